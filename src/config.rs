use anyhow::Context;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Endpoint of the remote face-comparison service.
    pub comparison_url: String,
    pub azure_account_name: String,
    pub azure_access_key: String,
    pub azure_blob_endpoint: Option<String>,
    pub container_name: String,
    /// Connection string of the transaction store (`mongodb://` or `postgres://`).
    pub store_url: String,
    pub store_database: String,
    pub store_collection: String,
    /// Optional request body cap; unset means no limit.
    pub max_upload_bytes: Option<usize>,
    pub cors_allowed_origins: Option<String>,
    pub log_format: LogFormat,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Postgres,
}

impl StoreBackend {
    pub fn from_url(url: &str) -> anyhow::Result<Self> {
        let scheme = url.split_once("://").map(|(scheme, _)| scheme);
        match scheme {
            Some("mongodb") | Some("mongodb+srv") => Ok(StoreBackend::Mongo),
            Some("postgres") | Some("postgresql") => Ok(StoreBackend::Postgres),
            _ => anyhow::bail!(
                "TRANSACTION_STORE_URL must start with mongodb://, mongodb+srv://, postgres:// or postgresql://"
            ),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{} is required", key));

        Ok(Config {
            server_port: lookup("SERVER_PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("SERVER_PORT must be a port number")?,
            comparison_url: required("SERVICE1_URL")?,
            azure_account_name: required("AZURE_ACCOUNT_NAME")?,
            azure_access_key: required("AZURE_ACCESS_KEY")?,
            azure_blob_endpoint: lookup("AZURE_BLOB_ENDPOINT").filter(|v| !v.trim().is_empty()),
            container_name: required("CONTAINER_NAME")?,
            // MONGO_STRING is the legacy name, read when the neutral one is unset.
            store_url: lookup("TRANSACTION_STORE_URL")
                .or_else(|| lookup("MONGO_STRING"))
                .context("TRANSACTION_STORE_URL (or MONGO_STRING) is required")?,
            store_database: lookup("MONGO_DATABASE").unwrap_or_else(|| "transactions".to_string()),
            store_collection: lookup("MONGO_COLLECTION").unwrap_or_else(|| "records".to_string()),
            max_upload_bytes: match lookup("MAX_UPLOAD_BYTES").filter(|v| !v.trim().is_empty()) {
                Some(raw) => Some(
                    raw.parse()
                        .context("MAX_UPLOAD_BYTES must be a number of bytes")?,
                ),
                None => None,
            },
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS").filter(|v| !v.trim().is_empty()),
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        })
    }

    pub fn blob_endpoint(&self) -> String {
        self.azure_blob_endpoint
            .clone()
            .unwrap_or_else(|| crate::storage::AzureBlobClient::default_endpoint(&self.azure_account_name))
    }

    pub fn store_backend(&self) -> anyhow::Result<StoreBackend> {
        StoreBackend::from_url(&self.store_url)
    }
}
