use crate::config::{Config, StoreBackend};
use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};

pub struct ValidationReport {
    pub comparison_service: bool,
    pub blob_storage: bool,
    pub transaction_store: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.comparison_service && self.blob_storage && self.transaction_store
    }

    pub fn print(&self) {
        println!("\n=== Configuration Validation Report ===");
        println!("Comparison Service: {}", status(self.comparison_service));
        println!("Blob Storage:       {}", status(self.blob_storage));
        println!("Transaction Store:  {}", status(self.transaction_store));

        if !self.errors.is_empty() {
            println!("\nErrors:");
            for error in &self.errors {
                println!("  ❌ {}", error);
            }
        }

        println!("\nOverall Status: {}", if self.is_valid() { "✅ PASS" } else { "❌ FAIL" });
        println!("=======================================\n");
    }
}

fn status(ok: bool) -> &'static str {
    if ok { "✅ OK" } else { "❌ FAIL" }
}

/// Checks the configuration without contacting any of the services.
pub fn validate_config(config: &Config) -> ValidationReport {
    let mut report = ValidationReport {
        comparison_service: true,
        blob_storage: true,
        transaction_store: true,
        errors: Vec::new(),
    };

    if let Err(e) = validate_comparison_service(config) {
        report.comparison_service = false;
        report.errors.push(format!("Comparison service: {:#}", e));
    }

    if let Err(e) = validate_blob_storage(config) {
        report.blob_storage = false;
        report.errors.push(format!("Blob storage: {:#}", e));
    }

    if let Err(e) = validate_transaction_store(config) {
        report.transaction_store = false;
        report.errors.push(format!("Transaction store: {:#}", e));
    }

    report
}

fn validate_comparison_service(config: &Config) -> Result<()> {
    if config.comparison_url.is_empty() {
        anyhow::bail!("SERVICE1_URL is empty");
    }
    url::Url::parse(&config.comparison_url).context("SERVICE1_URL is not a valid URL")?;

    Ok(())
}

fn validate_blob_storage(config: &Config) -> Result<()> {
    if config.azure_account_name.is_empty() {
        anyhow::bail!("AZURE_ACCOUNT_NAME is empty");
    }
    if config.container_name.is_empty() {
        anyhow::bail!("CONTAINER_NAME is empty");
    }
    general_purpose::STANDARD
        .decode(config.azure_access_key.trim())
        .context("AZURE_ACCESS_KEY is not valid base64")?;
    url::Url::parse(&config.blob_endpoint()).context("AZURE_BLOB_ENDPOINT is not a valid URL")?;

    Ok(())
}

fn validate_transaction_store(config: &Config) -> Result<StoreBackend> {
    if config.store_url.is_empty() {
        anyhow::bail!("TRANSACTION_STORE_URL is empty");
    }
    let backend = config.store_backend()?;
    if backend == StoreBackend::Mongo
        && (config.store_database.is_empty() || config.store_collection.is_empty())
    {
        anyhow::bail!("MONGO_DATABASE and MONGO_COLLECTION must not be empty");
    }

    Ok(backend)
}
