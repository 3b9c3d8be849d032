use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Client, Request, Response, StatusCode};
use thiserror::Error;
use url::Url;

use super::SharedKeyCredential;
use crate::config::Config;
use crate::domain::{Transaction, UploadedFile};
use crate::ports::BlobStore;

#[derive(Error, Debug)]
pub enum BlobStoreError {
    #[error("HTTP request to blob storage failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Storage account key is not valid base64: {0}")]
    InvalidAccountKey(#[from] base64::DecodeError),
    #[error("Invalid blob storage endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("Failed to sign request: {0}")]
    Signing(String),
    #[error("{operation} failed with status {status}: {body}")]
    UnexpectedStatus {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },
}

/// Client for a single Azure Blob Storage container
#[derive(Clone)]
pub struct AzureBlobClient {
    client: Client,
    credential: SharedKeyCredential,
    container: String,
    container_url: Url,
}

impl AzureBlobClient {
    /// `endpoint` is the blob service root, e.g. `https://{account}.blob.core.windows.net`
    pub fn new(
        client: Client,
        credential: SharedKeyCredential,
        endpoint: &str,
        container: &str,
    ) -> Result<Self, BlobStoreError> {
        let mut container_url = Url::parse(endpoint)
            .map_err(|e| BlobStoreError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        container_url
            .path_segments_mut()
            .map_err(|_| BlobStoreError::InvalidEndpoint(endpoint.to_string()))?
            .pop_if_empty()
            .push(container);

        Ok(AzureBlobClient {
            client,
            credential,
            container: container.to_string(),
            container_url,
        })
    }

    pub fn from_config(client: Client, config: &Config) -> Result<Self, BlobStoreError> {
        let credential =
            SharedKeyCredential::new(config.azure_account_name.clone(), &config.azure_access_key)?;
        Self::new(
            client,
            credential,
            &config.blob_endpoint(),
            &config.container_name,
        )
    }

    pub fn default_endpoint(account: &str) -> String {
        format!("https://{}.blob.core.windows.net", account)
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Returns `true` when the container was created, `false` when it already existed.
    pub async fn create_container_if_not_exists(&self) -> Result<bool, BlobStoreError> {
        let mut url = self.container_url.clone();
        url.query_pairs_mut().append_pair("restype", "container");

        let request = self.client.put(url).header(CONTENT_LENGTH, "0").build()?;
        let response = self.execute(request).await?;

        match response.status() {
            StatusCode::CREATED => {
                tracing::info!(container = %self.container, "Created blob container");
                Ok(true)
            }
            StatusCode::CONFLICT => Ok(false),
            status => Err(unexpected_status("create container", status, response).await),
        }
    }

    /// Uploads `file` as a block blob named `key`, replacing any existing blob.
    pub async fn put_blob(&self, key: &str, file: &UploadedFile) -> Result<(), BlobStoreError> {
        let request = self
            .client
            .put(self.blob_url(key))
            .header("x-ms-blob-type", "BlockBlob")
            .header(CONTENT_TYPE, file.content_type_or_default())
            .header(CONTENT_LENGTH, file.len())
            .body(file.data.clone())
            .build()?;
        let response = self.execute(request).await?;

        match response.status() {
            StatusCode::CREATED => Ok(()),
            status => Err(unexpected_status("put blob", status, response).await),
        }
    }

    fn blob_url(&self, key: &str) -> Url {
        let mut url = self.container_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(key);
        }
        url
    }

    async fn execute(&self, mut request: Request) -> Result<Response, BlobStoreError> {
        self.credential.sign(&mut request)?;
        Ok(self.client.execute(request).await?)
    }
}

#[async_trait]
impl BlobStore for AzureBlobClient {
    async fn upload_files(
        &self,
        files: &[&UploadedFile],
        transaction: &Transaction,
    ) -> Result<(), BlobStoreError> {
        self.create_container_if_not_exists().await?;

        for file in files {
            let key = transaction.storage_key(&file.filename);
            self.put_blob(&key, file).await?;
            tracing::info!(
                transaction_id = %transaction.id,
                container = %self.container,
                blob = %key,
                field = %file.field,
                size = file.len(),
                "Uploaded file to blob storage"
            );
        }

        Ok(())
    }
}

async fn unexpected_status(
    operation: &'static str,
    status: StatusCode,
    response: Response,
) -> BlobStoreError {
    let body = response.text().await.unwrap_or_default();
    BlobStoreError::UnexpectedStatus {
        operation,
        status,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use mockito::Matcher;

    const CONTAINER_PATH: &str = r"^/faces(\?.*)?$";

    fn blob_client(endpoint: &str) -> AzureBlobClient {
        let credential = SharedKeyCredential::new("devstoreaccount1", "c2VjcmV0LWtleQ==").unwrap();
        AzureBlobClient::new(Client::new(), credential, endpoint, "faces").unwrap()
    }

    fn image(field: &str, name: &str) -> UploadedFile {
        UploadedFile::new(
            field,
            name,
            Some("image/png".to_string()),
            Bytes::from_static(b"image-bytes"),
        )
    }

    #[test]
    fn test_default_endpoint() {
        assert_eq!(
            AzureBlobClient::default_endpoint("myaccount"),
            "https://myaccount.blob.core.windows.net"
        );
    }

    #[test]
    fn test_blob_url_encodes_key() {
        let client = blob_client("http://127.0.0.1:10000/devstoreaccount1/");
        let url = client.blob_url("abc_my cat.png");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:10000/devstoreaccount1/faces/abc_my%20cat.png"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let credential = SharedKeyCredential::new("acct", "c2VjcmV0").unwrap();
        let result = AzureBlobClient::new(Client::new(), credential, "not a url", "faces");
        assert!(matches!(result, Err(BlobStoreError::InvalidEndpoint(_))));
    }

    #[tokio::test]
    async fn test_upload_files_creates_container_and_uploads() {
        let mut server = mockito::Server::new_async().await;
        let tx = Transaction::new(true, "cat.png", "cat2.png");

        let container = server
            .mock("PUT", Matcher::Regex(CONTAINER_PATH.into()))
            .match_query(Matcher::UrlEncoded("restype".into(), "container".into()))
            .match_header(
                "authorization",
                Matcher::Regex("^SharedKey devstoreaccount1:".into()),
            )
            .match_header("x-ms-version", "2021-08-06")
            .with_status(201)
            .expect(1)
            .create_async()
            .await;
        let first = server
            .mock("PUT", format!("/faces/{}", tx.file1).as_str())
            .match_header("x-ms-blob-type", "BlockBlob")
            .match_header("content-type", "image/png")
            .match_body("image-bytes")
            .with_status(201)
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("PUT", format!("/faces/{}", tx.file2).as_str())
            .with_status(201)
            .expect(1)
            .create_async()
            .await;

        let client = blob_client(&server.url());
        let file1 = image("file1", "cat.png");
        let file2 = image("file2", "cat2.png");
        client.upload_files(&[&file1, &file2], &tx).await.unwrap();

        container.assert_async().await;
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_existing_container_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;

        let _container = server
            .mock("PUT", Matcher::Regex(CONTAINER_PATH.into()))
            .match_query(Matcher::UrlEncoded("restype".into(), "container".into()))
            .with_status(409)
            .create_async()
            .await;

        let client = blob_client(&server.url());
        let created = client.create_container_if_not_exists().await.unwrap();
        assert!(!created);
    }

    #[tokio::test]
    async fn test_container_failure_skips_uploads() {
        let mut server = mockito::Server::new_async().await;
        let tx = Transaction::new(false, "a.png", "b.png");

        let _container = server
            .mock("PUT", Matcher::Regex(CONTAINER_PATH.into()))
            .match_query(Matcher::UrlEncoded("restype".into(), "container".into()))
            .with_status(403)
            .with_body("AuthenticationFailed")
            .create_async()
            .await;
        let blobs = server
            .mock("PUT", Matcher::Regex(r"^/faces/.+".into()))
            .expect(0)
            .create_async()
            .await;

        let client = blob_client(&server.url());
        let file1 = image("file1", "a.png");
        let file2 = image("file2", "b.png");
        let result = client.upload_files(&[&file1, &file2], &tx).await;

        match result {
            Err(BlobStoreError::UnexpectedStatus { status, body, .. }) => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(body, "AuthenticationFailed");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        blobs.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_earlier_blobs() {
        let mut server = mockito::Server::new_async().await;
        let tx = Transaction::new(true, "cat.png", "cat2.png");

        let _container = server
            .mock("PUT", Matcher::Regex(CONTAINER_PATH.into()))
            .match_query(Matcher::UrlEncoded("restype".into(), "container".into()))
            .with_status(201)
            .create_async()
            .await;
        let first = server
            .mock("PUT", format!("/faces/{}", tx.file1).as_str())
            .with_status(201)
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("PUT", format!("/faces/{}", tx.file2).as_str())
            .with_status(500)
            .expect(1)
            .create_async()
            .await;

        let client = blob_client(&server.url());
        let file1 = image("file1", "cat.png");
        let file2 = image("file2", "cat2.png");
        let result = client.upload_files(&[&file1, &file2], &tx).await;

        assert!(matches!(
            result,
            Err(BlobStoreError::UnexpectedStatus {
                operation: "put blob",
                ..
            })
        ));
        first.assert_async().await;
        second.assert_async().await;
    }
}
