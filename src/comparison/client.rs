use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::domain::UploadedFile;
use crate::ports::FaceComparator;

#[derive(Error, Debug)]
pub enum ComparisonError {
    #[error("HTTP request to comparison service failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Invalid JSON from comparison service: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("`matched` field missing or not a boolean")]
    MissingMatched,
    #[error("Comparison service returned status {0}")]
    UnexpectedStatus(StatusCode),
}

/// HTTP client for the remote face-comparison service
#[derive(Clone)]
pub struct ComparisonClient {
    client: Client,
    url: String,
}

impl ComparisonClient {
    /// Creates a client posting to `url` with default client settings
    pub fn new(url: String) -> Self {
        Self::with_client(Client::new(), url)
    }

    /// Creates a client reusing an existing connection pool
    pub fn with_client(client: Client, url: String) -> Self {
        ComparisonClient { client, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends both images as `file1`/`file2` and returns the reported `matched` flag.
    pub async fn compare_files(
        &self,
        file1: &UploadedFile,
        file2: &UploadedFile,
    ) -> Result<bool, ComparisonError> {
        let form = Form::new()
            .part("file1", file_part(file1)?)
            .part("file2", file_part(file2)?);

        tracing::debug!(
            url = %self.url,
            file1 = %file1.filename,
            file2 = %file2.filename,
            "Calling comparison service"
        );

        let response = self.client.post(&self.url).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        parse_matched(status, &body)
    }
}

#[async_trait]
impl FaceComparator for ComparisonClient {
    async fn compare(
        &self,
        file1: &UploadedFile,
        file2: &UploadedFile,
    ) -> Result<bool, ComparisonError> {
        self.compare_files(file1, file2).await
    }
}

fn file_part(file: &UploadedFile) -> Result<Part, ComparisonError> {
    let part = Part::bytes(file.data.to_vec())
        .file_name(file.filename.clone())
        .mime_str(file.content_type_or_default())?;
    Ok(part)
}

/// The status is only consulted when the body carries no usable `matched` flag.
fn parse_matched(status: StatusCode, body: &[u8]) -> Result<bool, ComparisonError> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) if !status.is_success() => return Err(ComparisonError::UnexpectedStatus(status)),
        Err(e) => return Err(ComparisonError::InvalidJson(e)),
    };

    match value.get("matched") {
        Some(Value::Bool(matched)) => Ok(*matched),
        _ if !status.is_success() => Err(ComparisonError::UnexpectedStatus(status)),
        _ => Err(ComparisonError::MissingMatched),
    }
}
