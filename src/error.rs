use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::comparison::ComparisonError;
use crate::ports::StoreError;
use crate::storage::BlobStoreError;
use crate::use_cases::CompareFacesError;

pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} is required")]
    MissingFile(&'static str),

    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Comparison service error: {0}")]
    Comparison(#[from] ComparisonError),

    #[error("Blob storage error: {0}")]
    Storage(#[from] BlobStoreError),

    #[error("Transaction store error: {0}")]
    Persistence(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<CompareFacesError> for AppError {
    fn from(err: CompareFacesError) -> Self {
        match err {
            CompareFacesError::Comparison(e) => AppError::Comparison(e),
            CompareFacesError::Storage(e) => AppError::Storage(e),
            CompareFacesError::Persistence(e) => AppError::Persistence(e),
        }
    }
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFile(_) => StatusCode::BAD_REQUEST,
            AppError::Multipart(e) => e.status(),
            AppError::Comparison(_) | AppError::Storage(_) | AppError::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text returned to the caller. Causes of server errors are only logged.
    fn public_message(&self) -> String {
        match self {
            AppError::MissingFile(_) => self.to_string(),
            AppError::Multipart(e) => e.body_text(),
            AppError::Comparison(_) => "error calling comparison service".to_string(),
            AppError::Storage(_) => "failed to save images".to_string(),
            AppError::Persistence(_) => "error storing transaction".to_string(),
            AppError::Internal(_) => INTERNAL_SERVER_ERROR.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let body = Json(json!({
            "error": self.public_message(),
        }));

        (status, body).into_response()
    }
}
