//! Ports: the interfaces the orchestrator needs from its collaborators.

use async_trait::async_trait;
use thiserror::Error;

use crate::comparison::ComparisonError;
use crate::domain::{Transaction, UploadedFile};
use crate::storage::BlobStoreError;

/// Error type for transaction store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("error connecting to transaction store: {0}")]
    Connection(String),

    #[error("error inserting transaction: {0}")]
    Insert(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Remote service deciding whether two images show the same face.
#[async_trait]
pub trait FaceComparator: Send + Sync {
    async fn compare(
        &self,
        file1: &UploadedFile,
        file2: &UploadedFile,
    ) -> Result<bool, ComparisonError>;
}

/// Object storage for the uploaded images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads every file under `transaction.storage_key(filename)`.
    /// Stops at the first failure; files uploaded before it are kept.
    async fn upload_files(
        &self,
        files: &[&UploadedFile],
        transaction: &Transaction,
    ) -> Result<(), BlobStoreError>;
}

/// Document store receiving one record per transaction.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn insert(&self, transaction: &Transaction) -> StoreResult<()>;
}
