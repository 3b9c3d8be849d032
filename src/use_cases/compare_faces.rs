//! Compare faces use case.
//! Runs the comparison, then stores both images and the transaction record.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::comparison::ComparisonError;
use crate::domain::{Transaction, UploadedFile};
use crate::ports::{BlobStore, FaceComparator, StoreError, TransactionStore};
use crate::storage::BlobStoreError;

/// Input for the CompareFaces use case.
#[derive(Debug)]
pub struct CompareFacesInput {
    pub file1: UploadedFile,
    pub file2: UploadedFile,
}

/// Output of the CompareFaces use case.
#[derive(Debug)]
pub struct CompareFacesOutput {
    pub transaction_id: Uuid,
    pub matched: bool,
}

/// Failure of one step; later steps were not attempted.
#[derive(Debug, Error)]
pub enum CompareFacesError {
    #[error("comparison failed: {0}")]
    Comparison(#[from] ComparisonError),

    #[error("upload failed: {0}")]
    Storage(#[from] BlobStoreError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

/// Use case for comparing two faces and recording the outcome.
pub struct CompareFaces {
    comparator: Arc<dyn FaceComparator>,
    blob_store: Arc<dyn BlobStore>,
    transaction_store: Arc<dyn TransactionStore>,
}

impl CompareFaces {
    pub fn new(
        comparator: Arc<dyn FaceComparator>,
        blob_store: Arc<dyn BlobStore>,
        transaction_store: Arc<dyn TransactionStore>,
    ) -> Self {
        Self {
            comparator,
            blob_store,
            transaction_store,
        }
    }

    /// Steps run strictly in order and nothing is undone on failure:
    /// blobs uploaded before a failing insert stay in the container.
    pub async fn execute(
        &self,
        input: CompareFacesInput,
    ) -> Result<CompareFacesOutput, CompareFacesError> {
        let CompareFacesInput { file1, file2 } = input;

        let matched = self.comparator.compare(&file1, &file2).await?;

        let transaction = Transaction::new(matched, &file1.filename, &file2.filename);
        tracing::info!(
            transaction_id = %transaction.id,
            matched,
            "Face comparison completed"
        );

        self.blob_store
            .upload_files(&[&file1, &file2], &transaction)
            .await?;

        self.transaction_store.insert(&transaction).await?;
        tracing::info!(transaction_id = %transaction.id, "Transaction recorded");

        Ok(CompareFacesOutput {
            transaction_id: transaction.id,
            matched: transaction.matched,
        })
    }
}
