//! Azure Blob Storage access over the REST API.

pub mod client;
pub mod shared_key;

pub use client::{AzureBlobClient, BlobStoreError};
pub use shared_key::SharedKeyCredential;
