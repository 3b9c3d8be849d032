//! MongoDB implementation of TransactionStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::Client;
use serde::{Deserialize, Serialize};

use crate::domain::Transaction;
use crate::ports::{StoreError, StoreResult, TransactionStore};

/// Opens a fresh client per insert and shuts it down afterwards.
#[derive(Clone)]
pub struct MongoTransactionStore {
    uri: String,
    database: String,
    collection: String,
}

impl MongoTransactionStore {
    pub fn new(uri: String, database: String, collection: String) -> Self {
        Self {
            uri,
            database,
            collection,
        }
    }
}

#[async_trait]
impl TransactionStore for MongoTransactionStore {
    async fn insert(&self, tx: &Transaction) -> StoreResult<()> {
        let client = Client::with_uri_str(&self.uri)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let result = client
            .database(&self.database)
            .collection::<TransactionDocument>(&self.collection)
            .insert_one(TransactionDocument::from(tx), None)
            .await;

        client.shutdown().await;

        result.map_err(|e| StoreError::Insert(e.to_string()))?;
        Ok(())
    }
}

/// Internal document shape. Not exposed outside the adapter.
#[derive(Debug, Serialize, Deserialize)]
struct TransactionDocument {
    #[serde(rename = "_id")]
    id: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    timestamp: DateTime<Utc>,
    matched: bool,
    file1: String,
    file2: String,
}

impl From<&Transaction> for TransactionDocument {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.to_string(),
            timestamp: tx.timestamp,
            matched: tx.matched,
            file1: tx.file1.clone(),
            file2: tx.file2.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_shape() {
        let tx = Transaction::new(true, "cat.png", "cat2.png");
        let doc = bson::to_document(&TransactionDocument::from(&tx)).unwrap();

        assert_eq!(doc.get_str("_id").unwrap(), tx.id.to_string());
        assert!(doc.get_bool("matched").unwrap());
        assert_eq!(doc.get_str("file1").unwrap(), tx.file1);
        assert_eq!(doc.get_str("file2").unwrap(), tx.file2);
        assert_eq!(
            doc.get_datetime("timestamp").unwrap().timestamp_millis(),
            tx.timestamp.timestamp_millis()
        );
        assert!(doc.get("id").is_none());
    }

    #[tokio::test]
    async fn test_invalid_uri_is_connection_error() {
        let store = MongoTransactionStore::new(
            "not-a-mongo-uri".to_string(),
            "transactions".to_string(),
            "records".to_string(),
        );
        let tx = Transaction::new(false, "a.png", "b.png");

        let result = store.insert(&tx).await;
        assert!(matches!(result, Err(StoreError::Connection(_))));
    }
}
