//! Transaction domain entity.
//! The persisted record of one face-comparison request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Domain entity representing a comparison transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub matched: bool,
    /// Storage key of the first image.
    pub file1: String,
    /// Storage key of the second image.
    pub file2: String,
}

impl Transaction {
    /// Builds a transaction with a fresh id; both storage keys are derived from it.
    pub fn new(matched: bool, file1_name: &str, file2_name: &str) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            timestamp: Utc::now(),
            matched,
            file1: storage_key(id, file1_name),
            file2: storage_key(id, file2_name),
        }
    }

    /// Key under which a file belonging to this transaction is stored.
    pub fn storage_key(&self, filename: &str) -> String {
        storage_key(self.id, filename)
    }
}

fn storage_key(id: Uuid, filename: &str) -> String {
    format!("{}_{}", id, filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_prefixed_with_id() {
        let tx = Transaction::new(true, "cat.png", "cat2.png");

        assert_eq!(tx.file1, format!("{}_cat.png", tx.id));
        assert_eq!(tx.file2, format!("{}_cat2.png", tx.id));
        assert_eq!(tx.storage_key("cat.png"), tx.file1);
    }

    #[test]
    fn test_ids_are_unique_per_transaction() {
        let a = Transaction::new(false, "cat.png", "cat2.png");
        let b = Transaction::new(false, "cat.png", "cat2.png");

        assert_ne!(a.id, b.id);
        assert_ne!(a.file1, b.file1);
        assert_ne!(a.file2, b.file2);
    }

    #[test]
    fn test_serializes_id_as_string() {
        let tx = Transaction::new(true, "a.jpg", "b.jpg");
        let json = serde_json::to_value(&tx).unwrap();

        assert_eq!(json["id"], tx.id.to_string());
        assert_eq!(json["matched"], true);
    }
}
