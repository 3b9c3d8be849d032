//! Transaction store adapters, selected by connection-string scheme.

pub mod mongo_transaction_store;
pub mod postgres_transaction_store;

use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::ports::TransactionStore;

pub use mongo_transaction_store::MongoTransactionStore;
pub use postgres_transaction_store::PostgresTransactionStore;

/// Builds the store configured by `TRANSACTION_STORE_URL`, running migrations for Postgres.
pub async fn transaction_store(config: &Config) -> anyhow::Result<Arc<dyn TransactionStore>> {
    match config.store_backend()? {
        StoreBackend::Mongo => {
            tracing::info!(
                database = %config.store_database,
                collection = %config.store_collection,
                "Using MongoDB transaction store"
            );
            Ok(Arc::new(MongoTransactionStore::new(
                config.store_url.clone(),
                config.store_database.clone(),
                config.store_collection.clone(),
            )))
        }
        StoreBackend::Postgres => {
            let store = PostgresTransactionStore::new(config.store_url.clone());
            store.run_migrations().await?;
            tracing::info!("Using PostgreSQL transaction store");
            Ok(Arc::new(store))
        }
    }
}
