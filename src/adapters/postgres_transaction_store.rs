//! Postgres implementation of TransactionStore.

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::{Connection, PgConnection};

use crate::domain::Transaction;
use crate::ports::{StoreError, StoreResult, TransactionStore};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Postgres-backed transaction store. Each insert uses its own connection.
#[derive(Clone)]
pub struct PostgresTransactionStore {
    database_url: String,
}

impl PostgresTransactionStore {
    pub fn new(database_url: String) -> Self {
        Self { database_url }
    }

    async fn connect(&self) -> StoreResult<PgConnection> {
        PgConnection::connect(&self.database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    /// Creates the `records` table if needed.
    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        let mut conn = self.connect().await?;
        let result = MIGRATOR.run(&mut conn).await;
        let _ = conn.close().await;
        result?;

        tracing::info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for PostgresTransactionStore {
    async fn insert(&self, tx: &Transaction) -> StoreResult<()> {
        let mut conn = self.connect().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO records (id, timestamp, matched, file1, file2)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(tx.id)
        .bind(tx.timestamp)
        .bind(tx.matched)
        .bind(&tx.file1)
        .bind(&tx.file2)
        .execute(&mut conn)
        .await;

        if let Err(e) = conn.close().await {
            tracing::warn!(error = %e, "Failed to close transaction store connection");
        }

        result.map_err(|e| StoreError::Insert(e.to_string()))?;
        Ok(())
    }
}
