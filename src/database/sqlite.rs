use crate::database::StoragePort;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Sqlite};

pub struct SqliteStorage {
    pool: Pool<Sqlite>,
}

impl SqliteStorage {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoragePort for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM content_blobs WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .context(format!("Failed to read blob {}", key))?;

        Ok(value)
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM content_blobs ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list blob keys")?;

        Ok(keys)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        // the db does the insert/update in one statement
        sqlx::query(
            r#"
            INSERT INTO content_blobs (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await
        .context(format!("Failed to write blob {}", key))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM content_blobs WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .context(format!("Failed to delete blob {}", key))?;

        Ok(())
    }
}
