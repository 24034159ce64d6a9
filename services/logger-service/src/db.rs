// PostgreSQL: startup dependency and log store

use async_trait::async_trait;
use dependency_connector::Dependency;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Connection;
use std::time::Duration;
use tracing::info;

use crate::store::{LogEntry, LogStore, StoreError};

/// Primary data store as a startup dependency
pub struct PostgresDependency {
    url: String,
    max_connections: u32,
    acquire_timeout: Duration,
}

impl PostgresDependency {
    pub fn new(url: impl Into<String>, max_connections: u32, acquire_timeout: Duration) -> Self {
        Self {
            url: url.into(),
            max_connections,
            acquire_timeout,
        }
    }
}

#[async_trait]
impl Dependency for PostgresDependency {
    type Handle = PgPool;

    fn name(&self) -> &str {
        "postgres"
    }

    async fn open(&self) -> anyhow::Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .connect(&self.url)
            .await?;
        Ok(pool)
    }

    async fn ping(&self, pool: &PgPool) -> anyhow::Result<()> {
        let mut conn = pool.acquire().await?;
        conn.ping().await?;
        Ok(())
    }
}

pub struct PgLogStore {
    pool: PgPool,
}

impl PgLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS log_entries (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("log_entries table ready");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl LogStore for PgLogStore {
    async fn insert(&self, entry: &LogEntry) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO log_entries (name, data, created_at) VALUES ($1, $2, $3)")
            .bind(&entry.name)
            .bind(&entry.data)
            .bind(entry.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
