use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub name: String,
    pub data: String,
    pub created_at: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            created_at: Utc::now(),
        }
    }
}

/// Durable destination for log entries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogStore: Send + Sync + 'static {
    async fn insert(&self, entry: &LogEntry) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: LogStore + ?Sized> LogStore for Arc<T> {
    async fn insert(&self, entry: &LogEntry) -> Result<(), StoreError> {
        (**self).insert(entry).await
    }
}
