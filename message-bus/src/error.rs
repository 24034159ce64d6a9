//! Error types for message bus

use thiserror::Error;

/// Message bus error
#[derive(Debug, Error)]
pub enum Error {
    /// Connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Stream provisioning error
    #[error("Stream error: {0}")]
    Stream(String),

    /// Publish error
    #[error("Publish error: {0}")]
    Publish(String),

    /// Publish did not complete in time
    #[error("Publish timed out after {0}ms")]
    Timeout(u64),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
