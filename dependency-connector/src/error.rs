//! Error types for dependency connection

use thiserror::Error;

/// Dependency connection error
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Every permitted attempt failed
    #[error("unable to connect to {dependency} after {attempts} attempts: {last_error}")]
    Exhausted {
        /// Dependency name
        dependency: String,
        /// Number of attempts made
        attempts: u32,
        /// Error reported by the final attempt
        last_error: String,
    },
}
