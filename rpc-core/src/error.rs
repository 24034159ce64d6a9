//! Error types for the RPC transport

use std::time::Duration;
use thiserror::Error;

/// RPC error
#[derive(Debug, Error)]
pub enum RpcError {
    /// Could not open the TCP connection
    #[error("dial tcp {addr}: {source}")]
    Connect {
        /// Remote address
        addr: String,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },

    /// Socket read/write failed mid-call
    #[error("rpc transport error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame body could not be encoded or decoded
    #[error("rpc encoding error: {0}")]
    Codec(#[from] bincode::Error),

    /// The remote procedure returned an error
    #[error("{0}")]
    Remote(String),

    /// Peer closed the connection before replying
    #[error("rpc connection closed before reply")]
    Closed,

    /// Connect + call exceeded its deadline
    #[error("rpc call timed out after {0:?}")]
    Timeout(Duration),

    /// Reply did not match the request
    #[error("rpc protocol error: {0}")]
    Protocol(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, RpcError>;
