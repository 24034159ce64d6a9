// Gateway error taxonomy
// Every failure a dispatch can end in; mapped to HTTP by the normalizer

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Malformed request or unknown action; no backend is called
    #[error("{0}")]
    Validation(String),

    /// Could not talk to a backend (connect, encode, decode, timeout)
    #[error("{0}")]
    Transport(String),

    /// Backend explicitly rejected the credentials
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Backend answered with an unexpected status
    #[error("{service} unavailable")]
    BackendUnavailable { service: &'static str },
}

impl GatewayError {
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            GatewayError::Transport("transport error".to_string())
        } else {
            GatewayError::Transport(message)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            GatewayError::Transport(_) => StatusCode::BAD_GATEWAY,
            GatewayError::BackendUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Metric label
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Validation(_) => "validation_error",
            GatewayError::InvalidCredentials => "invalid_credentials",
            GatewayError::Transport(_) => "transport_error",
            GatewayError::BackendUnavailable { .. } => "backend_unavailable",
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::transport(err.to_string())
    }
}

impl From<rpc_core::RpcError> for GatewayError {
    fn from(err: rpc_core::RpcError) -> Self {
        GatewayError::transport(err.to_string())
    }
}

impl From<message_bus::Error> for GatewayError {
    fn from(err: message_bus::Error) -> Self {
        GatewayError::transport(err.to_string())
    }
}
