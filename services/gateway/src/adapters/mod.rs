// Backend call adapters
// One adapter per transport; each turns a typed payload into an Outcome

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::models::{AuthPayload, LogPayload, MailPayload};

pub mod http;
pub mod queue;
pub mod rpc;

pub use http::{HttpBackend, HttpBackendConfig};
pub use queue::QueueLogAdapter;
pub use rpc::RpcLogAdapter;

/// Successful backend call
#[derive(Debug, Clone, PartialEq)]
pub struct Delivered {
    /// Adapter-specific success text
    pub message: String,
    /// Backend data passed through to the caller
    pub data: Option<serde_json::Value>,
}

impl Delivered {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

pub type Outcome = Result<Delivered, GatewayError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn authenticate(&self, payload: &AuthPayload) -> Outcome;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailBackend: Send + Sync {
    async fn send_mail(&self, payload: &MailPayload) -> Outcome;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogBackend: Send + Sync {
    async fn write_log(&self, payload: &LogPayload) -> Outcome;
}
