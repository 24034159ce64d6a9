// Inbound/outbound envelopes
// The wire shapes every caller and every HTTP backend agree on

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GatewayError;

/// Request accepted on the dispatch endpoint.
///
/// Exactly one payload is expected, matching `action`; the others are ignored.
/// Payload fields missing from the body decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEnvelope {
    #[serde(default)]
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<LogPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<MailPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogPayload {
    pub name: String,
    pub data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailPayload {
    pub from_address: String,
    pub to_address: String,
    pub subject: String,
    pub message: String,
}

/// Closed set of actions the gateway can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Auth,
    Log,
    Mail,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Auth => "auth",
            Action::Log => "log",
            Action::Mail => "mail",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = GatewayError;

    /// Exact, case-sensitive match
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auth" => Ok(Action::Auth),
            "log" => Ok(Action::Log),
            "mail" => Ok(Action::Mail),
            "" => Err(GatewayError::Validation("action is required".to_string())),
            _ => Err(GatewayError::Validation("unknown action".to_string())),
        }
    }
}

/// Uniform response returned to callers and by HTTP backends.
///
/// `error == true` implies `data` is absent; `message` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub error: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ResultEnvelope {
    pub fn success(message: impl Into<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            error: false,
            message: non_empty(message.into(), "ok"),
            data,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: non_empty(message.into(), "request failed"),
            data: None,
        }
    }
}

fn non_empty(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
