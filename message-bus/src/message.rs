//! Log events carried on the bus

use serde::{Deserialize, Serialize};
use std::fmt;

/// Routing severity; selects the subject an event is published on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
}

impl Severity {
    /// Subject (routing key) for this severity
    pub fn subject(&self) -> &'static str {
        match self {
            Severity::Info => "log.INFO",
            Severity::Warning => "log.WARNING",
            Severity::Error => "log.ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subject())
    }
}

/// Log event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Entry name
    pub name: String,
    /// Entry data
    pub data: String,
}

impl LogEvent {
    /// Create new event
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Serialize to JSON bytes
    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}
