//! Procedures exposed by the log backend

use serde::{Deserialize, Serialize};

/// Record one log entry; replies with an acknowledgement string
pub const LOG_INFO: &str = "LogService.LogInfo";

/// Arguments of [`LOG_INFO`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntryArgs {
    /// Entry name
    pub name: String,
    /// Entry data
    pub data: String,
}
