// Binary-RPC adapter for the log backend
// One connection per call, closed on every exit path when the client drops

use async_trait::async_trait;
use rpc_core::client::call_once;
use rpc_core::contract::{LogEntryArgs, LOG_INFO};
use std::time::Duration;
use tracing::info;

use super::{Delivered, LogBackend, Outcome};
use crate::models::LogPayload;

pub struct RpcLogAdapter {
    addr: String,
    timeout: Duration,
}

impl RpcLogAdapter {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
        }
    }
}

#[async_trait]
impl LogBackend for RpcLogAdapter {
    async fn write_log(&self, payload: &LogPayload) -> Outcome {
        let args = LogEntryArgs {
            name: payload.name.clone(),
            data: payload.data.clone(),
        };

        let reply: String = call_once(&self.addr, LOG_INFO, &args, self.timeout).await?;
        info!("Log entry {} recorded via RPC", payload.name);

        if reply.trim().is_empty() {
            return Ok(Delivered::message("Logged"));
        }
        Ok(Delivered::message(reply))
    }
}
