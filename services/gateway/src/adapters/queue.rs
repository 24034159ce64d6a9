// Message-queue adapter for the log backend
// Fire-and-forget: success means the broker stored the event, nothing more

use async_trait::async_trait;
use message_bus::{EventEmitter, LogEvent, Severity};
use std::sync::Arc;

use super::{Delivered, LogBackend, Outcome};
use crate::models::LogPayload;

pub struct QueueLogAdapter {
    emitter: Arc<dyn EventEmitter>,
    severity: Severity,
}

impl QueueLogAdapter {
    pub fn new(emitter: Arc<dyn EventEmitter>) -> Self {
        Self {
            emitter,
            severity: Severity::Info,
        }
    }
}

#[async_trait]
impl LogBackend for QueueLogAdapter {
    async fn write_log(&self, payload: &LogPayload) -> Outcome {
        let event = LogEvent::new(payload.name.clone(), payload.data.clone());
        self.emitter.emit(&event, self.severity).await?;
        Ok(Delivered::message("Logged via message queue"))
    }
}
