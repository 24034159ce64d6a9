//! Event publisher

use crate::{
    client::NatsClient,
    message::{LogEvent, Severity},
    metrics::{MESSAGE_PUBLISH_DURATION, MESSAGE_PUBLISH_TOTAL},
    Error, Result,
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Capability to hand an event to the broker
#[async_trait]
pub trait EventEmitter: Send + Sync {
    /// Publish once; success means the broker stored the event
    async fn emit(&self, event: &LogEvent, severity: Severity) -> Result<()>;
}

/// Publisher configuration
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Deadline for publish plus broker acknowledgement
    pub publish_timeout: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            publish_timeout: Duration::from_secs(5),
        }
    }
}

/// JetStream publisher.
///
/// Makes exactly one attempt per event; callers that want retries own them.
pub struct Publisher {
    client: Arc<NatsClient>,
    config: PublisherConfig,
}

impl Publisher {
    /// Create new publisher
    pub fn new(client: Arc<NatsClient>, config: PublisherConfig) -> Self {
        Self { client, config }
    }

    async fn publish_once(&self, subject: &str, payload: Vec<u8>) -> Result<()> {
        // A fresh context per publish; the connection underneath is shared.
        let js = self.client.jetstream();

        let ack = js
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| Error::Publish(e.to_string()))?;

        ack.await
            .map_err(|e| Error::Publish(format!("publish ack failed: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl EventEmitter for Publisher {
    async fn emit(&self, event: &LogEvent, severity: Severity) -> Result<()> {
        let start = Instant::now();
        let subject = severity.subject();
        let payload = event.to_bytes()?;

        let result = match tokio::time::timeout(
            self.config.publish_timeout,
            self.publish_once(subject, payload),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(self.config.publish_timeout.as_millis() as u64)),
        };

        MESSAGE_PUBLISH_DURATION
            .with_label_values(&[subject])
            .observe(start.elapsed().as_secs_f64());

        let status = if result.is_ok() { "success" } else { "error" };
        MESSAGE_PUBLISH_TOTAL.with_label_values(&[subject, status]).inc();

        match &result {
            Ok(()) => info!("Published event {} to {}", event.name, subject),
            Err(e) => error!("Failed to publish event {} to {}: {}", event.name, subject, e),
        }

        result
    }
}
