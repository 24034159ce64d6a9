//! NATS connection and durable stream provisioning

use crate::{Error, Result};
use async_nats::jetstream::{
    self,
    stream::{Config as StreamConfig, RetentionPolicy, StorageType},
};
use async_trait::async_trait;
use dependency_connector::Dependency;
use std::time::Duration;
use tracing::info;

/// NATS connection configuration
#[derive(Debug, Clone)]
pub struct NatsConfig {
    /// Server URL
    pub url: String,

    /// Durable stream holding log events
    pub stream: String,

    /// Subjects captured by the stream
    pub subjects: Vec<String>,

    /// Per-attempt connect timeout
    pub connect_timeout: Duration,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            url: "nats://localhost:4222".to_string(),
            stream: "LOGS".to_string(),
            subjects: vec!["log.*".to_string()],
            connect_timeout: Duration::from_secs(5),
        }
    }
}

/// Live NATS connection. Cheap to share; safe for concurrent publishers.
#[derive(Clone)]
pub struct NatsClient {
    client: async_nats::Client,
    config: NatsConfig,
}

impl NatsClient {
    /// Open a connection (single attempt)
    pub async fn connect(config: NatsConfig) -> Result<Self> {
        info!("Connecting to NATS at {}", config.url);

        let client = async_nats::ConnectOptions::new()
            .connection_timeout(config.connect_timeout)
            .connect(config.url.as_str())
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Round-trip PING/PONG with the server
    pub async fn ping(&self) -> Result<()> {
        self.client
            .flush()
            .await
            .map_err(|e| Error::Connection(format!("ping failed: {}", e)))
    }

    /// Whether the underlying connection is currently up
    pub fn is_connected(&self) -> bool {
        self.client.connection_state() == async_nats::connection::State::Connected
    }

    /// JetStream context bound to this connection
    pub fn jetstream(&self) -> jetstream::Context {
        jetstream::new(self.client.clone())
    }

    /// Create the durable stream if it does not exist yet
    pub async fn ensure_stream(&self) -> Result<()> {
        let config = StreamConfig {
            name: self.config.stream.clone(),
            description: Some("Gateway log events".to_string()),
            subjects: self.config.subjects.clone(),
            retention: RetentionPolicy::Limits,
            storage: StorageType::File,
            max_age: Duration::from_secs(7 * 24 * 3600),
            ..Default::default()
        };

        self.jetstream()
            .get_or_create_stream(config)
            .await
            .map_err(|e| Error::Stream(e.to_string()))?;

        info!("Stream {} ready", self.config.stream);
        Ok(())
    }
}

/// Message broker as a startup dependency
pub struct NatsDependency {
    config: NatsConfig,
}

impl NatsDependency {
    /// Create new dependency descriptor
    pub fn new(config: NatsConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Dependency for NatsDependency {
    type Handle = NatsClient;

    fn name(&self) -> &str {
        "message broker"
    }

    async fn open(&self) -> anyhow::Result<NatsClient> {
        let client = NatsClient::connect(self.config.clone()).await?;
        client.ensure_stream().await?;
        Ok(client)
    }

    async fn ping(&self, handle: &NatsClient) -> anyhow::Result<()> {
        Ok(handle.ping().await?)
    }
}
