use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use dependency_connector::BackoffPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub backends: BackendsConfig,
    pub rpc: RpcConfig,
    pub nats: NatsConfig,
    pub log_backend: LogBackendConfig,
    pub connector: ConnectorConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackendsConfig {
    pub auth_url: String,
    pub mail_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RpcConfig {
    pub log_addr: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NatsConfig {
    pub url: String,
    pub stream: String,
    pub connect_timeout_secs: u64,
    pub publish_timeout_secs: u64,
}

/// Transport used for the `log` action
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogStrategy {
    /// Synchronous RPC; the caller learns whether the entry was recorded
    Rpc,
    /// Fire-and-forget publish to the message broker
    Queue,
}

impl fmt::Display for LogStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogStrategy::Rpc => f.write_str("rpc"),
            LogStrategy::Queue => f.write_str("queue"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogBackendConfig {
    pub strategy: LogStrategy,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConnectorConfig {
    pub max_attempts: u32,
    pub backoff_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelemetryConfig {
    pub json: bool,
}

impl Config {
    /// Built-in defaults, matching the container network names of the backends
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("backends.auth_url", "http://authentication-service/authenticate")?
            .set_default("backends.mail_url", "http://mail-service/send")?
            .set_default("backends.timeout_secs", 10)?
            .set_default("rpc.log_addr", "logger-service:5001")?
            .set_default("rpc.timeout_secs", 10)?
            .set_default("nats.url", "nats://nats:4222")?
            .set_default("nats.stream", "LOGS")?
            .set_default("nats.connect_timeout_secs", 5)?
            .set_default("nats.publish_timeout_secs", 5)?
            .set_default("log_backend.strategy", "rpc")?
            .set_default("connector.max_attempts", 10)?
            .set_default("connector.backoff_secs", 2)?
            .set_default("telemetry.json", false)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let mut builder = Self::defaults()?;

        if let Ok(config_file) = env::var("CONFIG_FILE") {
            builder = builder.add_source(File::with_name(&config_file).required(false));
        } else {
            builder = builder.add_source(
                File::with_name(&format!("config/{}", environment)).required(false),
            );
        }

        // GATEWAY__SERVER__PORT=9000, GATEWAY__LOG_BACKEND__STRATEGY=queue, ...
        builder = builder.add_source(Environment::with_prefix("GATEWAY").separator("__"));

        if let Ok(nats_url) = env::var("NATS_URL") {
            builder = builder.set_override("nats.url", nats_url)?;
        }

        if let Ok(auth_url) = env::var("AUTH_SERVICE_URL") {
            builder = builder.set_override("backends.auth_url", auth_url)?;
        }

        if let Ok(mail_url) = env::var("MAIL_SERVICE_URL") {
            builder = builder.set_override("backends.mail_url", mail_url)?;
        }

        if let Ok(log_addr) = env::var("LOGGER_RPC_ADDR") {
            builder = builder.set_override("rpc.log_addr", log_addr)?;
        }

        if let Ok(strategy) = env::var("LOG_STRATEGY") {
            builder = builder.set_override("log_backend.strategy", strategy)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port cannot be 0".to_string());
        }

        if self.backends.auth_url.is_empty() || self.backends.mail_url.is_empty() {
            return Err("Backend URLs are required".to_string());
        }

        if self.backends.timeout_secs == 0 || self.rpc.timeout_secs == 0 {
            return Err("Backend timeouts must be greater than 0".to_string());
        }

        if self.rpc.log_addr.is_empty() {
            return Err("Logger RPC address is required".to_string());
        }

        if self.log_backend.strategy == LogStrategy::Queue {
            if self.nats.url.is_empty() {
                return Err("NATS URL is required for the queue log strategy".to_string());
            }
            if self.nats.publish_timeout_secs == 0 {
                return Err("NATS publish timeout must be greater than 0".to_string());
            }
        }

        if self.connector.max_attempts == 0 {
            return Err("Connector must allow at least one attempt".to_string());
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            max_attempts: self.connector.max_attempts,
            interval: Duration::from_secs(self.connector.backoff_secs),
        }
    }
}
