use config::{ConfigError, Environment, File};
use dependency_connector::BackoffPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub connector: ConnectorConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub rpc_addr: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
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
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .set_default("server.rpc_addr", "0.0.0.0:5001")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 5)?
            .set_default("connector.max_attempts", 10)?
            .set_default("connector.backoff_secs", 2)?
            .set_default("telemetry.json", false)?;

        if let Ok(config_file) = env::var("CONFIG_FILE") {
            builder = builder.add_source(File::with_name(&config_file).required(false));
        } else {
            builder = builder.add_source(
                File::with_name(&format!("config/{}", environment)).required(false),
            );
        }

        builder = builder.add_source(Environment::with_prefix("LOGGER").separator("__"));

        // Connection string handed to the container
        if let Ok(dsn) = env::var("DSN") {
            builder = builder.set_override("database.url", dsn)?;
        } else if let Ok(db_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", db_url)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.rpc_addr.is_empty() {
            return Err("RPC listen address is required".to_string());
        }

        if self.database.url.is_empty() {
            return Err("Database URL is required (set DSN or DATABASE_URL)".to_string());
        }

        if self.database.max_connections == 0 {
            return Err("Database pool needs at least one connection".to_string());
        }

        if self.connector.max_attempts == 0 {
            return Err("Connector must allow at least one attempt".to_string());
        }

        Ok(())
    }

    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            max_attempts: self.connector.max_attempts,
            interval: Duration::from_secs(self.connector.backoff_secs),
        }
    }
}
