//! Message Bus with NATS support
//!
//! Provides fire-and-forget event publishing with:
//! - A durable JetStream stream per event family
//! - Severity-based routing keys (`log.INFO`, `log.WARNING`, `log.ERROR`)
//! - Startup connection through the dependency connector
//! - Observability via Prometheus metrics

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod client;
pub mod error;
pub mod message;
pub mod metrics;
pub mod publisher;

pub use client::{NatsClient, NatsConfig, NatsDependency};
pub use error::{Error, Result};
pub use message::{LogEvent, Severity};
pub use publisher::{EventEmitter, Publisher, PublisherConfig};
