// Broker Gateway Library
// Exposes modules for the binary and for integration tests

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod normalizer;
pub mod router;
pub mod server;
