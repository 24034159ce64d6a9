//! Startup-time connection establishment for required external dependencies.
//!
//! A service that cannot work without its database or message broker hands a
//! [`Dependency`] to a [`Connector`]. The connector opens the connection,
//! probes it for liveness and, on failure, backs off for a fixed interval
//! before trying again. Once the attempt bound is exhausted the connector
//! returns [`ConnectError::Exhausted`]; deciding whether that ends the process
//! is left to the caller's bootstrap code.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod connector;
pub mod error;

pub use connector::{BackoffPolicy, ConnectionState, Connector, Dependency};
pub use error::ConnectError;
