//! Binary RPC over a persistent TCP connection
//!
//! Each frame is a 4-byte big-endian length prefix followed by a bincode
//! body. A client sends an [`RpcRequest`] naming a procedure and receives one
//! [`RpcResponse`] carrying either the encoded reply or an error string.
//! Connections are sequential: one request in flight per connection.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod client;
pub mod contract;
pub mod error;
pub mod frame;
pub mod server;

pub use client::RpcClient;
pub use error::{Result, RpcError};
pub use frame::{RpcRequest, RpcResponse};
pub use server::{RpcServer, RpcService};
