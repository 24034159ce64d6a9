//! Log backend reached by the gateway over binary RPC.
//!
//! Serves `LogService.LogInfo` on a long-lived TCP listener and persists each
//! entry to PostgreSQL.

pub mod config;
pub mod db;
pub mod rpc;
pub mod store;
