//! JSON-RPC API Layer
//!
//! Implements the JSON-RPC 2.0 server for the Rentdesk lease tracker.
//! Methods are versioned `<area>.<verb>.v1`.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
