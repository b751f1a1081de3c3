//! Daemon configuration from environment variables

use anyhow::{Context, Result};
use rentdesk_api_rpc::server::{DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
use rentdesk_api_rpc::RpcServerConfig;
use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "~/.rentdesk/rentdesk.db";
const DEFAULT_LOG_FILTER: &str = "rentdesk=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub db_path: PathBuf,
    pub rpc: RpcServerConfig,
    pub log_format: LogFormat,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_db_path = lookup("RENTDESK_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let db_path = PathBuf::from(shellexpand::tilde(&raw_db_path).into_owned());

        let host = lookup("RENTDESK_RPC_HOST").unwrap_or_else(|| DEFAULT_RPC_HOST.to_string());
        let port = match lookup("RENTDESK_RPC_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("RENTDESK_RPC_PORT is not a port number: {}", raw))?,
            None => DEFAULT_RPC_PORT,
        };

        let log_format = match lookup("RENTDESK_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            db_path,
            rpc: RpcServerConfig { host, port },
            log_format,
        })
    }

    pub fn default_log_filter() -> &'static str {
        DEFAULT_LOG_FILTER
    }
}
