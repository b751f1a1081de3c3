//! JSON-RPC Server
//!
//! JSON-RPC 2.0 over TCP, bound to localhost by default.

use crate::handler::RpcHandler;
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use rentdesk_core::application::{InventoryService, LeaseService, SearchService};
use rentdesk_core::error::{AppError, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 9630;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// Register `method` so its params are parsed and handed to `RpcHandler::$call`
macro_rules! register {
    ($module:expr, $method:literal => $call:ident) => {
        $module
            .register_async_method($method, |params, handler, _| async move {
                let req = params.parse()?;
                handler.$call(req).await
            })
            .map_err(|e| AppError::Internal(e.to_string()))?;
    };
    ($module:expr, $method:literal => $call:ident()) => {
        $module
            .register_async_method($method, |_, handler, _| async move {
                handler.$call().await
            })
            .map_err(|e| AppError::Internal(e.to_string()))?;
    };
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: RpcHandler,
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        leases: Arc<LeaseService>,
        search: Arc<SearchService>,
        inventory: Arc<InventoryService>,
    ) -> Self {
        Self {
            config,
            handler: RpcHandler::new(leases, search, inventory),
        }
    }

    /// Build the method table
    pub fn into_module(self) -> Result<RpcModule<RpcHandler>> {
        let mut module = RpcModule::new(self.handler);

        register!(module, "units.search.v1" => search_units);
        register!(module, "units.upsert.v1" => upsert_unit);
        register!(module, "units.list.v1" => list_units());
        register!(module, "units.set_sim_set.v1" => set_sim_set);

        register!(module, "customers.create.v1" => create_customer);
        register!(module, "customers.list.v1" => list_customers());

        register!(module, "leases.create.v1" => create_lease);
        register!(module, "leases.extend.v1" => extend_lease);
        register!(module, "leases.return.v1" => return_lease);
        register!(module, "leases.active.v1" => active_leases());
        register!(module, "leases.due_today.v1" => due_today());
        register!(module, "leases.history.v1" => lease_history);
        register!(module, "leases.extensions.v1" => lease_extensions);

        register!(module, "sims.list.v1" => list_sims);
        register!(module, "sims.replace.v1" => replace_sims);
        register!(module, "sims.upsert.v1" => upsert_sim);

        register!(module, "notes.add.v1" => add_note);
        register!(module, "notes.list.v1" => list_notes);
        register!(module, "notes.update.v1" => update_note);
        register!(module, "notes.delete.v1" => delete_note);

        Ok(module)
    }

    /// Start the JSON-RPC server. Returns the bound address and a stop handle.
    pub async fn start(self) -> Result<(SocketAddr, ServerHandle)> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| {
                AppError::Config(format!("Failed to bind RPC server on {}: {}", addr, e))
            })?;

        let local_addr = server
            .local_addr()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let module = self.into_module()?;
        let method_count = module.method_names().count();
        let handle = server.start(module);

        info!(addr = %local_addr, methods = method_count, "JSON-RPC server started");
        Ok((local_addr, handle))
    }
}
