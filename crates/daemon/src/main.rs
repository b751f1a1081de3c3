//! Rentdesk Daemon - Main Entry Point
//! Composition root: config, logging, database, services, JSON-RPC server

mod config;

use anyhow::{Context, Result};
use config::{DaemonConfig, LogFormat};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rentdesk_api_rpc::RpcServer;
use rentdesk_core::application::{InventoryService, LeaseService, SearchService};
use rentdesk_core::port::{SystemTimeProvider, TimeProvider};
use rentdesk_infra_sqlite::{
    create_pool, run_migrations, schema_version, SqliteInventoryRepository, SqliteLeaseRepository,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DaemonConfig::default_log_filter()))
        .context("Failed to create env filter")?;

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty())
            .init(),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration + logging
    let config = DaemonConfig::from_env()?;
    init_logging(config.log_format)?;

    info!("Rentdesk daemon v{} starting...", VERSION);

    // 2. Database
    if let Some(parent) = config.db_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let db_url = format!("sqlite://{}", config.db_path.display());
    info!(db_path = %config.db_path.display(), "Initializing database...");

    let pool = create_pool(&db_url)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    let version = schema_version(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Schema version lookup failed: {}", e))?;
    info!(schema_version = version, "Database ready");

    // 3. DI wiring
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let lease_repo = Arc::new(SqliteLeaseRepository::new(pool.clone()));
    let inventory_repo = Arc::new(SqliteInventoryRepository::new(pool.clone()));

    let leases = Arc::new(LeaseService::new(
        lease_repo.clone(),
        lease_repo.clone(),
        time_provider.clone(),
    ));
    let search = Arc::new(SearchService::new(lease_repo));
    let inventory = Arc::new(InventoryService::new(inventory_repo, time_provider.clone()));

    // 4. Due-today reminder
    match leases.due_today().await {
        Ok(entries) if entries.is_empty() => info!("No leases due today"),
        Ok(entries) => {
            for entry in &entries {
                warn!(
                    serial = %entry.serial_number,
                    customer = %entry.customer_name,
                    due_date = %entry.due_date,
                    "Lease due today"
                );
            }
        }
        Err(e) => tracing::error!(error = ?e, "Due-today lookup failed"),
    }

    // 5. JSON-RPC server
    let rpc_server = RpcServer::new(config.rpc.clone(), leases, search, inventory);
    let (addr, rpc_handle) = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %addr, "System ready. Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;
    pool.close().await;

    info!("Shutdown complete.");
    Ok(())
}
