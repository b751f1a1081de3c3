// Rentdesk Infrastructure - SQLite Adapter
// Implements: LeaseRepository, TransactionalLeaseRepository, InventoryRepository

mod connection;
mod error;
mod inventory_repository;
mod lease_repository;
mod migration;
mod rows;
mod transaction;

pub use connection::create_pool;
pub use inventory_repository::SqliteInventoryRepository;
pub use lease_repository::SqliteLeaseRepository;
pub use migration::{run_migrations, schema_version};
pub use transaction::SqliteLeaseTransaction;

// Note: sqlx::Error conversion goes through error::map_sqlx_error
// (orphan rules forbid From<sqlx::Error> for AppError in this crate)
