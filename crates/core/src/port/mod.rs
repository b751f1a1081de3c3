// Port Layer - Interfaces for external dependencies

pub mod inventory_repository;
pub mod lease_repository;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use inventory_repository::InventoryRepository;
pub use lease_repository::LeaseRepository;
pub use time_provider::{FixedTimeProvider, SystemTimeProvider, TimeProvider};
pub use transaction::{LeaseRepositoryTransaction, Transaction, TransactionalLeaseRepository};
