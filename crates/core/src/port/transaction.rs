// Transaction port for atomic operations

use crate::domain::{Lease, LeaseId, NewLease, UnitId};
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional lease operations
#[async_trait]
pub trait TransactionalLeaseRepository: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn LeaseRepositoryTransaction>>;
}

/// Lease operations within a transaction
#[async_trait]
pub trait LeaseRepositoryTransaction: Transaction {
    /// Find lease by ID (within transaction)
    async fn find_by_id(&mut self, id: LeaseId) -> Result<Option<Lease>>;

    /// Return any active lease of the unit, stamping `returned_at`. Returns rows affected.
    async fn supersede_active_lease(&mut self, unit_id: UnitId, returned_at: i64) -> Result<u64>;

    /// Insert a new active lease
    async fn insert_active_lease(&mut self, lease: &NewLease) -> Result<LeaseId>;

    /// Count extension records (within transaction)
    async fn count_extensions(&mut self, lease_id: LeaseId) -> Result<i64>;

    /// Append an extension record unless the lease already has `max_extensions`.
    /// Returns false when the cap blocked the insert.
    async fn insert_extension_capped(
        &mut self,
        lease_id: LeaseId,
        extended_due_date: NaiveDate,
        reason: Option<&str>,
        created_at: i64,
        max_extensions: i64,
    ) -> Result<bool>;

    /// Move the due date of a lease
    async fn update_due_date(&mut self, lease_id: LeaseId, due_date: NaiveDate) -> Result<()>;
}
