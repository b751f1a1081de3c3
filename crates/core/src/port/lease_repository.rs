// Lease Repository Port (Interface)

use crate::domain::{
    ActiveLeaseRecord, DueTodayEntry, Lease, LeaseExtension, LeaseHistoryEntry, LeaseId,
    UnitFilter, UnitId, UnitWithActiveLease,
};
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Read-side and single-statement lease persistence
#[async_trait]
pub trait LeaseRepository: Send + Sync {
    /// Find lease by ID
    async fn find_by_id(&self, id: LeaseId) -> Result<Option<Lease>>;

    /// Units matching the filter, each with its active lease (ordered by serial number)
    async fn find_units(&self, filter: &UnitFilter) -> Result<Vec<UnitWithActiveLease>>;

    /// Count extension records of a lease
    async fn count_extensions(&self, lease_id: LeaseId) -> Result<i64>;

    /// Extension audit log of a lease, oldest first
    async fn list_extensions(&self, lease_id: LeaseId) -> Result<Vec<LeaseExtension>>;

    /// Set status to returned and stamp `returned_at`. Returns rows affected.
    async fn mark_returned(&self, lease_id: LeaseId, returned_at: i64) -> Result<u64>;

    /// All active leases (ordered by due date, then serial number)
    async fn list_active_leases(&self) -> Result<Vec<ActiveLeaseRecord>>;

    /// All leases of a unit with extension counts (newest start date first)
    async fn list_lease_history(&self, unit_id: UnitId) -> Result<Vec<LeaseHistoryEntry>>;

    /// Active leases due on `date` (ordered by customer name, then serial number)
    async fn list_due_on(&self, date: NaiveDate) -> Result<Vec<DueTodayEntry>>;
}
