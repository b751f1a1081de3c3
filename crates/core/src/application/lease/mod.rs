// Lease Service - lifecycle use cases and read views

pub mod create;
pub mod extend;

pub use create::CreateLeaseRequest;
pub use extend::ExtendLeaseRequest;

use crate::domain::{
    ActiveLease, DueTodayEntry, ExtensionOutcome, LeaseExtension, LeaseHistoryEntry, LeaseId,
    UnitId,
};
use crate::error::{AppError, Result};
use crate::port::{LeaseRepository, TimeProvider, TransactionalLeaseRepository};
use std::sync::Arc;
use tracing::{debug, info};

/// Lease lifecycle manager
///
/// Owns the single-active-lease invariant (create supersedes), the extension cap,
/// and the due-today / overdue views.
pub struct LeaseService {
    tx_lease_repo: Arc<dyn TransactionalLeaseRepository>,
    lease_repo: Arc<dyn LeaseRepository>,
    time_provider: Arc<dyn TimeProvider>,
}

impl LeaseService {
    pub fn new(
        tx_lease_repo: Arc<dyn TransactionalLeaseRepository>,
        lease_repo: Arc<dyn LeaseRepository>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            tx_lease_repo,
            lease_repo,
            time_provider,
        }
    }

    /// Start a lease, returning any active lease on the unit first
    pub async fn create_lease(&self, req: CreateLeaseRequest) -> Result<LeaseId> {
        create::execute(
            self.tx_lease_repo.as_ref(),
            self.time_provider.as_ref(),
            req,
        )
        .await
    }

    /// Push the due date forward (max 5 times per lease)
    pub async fn extend_lease(&self, req: ExtendLeaseRequest) -> Result<ExtensionOutcome> {
        extend::execute(
            self.tx_lease_repo.as_ref(),
            self.time_provider.as_ref(),
            req,
        )
        .await
    }

    /// Mark a lease returned and stamp the return time
    pub async fn cancel_lease(&self, lease_id: LeaseId) -> Result<()> {
        let now = self.time_provider.now_millis();
        let affected = self.lease_repo.mark_returned(lease_id, now).await?;
        if affected == 0 {
            return Err(AppError::NotFound(format!("Lease {} not found", lease_id)));
        }
        info!(lease_id, "Lease marked returned");
        Ok(())
    }

    /// Active leases due on the current date
    pub async fn due_today(&self) -> Result<Vec<DueTodayEntry>> {
        let today = self.time_provider.today();
        let rows = self.lease_repo.list_due_on(today).await?;
        debug!(%today, count = rows.len(), "Loaded due-today leases");
        Ok(rows)
    }

    /// All active leases with the overdue flag (`due_date < today`)
    pub async fn load_active_leases(&self) -> Result<Vec<ActiveLease>> {
        let today = self.time_provider.today();
        let rows = self.lease_repo.list_active_leases().await?;
        Ok(rows
            .into_iter()
            .map(|lease| ActiveLease::annotate(lease, today))
            .collect())
    }

    /// Every lease of a unit, newest first, with extension counts
    pub async fn unit_history(&self, unit_id: UnitId) -> Result<Vec<LeaseHistoryEntry>> {
        self.lease_repo.list_lease_history(unit_id).await
    }

    pub async fn lease_extensions(&self, lease_id: LeaseId) -> Result<Vec<LeaseExtension>> {
        self.lease_repo.list_extensions(lease_id).await
    }
}
