// Create Lease Use Case

use crate::domain::{LeaseId, NewLease};
use crate::error::Result;
use crate::port::{TimeProvider, TransactionalLeaseRepository};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLeaseRequest {
    pub unit_id: i64,
    pub customer_id: i64,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Execute create-lease use case (supersede + insert in one transaction)
///
/// # Arguments
///
/// * `lease_repo` - Transactional lease repository
/// * `time_provider` - Stamps `returned_at` on the superseded lease
/// * `req` - Create request
pub async fn execute(
    lease_repo: &dyn TransactionalLeaseRepository,
    time_provider: &dyn TimeProvider,
    req: CreateLeaseRequest,
) -> Result<LeaseId> {
    let new_lease = NewLease::new(req.unit_id, req.customer_id, req.start_date, req.due_date)?;

    let mut tx = lease_repo.begin_transaction().await?;

    // Supersede first so the new row never shares the unit with another active lease
    let now = time_provider.now_millis();
    let superseded = tx.supersede_active_lease(new_lease.unit_id, now).await?;

    let lease_id = tx.insert_active_lease(&new_lease).await?;

    tx.commit().await?;

    info!(
        lease_id,
        unit_id = new_lease.unit_id,
        customer_id = new_lease.customer_id,
        due_date = %new_lease.due_date,
        superseded,
        "Lease created"
    );

    Ok(lease_id)
}
