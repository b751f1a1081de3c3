// Extend Lease Use Case

use crate::domain::{
    check_extension, ExtensionOutcome, ExtensionRejection, LeaseId, MAX_EXTENSIONS_PER_LEASE,
};
use crate::error::{AppError, Result};
use crate::port::{TimeProvider, TransactionalLeaseRepository};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendLeaseRequest {
    pub lease_id: LeaseId,
    pub new_due_date: NaiveDate,

    #[serde(default)]
    pub reason: Option<String>,
}

/// Execute extend-lease use case
///
/// Policy rejections come back as `ExtensionOutcome::Rejected` with nothing written.
/// Unknown leases are `AppError::NotFound`, returned leases `AppError::InvalidState`.
pub async fn execute(
    lease_repo: &dyn TransactionalLeaseRepository,
    time_provider: &dyn TimeProvider,
    req: ExtendLeaseRequest,
) -> Result<ExtensionOutcome> {
    let reason = req
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    let mut tx = lease_repo.begin_transaction().await?;

    let Some(lease) = tx.find_by_id(req.lease_id).await? else {
        tx.rollback().await?;
        return Err(AppError::NotFound(format!(
            "Lease {} not found",
            req.lease_id
        )));
    };

    let existing = tx.count_extensions(req.lease_id).await?;

    let rejection = match check_extension(&lease, existing, req.new_due_date) {
        Ok(rejection) => rejection,
        Err(e) => {
            tx.rollback().await?;
            return Err(AppError::InvalidState(format!(
                "Lease {} cannot be extended: {}",
                req.lease_id, e
            )));
        }
    };

    if let Some(rejection) = rejection {
        tx.rollback().await?;
        warn!(
            lease_id = req.lease_id,
            extensions = existing,
            reason = %rejection.message(),
            "Lease extension rejected"
        );
        return Ok(ExtensionOutcome::Rejected(rejection));
    }

    // The insert re-checks the cap in SQL, so a racing writer cannot push past it
    let inserted = tx
        .insert_extension_capped(
            req.lease_id,
            req.new_due_date,
            reason,
            time_provider.now_millis(),
            MAX_EXTENSIONS_PER_LEASE,
        )
        .await?;

    if !inserted {
        tx.rollback().await?;
        warn!(lease_id = req.lease_id, "Lease extension lost race to cap");
        return Ok(ExtensionOutcome::Rejected(ExtensionRejection::LimitReached));
    }

    tx.update_due_date(req.lease_id, req.new_due_date).await?;
    tx.commit().await?;

    info!(
        lease_id = req.lease_id,
        from = %lease.due_date,
        to = %req.new_due_date,
        extension = existing + 1,
        "Lease extended"
    );

    Ok(ExtensionOutcome::Extended {
        lease_id: req.lease_id,
        due_date: req.new_due_date,
        extension_count: existing + 1,
    })
}
