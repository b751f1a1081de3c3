// Lease Domain Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::{DomainError, Result};
use super::unit::{CustomerId, UnitId};

/// Lease ID (database rowid)
pub type LeaseId = i64;

/// Hard cap on extension records per lease
pub const MAX_EXTENSIONS_PER_LEASE: i64 = 5;

/// Lease status. `Returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaseStatus {
    Active,
    Returned,
}

impl LeaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaseStatus::Active => "active",
            LeaseStatus::Returned => "returned",
        }
    }
}

impl std::fmt::Display for LeaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaseStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(LeaseStatus::Active),
            "returned" => Ok(LeaseStatus::Returned),
            other => Err(DomainError::UnknownStatus(other.to_string())),
        }
    }
}

/// Lease Entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    pub id: LeaseId,
    pub unit_id: UnitId,
    pub customer_id: CustomerId,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: LeaseStatus,
    pub returned_at: Option<i64>, // epoch ms
}

impl Lease {
    pub fn is_active(&self) -> bool {
        self.status == LeaseStatus::Active
    }

    /// Due date may only move while the lease is active
    pub fn ensure_extendable(&self) -> Result<()> {
        if !self.is_active() {
            return Err(DomainError::InvalidStateTransition {
                from: self.status.to_string(),
                to: "extended".to_string(),
            });
        }
        Ok(())
    }

    /// Mark as Returned with explicit timestamp
    ///
    /// Re-stamps `returned_at` when the lease is already returned.
    pub fn mark_returned(&mut self, now_millis: i64) {
        self.status = LeaseStatus::Returned;
        self.returned_at = Some(now_millis);
    }
}

/// Validated input for a new active lease
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLease {
    pub unit_id: UnitId,
    pub customer_id: CustomerId,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl NewLease {
    pub fn new(
        unit_id: UnitId,
        customer_id: CustomerId,
        start_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Self> {
        if start_date > due_date {
            return Err(DomainError::InvalidDateRange {
                start: start_date.to_string(),
                due: due_date.to_string(),
            });
        }
        Ok(Self {
            unit_id,
            customer_id,
            start_date,
            due_date,
        })
    }
}

/// Append-only audit record of a due-date push
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseExtension {
    pub id: i64,
    pub lease_id: LeaseId,
    pub extended_due_date: NaiveDate,
    pub reason: Option<String>,
    pub created_at: i64, // epoch ms
}

/// Why an extension request was turned down
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtensionRejection {
    LimitReached,
    NotLater { current_due_date: NaiveDate },
}

impl ExtensionRejection {
    pub fn message(&self) -> String {
        match self {
            ExtensionRejection::LimitReached => format!(
                "Maximum of {} extensions reached.",
                MAX_EXTENSIONS_PER_LEASE
            ),
            ExtensionRejection::NotLater { current_due_date } => format!(
                "New due date must be after the current due date ({}).",
                current_due_date
            ),
        }
    }
}

/// Result of an extension request. Rejections are not errors: no state changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExtensionOutcome {
    Extended {
        lease_id: LeaseId,
        due_date: NaiveDate,
        extension_count: i64,
    },
    Rejected(ExtensionRejection),
}

impl ExtensionOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, ExtensionOutcome::Extended { .. })
    }

    pub fn message(&self) -> String {
        match self {
            ExtensionOutcome::Extended { .. } => "Lease extended.".to_string(),
            ExtensionOutcome::Rejected(reason) => reason.message(),
        }
    }
}

/// Decide whether an extension may be applied, given the current lease and its extension count
pub fn check_extension(
    lease: &Lease,
    existing_extensions: i64,
    new_due_date: NaiveDate,
) -> Result<Option<ExtensionRejection>> {
    lease.ensure_extendable()?;

    if existing_extensions >= MAX_EXTENSIONS_PER_LEASE {
        return Ok(Some(ExtensionRejection::LimitReached));
    }
    if new_due_date <= lease.due_date {
        return Ok(Some(ExtensionRejection::NotLater {
            current_due_date: lease.due_date,
        }));
    }
    Ok(None)
}

/// Active lease due on a given day (reminder banner)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueTodayEntry {
    pub serial_number: String,
    pub customer_name: String,
    pub due_date: NaiveDate,
}

/// Active lease joined with its unit and customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveLeaseRecord {
    pub lease_id: LeaseId,
    pub unit_id: UnitId,
    pub serial_number: String,
    pub model: Option<String>,
    pub sim_set_number: Option<i64>,
    pub customer_name: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl ActiveLeaseRecord {
    /// Overdue means strictly past due; a lease due today is not overdue.
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        self.due_date < today
    }
}

/// Active lease annotated with the overdue flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveLease {
    #[serde(flatten)]
    pub lease: ActiveLeaseRecord,
    pub overdue: bool,
}

impl ActiveLease {
    pub fn annotate(lease: ActiveLeaseRecord, today: NaiveDate) -> Self {
        let overdue = lease.is_overdue_on(today);
        Self { lease, overdue }
    }
}

/// One row of a unit's lease history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseHistoryEntry {
    pub lease_id: LeaseId,
    pub customer_name: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: LeaseStatus,
    pub returned_at: Option<i64>,
    pub extension_count: i64,
}
