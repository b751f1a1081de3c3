// SQLite row representations and their domain conversions

use chrono::NaiveDate;
use rentdesk_core::domain::{
    ActiveLeaseRecord, ActiveLeaseSummary, Customer, DueTodayEntry, Lease, LeaseExtension,
    LeaseHistoryEntry, LeaseStatus, Note, Sim, Unit, UnitWithActiveLease,
};
use rentdesk_core::error::{AppError, Result};

fn parse_status(raw: &str) -> Result<LeaseStatus> {
    raw.parse::<LeaseStatus>()
        .map_err(|e| AppError::Database(format!("Corrupt lease row: {}", e)))
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct LeaseRow {
    id: i64,
    unit_id: i64,
    customer_id: i64,
    start_date: NaiveDate,
    due_date: NaiveDate,
    status: String,
    returned_at: Option<i64>,
}

impl LeaseRow {
    pub(crate) fn into_lease(self) -> Result<Lease> {
        Ok(Lease {
            id: self.id,
            unit_id: self.unit_id,
            customer_id: self.customer_id,
            start_date: self.start_date,
            due_date: self.due_date,
            status: parse_status(&self.status)?,
            returned_at: self.returned_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct LeaseExtensionRow {
    id: i64,
    lease_id: i64,
    extended_due_date: NaiveDate,
    reason: Option<String>,
    created_at: i64,
}

impl From<LeaseExtensionRow> for LeaseExtension {
    fn from(row: LeaseExtensionRow) -> Self {
        LeaseExtension {
            id: row.id,
            lease_id: row.lease_id,
            extended_due_date: row.extended_due_date,
            reason: row.reason,
            created_at: row.created_at,
        }
    }
}

/// Unit LEFT JOIN its active lease and that lease's customer
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UnitSearchRow {
    id: i64,
    serial_number: String,
    model: Option<String>,
    sim_set_number: Option<i64>,
    lease_id: Option<i64>,
    customer_id: Option<i64>,
    status: Option<String>,
    start_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    customer_name: Option<String>,
}

impl UnitSearchRow {
    pub(crate) fn into_search_result(self) -> Result<UnitWithActiveLease> {
        let active_lease = match (
            self.lease_id,
            self.customer_id,
            self.status,
            self.start_date,
            self.due_date,
        ) {
            (Some(lease_id), Some(customer_id), Some(status), Some(start_date), Some(due_date)) => {
                Some(ActiveLeaseSummary {
                    lease_id,
                    customer_id,
                    customer_name: self.customer_name.unwrap_or_default(),
                    status: parse_status(&status)?,
                    start_date,
                    due_date,
                })
            }
            _ => None,
        };

        Ok(UnitWithActiveLease {
            unit: Unit {
                id: self.id,
                serial_number: self.serial_number,
                model: self.model,
                sim_set_number: self.sim_set_number,
            },
            active_lease,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ActiveLeaseRow {
    lease_id: i64,
    unit_id: i64,
    serial_number: String,
    model: Option<String>,
    sim_set_number: Option<i64>,
    customer_name: String,
    start_date: NaiveDate,
    due_date: NaiveDate,
}

impl From<ActiveLeaseRow> for ActiveLeaseRecord {
    fn from(row: ActiveLeaseRow) -> Self {
        ActiveLeaseRecord {
            lease_id: row.lease_id,
            unit_id: row.unit_id,
            serial_number: row.serial_number,
            model: row.model,
            sim_set_number: row.sim_set_number,
            customer_name: row.customer_name,
            start_date: row.start_date,
            due_date: row.due_date,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct LeaseHistoryRow {
    lease_id: i64,
    customer_name: String,
    start_date: NaiveDate,
    due_date: NaiveDate,
    status: String,
    returned_at: Option<i64>,
    extension_count: i64,
}

impl LeaseHistoryRow {
    pub(crate) fn into_entry(self) -> Result<LeaseHistoryEntry> {
        Ok(LeaseHistoryEntry {
            lease_id: self.lease_id,
            customer_name: self.customer_name,
            start_date: self.start_date,
            due_date: self.due_date,
            status: parse_status(&self.status)?,
            returned_at: self.returned_at,
            extension_count: self.extension_count,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DueTodayRow {
    serial_number: String,
    customer_name: String,
    due_date: NaiveDate,
}

impl From<DueTodayRow> for DueTodayEntry {
    fn from(row: DueTodayRow) -> Self {
        DueTodayEntry {
            serial_number: row.serial_number,
            customer_name: row.customer_name,
            due_date: row.due_date,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CustomerRow {
    id: i64,
    name: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UnitRow {
    id: i64,
    serial_number: String,
    model: Option<String>,
    sim_set_number: Option<i64>,
}

impl From<UnitRow> for Unit {
    fn from(row: UnitRow) -> Self {
        Unit {
            id: row.id,
            serial_number: row.serial_number,
            model: row.model,
            sim_set_number: row.sim_set_number,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SimRow {
    slot: i64,
    imei: Option<String>,
    vendor: Option<String>,
}

impl SimRow {
    pub(crate) fn into_sim(self) -> Result<Sim> {
        let slot = u8::try_from(self.slot)
            .map_err(|_| AppError::Database(format!("Corrupt SIM slot: {}", self.slot)))?;
        Ok(Sim {
            slot,
            imei: self.imei,
            vendor: self.vendor,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct NoteRow {
    id: i64,
    unit_id: i64,
    note_text: String,
    author: Option<String>,
    created_at: i64,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Note {
            id: row.id,
            unit_id: row.unit_id,
            text: row.note_text,
            author: row.author,
            created_at: row.created_at,
        }
    }
}
