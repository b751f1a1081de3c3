//! Response views and table rendering

use chrono::{DateTime, Local, NaiveDate};
use colored::Colorize;
use serde::Deserialize;
use tabled::{Table, Tabled};

const EMPTY: &str = "-";

fn opt<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| EMPTY.to_string())
}

/// Epoch milliseconds as local wall-clock time
pub fn timestamp(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

#[derive(Debug, Deserialize)]
pub struct ActiveLeaseSummaryView {
    pub lease_id: i64,
    pub customer_name: String,
    pub status: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct SearchRowView {
    pub id: i64,
    pub serial_number: String,
    pub model: Option<String>,
    pub sim_set_number: Option<i64>,
    pub active_lease: Option<ActiveLeaseSummaryView>,
}

#[derive(Tabled)]
struct SearchRow {
    #[tabled(rename = "Unit")]
    id: i64,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "SIM Set")]
    sim_set: String,
    #[tabled(rename = "Lease")]
    lease: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Due")]
    due: String,
}

pub fn search_table(rows: &[SearchRowView]) -> String {
    let rows: Vec<SearchRow> = rows
        .iter()
        .map(|r| {
            let lease = r.active_lease.as_ref();
            SearchRow {
                id: r.id,
                serial: r.serial_number.clone(),
                model: opt(&r.model),
                sim_set: opt(&r.sim_set_number),
                lease: opt(&lease.map(|l| l.lease_id)),
                customer: opt(&lease.map(|l| l.customer_name.clone())),
                status: lease
                    .map(|l| l.status.clone())
                    .unwrap_or_else(|| "available".to_string()),
                start: opt(&lease.map(|l| l.start_date)),
                due: opt(&lease.map(|l| l.due_date)),
            }
        })
        .collect();
    Table::new(rows).to_string()
}

#[derive(Debug, Deserialize)]
pub struct ActiveLeaseView {
    pub lease_id: i64,
    pub serial_number: String,
    pub model: Option<String>,
    pub sim_set_number: Option<i64>,
    pub customer_name: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub overdue: bool,
}

#[derive(Tabled)]
struct ActiveRow {
    #[tabled(rename = "Lease")]
    lease_id: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "SIM Set")]
    sim_set: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "Due")]
    due: String,
}

/// Active leases; overdue rows are painted red and flagged in the Due column
pub fn active_table(leases: &[ActiveLeaseView]) -> String {
    let rows: Vec<ActiveRow> = leases
        .iter()
        .map(|l| {
            let due = if l.overdue {
                format!("{} (overdue)", l.due_date)
            } else {
                l.due_date.to_string()
            };
            let cells = [
                l.lease_id.to_string(),
                l.serial_number.clone(),
                opt(&l.model),
                opt(&l.sim_set_number),
                l.customer_name.clone(),
                l.start_date.to_string(),
                due,
            ];
            let [lease_id, serial, model, sim_set, customer, start, due] = if l.overdue {
                cells.map(|c| c.red().to_string())
            } else {
                cells
            };
            ActiveRow {
                lease_id,
                serial,
                model,
                sim_set,
                customer,
                start,
                due,
            }
        })
        .collect();
    Table::new(rows).to_string()
}

#[derive(Debug, Deserialize, Tabled)]
pub struct DueTodayView {
    #[tabled(rename = "Serial")]
    pub serial_number: String,
    #[tabled(rename = "Customer")]
    pub customer_name: String,
    #[tabled(rename = "Due")]
    pub due_date: NaiveDate,
}

/// Reminder printed ahead of the active lease table; None when nothing is due
pub fn due_today_banner(entries: &[DueTodayView]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    let mut banner = format!("{} lease(s) due today:", entries.len())
        .yellow()
        .bold()
        .to_string();
    for entry in entries {
        banner.push_str(&format!(
            "\n  • {} ({})",
            entry.serial_number, entry.customer_name
        ));
    }
    Some(banner)
}

pub fn due_today_table(entries: &[DueTodayView]) -> String {
    Table::new(entries).to_string()
}

#[derive(Debug, Deserialize)]
pub struct HistoryView {
    pub lease_id: i64,
    pub customer_name: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: String,
    pub returned_at: Option<i64>,
    pub extension_count: i64,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Lease")]
    lease_id: i64,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Start")]
    start: NaiveDate,
    #[tabled(rename = "Due")]
    due: NaiveDate,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Returned")]
    returned: String,
    #[tabled(rename = "Extensions")]
    extensions: i64,
}

pub fn history_table(entries: &[HistoryView]) -> String {
    let rows: Vec<HistoryRow> = entries
        .iter()
        .map(|e| HistoryRow {
            lease_id: e.lease_id,
            customer: e.customer_name.clone(),
            start: e.start_date,
            due: e.due_date,
            status: e.status.clone(),
            returned: opt(&e.returned_at.map(timestamp)),
            extensions: e.extension_count,
        })
        .collect();
    Table::new(rows).to_string()
}

#[derive(Debug, Deserialize)]
pub struct ExtensionView {
    pub id: i64,
    pub extended_due_date: NaiveDate,
    pub reason: Option<String>,
    pub created_at: i64,
}

#[derive(Tabled)]
struct ExtensionRow {
    #[tabled(rename = "#")]
    id: i64,
    #[tabled(rename = "New Due")]
    due: NaiveDate,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Recorded")]
    created: String,
}

pub fn extensions_table(entries: &[ExtensionView]) -> String {
    let rows: Vec<ExtensionRow> = entries
        .iter()
        .map(|e| ExtensionRow {
            id: e.id,
            due: e.extended_due_date,
            reason: opt(&e.reason),
            created: timestamp(e.created_at),
        })
        .collect();
    Table::new(rows).to_string()
}

#[derive(Debug, Deserialize, Tabled)]
pub struct CustomerView {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Name")]
    pub name: String,
}

pub fn customers_table(customers: &[CustomerView]) -> String {
    Table::new(customers).to_string()
}

#[derive(Debug, Deserialize)]
pub struct UnitView {
    pub id: i64,
    pub serial_number: String,
    pub model: Option<String>,
    pub sim_set_number: Option<i64>,
}

#[derive(Tabled)]
struct UnitRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "SIM Set")]
    sim_set: String,
}

pub fn units_table(units: &[UnitView]) -> String {
    let rows: Vec<UnitRow> = units
        .iter()
        .map(|u| UnitRow {
            id: u.id,
            serial: u.serial_number.clone(),
            model: opt(&u.model),
            sim_set: opt(&u.sim_set_number),
        })
        .collect();
    Table::new(rows).to_string()
}

#[derive(Debug, Deserialize)]
pub struct SimView {
    pub slot: u8,
    pub imei: Option<String>,
    pub vendor: Option<String>,
}

#[derive(Tabled)]
struct SimRow {
    #[tabled(rename = "Slot")]
    slot: u8,
    #[tabled(rename = "IMEI")]
    imei: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
}

pub fn sims_table(sims: &[SimView]) -> String {
    let rows: Vec<SimRow> = sims
        .iter()
        .map(|s| SimRow {
            slot: s.slot,
            imei: opt(&s.imei),
            vendor: opt(&s.vendor),
        })
        .collect();
    Table::new(rows).to_string()
}

#[derive(Debug, Deserialize)]
pub struct NoteView {
    pub id: i64,
    pub text: String,
    pub author: Option<String>,
    pub created_at: i64,
}

#[derive(Tabled)]
struct NoteRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Note")]
    text: String,
}

pub fn notes_table(notes: &[NoteView]) -> String {
    let rows: Vec<NoteRow> = notes
        .iter()
        .map(|n| NoteRow {
            id: n.id,
            when: timestamp(n.created_at),
            author: opt(&n.author),
            text: n.text.clone(),
        })
        .collect();
    Table::new(rows).to_string()
}
