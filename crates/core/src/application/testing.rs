//! In-memory lease store for service tests

use crate::domain::{
    ActiveLeaseRecord, ActiveLeaseSummary, Customer, CustomerId, DueTodayEntry, Lease,
    LeaseExtension, LeaseHistoryEntry, LeaseId, LeaseStatus, NewLease, Unit, UnitFilter, UnitId,
    UnitWithActiveLease,
};
use crate::error::{AppError, Result};
use crate::port::{
    LeaseRepository, LeaseRepositoryTransaction, Transaction, TransactionalLeaseRepository,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub(crate) struct StoreState {
    pub customers: Vec<Customer>,
    pub units: Vec<Unit>,
    pub leases: Vec<Lease>,
    pub extensions: Vec<LeaseExtension>,
    next_id: i64,
}

impl StoreState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn customer_name(&self, id: CustomerId) -> String {
        self.customers
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    fn find_lease(&self, id: LeaseId) -> Option<Lease> {
        self.leases.iter().find(|l| l.id == id).cloned()
    }

    fn count_extensions(&self, lease_id: LeaseId) -> i64 {
        self.extensions
            .iter()
            .filter(|e| e.lease_id == lease_id)
            .count() as i64
    }

    fn supersede(&mut self, unit_id: UnitId, returned_at: i64) -> u64 {
        let mut affected = 0;
        for lease in self
            .leases
            .iter_mut()
            .filter(|l| l.unit_id == unit_id && l.is_active())
        {
            lease.mark_returned(returned_at);
            affected += 1;
        }
        affected
    }

    fn insert_lease(&mut self, new: &NewLease) -> Result<LeaseId> {
        let known_customer = self.customers.iter().any(|c| c.id == new.customer_id);
        if self.unit(new.unit_id).is_none() || !known_customer {
            return Err(AppError::Database(
                "Foreign key constraint violation".to_string(),
            ));
        }
        if self
            .leases
            .iter()
            .any(|l| l.unit_id == new.unit_id && l.is_active())
        {
            return Err(AppError::Database(
                "Unique constraint violation: one active lease per unit".to_string(),
            ));
        }
        let id = self.next_id();
        self.leases.push(Lease {
            id,
            unit_id: new.unit_id,
            customer_id: new.customer_id,
            start_date: new.start_date,
            due_date: new.due_date,
            status: LeaseStatus::Active,
            returned_at: None,
        });
        Ok(id)
    }
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryLeaseStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryLeaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_customer(&self, name: &str) -> CustomerId {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.customers.push(Customer {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn add_unit(&self, serial_number: &str) -> UnitId {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.units.push(Unit {
            id,
            serial_number: serial_number.to_string(),
            model: None,
            sim_set_number: None,
        });
        id
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.lock().unwrap().clone()
    }

    pub fn active_leases_for(&self, unit_id: UnitId) -> Vec<Lease> {
        self.snapshot()
            .leases
            .into_iter()
            .filter(|l| l.unit_id == unit_id && l.is_active())
            .collect()
    }
}

#[async_trait]
impl LeaseRepository for InMemoryLeaseStore {
    async fn find_by_id(&self, id: LeaseId) -> Result<Option<Lease>> {
        Ok(self.state.lock().unwrap().find_lease(id))
    }

    async fn find_units(&self, filter: &UnitFilter) -> Result<Vec<UnitWithActiveLease>> {
        let state = self.snapshot();
        let mut rows: Vec<UnitWithActiveLease> = state
            .units
            .iter()
            .map(|unit| UnitWithActiveLease {
                unit: unit.clone(),
                active_lease: state
                    .leases
                    .iter()
                    .find(|l| l.unit_id == unit.id && l.is_active())
                    .map(|l| ActiveLeaseSummary {
                        lease_id: l.id,
                        customer_id: l.customer_id,
                        customer_name: state.customer_name(l.customer_id),
                        status: l.status,
                        start_date: l.start_date,
                        due_date: l.due_date,
                    }),
            })
            .filter(|row| filter.matches(row))
            .collect();
        rows.sort_by(|a, b| a.unit.serial_number.cmp(&b.unit.serial_number));
        Ok(rows)
    }

    async fn count_extensions(&self, lease_id: LeaseId) -> Result<i64> {
        Ok(self.state.lock().unwrap().count_extensions(lease_id))
    }

    async fn list_extensions(&self, lease_id: LeaseId) -> Result<Vec<LeaseExtension>> {
        let state = self.snapshot();
        Ok(state
            .extensions
            .into_iter()
            .filter(|e| e.lease_id == lease_id)
            .collect())
    }

    async fn mark_returned(&self, lease_id: LeaseId, returned_at: i64) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        match state.leases.iter_mut().find(|l| l.id == lease_id) {
            Some(lease) => {
                lease.mark_returned(returned_at);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn list_active_leases(&self) -> Result<Vec<ActiveLeaseRecord>> {
        let state = self.snapshot();
        let mut rows: Vec<ActiveLeaseRecord> = state
            .leases
            .iter()
            .filter(|l| l.is_active())
            .filter_map(|l| {
                let unit = state.unit(l.unit_id)?;
                Some(ActiveLeaseRecord {
                    lease_id: l.id,
                    unit_id: unit.id,
                    serial_number: unit.serial_number.clone(),
                    model: unit.model.clone(),
                    sim_set_number: unit.sim_set_number,
                    customer_name: state.customer_name(l.customer_id),
                    start_date: l.start_date,
                    due_date: l.due_date,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            (a.due_date, &a.serial_number).cmp(&(b.due_date, &b.serial_number))
        });
        Ok(rows)
    }

    async fn list_lease_history(&self, unit_id: UnitId) -> Result<Vec<LeaseHistoryEntry>> {
        let state = self.snapshot();
        let mut rows: Vec<LeaseHistoryEntry> = state
            .leases
            .iter()
            .filter(|l| l.unit_id == unit_id)
            .map(|l| LeaseHistoryEntry {
                lease_id: l.id,
                customer_name: state.customer_name(l.customer_id),
                start_date: l.start_date,
                due_date: l.due_date,
                status: l.status,
                returned_at: l.returned_at,
                extension_count: state.count_extensions(l.id),
            })
            .collect();
        rows.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(rows)
    }

    async fn list_due_on(&self, date: NaiveDate) -> Result<Vec<DueTodayEntry>> {
        let state = self.snapshot();
        let mut rows: Vec<DueTodayEntry> = state
            .leases
            .iter()
            .filter(|l| l.is_active() && l.due_date == date)
            .filter_map(|l| {
                Some(DueTodayEntry {
                    serial_number: state.unit(l.unit_id)?.serial_number.clone(),
                    customer_name: state.customer_name(l.customer_id),
                    due_date: l.due_date,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            (&a.customer_name, &a.serial_number).cmp(&(&b.customer_name, &b.serial_number))
        });
        Ok(rows)
    }
}

#[async_trait]
impl TransactionalLeaseRepository for InMemoryLeaseStore {
    async fn begin_transaction(&self) -> Result<Box<dyn LeaseRepositoryTransaction>> {
        Ok(Box::new(InMemoryTransaction {
            shared: Arc::clone(&self.state),
            working: self.snapshot(),
        }))
    }
}

/// Works on a private copy; commit publishes it
struct InMemoryTransaction {
    shared: Arc<Mutex<StoreState>>,
    working: StoreState,
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        *self.shared.lock().unwrap() = self.working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl LeaseRepositoryTransaction for InMemoryTransaction {
    async fn find_by_id(&mut self, id: LeaseId) -> Result<Option<Lease>> {
        Ok(self.working.find_lease(id))
    }

    async fn supersede_active_lease(&mut self, unit_id: UnitId, returned_at: i64) -> Result<u64> {
        Ok(self.working.supersede(unit_id, returned_at))
    }

    async fn insert_active_lease(&mut self, lease: &NewLease) -> Result<LeaseId> {
        self.working.insert_lease(lease)
    }

    async fn count_extensions(&mut self, lease_id: LeaseId) -> Result<i64> {
        Ok(self.working.count_extensions(lease_id))
    }

    async fn insert_extension_capped(
        &mut self,
        lease_id: LeaseId,
        extended_due_date: NaiveDate,
        reason: Option<&str>,
        created_at: i64,
        max_extensions: i64,
    ) -> Result<bool> {
        if self.working.count_extensions(lease_id) >= max_extensions {
            return Ok(false);
        }
        let id = self.working.next_id();
        self.working.extensions.push(LeaseExtension {
            id,
            lease_id,
            extended_due_date,
            reason: reason.map(str::to_string),
            created_at,
        });
        Ok(true)
    }

    async fn update_due_date(&mut self, lease_id: LeaseId, due_date: NaiveDate) -> Result<()> {
        match self.working.leases.iter_mut().find(|l| l.id == lease_id) {
            Some(lease) => {
                lease.due_date = due_date;
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Lease {} not found", lease_id))),
        }
    }
}
