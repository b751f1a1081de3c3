// Inventory Repository Port (customers, units, SIMs, notes)

use crate::domain::{Customer, NewNote, NewUnit, Note, NoteId, Sim, SimSet, Unit, UnitId};
use crate::error::Result;
use async_trait::async_trait;

/// Plain record persistence for everything outside the lease lifecycle
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Insert customer; an existing name is left untouched
    async fn create_customer(&self, name: &str) -> Result<()>;

    /// All customers ordered by name
    async fn list_customers(&self) -> Result<Vec<Customer>>;

    /// Insert or coalesce-update a unit by serial number
    async fn upsert_unit(&self, unit: &NewUnit) -> Result<UnitId>;

    /// All units ordered by serial number
    async fn list_units(&self) -> Result<Vec<Unit>>;

    /// Returns rows affected
    async fn set_sim_set_number(&self, unit_id: UnitId, sim_set_number: i64) -> Result<u64>;

    /// SIMs of a unit ordered by slot
    async fn load_sims(&self, unit_id: UnitId) -> Result<Vec<Sim>>;

    /// Delete every SIM of the unit and insert the new set, atomically
    async fn replace_sims(&self, unit_id: UnitId, sims: &SimSet) -> Result<()>;

    /// Insert or overwrite a single slot
    async fn upsert_sim(&self, unit_id: UnitId, sim: &Sim) -> Result<()>;

    async fn add_note(&self, note: &NewNote, created_at: i64) -> Result<NoteId>;

    /// Notes of a unit, newest first
    async fn list_notes(&self, unit_id: UnitId) -> Result<Vec<Note>>;

    /// Overwrite text and timestamp. Returns false when the note does not exist.
    async fn update_note(&self, note_id: NoteId, text: &str, updated_at: i64) -> Result<bool>;

    /// Returns false when the note does not exist
    async fn delete_note(&self, note_id: NoteId) -> Result<bool>;
}
