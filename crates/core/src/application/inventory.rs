// Inventory Service - customers, units, SIM sets and notes

use crate::domain::note::normalize_note_text;
use crate::domain::unit::normalize_customer_name;
use crate::domain::{Customer, NewNote, NewUnit, Note, NoteId, Sim, SimSet, Unit, UnitId};
use crate::error::{AppError, Result};
use crate::port::{InventoryRepository, TimeProvider};
use std::sync::Arc;
use tracing::info;

pub struct InventoryService {
    repo: Arc<dyn InventoryRepository>,
    time_provider: Arc<dyn TimeProvider>,
}

impl InventoryService {
    pub fn new(repo: Arc<dyn InventoryRepository>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            repo,
            time_provider,
        }
    }

    /// Create a customer; an existing name is a no-op. Returns the stored name.
    pub async fn create_customer(&self, name: &str) -> Result<String> {
        let name = normalize_customer_name(name)?;
        self.repo.create_customer(&name).await?;
        info!(customer = %name, "Customer created");
        Ok(name)
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.repo.list_customers().await
    }

    /// Create a unit or fill in missing model / SIM set number of an existing one
    pub async fn upsert_unit(
        &self,
        serial_number: &str,
        model: Option<&str>,
        sim_set_number: Option<i64>,
    ) -> Result<UnitId> {
        let unit = NewUnit::new(serial_number, model, sim_set_number)?;
        let unit_id = self.repo.upsert_unit(&unit).await?;
        info!(unit_id, serial = %unit.serial_number, "Unit upserted");
        Ok(unit_id)
    }

    pub async fn list_units(&self) -> Result<Vec<Unit>> {
        self.repo.list_units().await
    }

    pub async fn set_sim_set_number(&self, unit_id: UnitId, sim_set_number: i64) -> Result<()> {
        if sim_set_number < 0 {
            return Err(AppError::Validation(format!(
                "SIM set number must be non-negative, got {}",
                sim_set_number
            )));
        }
        let affected = self
            .repo
            .set_sim_set_number(unit_id, sim_set_number)
            .await?;
        if affected == 0 {
            return Err(AppError::NotFound(format!("Unit {} not found", unit_id)));
        }
        Ok(())
    }

    /// Stored SIMs of a unit, ordered by slot (may be fewer than 8)
    pub async fn load_sims(&self, unit_id: UnitId) -> Result<Vec<Sim>> {
        self.repo.load_sims(unit_id).await
    }

    /// The editable 8-slot grid, empty where nothing is stored
    pub async fn sim_grid(&self, unit_id: UnitId) -> Result<SimSet> {
        let existing = self.repo.load_sims(unit_id).await?;
        Ok(SimSet::grid_from(&existing))
    }

    /// Replace the whole SIM set. Anything other than slots 1..=8 exactly once is rejected.
    pub async fn replace_sims(&self, unit_id: UnitId, sims: Vec<Sim>) -> Result<()> {
        let set = SimSet::new(sims)?;
        self.repo.replace_sims(unit_id, &set).await?;
        info!(unit_id, "SIM set replaced");
        Ok(())
    }

    pub async fn upsert_sim(&self, unit_id: UnitId, sim: Sim) -> Result<()> {
        let sim = Sim::new(sim.slot, sim.imei.as_deref(), sim.vendor.as_deref())?;
        self.repo.upsert_sim(unit_id, &sim).await
    }

    pub async fn add_note(
        &self,
        unit_id: UnitId,
        text: &str,
        author: Option<&str>,
    ) -> Result<NoteId> {
        let note = NewNote::new(unit_id, text, author)?;
        let note_id = self
            .repo
            .add_note(&note, self.time_provider.now_millis())
            .await?;
        info!(note_id, unit_id, "Note added");
        Ok(note_id)
    }

    pub async fn list_notes(&self, unit_id: UnitId) -> Result<Vec<Note>> {
        self.repo.list_notes(unit_id).await
    }

    /// Overwrite a note's text; the timestamp moves to now
    pub async fn update_note(&self, note_id: NoteId, text: &str) -> Result<bool> {
        let text = normalize_note_text(text)?;
        self.repo
            .update_note(note_id, &text, self.time_provider.now_millis())
            .await
    }

    pub async fn delete_note(&self, note_id: NoteId) -> Result<bool> {
        self.repo.delete_note(note_id).await
    }
}
