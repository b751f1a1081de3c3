// SQLite InventoryRepository Implementation

use crate::error::map_sqlx_error;
use crate::rows::{CustomerRow, NoteRow, SimRow, UnitRow};
use async_trait::async_trait;
use rentdesk_core::domain::{Customer, NewNote, NewUnit, Note, NoteId, Sim, SimSet, Unit, UnitId};
use rentdesk_core::error::Result;
use rentdesk_core::port::InventoryRepository;
use sqlx::SqlitePool;
use tracing::debug;

pub struct SqliteInventoryRepository {
    pool: SqlitePool,
}

impl SqliteInventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryRepository for SqliteInventoryRepository {
    async fn create_customer(&self, name: &str) -> Result<()> {
        sqlx::query("INSERT INTO customers (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>> {
        let rows: Vec<CustomerRow> =
            sqlx::query_as("SELECT id, name FROM customers ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn upsert_unit(&self, unit: &NewUnit) -> Result<UnitId> {
        // Existing values win over NULLs; provided values fill or overwrite
        sqlx::query(
            r#"
            INSERT INTO units (serial_number, model, sim_set_number)
            VALUES (?, ?, ?)
            ON CONFLICT(serial_number) DO UPDATE SET
                model = COALESCE(excluded.model, units.model),
                sim_set_number = COALESCE(excluded.sim_set_number, units.sim_set_number)
            "#,
        )
        .bind(&unit.serial_number)
        .bind(&unit.model)
        .bind(unit.sim_set_number)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        // last_insert_rowid is stale on the update path
        let id: i64 = sqlx::query_scalar("SELECT id FROM units WHERE serial_number = ?")
            .bind(&unit.serial_number)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(id)
    }

    async fn list_units(&self) -> Result<Vec<Unit>> {
        let rows: Vec<UnitRow> = sqlx::query_as(
            "SELECT id, serial_number, model, sim_set_number FROM units ORDER BY serial_number",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Unit::from).collect())
    }

    async fn set_sim_set_number(&self, unit_id: UnitId, sim_set_number: i64) -> Result<u64> {
        let result = sqlx::query("UPDATE units SET sim_set_number = ? WHERE id = ?")
            .bind(sim_set_number)
            .bind(unit_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn load_sims(&self, unit_id: UnitId) -> Result<Vec<Sim>> {
        let rows: Vec<SimRow> = sqlx::query_as(
            "SELECT slot, imei, vendor FROM sims WHERE unit_id = ? ORDER BY slot",
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(SimRow::into_sim).collect()
    }

    async fn replace_sims(&self, unit_id: UnitId, sims: &SimSet) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("DELETE FROM sims WHERE unit_id = ?")
            .bind(unit_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        for sim in sims.iter() {
            sqlx::query("INSERT INTO sims (unit_id, slot, imei, vendor) VALUES (?, ?, ?, ?)")
                .bind(unit_id)
                .bind(i64::from(sim.slot))
                .bind(&sim.imei)
                .bind(&sim.vendor)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(unit_id, slots = sims.as_slice().len(), "SIM set written");
        Ok(())
    }

    async fn upsert_sim(&self, unit_id: UnitId, sim: &Sim) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sims (unit_id, slot, imei, vendor)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(unit_id, slot) DO UPDATE SET
                imei = excluded.imei,
                vendor = excluded.vendor
            "#,
        )
        .bind(unit_id)
        .bind(i64::from(sim.slot))
        .bind(&sim.imei)
        .bind(&sim.vendor)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn add_note(&self, note: &NewNote, created_at: i64) -> Result<NoteId> {
        let result = sqlx::query(
            "INSERT INTO unit_notes (unit_id, note_text, author, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(note.unit_id)
        .bind(&note.text)
        .bind(&note.author)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(result.last_insert_rowid())
    }

    async fn list_notes(&self, unit_id: UnitId) -> Result<Vec<Note>> {
        let rows: Vec<NoteRow> = sqlx::query_as(
            r#"
            SELECT id, unit_id, note_text, author, created_at
            FROM unit_notes
            WHERE unit_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Note::from).collect())
    }

    async fn update_note(&self, note_id: NoteId, text: &str, updated_at: i64) -> Result<bool> {
        let result =
            sqlx::query("UPDATE unit_notes SET note_text = ?, created_at = ? WHERE id = ?")
                .bind(text)
                .bind(updated_at)
                .bind(note_id)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_note(&self, note_id: NoteId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM unit_notes WHERE id = ?")
            .bind(note_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }
}
