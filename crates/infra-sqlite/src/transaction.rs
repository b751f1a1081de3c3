// SQLite Transaction Implementation

use crate::error::map_sqlx_error;
use crate::rows::LeaseRow;
use async_trait::async_trait;
use chrono::NaiveDate;
use rentdesk_core::domain::{Lease, LeaseId, LeaseStatus, NewLease, UnitId};
use rentdesk_core::error::{AppError, Result};
use rentdesk_core::port::{LeaseRepositoryTransaction, Transaction};
use sqlx::{Sqlite, Transaction as SqlxTransaction};

pub struct SqliteLeaseTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteLeaseTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteLeaseTransaction<'_> {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)
    }
}

#[async_trait]
impl LeaseRepositoryTransaction for SqliteLeaseTransaction<'_> {
    async fn find_by_id(&mut self, id: LeaseId) -> Result<Option<Lease>> {
        let row = sqlx::query_as::<_, LeaseRow>(
            "SELECT id, unit_id, customer_id, start_date, due_date, status, returned_at
             FROM leases WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        row.map(LeaseRow::into_lease).transpose()
    }

    async fn supersede_active_lease(&mut self, unit_id: UnitId, returned_at: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE leases
            SET status = ?, returned_at = ?
            WHERE unit_id = ? AND status = ?
            "#,
        )
        .bind(LeaseStatus::Returned.as_str())
        .bind(returned_at)
        .bind(unit_id)
        .bind(LeaseStatus::Active.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn insert_active_lease(&mut self, lease: &NewLease) -> Result<LeaseId> {
        let result = sqlx::query(
            r#"
            INSERT INTO leases (unit_id, customer_id, start_date, due_date, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(lease.unit_id)
        .bind(lease.customer_id)
        .bind(lease.start_date)
        .bind(lease.due_date)
        .bind(LeaseStatus::Active.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn count_extensions(&mut self, lease_id: LeaseId) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM lease_extensions WHERE lease_id = ?")
            .bind(lease_id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)
    }

    async fn insert_extension_capped(
        &mut self,
        lease_id: LeaseId,
        extended_due_date: NaiveDate,
        reason: Option<&str>,
        created_at: i64,
        max_extensions: i64,
    ) -> Result<bool> {
        // Count and insert in one statement so a concurrent writer cannot slip past the cap
        let result = sqlx::query(
            r#"
            INSERT INTO lease_extensions (lease_id, extended_due_date, reason, created_at)
            SELECT ?, ?, ?, ?
            WHERE (SELECT COUNT(*) FROM lease_extensions WHERE lease_id = ?) < ?
            "#,
        )
        .bind(lease_id)
        .bind(extended_due_date)
        .bind(reason)
        .bind(created_at)
        .bind(lease_id)
        .bind(max_extensions)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_due_date(&mut self, lease_id: LeaseId, due_date: NaiveDate) -> Result<()> {
        let result = sqlx::query("UPDATE leases SET due_date = ? WHERE id = ? AND status = ?")
            .bind(due_date)
            .bind(lease_id)
            .bind(LeaseStatus::Active.as_str())
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::InvalidState(format!(
                "Lease {} is not active",
                lease_id
            )));
        }

        Ok(())
    }
}
