// SQLite LeaseRepository Implementation

use crate::error::map_sqlx_error;
use crate::rows::{
    ActiveLeaseRow, DueTodayRow, LeaseExtensionRow, LeaseHistoryRow, LeaseRow, UnitSearchRow,
};
use crate::SqliteLeaseTransaction;
use async_trait::async_trait;
use chrono::NaiveDate;
use rentdesk_core::domain::{
    ActiveLeaseRecord, DueTodayEntry, Lease, LeaseExtension, LeaseHistoryEntry, LeaseId,
    LeaseStatus, SerialQuery, UnitFilter, UnitId, UnitWithActiveLease,
};
use rentdesk_core::error::Result;
use rentdesk_core::port::{
    LeaseRepository, LeaseRepositoryTransaction, TransactionalLeaseRepository,
};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

pub struct SqliteLeaseRepository {
    pool: SqlitePool,
}

impl SqliteLeaseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Append the serial predicate for a parsed query.
///
/// `instr`/`substr` instead of LIKE: case-sensitive, and `%`/`_` stay literal.
fn push_serial_predicate(builder: &mut QueryBuilder<'_, Sqlite>, query: &SerialQuery) {
    match query {
        SerialQuery::Any => {}
        SerialQuery::Suffix(tail) => {
            builder
                .push(" AND substr(u.serial_number, ")
                .push_bind(-(tail.len() as i64))
                .push(") = ")
                .push_bind(tail.clone());
        }
        SerialQuery::Contains(part) => {
            builder
                .push(" AND instr(u.serial_number, ")
                .push_bind(part.clone())
                .push(") > 0");
        }
    }
}

#[async_trait]
impl LeaseRepository for SqliteLeaseRepository {
    async fn find_by_id(&self, id: LeaseId) -> Result<Option<Lease>> {
        let row = sqlx::query_as::<_, LeaseRow>(
            "SELECT id, unit_id, customer_id, start_date, due_date, status, returned_at
             FROM leases WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(LeaseRow::into_lease).transpose()
    }

    async fn find_units(&self, filter: &UnitFilter) -> Result<Vec<UnitWithActiveLease>> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT u.id, u.serial_number, u.model, u.sim_set_number,
                   l.id AS lease_id, l.customer_id, l.status, l.start_date, l.due_date,
                   c.name AS customer_name
            FROM units u
            LEFT JOIN leases l ON l.unit_id = u.id AND l.status = 'active'
            LEFT JOIN customers c ON c.id = l.customer_id
            WHERE 1=1
            "#,
        );

        push_serial_predicate(&mut builder, &filter.serial);

        if let Some(customer_id) = filter.active_customer_id {
            builder
                .push(" AND l.customer_id = ")
                .push_bind(customer_id)
                .push(" AND l.status = 'active'");
        }

        builder.push(" ORDER BY u.serial_number");

        let rows: Vec<UnitSearchRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        debug!(found = rows.len(), "Unit search executed");

        rows.into_iter()
            .map(UnitSearchRow::into_search_result)
            .collect()
    }

    async fn count_extensions(&self, lease_id: LeaseId) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM lease_extensions WHERE lease_id = ?")
                .bind(lease_id)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(count)
    }

    async fn list_extensions(&self, lease_id: LeaseId) -> Result<Vec<LeaseExtension>> {
        let rows: Vec<LeaseExtensionRow> = sqlx::query_as(
            r#"
            SELECT id, lease_id, extended_due_date, reason, created_at
            FROM lease_extensions
            WHERE lease_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(lease_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(LeaseExtension::from).collect())
    }

    async fn mark_returned(&self, lease_id: LeaseId, returned_at: i64) -> Result<u64> {
        let result = sqlx::query("UPDATE leases SET status = ?, returned_at = ? WHERE id = ?")
            .bind(LeaseStatus::Returned.as_str())
            .bind(returned_at)
            .bind(lease_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn list_active_leases(&self) -> Result<Vec<ActiveLeaseRecord>> {
        let rows: Vec<ActiveLeaseRow> = sqlx::query_as(
            r#"
            SELECT l.id AS lease_id,
                   u.id AS unit_id, u.serial_number, u.model, u.sim_set_number,
                   c.name AS customer_name,
                   l.start_date, l.due_date
            FROM leases l
            JOIN units u ON u.id = l.unit_id
            JOIN customers c ON c.id = l.customer_id
            WHERE l.status = 'active'
            ORDER BY l.due_date ASC, u.serial_number ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ActiveLeaseRecord::from).collect())
    }

    async fn list_lease_history(&self, unit_id: UnitId) -> Result<Vec<LeaseHistoryEntry>> {
        let rows: Vec<LeaseHistoryRow> = sqlx::query_as(
            r#"
            SELECT l.id AS lease_id, c.name AS customer_name,
                   l.start_date, l.due_date, l.status, l.returned_at,
                   (SELECT COUNT(*) FROM lease_extensions e
                    WHERE e.lease_id = l.id) AS extension_count
            FROM leases l
            JOIN customers c ON c.id = l.customer_id
            WHERE l.unit_id = ?
            ORDER BY l.start_date DESC, l.id DESC
            "#,
        )
        .bind(unit_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(LeaseHistoryRow::into_entry).collect()
    }

    async fn list_due_on(&self, date: NaiveDate) -> Result<Vec<DueTodayEntry>> {
        let rows: Vec<DueTodayRow> = sqlx::query_as(
            r#"
            SELECT u.serial_number, c.name AS customer_name, l.due_date
            FROM leases l
            JOIN units u ON u.id = l.unit_id
            JOIN customers c ON c.id = l.customer_id
            WHERE l.status = 'active' AND l.due_date = ?
            ORDER BY c.name, u.serial_number
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(DueTodayEntry::from).collect())
    }
}

#[async_trait]
impl TransactionalLeaseRepository for SqliteLeaseRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn LeaseRepositoryTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteLeaseTransaction::new(tx)))
    }
}
