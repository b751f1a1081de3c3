//! Shared wiring: real SQLite adapters behind the core services, frozen clock

#![allow(dead_code)]

use chrono::NaiveDate;
use rentdesk_core::application::{InventoryService, LeaseService, SearchService};
use rentdesk_core::domain::{CustomerId, UnitId};
use rentdesk_core::port::FixedTimeProvider;
use rentdesk_infra_sqlite::{
    create_pool, run_migrations, SqliteInventoryRepository, SqliteLeaseRepository,
};
use sqlx::SqlitePool;
use std::sync::Arc;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub struct Harness {
    pub pool: SqlitePool,
    pub leases: LeaseService,
    pub search: SearchService,
    pub inventory: InventoryService,
}

impl Harness {
    /// Fresh in-memory database with the clock frozen on `today`
    pub async fn in_memory(today: NaiveDate) -> Self {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        Self::over(pool, today)
    }

    /// Services over an existing pool; lets a test move the clock
    pub fn over(pool: SqlitePool, today: NaiveDate) -> Self {
        let clock = Arc::new(FixedTimeProvider::on(today));
        let lease_repo = Arc::new(SqliteLeaseRepository::new(pool.clone()));
        let inventory_repo = Arc::new(SqliteInventoryRepository::new(pool.clone()));

        Self {
            leases: LeaseService::new(lease_repo.clone(), lease_repo.clone(), clock.clone()),
            search: SearchService::new(lease_repo),
            inventory: InventoryService::new(inventory_repo, clock),
            pool,
        }
    }

    pub async fn customer(&self, name: &str) -> CustomerId {
        self.inventory.create_customer(name).await.unwrap();
        self.inventory
            .list_customers()
            .await
            .unwrap()
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| c.id)
            .unwrap()
    }

    pub async fn unit(&self, serial: &str) -> UnitId {
        self.inventory.upsert_unit(serial, None, None).await.unwrap()
    }

    pub async fn active_lease_count(&self, unit_id: UnitId) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM leases WHERE unit_id = ? AND status = 'active'")
            .bind(unit_id)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}
