//! Racing writers against a file-backed database
//!
//! Individual attempts may lose with SQLITE_BUSY; the invariants must hold regardless.

mod common;

use common::{date, Harness};
use rentdesk_core::application::{CreateLeaseRequest, ExtendLeaseRequest};
use rentdesk_infra_sqlite::{create_pool, run_migrations};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDb {
    path: PathBuf,
}

impl TempDb {
    fn new(name: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "rentdesk_{}_{}_{}.db",
            name,
            std::process::id(),
            nanos
        ));
        Self { path }
    }

    fn url(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", self.path.display(), suffix));
        }
    }
}

async fn file_harness(db: &TempDb) -> Arc<Harness> {
    let pool = create_pool(&db.url()).await.unwrap();
    run_migrations(&pool).await.unwrap();
    Arc::new(Harness::over(pool, date(2024, 5, 10)))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_creates_leave_one_active_lease() {
    let db = TempDb::new("creates");
    let h = file_harness(&db).await;
    let unit = h.unit("RACE-1").await;

    let mut customers = Vec::new();
    for i in 0..8 {
        customers.push(h.customer(&format!("Customer {}", i)).await);
    }

    let handles: Vec<_> = customers
        .into_iter()
        .map(|customer_id| {
            let h = Arc::clone(&h);
            tokio::spawn(async move {
                h.leases
                    .create_lease(CreateLeaseRequest {
                        unit_id: unit,
                        customer_id,
                        start_date: date(2024, 5, 1),
                        due_date: date(2024, 5, 31),
                    })
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            created += 1;
        }
    }

    assert!(created >= 1);
    assert_eq!(h.active_lease_count(unit).await, 1);

    let history = h.leases.unit_history(unit).await.unwrap();
    assert_eq!(history.len(), created);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_extensions_never_exceed_cap() {
    let db = TempDb::new("extends");
    let h = file_harness(&db).await;
    let unit = h.unit("RACE-2").await;
    let customer = h.customer("Acme").await;
    let lease = h
        .leases
        .create_lease(CreateLeaseRequest {
            unit_id: unit,
            customer_id: customer,
            start_date: date(2024, 5, 1),
            due_date: date(2024, 5, 2),
        })
        .await
        .unwrap();

    let handles: Vec<_> = (3..=20)
        .map(|day| {
            let h = Arc::clone(&h);
            tokio::spawn(async move {
                h.leases
                    .extend_lease(ExtendLeaseRequest {
                        lease_id: lease,
                        new_due_date: date(2024, 5, day),
                        reason: None,
                    })
                    .await
            })
        })
        .collect();

    for handle in handles {
        let _ = handle.await.unwrap();
    }

    let log = h.leases.lease_extensions(lease).await.unwrap();
    assert!(log.len() <= 5, "cap exceeded: {} extensions", log.len());

    // Whatever won, the lease carries the due date of the last recorded extension
    let history = h.leases.unit_history(unit).await.unwrap();
    assert_eq!(history[0].extension_count as usize, log.len());
    if let Some(last) = log.last() {
        assert_eq!(history[0].due_date, last.extended_due_date);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_extensions_at_cap_stay_rejected_under_contention() {
    let db = TempDb::new("capped");
    let h = file_harness(&db).await;
    let unit = h.unit("RACE-3").await;
    let customer = h.customer("Acme").await;
    let lease = h
        .leases
        .create_lease(CreateLeaseRequest {
            unit_id: unit,
            customer_id: customer,
            start_date: date(2024, 5, 1),
            due_date: date(2024, 5, 2),
        })
        .await
        .unwrap();

    for day in 3..=7 {
        let outcome = h
            .leases
            .extend_lease(ExtendLeaseRequest {
                lease_id: lease,
                new_due_date: date(2024, 5, day),
                reason: None,
            })
            .await
            .unwrap();
        assert!(outcome.is_ok());
    }

    let handles: Vec<_> = (8..=15)
        .map(|day| {
            let h = Arc::clone(&h);
            tokio::spawn(async move {
                h.leases
                    .extend_lease(ExtendLeaseRequest {
                        lease_id: lease,
                        new_due_date: date(2024, 5, day),
                        reason: None,
                    })
                    .await
            })
        })
        .collect();

    for handle in handles {
        if let Ok(outcome) = handle.await.unwrap() {
            assert!(!outcome.is_ok());
        }
    }

    assert_eq!(h.leases.lease_extensions(lease).await.unwrap().len(), 5);
}
