//! Serial-number search over the SQLite adapter

mod common;

use common::{date, Harness};
use rentdesk_core::application::CreateLeaseRequest;

fn serials(rows: &[rentdesk_core::domain::UnitWithActiveLease]) -> Vec<&str> {
    rows.iter().map(|r| r.unit.serial_number.as_str()).collect()
}

async fn seeded() -> Harness {
    let h = Harness::in_memory(date(2024, 5, 10)).await;
    for serial in [
        "ABC-00012345",
        "12345",
        "123456",
        "XYZ-ABC-01",
        "xyz-abc-02",
        "A%C_03",
    ] {
        h.unit(serial).await;
    }
    h
}

#[tokio::test]
async fn test_five_digits_match_suffix_only() {
    let h = seeded().await;
    let rows = h.search.search_units("12345", None).await.unwrap();
    assert_eq!(serials(&rows), vec!["12345", "ABC-00012345"]);
}

#[tokio::test]
async fn test_other_queries_match_substring() {
    let h = seeded().await;

    // Six digits is no longer a suffix query
    let rows = h.search.search_units("123456", None).await.unwrap();
    assert_eq!(serials(&rows), vec!["123456"]);

    let rows = h.search.search_units("2345", None).await.unwrap();
    assert_eq!(serials(&rows), vec!["12345", "123456", "ABC-00012345"]);
}

#[tokio::test]
async fn test_matching_is_case_sensitive() {
    let h = seeded().await;
    let rows = h.search.search_units("ABC", None).await.unwrap();
    assert_eq!(serials(&rows), vec!["ABC-00012345", "XYZ-ABC-01"]);

    let rows = h.search.search_units("abc", None).await.unwrap();
    assert_eq!(serials(&rows), vec!["xyz-abc-02"]);
}

#[tokio::test]
async fn test_wildcards_are_literal() {
    let h = seeded().await;
    assert_eq!(
        serials(&h.search.search_units("%", None).await.unwrap()),
        vec!["A%C_03"]
    );
    assert_eq!(
        serials(&h.search.search_units("_", None).await.unwrap()),
        vec!["A%C_03"]
    );
}

#[tokio::test]
async fn test_blank_query_lists_everything_in_serial_order() {
    let h = seeded().await;
    let rows = h.search.search_units("   ", None).await.unwrap();
    assert_eq!(rows.len(), 6);
    let listed = serials(&rows);
    let mut sorted = listed.clone();
    sorted.sort();
    assert_eq!(listed, sorted);
}

#[tokio::test]
async fn test_customer_filter_uses_current_active_lease() {
    let h = seeded().await;
    let acme = h.customer("Acme").await;
    let zeta = h.customer("Zeta").await;
    let units = h.inventory.list_units().await.unwrap();
    let unit_of = |serial: &str| units.iter().find(|u| u.serial_number == serial).unwrap().id;

    let lease = |unit_id, customer_id| CreateLeaseRequest {
        unit_id,
        customer_id,
        start_date: date(2024, 5, 1),
        due_date: date(2024, 5, 31),
    };

    h.leases.create_lease(lease(unit_of("ABC-00012345"), acme)).await.unwrap();
    h.leases.create_lease(lease(unit_of("XYZ-ABC-01"), acme)).await.unwrap();
    // Acme's lease on 12345 was superseded by Zeta: no longer Acme's
    h.leases.create_lease(lease(unit_of("12345"), acme)).await.unwrap();
    h.leases.create_lease(lease(unit_of("12345"), zeta)).await.unwrap();

    let rows = h.search.search_units("", Some(acme)).await.unwrap();
    assert_eq!(serials(&rows), vec!["ABC-00012345", "XYZ-ABC-01"]);

    let rows = h.search.search_units("12345", Some(acme)).await.unwrap();
    assert_eq!(serials(&rows), vec!["ABC-00012345"]);

    let rows = h.search.search_units("12345", Some(zeta)).await.unwrap();
    assert_eq!(serials(&rows), vec!["12345"]);
    assert_eq!(
        rows[0].active_lease.as_ref().unwrap().customer_name,
        "Zeta"
    );
}
