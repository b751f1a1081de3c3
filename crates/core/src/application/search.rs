// Unit Search - serial-number matcher + active-customer filter

use crate::domain::{CustomerId, UnitFilter, UnitWithActiveLease};
use crate::error::Result;
use crate::port::LeaseRepository;
use std::sync::Arc;
use tracing::debug;

pub struct SearchService {
    lease_repo: Arc<dyn LeaseRepository>,
}

impl SearchService {
    pub fn new(lease_repo: Arc<dyn LeaseRepository>) -> Self {
        Self { lease_repo }
    }

    /// Find units by serial query, optionally restricted to one customer's active leases.
    ///
    /// A query of exactly five digits matches serial suffixes; anything else is a
    /// substring match; a blank query matches every unit.
    pub async fn search_units(
        &self,
        query: &str,
        active_customer_id: Option<CustomerId>,
    ) -> Result<Vec<UnitWithActiveLease>> {
        let filter = UnitFilter::new(query, active_customer_id);
        let rows = self.lease_repo.find_units(&filter).await?;
        debug!(
            query = %query.trim(),
            serial = ?filter.serial,
            customer_id = ?active_customer_id,
            found = rows.len(),
            "Unit search"
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::lease::{CreateLeaseRequest, LeaseService};
    use crate::application::testing::InMemoryLeaseStore;
    use crate::port::FixedTimeProvider;
    use chrono::NaiveDate;

    fn serials(rows: &[UnitWithActiveLease]) -> Vec<&str> {
        rows.iter().map(|r| r.unit.serial_number.as_str()).collect()
    }

    #[tokio::test]
    async fn test_suffix_and_substring_search() {
        let store = InMemoryLeaseStore::new();
        store.add_unit("ABC-00012345");
        store.add_unit("12345");
        store.add_unit("123456");
        store.add_unit("XYZ-ABC-01");
        let search = SearchService::new(Arc::new(store));

        let rows = search.search_units("12345", None).await.unwrap();
        assert_eq!(serials(&rows), vec!["12345", "ABC-00012345"]);

        let rows = search.search_units("ABC", None).await.unwrap();
        assert_eq!(serials(&rows), vec!["ABC-00012345", "XYZ-ABC-01"]);

        let rows = search.search_units("   ", None).await.unwrap();
        assert_eq!(rows.len(), 4);
    }

    #[tokio::test]
    async fn test_customer_filter_uses_active_lease_only() {
        let store = InMemoryLeaseStore::new();
        let u1 = store.add_unit("ABC-00000001");
        let u2 = store.add_unit("ABC-00000002");
        let acme = store.add_customer("Acme");
        let globex = store.add_customer("Globex");
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let leases = LeaseService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(FixedTimeProvider::on(day)),
        );

        leases
            .create_lease(CreateLeaseRequest {
                unit_id: u1,
                customer_id: acme,
                start_date: day,
                due_date: day,
            })
            .await
            .unwrap();
        // u2 was leased to Acme, then handed to Globex
        for customer_id in [acme, globex] {
            leases
                .create_lease(CreateLeaseRequest {
                    unit_id: u2,
                    customer_id,
                    start_date: day,
                    due_date: day,
                })
                .await
                .unwrap();
        }

        let search = SearchService::new(Arc::new(store));
        let rows = search.search_units("ABC", Some(acme)).await.unwrap();
        assert_eq!(serials(&rows), vec!["ABC-00000001"]);
        assert_eq!(
            rows[0].active_lease.as_ref().unwrap().customer_name,
            "Acme"
        );

        let rows = search.search_units("", Some(globex)).await.unwrap();
        assert_eq!(serials(&rows), vec!["ABC-00000002"]);
    }
}
