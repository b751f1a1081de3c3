// Unit & Customer Domain Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{DomainError, Result};
use super::lease::{LeaseId, LeaseStatus};
use super::serial_query::SerialQuery;

/// Unit ID (database rowid)
pub type UnitId = i64;

/// Customer ID (database rowid)
pub type CustomerId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
}

/// Trim a customer name, rejecting blanks
pub fn normalize_customer_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::ValidationError(
            "Customer name cannot be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

/// Hardware unit, keyed by its immutable serial number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub serial_number: String,
    pub model: Option<String>,
    pub sim_set_number: Option<i64>,
}

/// Upsert input for a unit.
///
/// `model` and `sim_set_number` use coalesce semantics on conflict:
/// `None` keeps whatever is already stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUnit {
    pub serial_number: String,
    pub model: Option<String>,
    pub sim_set_number: Option<i64>,
}

impl NewUnit {
    pub fn new(
        serial_number: &str,
        model: Option<&str>,
        sim_set_number: Option<i64>,
    ) -> Result<Self> {
        let serial_number = serial_number.trim();
        if serial_number.is_empty() {
            return Err(DomainError::ValidationError(
                "Serial number cannot be empty".to_string(),
            ));
        }
        if let Some(n) = sim_set_number {
            if n < 0 {
                return Err(DomainError::ValidationError(format!(
                    "SIM set number must be non-negative, got {}",
                    n
                )));
            }
        }

        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        Ok(Self {
            serial_number: serial_number.to_string(),
            model,
            sim_set_number,
        })
    }
}

/// The active lease shown next to a unit in search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveLeaseSummary {
    pub lease_id: LeaseId,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub status: LeaseStatus,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Search result row: a unit and its current active lease, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitWithActiveLease {
    #[serde(flatten)]
    pub unit: Unit,
    pub active_lease: Option<ActiveLeaseSummary>,
}

/// Unit search filter. Both parts are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitFilter {
    pub serial: SerialQuery,
    /// Only units whose current active lease belongs to this customer
    pub active_customer_id: Option<CustomerId>,
}

impl UnitFilter {
    pub fn new(query: &str, active_customer_id: Option<CustomerId>) -> Self {
        Self {
            serial: SerialQuery::parse(query),
            active_customer_id,
        }
    }

    /// In-memory evaluation of the filter against a search row
    pub fn matches(&self, row: &UnitWithActiveLease) -> bool {
        if !self.serial.matches(&row.unit.serial_number) {
            return false;
        }
        match self.active_customer_id {
            None => true,
            Some(customer_id) => row
                .active_lease
                .as_ref()
                .is_some_and(|lease| lease.customer_id == customer_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_unit_trims_and_drops_blank_model() {
        let unit = NewUnit::new("  ABC-00012345 ", Some("   "), None).unwrap();
        assert_eq!(unit.serial_number, "ABC-00012345");
        assert_eq!(unit.model, None);

        let unit = NewUnit::new("X1", Some(" LU800 "), Some(4)).unwrap();
        assert_eq!(unit.model.as_deref(), Some("LU800"));
        assert_eq!(unit.sim_set_number, Some(4));
    }

    #[test]
    fn test_new_unit_rejects_blank_serial() {
        assert!(NewUnit::new("   ", None, None).is_err());
    }

    #[test]
    fn test_new_unit_rejects_negative_sim_set() {
        assert!(NewUnit::new("X1", None, Some(-1)).is_err());
    }

    #[test]
    fn test_customer_name_normalization() {
        assert_eq!(normalize_customer_name(" Acme ").unwrap(), "Acme");
        assert!(normalize_customer_name("\t").is_err());
    }

    #[test]
    fn test_filter_requires_active_lease_for_customer() {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let due = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let leased = UnitWithActiveLease {
            unit: Unit {
                id: 1,
                serial_number: "ABC-00012345".to_string(),
                model: None,
                sim_set_number: None,
            },
            active_lease: Some(ActiveLeaseSummary {
                lease_id: 7,
                customer_id: 3,
                customer_name: "Acme".to_string(),
                status: LeaseStatus::Active,
                start_date: start,
                due_date: due,
            }),
        };
        let idle = UnitWithActiveLease {
            unit: Unit {
                id: 2,
                serial_number: "ABC-00099999".to_string(),
                model: None,
                sim_set_number: None,
            },
            active_lease: None,
        };

        let filter = UnitFilter::new("ABC", Some(3));
        assert!(filter.matches(&leased));
        assert!(!filter.matches(&idle));

        let other_customer = UnitFilter::new("", Some(4));
        assert!(!other_customer.matches(&leased));

        let anyone = UnitFilter::new("", None);
        assert!(anyone.matches(&idle));
    }
}
