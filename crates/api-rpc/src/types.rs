//! RPC Request/Response Types
//!
//! Method parameters and results. Dates travel as ISO `YYYY-MM-DD` strings.

use chrono::NaiveDate;
use rentdesk_core::domain::{CustomerId, ExtensionOutcome, LeaseId, NoteId, Sim, UnitId};
use serde::{Deserialize, Serialize};

/// units.search.v1 - Serial query plus optional active-customer filter
#[derive(Debug, Deserialize)]
pub struct SearchUnitsRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
}

/// units.upsert.v1 - Create or fill in a unit by serial number
#[derive(Debug, Deserialize)]
pub struct UpsertUnitRequest {
    pub serial_number: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub sim_set_number: Option<i64>,
}

/// units.set_sim_set.v1
#[derive(Debug, Deserialize)]
pub struct SetSimSetRequest {
    pub unit_id: UnitId,
    pub sim_set_number: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitIdResponse {
    pub unit_id: UnitId,
}

/// Any method keyed by a unit (leases.history.v1, notes.list.v1)
#[derive(Debug, Deserialize)]
pub struct UnitIdRequest {
    pub unit_id: UnitId,
}

/// customers.create.v1
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateCustomerResponse {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaseIdResponse {
    pub lease_id: LeaseId,
}

/// Any method keyed by a lease (leases.return.v1, leases.extensions.v1)
#[derive(Debug, Deserialize)]
pub struct LeaseIdRequest {
    pub lease_id: LeaseId,
}

/// leases.extend.v1 result: `(ok, message)` plus the new due date on success
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendLeaseResponse {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_count: Option<i64>,
}

impl From<ExtensionOutcome> for ExtendLeaseResponse {
    fn from(outcome: ExtensionOutcome) -> Self {
        let (due_date, extension_count) = match &outcome {
            ExtensionOutcome::Extended {
                due_date,
                extension_count,
                ..
            } => (Some(*due_date), Some(*extension_count)),
            ExtensionOutcome::Rejected(_) => (None, None),
        };
        Self {
            ok: outcome.is_ok(),
            message: outcome.message(),
            due_date,
            extension_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReturnLeaseResponse {
    pub lease_id: LeaseId,
    pub returned: bool,
}

/// sims.list.v1 - `grid` pads the answer to all 8 slots
#[derive(Debug, Deserialize)]
pub struct ListSimsRequest {
    pub unit_id: UnitId,
    #[serde(default)]
    pub grid: bool,
}

/// sims.replace.v1 - Whole-set replacement, exactly slots 1..=8
#[derive(Debug, Deserialize)]
pub struct ReplaceSimsRequest {
    pub unit_id: UnitId,
    pub sims: Vec<Sim>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplaceSimsResponse {
    pub unit_id: UnitId,
    pub slots: usize,
}

/// sims.upsert.v1 - Single slot write
#[derive(Debug, Deserialize)]
pub struct UpsertSimRequest {
    pub unit_id: UnitId,
    pub slot: u8,
    #[serde(default)]
    pub imei: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
}

/// notes.add.v1
#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    pub unit_id: UnitId,
    pub text: String,
    #[serde(default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteIdResponse {
    pub note_id: NoteId,
}

/// notes.update.v1
#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub note_id: NoteId,
    pub text: String,
}

/// notes.delete.v1
#[derive(Debug, Deserialize)]
pub struct NoteIdRequest {
    pub note_id: NoteId,
}

/// notes.update.v1 / notes.delete.v1 result
#[derive(Debug, Clone, Serialize)]
pub struct NoteChangeResponse {
    pub note_id: NoteId,
    pub changed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentdesk_core::domain::ExtensionRejection;

    #[test]
    fn test_search_request_defaults() {
        let req: SearchUnitsRequest = serde_json::from_str("{}").unwrap();
        assert!(req.query.is_empty());
        assert!(req.customer_id.is_none());
    }

    #[test]
    fn test_extend_response_from_outcomes() {
        let due = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let ok = ExtendLeaseResponse::from(ExtensionOutcome::Extended {
            lease_id: 3,
            due_date: due,
            extension_count: 2,
        });
        assert!(ok.ok);
        assert_eq!(ok.message, "Lease extended.");
        assert_eq!(ok.due_date, Some(due));

        let rejected =
            ExtendLeaseResponse::from(ExtensionOutcome::Rejected(ExtensionRejection::LimitReached));
        assert!(!rejected.ok);
        assert_eq!(rejected.message, "Maximum of 5 extensions reached.");

        let json = serde_json::to_value(&rejected).unwrap();
        assert!(json.get("due_date").is_none());
    }

    #[test]
    fn test_replace_sims_request_parses_slots() {
        let req: ReplaceSimsRequest = serde_json::from_str(
            r#"{"unit_id": 4, "sims": [{"slot": 1, "imei": "3500", "vendor": null}]}"#,
        )
        .unwrap();
        assert_eq!(req.sims[0].slot, 1);
        assert_eq!(req.sims[0].imei.as_deref(), Some("3500"));
    }
}
