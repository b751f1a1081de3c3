// Domain Layer - Pure business logic and entities

pub mod error;
pub mod lease;
pub mod note;
pub mod serial_query;
pub mod sim;
pub mod unit;

// Re-exports
pub use error::DomainError;
pub use lease::{
    check_extension, ActiveLease, ActiveLeaseRecord, DueTodayEntry, ExtensionOutcome,
    ExtensionRejection, Lease, LeaseExtension, LeaseHistoryEntry, LeaseId, LeaseStatus, NewLease,
    MAX_EXTENSIONS_PER_LEASE,
};
pub use note::{NewNote, Note, NoteId};
pub use serial_query::SerialQuery;
pub use sim::{Sim, SimSet, SIM_SLOTS};
pub use unit::{
    ActiveLeaseSummary, Customer, CustomerId, NewUnit, Unit, UnitFilter, UnitId,
    UnitWithActiveLease,
};
