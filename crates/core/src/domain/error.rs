// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid lease state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Lease start date {start} is after due date {due}")]
    InvalidDateRange { start: String, due: String },

    #[error("Invalid SIM set: {0}")]
    InvalidSimSet(String),

    #[error("Unknown lease status: {0}")]
    UnknownStatus(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
