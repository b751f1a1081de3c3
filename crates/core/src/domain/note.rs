// Unit Note Domain Model

use serde::{Deserialize, Serialize};

use super::error::{DomainError, Result};
use super::unit::UnitId;

/// Note ID (database rowid)
pub type NoteId = i64;

/// Free-form note attached to a unit.
///
/// Editing overwrites `text` and refreshes `created_at`; no history is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub unit_id: UnitId,
    pub text: String,
    pub author: Option<String>,
    pub created_at: i64, // epoch ms
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub unit_id: UnitId,
    pub text: String,
    pub author: Option<String>,
}

impl NewNote {
    pub fn new(unit_id: UnitId, text: &str, author: Option<&str>) -> Result<Self> {
        Ok(Self {
            unit_id,
            text: normalize_note_text(text)?,
            author: author
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
        })
    }
}

pub fn normalize_note_text(text: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DomainError::ValidationError(
            "Note text cannot be empty".to_string(),
        ));
    }
    Ok(text.to_string())
}
