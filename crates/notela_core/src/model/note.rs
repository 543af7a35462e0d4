//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted markdown note record.
//! - Provide defaults and validation applied by every write path.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `title` is never blank once persisted.
//! - `filename`, when set, is a single safe path component.

use crate::model::tag::Tag;
use crate::model::validation::{validate_filename, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable note identifier.
pub type NoteId = Uuid;

/// Title used when a note is created without one.
pub const DEFAULT_NOTE_TITLE: &str = "Untitled Note";

/// Persisted markdown note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    /// Raw markdown source.
    pub content: String,
    /// Vault filename this note was imported from or exported to.
    pub filename: Option<String>,
    /// Epoch milliseconds. Assigned by storage; `0` before the first write.
    pub created_at: i64,
    /// Epoch milliseconds. Assigned by storage; `0` before the first write.
    pub updated_at: i64,
    /// Sorted by name.
    pub tags: Vec<Tag>,
}

impl Note {
    /// Creates an unsaved note with a generated id.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            filename: None,
            created_at: 0,
            updated_at: 0,
            tags: Vec::new(),
        }
    }

    /// Validates write-time invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        if let Some(filename) = self.filename.as_deref() {
            validate_filename(filename)?;
        }
        Ok(())
    }

    /// Tag names in stored order.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|tag| tag.name.as_str()).collect()
    }
}

/// Resolves an optional caller-provided title to the stored title.
///
/// Blank and missing titles fall back to [`DEFAULT_NOTE_TITLE`].
pub fn resolve_note_title(title: Option<&str>) -> String {
    match title.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_NOTE_TITLE.to_string(),
    }
}
