//! Field validation shared by note, task and vault writes.

use crate::model::vault::VAULT_FILE_EXTENSION;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty after trimming.
    BlankTitle,
    /// Filename is not a single, safe path component.
    InvalidFilename(String),
    /// Tag value is empty after trimming.
    BlankTag,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title must not be blank"),
            Self::InvalidFilename(value) => write!(f, "invalid filename: `{value}`"),
            Self::BlankTag => write!(f, "tag must not be blank"),
        }
    }
}

impl Error for ValidationError {}

/// Validates that `value` is usable as a single file name.
///
/// Rejects empty names, `.`/`..`, and anything containing a path separator
/// or NUL so the name can never escape its directory.
pub fn validate_filename(value: &str) -> Result<(), ValidationError> {
    let invalid = value.trim().is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);
    if invalid {
        return Err(ValidationError::InvalidFilename(value.to_string()));
    }
    Ok(())
}

/// Validates a vault entry name: a safe file name with a non-empty stem
/// and the markdown extension.
pub fn validate_vault_filename(value: &str) -> Result<(), ValidationError> {
    validate_filename(value)?;
    match value.strip_suffix(VAULT_FILE_EXTENSION) {
        Some(stem) if !stem.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidFilename(value.to_string())),
    }
}
