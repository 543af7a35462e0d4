//! Tag model and name normalization.

use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Color assigned to tags created implicitly through note/task writes.
pub const DEFAULT_TAG_COLOR: &str = "#89b4fa";

/// Label attached to notes and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    /// Always trimmed and lowercase.
    pub name: String,
    pub color: String,
}

/// Normalizes one tag value (trim + lowercase).
///
/// Returns `None` for blank input.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes, deduplicates and sorts tag values.
///
/// # Errors
/// - [`ValidationError::BlankTag`] when any input is blank; a blank tag is a
///   caller mistake, not something to drop silently.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Result<Vec<String>, ValidationError> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        let normalized = normalize_tag(tag.as_ref()).ok_or(ValidationError::BlankTag)?;
        unique.insert(normalized);
    }
    Ok(unique.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::{normalize_tag, normalize_tags};
    use crate::model::validation::ValidationError;

    #[test]
    fn normalize_tag_trims_and_lowercases() {
        assert_eq!(normalize_tag("  Work ").as_deref(), Some("work"));
        assert_eq!(normalize_tag("   "), None);
    }

    #[test]
    fn normalize_tags_dedups_case_insensitively() {
        let tags = normalize_tags(&["Work", "IMPORTANT", "work"]).expect("valid tags");
        assert_eq!(tags, vec!["important".to_string(), "work".to_string()]);
    }

    #[test]
    fn normalize_tags_rejects_blank_values() {
        let err = normalize_tags(&["ok", " "]).expect_err("blank tag must fail");
        assert_eq!(err, ValidationError::BlankTag);
    }
}
