//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQL and file-system details from service orchestration.
//!
//! # Invariants
//! - Repository writes call the model's `validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to
//!   transport errors.

pub mod error;
pub mod note_repo;
mod schema_check;
pub mod tag_links;
pub mod task_repo;
pub mod vault_repo;

use uuid::Uuid;

pub use error::{RepoError, RepoResult};

/// Limit applied when a caller passes `limit=0`.
pub const LIST_DEFAULT_LIMIT: u32 = 50;
/// Upper bound for any list page.
pub const LIST_LIMIT_MAX: u32 = 200;

/// Normalizes a list page size.
///
/// `None` means "no limit" and is kept as-is; `Some(0)` becomes the default
/// and anything above [`LIST_LIMIT_MAX`] is clamped.
pub fn normalize_list_limit(limit: Option<u32>) -> Option<u32> {
    match limit {
        None => None,
        Some(0) => Some(LIST_DEFAULT_LIMIT),
        Some(value) => Some(value.min(LIST_LIMIT_MAX)),
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
