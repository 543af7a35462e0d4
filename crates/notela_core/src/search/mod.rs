//! Full-text search entry points.
//!
//! # Responsibility
//! - Expose note search backed by the SQLite FTS5 index `notes_fts`.
//! - Keep hit shaping (snippets, ordering) inside core.

pub mod fts;
