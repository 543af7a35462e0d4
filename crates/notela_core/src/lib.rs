//! Core domain logic for Notela.
//! This crate is the single source of truth for business invariants.

pub mod access;
pub mod db;
pub mod editor;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use access::{gate_from_secret, AccessError, AccessGate, VAULT_PASSWORD_HEADER};
pub use db::{open_db, open_db_in_memory, DbError};
pub use editor::highlight::{highlight, highlight_lines, StyledLine};
pub use editor::Editor;
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LoggingError,
};
pub use model::note::{Note, NoteId};
pub use model::tag::Tag;
pub use model::task::{Task, TaskId, TaskPriority};
pub use model::vault::{VaultDocument, VaultFileSummary};
pub use repo::note_repo::{NoteListQuery, NoteRepository, SqliteNoteRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
pub use repo::vault_repo::{FsVaultStore, VaultError, VaultStore};
pub use repo::{RepoError, RepoResult};
pub use search::fts::{search_notes, SearchError, SearchHit, SearchQuery, SearchResult};
pub use service::note_service::{NoteInput, NoteService, NoteServiceError};
pub use service::task_service::{TaskInput, TaskPatch, TaskService, TaskServiceError};
pub use service::vault_service::{MigrationReport, VaultService, VaultServiceError};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
