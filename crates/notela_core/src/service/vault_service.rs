//! Vault use-case service.
//!
//! # Responsibility
//! - Listing with case-insensitive search over title and preview.
//! - Create/update with required-field checks.
//! - One-shot import of vault files into notes.
//!
//! # Invariants
//! - Import never creates two notes for the same filename; a file whose
//!   name already belongs to a note is reported as skipped.

use crate::model::note::NoteId;
use crate::model::vault::{derive_vault_title, VaultDocument, VaultFileSummary};
use crate::repo::note_repo::NoteRepository;
use crate::repo::vault_repo::{VaultError, VaultStore};
use crate::service::note_service::{NoteInput, NoteService, NoteServiceError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum VaultServiceError {
    /// A required request field is missing or empty.
    MissingField(&'static str),
    Vault(VaultError),
    Notes(NoteServiceError),
}

impl Display for VaultServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::Vault(err) => write!(f, "{err}"),
            Self::Notes(err) => write!(f, "{err}"),
        }
    }
}

impl Error for VaultServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingField(_) => None,
            Self::Vault(err) => Some(err),
            Self::Notes(err) => Some(err),
        }
    }
}

impl From<VaultError> for VaultServiceError {
    fn from(value: VaultError) -> Self {
        Self::Vault(value)
    }
}

impl From<NoteServiceError> for VaultServiceError {
    fn from(value: NoteServiceError) -> Self {
        Self::Notes(value)
    }
}

/// Outcome of [`VaultService::migrate_into_notes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// `(filename, created note id)` in listing order.
    pub migrated: Vec<(String, NoteId)>,
    /// Filenames that already had a note.
    pub skipped: Vec<String>,
}

pub struct VaultService<S: VaultStore> {
    store: S,
}

impl<S: VaultStore> VaultService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists vault files, newest first, optionally filtered by `query`.
    pub fn list_files(&self, query: Option<&str>) -> Result<Vec<VaultFileSummary>, VaultServiceError> {
        let files = self.store.list()?;
        let needle = query
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase);

        let Some(needle) = needle else {
            return Ok(files);
        };
        Ok(files
            .into_iter()
            .filter(|file| {
                file.title.to_lowercase().contains(&needle)
                    || file.preview.to_lowercase().contains(&needle)
            })
            .collect())
    }

    pub fn read_file(&self, filename: &str) -> Result<VaultDocument, VaultServiceError> {
        Ok(self.store.read(filename)?)
    }

    /// Creates or overwrites a file. Both fields must be present and non-empty.
    pub fn save_file(
        &self,
        filename: Option<&str>,
        content: Option<&str>,
    ) -> Result<String, VaultServiceError> {
        let content = required(content, "content")?;
        let filename = required(filename, "filename")?;
        self.store.write(filename, content)?;
        info!(
            "event=vault_save module=vault status=ok filename={filename} bytes={}",
            content.len()
        );
        Ok(filename.to_string())
    }

    /// Overwrites an existing or new file. `content` must be non-empty.
    pub fn update_file(&self, filename: &str, content: Option<&str>) -> Result<(), VaultServiceError> {
        let content = required(content, "content")?;
        self.store.write(filename, content)?;
        info!(
            "event=vault_update module=vault status=ok filename={filename} bytes={}",
            content.len()
        );
        Ok(())
    }

    pub fn delete_file(&self, filename: &str) -> Result<(), VaultServiceError> {
        self.store.delete(filename)?;
        info!("event=vault_delete module=vault status=ok filename={filename}");
        Ok(())
    }

    /// Imports every vault file that has no note yet.
    pub fn migrate_into_notes<R: NoteRepository>(
        &self,
        notes: &mut NoteService<R>,
    ) -> Result<MigrationReport, VaultServiceError> {
        let files = self.store.list()?;
        info!(
            "event=vault_migrate module=vault status=start files={}",
            files.len()
        );

        let mut report = MigrationReport::default();
        for file in files {
            if notes.find_by_filename(&file.filename)?.is_some() {
                warn!(
                    "event=vault_migrate module=vault status=skip filename={} reason=exists",
                    file.filename
                );
                report.skipped.push(file.filename);
                continue;
            }

            let document = self.store.read(&file.filename)?;
            let title = derive_vault_title(&document.filename, &document.content);
            let note = notes.create_note(NoteInput {
                title: Some(title),
                content: Some(document.content),
                filename: Some(document.filename.clone()),
                tags: None,
            })?;
            info!(
                "event=vault_migrate module=vault status=ok filename={} note_id={}",
                document.filename, note.id
            );
            report.migrated.push((document.filename, note.id));
        }

        info!(
            "event=vault_migrate module=vault status=done migrated={} skipped={}",
            report.migrated.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, VaultServiceError> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(VaultServiceError::MissingField(field)),
    }
}
