//! Note use-case service.
//!
//! # Responsibility
//! - Provide note create/update/get/list/delete APIs over a repository.
//! - Apply defaults (`"Untitled Note"`, empty content) and tag normalization.
//!
//! # Invariants
//! - `update_note` is a partial update: omitted fields keep their value and
//!   the tag set is only replaced when `tags` is provided.
//! - Every write returns the read-back record, never the caller's input.

use crate::model::note::{resolve_note_title, Note, NoteId};
use crate::model::tag::{normalize_tag, normalize_tags, Tag};
use crate::model::validation::ValidationError;
use crate::repo::note_repo::{NoteListQuery, NoteRepository};
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Caller input violates a model rule.
    Validation(ValidationError),
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for NoteServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Fields accepted by note create and update.
///
/// On create, `None` means "use the default"; on update it means "keep".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteInput {
    pub title: Option<String>,
    pub content: Option<String>,
    /// `Some("")` clears the filename on update.
    pub filename: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note and returns the stored record.
    pub fn create_note(&mut self, input: NoteInput) -> Result<Note, NoteServiceError> {
        let tags = normalize_tags(input.tags.as_deref().unwrap_or_default())?;
        let mut note = Note::new(
            resolve_note_title(input.title.as_deref()),
            input.content.unwrap_or_default(),
        );
        note.filename = input.filename.and_then(non_blank);

        let id = self.repo.create_note(&note, &tags)?;
        info!(
            "event=note_create module=service status=ok note_id={id} tags={}",
            tags.len()
        );
        self.read_back(id, "created note not found in read-back")
    }

    /// Applies a partial update and returns the stored record.
    pub fn update_note(&mut self, id: NoteId, input: NoteInput) -> Result<Note, NoteServiceError> {
        let mut note = self
            .repo
            .get_note(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))?;

        if let Some(title) = input.title.as_deref() {
            note.title = resolve_note_title(Some(title));
        }
        if let Some(content) = input.content {
            note.content = content;
        }
        if let Some(filename) = input.filename {
            note.filename = non_blank(filename);
        }
        let tags = input
            .tags
            .as_deref()
            .map(|tags| normalize_tags(tags))
            .transpose()?;

        self.repo.update_note(&note, tags.as_deref())?;
        info!(
            "event=note_update module=service status=ok note_id={id} tags_replaced={}",
            tags.is_some()
        );
        self.read_back(id, "updated note not found in read-back")
    }

    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>, NoteServiceError> {
        Ok(self.repo.get_note(id)?)
    }

    /// Lists notes using an optional single-tag filter and pagination.
    pub fn list_notes(
        &self,
        tag: Option<&str>,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<Vec<Note>, NoteServiceError> {
        let query = NoteListQuery {
            tag: tag.and_then(normalize_tag),
            limit,
            offset,
        };
        Ok(self.repo.list_notes(&query)?)
    }

    pub fn find_by_filename(&self, filename: &str) -> Result<Option<Note>, NoteServiceError> {
        Ok(self.repo.find_note_by_filename(filename)?)
    }

    /// Hard-deletes one note.
    pub fn delete_note(&mut self, id: NoteId) -> Result<(), NoteServiceError> {
        self.repo.delete_note(id)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    pub fn count_notes(&self) -> Result<u64, NoteServiceError> {
        Ok(self.repo.count_notes()?)
    }

    pub fn list_tags(&self) -> Result<Vec<Tag>, NoteServiceError> {
        Ok(self.repo.list_tags()?)
    }

    fn read_back(&self, id: NoteId, details: &'static str) -> Result<Note, NoteServiceError> {
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(details))
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
