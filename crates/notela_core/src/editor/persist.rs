//! Persistence boundary between the editor and note storage.

use crate::editor::buffer::DocumentIdentity;
use crate::editor::export::first_heading;
use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::NoteRepository;
use crate::service::note_service::{NoteInput, NoteService, NoteServiceError};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum NoteStoreError {
    NotFound(NoteId),
    Backend(Box<dyn Error + Send + Sync>),
}

impl Display for NoteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Backend(err) => write!(f, "note store failure: {err}"),
        }
    }
}

impl Error for NoteStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Backend(err) => Some(err.as_ref()),
        }
    }
}

impl From<NoteServiceError> for NoteStoreError {
    fn from(value: NoteServiceError) -> Self {
        match value {
            NoteServiceError::NoteNotFound(id) => Self::NotFound(id),
            other => Self::Backend(Box::new(other)),
        }
    }
}

/// Where the editor loads from and saves to.
pub trait NoteStore {
    fn load(&mut self, id: NoteId) -> Result<Note, NoteStoreError>;

    /// Saves `content` under `identity`, creating a note when there is none.
    /// Returns the id of the note now holding the content.
    fn save(
        &mut self,
        content: &str,
        identity: Option<&DocumentIdentity>,
    ) -> Result<NoteId, NoteStoreError>;
}

/// Title stored for editor content: the first heading, else the default.
fn title_for(content: &str) -> Option<String> {
    first_heading(content).map(str::to_string)
}

impl<R: NoteRepository> NoteStore for NoteService<R> {
    fn load(&mut self, id: NoteId) -> Result<Note, NoteStoreError> {
        self.get_note(id)?.ok_or(NoteStoreError::NotFound(id))
    }

    fn save(
        &mut self,
        content: &str,
        identity: Option<&DocumentIdentity>,
    ) -> Result<NoteId, NoteStoreError> {
        let existing = match identity {
            Some(DocumentIdentity::Note(id)) => Some(*id),
            Some(DocumentIdentity::Filename(filename)) => {
                self.find_by_filename(filename)?.map(|note| note.id)
            }
            None => None,
        };
        let input = NoteInput {
            title: title_for(content),
            content: Some(content.to_string()),
            filename: match identity {
                Some(DocumentIdentity::Filename(filename)) => Some(filename.clone()),
                _ => None,
            },
            tags: None,
        };

        let note = match existing {
            Some(id) => self.update_note(id, input)?,
            None => self.create_note(input)?,
        };
        Ok(note.id)
    }
}
