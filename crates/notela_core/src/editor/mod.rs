//! Markdown editor pipeline.
//!
//! # Responsibility
//! - Own the editable document and its rendered (highlighted) form.
//! - Route input, paste, scroll, keys and save/load through one component.
//!
//! # Invariants
//! - Rendered lines are recomputed from the full text on every change.
//! - Caret/selection lives here, never in the rendered output.
//! - Nothing is persisted without an explicit save.

pub mod buffer;
pub mod export;
pub mod highlight;
pub mod keymap;
pub mod paste;
pub mod persist;
pub mod save_state;
pub mod scroll;

use crate::model::note::NoteId;
use buffer::{DocumentBuffer, DocumentIdentity, Selection};
use export::{export_filename, ExportFile};
use highlight::{highlight_lines, StyledLine};
use keymap::{Command, KeyContext, KeyEvent, Keymap};
use log::{info, warn};
use paste::{image_markdown_for_paste, PasteOutcome};
use persist::{NoteStore, NoteStoreError};
use save_state::{SaveError, SaveState, SaveTicket, SaveTracker};
use scroll::{ScrollOffsets, ScrollSync};
use std::time::Instant;

/// Outcome of the last load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Fresh buffer, nothing loaded.
    #[default]
    Empty,
    Loaded(NoteId),
    /// Load failed; the buffer was left empty.
    Failed,
}

/// Content handed to an asynchronous host for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    pub ticket: SaveTicket,
    pub content: String,
    pub identity: Option<DocumentIdentity>,
}

/// Markdown editor with live highlighting.
#[derive(Debug)]
pub struct Editor {
    buffer: DocumentBuffer,
    selection: Selection,
    focused: bool,
    scroll: ScrollSync,
    save: SaveTracker,
    /// Buffer revision captured by the save in flight.
    saving_revision: Option<u64>,
    load_status: LoadStatus,
    rendered: Vec<StyledLine>,
    keymap: Keymap,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Empty, focused editor.
    pub fn new() -> Self {
        Self {
            buffer: DocumentBuffer::new(),
            selection: Selection::default(),
            focused: true,
            scroll: ScrollSync::default(),
            save: SaveTracker::default(),
            saving_revision: None,
            load_status: LoadStatus::Empty,
            rendered: Vec::new(),
            keymap: Keymap::for_context(KeyContext::Editor),
        }
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    pub fn identity(&self) -> Option<&DocumentIdentity> {
        self.buffer.identity()
    }

    pub fn save_state(&self) -> SaveState {
        self.save.state()
    }

    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    pub fn scroll_sync(&self) -> &ScrollSync {
        &self.scroll
    }

    pub fn lines(&self) -> &[StyledLine] {
        &self.rendered
    }

    /// Overlay markup for the current text.
    pub fn markup(&self) -> String {
        self.rendered
            .iter()
            .map(StyledLine::to_markup)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Keystroke path: the input surface reports its full text and caret.
    pub fn input(&mut self, text: impl Into<String>, selection: Selection) {
        if self.buffer.set_text(text) {
            self.after_edit();
        }
        self.selection = selection.clamp(self.buffer.char_len());
    }

    /// Inserts `text` over the current selection.
    pub fn insert(&mut self, text: &str) {
        let caret = self.buffer.replace(self.selection, text);
        self.selection = Selection::caret(caret);
        self.after_edit();
    }

    /// Offers pasted text to the image interceptor.
    ///
    /// On [`PasteOutcome::PassThrough`] the host performs its default paste
    /// and reports the result through [`Editor::input`].
    pub fn paste(&mut self, pasted: &str) -> PasteOutcome {
        let Some(markdown) = image_markdown_for_paste(pasted) else {
            return PasteOutcome::PassThrough;
        };
        self.insert(&markdown);
        self.focused = true;
        PasteOutcome::Intercepted {
            inserted: markdown,
            caret: self.selection.start,
        }
    }

    pub fn scroll(&mut self, offsets: ScrollOffsets) {
        self.scroll.on_scroll(offsets);
    }

    /// Dispatches a key through the editor keymap.
    ///
    /// `Blur` is applied here; `Save` and `Export` are returned for the host
    /// to run through [`Editor::save_with`]/[`Editor::begin_save`] and
    /// [`Editor::export`].
    pub fn key(&mut self, event: KeyEvent) -> Option<Command> {
        let command = self.keymap.resolve(event, self.buffer.text().is_empty())?;
        if command == Command::Blur {
            self.focused = false;
        }
        Some(command)
    }

    /// Starts a save for an asynchronous host.
    pub fn begin_save(&mut self) -> Result<SaveRequest, SaveError> {
        let ticket = self.save.begin(self.buffer.text())?;
        self.saving_revision = Some(self.buffer.revision());
        info!(
            "event=editor_save module=editor status=start generation={}",
            ticket.generation()
        );
        Ok(SaveRequest {
            ticket,
            content: self.buffer.text().to_string(),
            identity: self.buffer.identity().cloned(),
        })
    }

    /// Applies a save completion. Returns `false` for stale tickets.
    ///
    /// `Ok(id)` binds the buffer to that note if it had no identity yet.
    pub fn finish_save(
        &mut self,
        ticket: SaveTicket,
        result: Result<NoteId, String>,
        now: Instant,
    ) -> bool {
        if !self.save.finish(ticket, result.is_ok(), now) {
            return false;
        }
        let revision = self.saving_revision.take();
        match result {
            Ok(id) => {
                self.buffer.bind_identity(DocumentIdentity::Note(id));
                if let Some(revision) = revision {
                    self.buffer.mark_saved(revision);
                }
                info!(
                    "event=editor_save module=editor status=ok generation={} note_id={id}",
                    ticket.generation()
                );
            }
            Err(message) => {
                warn!(
                    "event=editor_save module=editor status=error generation={} error={message}",
                    ticket.generation()
                );
            }
        }
        true
    }

    /// Saves synchronously through `store`.
    pub fn save_with<S: NoteStore>(
        &mut self,
        store: &mut S,
        now: Instant,
    ) -> Result<NoteId, SaveError> {
        let request = self.begin_save()?;
        match store.save(&request.content, request.identity.as_ref()) {
            Ok(id) => {
                self.finish_save(request.ticket, Ok(id), now);
                Ok(id)
            }
            Err(err) => {
                let message = err.to_string();
                self.finish_save(request.ticket, Err(message.clone()), now);
                Err(SaveError::Failed(message))
            }
        }
    }

    /// Replaces the buffer with a stored note.
    ///
    /// On failure the buffer is emptied and the load status reports it.
    pub fn load_with<S: NoteStore>(
        &mut self,
        store: &mut S,
        id: NoteId,
    ) -> Result<(), NoteStoreError> {
        self.reset();
        match store.load(id) {
            Ok(note) => {
                self.buffer = DocumentBuffer::loaded(note.content, DocumentIdentity::Note(id));
                self.selection = Selection::caret(self.buffer.char_len());
                self.load_status = LoadStatus::Loaded(id);
                self.rerender();
                info!("event=editor_load module=editor status=ok note_id={id}");
                Ok(())
            }
            Err(err) => {
                self.load_status = LoadStatus::Failed;
                warn!("event=editor_load module=editor status=error note_id={id} error={err}");
                Err(err)
            }
        }
    }

    /// Advances timed save-state transitions.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.save.tick(now)
    }

    /// Current content as a downloadable markdown file.
    pub fn export(&self) -> ExportFile {
        ExportFile {
            filename: export_filename(self.buffer.text()),
            content: self.buffer.text().to_string(),
        }
    }

    /// Clears everything back to a fresh editor. A save in flight is
    /// abandoned and its completion ignored.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.selection = Selection::default();
        self.save.reset();
        self.saving_revision = None;
        self.load_status = LoadStatus::Empty;
        self.rendered.clear();
        self.focused = true;
    }

    fn after_edit(&mut self) {
        self.save.on_edit();
        self.rerender();
    }

    fn rerender(&mut self) {
        self.rendered = highlight_lines(self.buffer.text());
    }
}
