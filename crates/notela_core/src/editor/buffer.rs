//! Editable document buffer and selection.
//!
//! Offsets are character offsets, not bytes, so callers can pass caret
//! positions straight from a text input.

use crate::model::note::NoteId;

/// Caret or selected range, in characters. `start <= end` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Builds a selection from two offsets in any order.
    pub fn range(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn is_caret(self) -> bool {
        self.start == self.end
    }

    pub fn clamp(self, len: usize) -> Self {
        Self {
            start: self.start.min(len),
            end: self.end.min(len),
        }
    }
}

/// What a buffer is saved as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentIdentity {
    Note(NoteId),
    Filename(String),
}

/// Raw markdown plus edit bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentBuffer {
    text: String,
    modified: bool,
    /// Bumped on every content change.
    revision: u64,
    identity: Option<DocumentIdentity>,
}

impl DocumentBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer seeded from stored content; starts unmodified.
    pub fn loaded(text: impl Into<String>, identity: DocumentIdentity) -> Self {
        Self {
            text: text.into(),
            modified: false,
            revision: 0,
            identity: Some(identity),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn identity(&self) -> Option<&DocumentIdentity> {
        self.identity.as_ref()
    }

    /// Binds the identity if none is bound yet. Returns whether it was bound.
    pub fn bind_identity(&mut self, identity: DocumentIdentity) -> bool {
        if self.identity.is_some() {
            return false;
        }
        self.identity = Some(identity);
        true
    }

    /// Replaces the whole text. Returns whether anything changed.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.text {
            return false;
        }
        self.text = text;
        self.touch();
        true
    }

    /// Replaces `selection` with `insert` and returns the caret after it.
    pub fn replace(&mut self, selection: Selection, insert: &str) -> usize {
        let selection = selection.clamp(self.char_len());
        let start = self.byte_offset(selection.start);
        let end = self.byte_offset(selection.end);
        self.text.replace_range(start..end, insert);
        self.touch();
        selection.start + insert.chars().count()
    }

    /// Marks the buffer saved if no edit happened since `revision`.
    pub fn mark_saved(&mut self, revision: u64) {
        if revision == self.revision {
            self.modified = false;
        }
    }

    /// Empties the buffer and forgets its identity.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn touch(&mut self) {
        self.modified = true;
        self.revision += 1;
    }

    fn byte_offset(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map_or(self.text.len(), |(byte, _)| byte)
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentBuffer, DocumentIdentity, Selection};

    #[test]
    fn replace_uses_char_offsets() {
        let mut buffer = DocumentBuffer::new();
        buffer.set_text("héllo");
        let caret = buffer.replace(Selection::range(3, 1), "EY");
        assert_eq!(buffer.text(), "hEYlo");
        assert_eq!(caret, 3);
    }

    #[test]
    fn out_of_range_selection_appends() {
        let mut buffer = DocumentBuffer::new();
        buffer.set_text("ab");
        let caret = buffer.replace(Selection::caret(10), "c");
        assert_eq!(buffer.text(), "abc");
        assert_eq!(caret, 3);
    }

    #[test]
    fn mark_saved_ignores_stale_revision() {
        let mut buffer = DocumentBuffer::new();
        buffer.set_text("a");
        let saved_at = buffer.revision();
        buffer.set_text("ab");
        buffer.mark_saved(saved_at);
        assert!(buffer.is_modified());
        buffer.mark_saved(buffer.revision());
        assert!(!buffer.is_modified());
    }

    #[test]
    fn identity_binds_once() {
        let mut buffer = DocumentBuffer::new();
        assert!(buffer.bind_identity(DocumentIdentity::Filename("a.md".to_string())));
        assert!(!buffer.bind_identity(DocumentIdentity::Filename("b.md".to_string())));
        assert_eq!(
            buffer.identity(),
            Some(&DocumentIdentity::Filename("a.md".to_string()))
        );
    }

    #[test]
    fn unchanged_text_is_not_an_edit() {
        let mut buffer = DocumentBuffer::loaded("same", DocumentIdentity::Filename("x.md".into()));
        assert!(!buffer.set_text("same"));
        assert!(!buffer.is_modified());
    }
}
