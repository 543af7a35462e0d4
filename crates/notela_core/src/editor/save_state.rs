//! Save-state machine shown next to the editor.
//!
//! # Invariants
//! - At most one save is in flight; a second request gets
//!   [`SaveError::InFlight`].
//! - A completion is applied only when its ticket generation matches the
//!   attempt in flight.
//! - `saved` lasts [`SAVED_DISPLAY`], `error` lasts [`ERROR_DISPLAY`];
//!   an edit in either state returns to `idle` immediately.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

pub const SAVED_DISPLAY: Duration = Duration::from_secs(2);
pub const ERROR_DISPLAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveState {
    #[default]
    Idle,
    Saving,
    Saved,
    Error,
}

impl SaveState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Saving => "saving",
            Self::Saved => "saved",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// Content is blank after trimming.
    EmptyContent,
    /// Another save has not completed yet.
    InFlight,
    /// The store rejected the save.
    Failed(String),
}

impl Display for SaveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "nothing to save"),
            Self::InFlight => write!(f, "a save is already in progress"),
            Self::Failed(message) => write!(f, "save failed: {message}"),
        }
    }
}

impl Error for SaveError {}

/// Proof of one save attempt, handed back on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTicket {
    generation: u64,
}

impl SaveTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Default)]
pub struct SaveTracker {
    state: SaveState,
    generation: u64,
    /// When `saved`/`error` was entered.
    entered_at: Option<Instant>,
}

impl SaveTracker {
    pub fn state(&self) -> SaveState {
        self.state
    }

    /// Starts a save attempt for `content`.
    pub fn begin(&mut self, content: &str) -> Result<SaveTicket, SaveError> {
        if self.state == SaveState::Saving {
            return Err(SaveError::InFlight);
        }
        if content.trim().is_empty() {
            return Err(SaveError::EmptyContent);
        }
        self.generation += 1;
        self.state = SaveState::Saving;
        self.entered_at = None;
        Ok(SaveTicket {
            generation: self.generation,
        })
    }

    /// Applies a completion. Returns `false` when the ticket is stale.
    pub fn finish(&mut self, ticket: SaveTicket, succeeded: bool, now: Instant) -> bool {
        if self.state != SaveState::Saving || ticket.generation != self.generation {
            return false;
        }
        self.state = if succeeded {
            SaveState::Saved
        } else {
            SaveState::Error
        };
        self.entered_at = Some(now);
        true
    }

    /// Expires `saved`/`error`. Returns whether the state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let timeout = match self.state {
            SaveState::Saved => SAVED_DISPLAY,
            SaveState::Error => ERROR_DISPLAY,
            SaveState::Idle | SaveState::Saving => return false,
        };
        let expired = self
            .entered_at
            .is_some_and(|entered| now.saturating_duration_since(entered) >= timeout);
        if expired {
            self.to_idle();
        }
        expired
    }

    /// An edit cancels a `saved`/`error` display.
    pub fn on_edit(&mut self) {
        if matches!(self.state, SaveState::Saved | SaveState::Error) {
            self.to_idle();
        }
    }

    /// Drops any attempt in flight; its completion will be ignored.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.to_idle();
    }

    fn to_idle(&mut self) {
        self.state = SaveState::Idle;
        self.entered_at = None;
    }
}
