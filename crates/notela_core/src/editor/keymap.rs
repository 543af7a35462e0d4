//! Scoped key bindings.
//!
//! # Responsibility
//! - Map key events to commands through one table per context.
//! - Provide the list cursor used by task and vault lists.
//!
//! # Invariants
//! - A key only resolves inside the context whose table binds it; there are
//!   no global listeners.
//! - `Ctrl` and `Cmd` are interchangeable for command chords.

use crate::model::task::TaskPriority;

/// Screen area that owns keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Editor,
    TaskList,
    Vault,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Up,
    Down,
    Delete,
    Backspace,
}

/// One key press with its modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    /// `Cmd` on macOS.
    pub meta: bool,
}

impl KeyEvent {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
        }
    }

    /// Key pressed with the platform command modifier.
    pub fn command(key: Key) -> Self {
        Self {
            key,
            ctrl: true,
            meta: false,
        }
    }

    fn has_command_modifier(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Action a context performs in response to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Save,
    Export,
    Blur,
    AddTask,
    SelectPrevious,
    SelectNext,
    DeleteSelected,
    ClearSelection,
    SetPriority(TaskPriority),
    Open,
    Edit,
    New,
    Delete,
    Close,
    SearchMode,
    CommandMode,
    ShowNotes,
    ShowTasks,
}

/// Extra condition a binding needs to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    Always,
    /// The context's text input is empty.
    InputEmpty,
}

#[derive(Debug, Clone, Copy)]
struct Binding {
    key: Key,
    command_modifier: bool,
    guard: Guard,
    command: Command,
}

const fn bind(key: Key, command: Command) -> Binding {
    Binding {
        key,
        command_modifier: false,
        guard: Guard::Always,
        command,
    }
}

const fn chord(key: Key, command: Command) -> Binding {
    Binding {
        key,
        command_modifier: true,
        guard: Guard::Always,
        command,
    }
}

const fn when_input_empty(key: Key, command: Command) -> Binding {
    Binding {
        key,
        command_modifier: false,
        guard: Guard::InputEmpty,
        command,
    }
}

const EDITOR_BINDINGS: &[Binding] = &[
    chord(Key::Char('s'), Command::Save),
    chord(Key::Char('e'), Command::Export),
    bind(Key::Escape, Command::Blur),
];

const TASK_LIST_BINDINGS: &[Binding] = &[
    bind(Key::Enter, Command::AddTask),
    bind(Key::Up, Command::SelectPrevious),
    bind(Key::Down, Command::SelectNext),
    when_input_empty(Key::Delete, Command::DeleteSelected),
    when_input_empty(Key::Backspace, Command::DeleteSelected),
    bind(Key::Escape, Command::ClearSelection),
    chord(Key::Char('1'), Command::SetPriority(TaskPriority::Low)),
    chord(Key::Char('2'), Command::SetPriority(TaskPriority::Medium)),
    chord(Key::Char('3'), Command::SetPriority(TaskPriority::High)),
];

const VAULT_BINDINGS: &[Binding] = &[
    bind(Key::Char('j'), Command::SelectNext),
    bind(Key::Down, Command::SelectNext),
    bind(Key::Char('k'), Command::SelectPrevious),
    bind(Key::Up, Command::SelectPrevious),
    bind(Key::Enter, Command::Open),
    bind(Key::Char('e'), Command::Edit),
    bind(Key::Char('n'), Command::New),
    bind(Key::Char('d'), Command::Delete),
    bind(Key::Char('q'), Command::Close),
    bind(Key::Char('/'), Command::SearchMode),
    bind(Key::Char(':'), Command::CommandMode),
];

const HOME_BINDINGS: &[Binding] = &[
    bind(Key::Char('1'), Command::ShowNotes),
    bind(Key::Char('2'), Command::ShowTasks),
];

/// Key table bound to one context.
#[derive(Debug, Clone, Copy)]
pub struct Keymap {
    context: KeyContext,
    bindings: &'static [Binding],
}

impl Keymap {
    pub fn for_context(context: KeyContext) -> Self {
        let bindings = match context {
            KeyContext::Editor => EDITOR_BINDINGS,
            KeyContext::TaskList => TASK_LIST_BINDINGS,
            KeyContext::Vault => VAULT_BINDINGS,
            KeyContext::Home => HOME_BINDINGS,
        };
        Self { context, bindings }
    }

    pub fn context(&self) -> KeyContext {
        self.context
    }

    /// Resolves `event`. `input_empty` reports whether the context's text
    /// input is empty; only guarded bindings look at it.
    pub fn resolve(&self, event: KeyEvent, input_empty: bool) -> Option<Command> {
        let key = normalize_key(event.key);
        self.bindings
            .iter()
            .find(|binding| {
                binding.key == key
                    && binding.command_modifier == event.has_command_modifier()
                    && match binding.guard {
                        Guard::Always => true,
                        Guard::InputEmpty => input_empty,
                    }
            })
            .map(|binding| binding.command)
    }
}

fn normalize_key(key: Key) -> Key {
    match key {
        Key::Char(ch) => Key::Char(ch.to_ascii_lowercase()),
        other => other,
    }
}

/// How a list cursor behaves at the ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    Wrap,
    Clamp,
}

/// Selected row in a list of `len` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCursor {
    mode: CursorMode,
    len: usize,
    selected: Option<usize>,
}

impl ListCursor {
    pub fn new(mode: CursorMode, len: usize) -> Self {
        Self {
            mode,
            len,
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Updates the item count, dropping a selection that fell off the end.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.selected = match self.selected {
            Some(_) if len == 0 => None,
            Some(index) if index >= len => match self.mode {
                CursorMode::Wrap => None,
                CursorMode::Clamp => Some(len - 1),
            },
            other => other,
        };
    }

    pub fn next(&mut self) {
        if self.len == 0 {
            return;
        }
        let last = self.len - 1;
        self.selected = Some(match (self.selected, self.mode) {
            (None, _) => 0,
            (Some(index), CursorMode::Wrap) if index >= last => 0,
            (Some(index), CursorMode::Clamp) => (index + 1).min(last),
            (Some(index), CursorMode::Wrap) => index + 1,
        });
    }

    pub fn previous(&mut self) {
        if self.len == 0 {
            return;
        }
        let last = self.len - 1;
        self.selected = Some(match (self.selected, self.mode) {
            (None, CursorMode::Wrap) => last,
            (None, CursorMode::Clamp) => 0,
            (Some(0), CursorMode::Wrap) => last,
            (Some(index), _) => index.saturating_sub(1),
        });
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

/// Parsed vault command line (entered after `:`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultCommand {
    Quit,
    Help,
    Unknown(String),
}

pub fn parse_vault_command(line: &str) -> VaultCommand {
    match line.trim().trim_start_matches(':').trim() {
        "q" | "quit" => VaultCommand::Quit,
        "help" => VaultCommand::Help,
        other => VaultCommand::Unknown(other.to_string()),
    }
}
