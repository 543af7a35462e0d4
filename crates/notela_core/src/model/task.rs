//! Task domain model.
//!
//! # Responsibility
//! - Define the flat task record with priority levels.
//! - Own the priority wire/storage spellings.
//!
//! # Invariants
//! - `title` is never blank once persisted.
//! - Storage uses lowercase priority names; the HTTP boundary uses uppercase.

use crate::model::tag::Tag;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable task identifier.
pub type TaskId = Uuid;

/// Title used when a task is created without one.
pub const DEFAULT_TASK_TITLE: &str = "Untitled Task";

/// Task urgency, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Storage spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Boundary spelling (`LOW|MEDIUM|HIGH|URGENT`).
    pub fn as_upper_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }

    /// Three-dot urgency gauge shown next to list entries.
    pub fn gauge(self) -> &'static str {
        match self {
            Self::Low => "●○○",
            Self::Medium => "●●○",
            Self::High | Self::Urgent => "●●●",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = ParsePriorityError;

    /// Parses any casing of `low|medium|high|urgent`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParsePriorityError(value.to_string())),
        }
    }
}

/// Unknown priority spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePriorityError(pub String);

impl Display for ParsePriorityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported task priority `{}`; expected low|medium|high|urgent",
            self.0
        )
    }
}

impl Error for ParsePriorityError {}

/// Persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub priority: TaskPriority,
    /// Epoch milliseconds.
    pub due_date: Option<i64>,
    /// Epoch milliseconds. Assigned by storage; `0` before the first write.
    pub created_at: i64,
    /// Epoch milliseconds. Assigned by storage; `0` before the first write.
    pub updated_at: i64,
    pub tags: Vec<Tag>,
}

impl Task {
    /// Creates an unsaved, open task with default priority.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            completed: false,
            priority: TaskPriority::default(),
            due_date: None,
            created_at: 0,
            updated_at: 0,
            tags: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        Ok(())
    }
}

/// Resolves an optional caller-provided title to the stored title.
pub fn resolve_task_title(title: Option<&str>) -> String {
    match title.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_TASK_TITLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_task_title, Task, TaskPriority, DEFAULT_TASK_TITLE};

    #[test]
    fn priority_parses_any_case() {
        assert_eq!("HIGH".parse::<TaskPriority>(), Ok(TaskPriority::High));
        assert_eq!(" low ".parse::<TaskPriority>(), Ok(TaskPriority::Low));
        assert!("panic".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn priority_serializes_uppercase() {
        let json = serde_json::to_string(&TaskPriority::Urgent).expect("serialize");
        assert_eq!(json, "\"URGENT\"");
    }

    #[test]
    fn priorities_order_by_urgency() {
        assert!(TaskPriority::Low < TaskPriority::Medium);
        assert!(TaskPriority::High < TaskPriority::Urgent);
    }

    #[test]
    fn new_task_defaults() {
        let task = Task::new("ship it");
        assert!(!task.completed);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.priority.gauge(), "●●○");
        assert_eq!(resolve_task_title(Some("")), DEFAULT_TASK_TITLE);
    }
}
