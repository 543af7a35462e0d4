//! Task use-case service.
//!
//! # Invariants
//! - New tasks are open, default to `MEDIUM` and `"Untitled Task"`.
//! - `toggle_task` flips `completed` and leaves every other field untouched.

use crate::model::tag::{normalize_tag, normalize_tags};
use crate::model::task::{resolve_task_title, Task, TaskId, TaskPriority};
use crate::model::validation::ValidationError;
use crate::repo::task_repo::{TaskListQuery, TaskRepository};
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    Validation(ValidationError),
    TaskNotFound(TaskId),
    Repo(RepoError),
    InconsistentState(&'static str),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for TaskServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Fields accepted by task creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<i64>,
    pub tags: Option<Vec<String>>,
}

/// Partial task update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<TaskPriority>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<i64>>,
    pub tags: Option<Vec<String>>,
}

/// Filters for task listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub priority: Option<TaskPriority>,
    pub tag: Option<String>,
}

/// Task counters used by the status endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
}

pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_task(&mut self, input: TaskInput) -> Result<Task, TaskServiceError> {
        let tags = normalize_tags(input.tags.as_deref().unwrap_or_default())?;
        let mut task = Task::new(resolve_task_title(input.title.as_deref()));
        task.description = input.description.unwrap_or_default();
        task.priority = input.priority.unwrap_or_default();
        task.due_date = input.due_date;

        let id = self.repo.create_task(&task, &tags)?;
        info!(
            "event=task_create module=service status=ok task_id={id} priority={}",
            task.priority.as_str()
        );
        self.read_back(id, "created task not found in read-back")
    }

    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> Result<Task, TaskServiceError> {
        let mut task = self.load(id)?;

        if let Some(title) = patch.title.as_deref() {
            task.title = resolve_task_title(Some(title));
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        let tags = patch.tags.as_deref().map(|tags| normalize_tags(tags)).transpose()?;

        self.repo.update_task(&task, tags.as_deref())?;
        info!("event=task_update module=service status=ok task_id={id}");
        self.read_back(id, "updated task not found in read-back")
    }

    /// Flips the completion flag of one task.
    pub fn toggle_task(&mut self, id: TaskId) -> Result<Task, TaskServiceError> {
        let mut task = self.load(id)?;
        task.completed = !task.completed;
        self.repo.update_task(&task, None)?;
        info!(
            "event=task_toggle module=service status=ok task_id={id} completed={}",
            task.completed
        );
        self.read_back(id, "toggled task not found in read-back")
    }

    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>, TaskServiceError> {
        Ok(self.repo.get_task(id)?)
    }

    /// Lists every task matching `filter`, newest first.
    pub fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, TaskServiceError> {
        let query = TaskListQuery {
            completed: filter.completed,
            priority: filter.priority,
            tag: filter.tag.as_deref().and_then(normalize_tag),
            limit: None,
            offset: 0,
        };
        Ok(self.repo.list_tasks(&query)?)
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<(), TaskServiceError> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }

    pub fn count_tasks(&self) -> Result<TaskCounts, TaskServiceError> {
        let total = self.repo.count_tasks(None)?;
        let completed = self.repo.count_tasks(Some(true))?;
        Ok(TaskCounts {
            total,
            completed,
            pending: total.saturating_sub(completed),
        })
    }

    fn load(&self, id: TaskId) -> Result<Task, TaskServiceError> {
        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    fn read_back(&self, id: TaskId, details: &'static str) -> Result<Task, TaskServiceError> {
        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::InconsistentState(details))
    }
}
