//! JSON shapes of the REST API.
//!
//! Field names are camelCase; timestamps are RFC 3339 with millisecond
//! precision in UTC.

use crate::api::ApiError;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use notela_core::{
    Note, NoteInput, SearchHit, Tag, Task, TaskPriority, VaultFileSummary,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Renders epoch milliseconds as `2024-03-01T10:00:00.000Z`.
pub fn format_timestamp(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|value| value.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| epoch_ms.to_string())
}

/// Parses an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (UTC midnight).
pub fn parse_due_date(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.timestamp_millis());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TagDto {
    id: i64,
    name: String,
    color: String,
}

impl From<Tag> for TagDto {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
        }
    }
}

fn tag_dtos(tags: Vec<Tag>) -> Vec<TagDto> {
    tags.into_iter().map(TagDto::from).collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NoteDto {
    id: String,
    title: String,
    content: String,
    filename: Option<String>,
    created_at: String,
    updated_at: String,
    tags: Vec<TagDto>,
}

impl From<Note> for NoteDto {
    fn from(note: Note) -> Self {
        Self {
            id: note.id.to_string(),
            title: note.title,
            content: note.content,
            filename: note.filename,
            created_at: format_timestamp(note.created_at),
            updated_at: format_timestamp(note.updated_at),
            tags: tag_dtos(note.tags),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskDto {
    id: String,
    title: String,
    description: String,
    completed: bool,
    priority: TaskPriority,
    due_date: Option<String>,
    created_at: String,
    updated_at: String,
    tags: Vec<TagDto>,
}

impl From<Task> for TaskDto {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title,
            description: task.description,
            completed: task.completed,
            priority: task.priority,
            due_date: task.due_date.map(format_timestamp),
            created_at: format_timestamp(task.created_at),
            updated_at: format_timestamp(task.updated_at),
            tags: tag_dtos(task.tags),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VaultFileDto {
    filename: String,
    title: String,
    last_modified: String,
    size: u64,
    preview: String,
}

impl From<VaultFileSummary> for VaultFileDto {
    fn from(file: VaultFileSummary) -> Self {
        Self {
            filename: file.filename,
            title: file.title,
            last_modified: format_timestamp(file.last_modified),
            size: file.size,
            preview: file.preview,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchHitDto {
    id: String,
    title: String,
    snippet: String,
    updated_at: String,
}

impl From<SearchHit> for SearchHitDto {
    fn from(hit: SearchHit) -> Self {
        Self {
            id: hit.note_id.to_string(),
            title: hit.title,
            snippet: hit.snippet,
            updated_at: format_timestamp(hit.updated_at),
        }
    }
}

/// Body of note create and update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NoteBody {
    title: Option<String>,
    content: Option<String>,
    filename: Option<String>,
    tags: Option<Vec<String>>,
}

impl From<NoteBody> for NoteInput {
    fn from(body: NoteBody) -> Self {
        Self {
            title: body.title,
            content: body.content,
            filename: body.filename,
            tags: body.tags,
        }
    }
}

/// `dueDate` as epoch milliseconds or a date string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum DueDateInput {
    Millis(i64),
    Text(String),
}

impl DueDateInput {
    /// An empty string means "no due date".
    pub(crate) fn to_millis(&self) -> Result<Option<i64>, ApiError> {
        match self {
            Self::Millis(value) => Ok(Some(*value)),
            Self::Text(text) if text.trim().is_empty() => Ok(None),
            Self::Text(text) => parse_due_date(text)
                .map(Some)
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid dueDate `{text}`"))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskCreateBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<DueDateInput>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskUpdateBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
    /// Absent keeps the due date; `null` clears it.
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<DueDateInput>>,
    pub tags: Option<Vec<String>>,
}

/// Parses an optional priority; blank means "not given".
pub(crate) fn parse_priority(value: Option<&str>) -> Result<Option<TaskPriority>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<TaskPriority>()
            .map(Some)
            .map_err(|err| ApiError::BadRequest(format!("{err}"))),
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VaultSaveBody {
    pub content: Option<String>,
    pub filename: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VaultUpdateBody {
    pub content: Option<String>,
}
