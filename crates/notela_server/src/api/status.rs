//! `/api/status` and `/api/tags`.

use crate::api::dto::{format_timestamp, TagDto};
use crate::api::{ApiError, ApiResponse, App};
use log::error;
use notela_core::service::task_service::TaskCounts;
use serde::Serialize;
use serde_json::json;
use std::error::Error;

const DATABASE_LABEL: &str = "SQLite";

#[derive(Debug, Serialize)]
struct StatusBody {
    database: &'static str,
    status: &'static str,
    stats: Stats,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct Stats {
    notes: u64,
    tasks: TaskStats,
    tags: u64,
}

#[derive(Debug, Serialize)]
struct TaskStats {
    total: u64,
    completed: u64,
    pending: u64,
}

impl From<TaskCounts> for TaskStats {
    fn from(counts: TaskCounts) -> Self {
        Self {
            total: counts.total,
            completed: counts.completed,
            pending: counts.pending,
        }
    }
}

pub(super) fn tags(app: &mut App) -> Result<ApiResponse, ApiError> {
    let tags = app
        .note_service()?
        .list_tags()
        .map_err(|err| ApiError::internal("Failed to fetch tags", err))?;
    let body: Vec<TagDto> = tags.into_iter().map(TagDto::from).collect();
    ApiResponse::ok(&body)
}

/// Database counters. Failures are reported in the body with status 500
/// rather than as a plain error object.
pub(super) fn status(app: &mut App) -> Result<ApiResponse, ApiError> {
    let timestamp = format_timestamp(chrono::Utc::now().timestamp_millis());
    match collect_stats(app) {
        Ok(stats) => ApiResponse::ok(&StatusBody {
            database: DATABASE_LABEL,
            status: "connected",
            stats,
            timestamp,
        }),
        Err(err) => {
            error!("event=status_check module=api status=error error={err}");
            ApiResponse::json(
                500,
                &json!({
                    "database": DATABASE_LABEL,
                    "status": "error",
                    "error": "Failed to connect to database",
                    "timestamp": timestamp,
                }),
            )
        }
    }
}

fn collect_stats(app: &mut App) -> Result<Stats, Box<dyn Error + Send + Sync>> {
    let (notes, tags) = {
        let service = app.note_service()?;
        (service.count_notes()?, service.list_tags()?.len() as u64)
    };
    let tasks = app.task_service()?.count_tasks()?;
    Ok(Stats {
        notes,
        tasks: TaskStats::from(tasks),
        tags,
    })
}
