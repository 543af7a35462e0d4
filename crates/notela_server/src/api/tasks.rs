//! `/api/tasks` handlers.

use crate::api::dto::{parse_priority, TaskCreateBody, TaskDto, TaskUpdateBody};
use crate::api::{parse_id, ApiError, ApiRequest, ApiResponse, App};
use notela_core::service::task_service::TaskFilter;
use notela_core::{TaskInput, TaskPatch, TaskServiceError};
use serde_json::json;

const TASK_NOT_FOUND: &str = "Task not found";

pub(super) fn list(app: &mut App, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let completed = match request.query_param("completed").map(str::trim) {
        None | Some("") => None,
        Some("true") => Some(true),
        Some("false") => Some(false),
        Some(other) => {
            return Err(ApiError::BadRequest(format!("Invalid completed `{other}`")));
        }
    };
    let filter = TaskFilter {
        completed,
        priority: parse_priority(request.query_param("priority"))?,
        tag: request.query_param("tag").map(str::to_string),
    };

    let tasks = app
        .task_service()?
        .list_tasks(&filter)
        .map_err(task_error("Failed to fetch tasks"))?;
    let body: Vec<TaskDto> = tasks.into_iter().map(TaskDto::from).collect();
    ApiResponse::ok(&body)
}

pub(super) fn create(app: &mut App, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let body: TaskCreateBody = request.json()?;
    let input = TaskInput {
        priority: parse_priority(body.priority.as_deref())?,
        due_date: match &body.due_date {
            Some(due_date) => due_date.to_millis()?,
            None => None,
        },
        title: body.title,
        description: body.description,
        tags: body.tags,
    };

    let task = app
        .task_service()?
        .create_task(input)
        .map_err(task_error("Failed to create task"))?;
    ApiResponse::created(&TaskDto::from(task))
}

pub(super) fn get(app: &mut App, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = parse_id(raw_id, TASK_NOT_FOUND)?;
    let task = app
        .task_service()?
        .get_task(id)
        .map_err(task_error("Failed to fetch task"))?
        .ok_or(ApiError::NotFound(TASK_NOT_FOUND))?;
    ApiResponse::ok(&TaskDto::from(task))
}

pub(super) fn update(
    app: &mut App,
    raw_id: &str,
    request: &ApiRequest,
) -> Result<ApiResponse, ApiError> {
    let id = parse_id(raw_id, TASK_NOT_FOUND)?;
    let body: TaskUpdateBody = request.json()?;
    let due_date = match &body.due_date {
        None => None,
        Some(None) => Some(None),
        Some(Some(due_date)) => Some(due_date.to_millis()?),
    };
    let patch = TaskPatch {
        priority: parse_priority(body.priority.as_deref())?,
        due_date,
        title: body.title,
        description: body.description,
        completed: body.completed,
        tags: body.tags,
    };

    let task = app
        .task_service()?
        .update_task(id, patch)
        .map_err(task_error("Failed to update task"))?;
    ApiResponse::ok(&TaskDto::from(task))
}

pub(super) fn toggle(app: &mut App, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = parse_id(raw_id, TASK_NOT_FOUND)?;
    let task = app
        .task_service()?
        .toggle_task(id)
        .map_err(task_error("Failed to update task"))?;
    ApiResponse::ok(&TaskDto::from(task))
}

pub(super) fn delete(app: &mut App, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = parse_id(raw_id, TASK_NOT_FOUND)?;
    app.task_service()?
        .delete_task(id)
        .map_err(task_error("Failed to delete task"))?;
    ApiResponse::ok(&json!({ "message": "Task deleted successfully" }))
}

fn task_error(context: &'static str) -> impl FnOnce(TaskServiceError) -> ApiError {
    move |err| match err {
        TaskServiceError::Validation(err) => ApiError::BadRequest(err.to_string()),
        TaskServiceError::TaskNotFound(_) => ApiError::NotFound(TASK_NOT_FOUND),
        other => ApiError::internal(context, other),
    }
}
