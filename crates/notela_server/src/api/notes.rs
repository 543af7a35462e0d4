//! `/api/notes` handlers.

use crate::api::dto::{NoteBody, NoteDto, SearchHitDto};
use crate::api::{parse_id, query_u32, ApiError, ApiRequest, ApiResponse, App};
use notela_core::repo::LIST_LIMIT_MAX;
use notela_core::search::fts::DEFAULT_SEARCH_LIMIT;
use notela_core::{search_notes, NoteInput, NoteServiceError, SearchError, SearchQuery};
use serde_json::json;

const NOTE_NOT_FOUND: &str = "Note not found";

pub(super) fn list(app: &mut App, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let limit = query_u32(request, "limit")?;
    let offset = query_u32(request, "offset")?.unwrap_or(0);
    let notes = app
        .note_service()?
        .list_notes(request.query_param("tag"), limit, offset)
        .map_err(note_error("Failed to fetch notes"))?;
    let body: Vec<NoteDto> = notes.into_iter().map(NoteDto::from).collect();
    ApiResponse::ok(&body)
}

pub(super) fn create(app: &mut App, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let body: NoteBody = request.json()?;
    let note = app
        .note_service()?
        .create_note(NoteInput::from(body))
        .map_err(note_error("Failed to create note"))?;
    ApiResponse::created(&NoteDto::from(note))
}

pub(super) fn search(app: &mut App, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let text = request.query_param("q").unwrap_or_default();
    let limit = query_u32(request, "limit")?
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .min(LIST_LIMIT_MAX);
    let query = SearchQuery::new(text).with_limit(limit);

    let hits = search_notes(app.conn(), &query).map_err(|err| match err {
        SearchError::InvalidQuery { message, .. } => {
            ApiError::BadRequest(format!("Invalid search query: {message}"))
        }
        other => ApiError::internal("Failed to search notes", other),
    })?;
    let body: Vec<SearchHitDto> = hits.into_iter().map(SearchHitDto::from).collect();
    ApiResponse::ok(&body)
}

pub(super) fn get(app: &mut App, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = parse_id(raw_id, NOTE_NOT_FOUND)?;
    let note = app
        .note_service()?
        .get_note(id)
        .map_err(note_error("Failed to fetch note"))?
        .ok_or(ApiError::NotFound(NOTE_NOT_FOUND))?;
    ApiResponse::ok(&NoteDto::from(note))
}

pub(super) fn update(
    app: &mut App,
    raw_id: &str,
    request: &ApiRequest,
) -> Result<ApiResponse, ApiError> {
    let id = parse_id(raw_id, NOTE_NOT_FOUND)?;
    let body: NoteBody = request.json()?;
    let note = app
        .note_service()?
        .update_note(id, NoteInput::from(body))
        .map_err(note_error("Failed to update note"))?;
    ApiResponse::ok(&NoteDto::from(note))
}

pub(super) fn delete(app: &mut App, raw_id: &str) -> Result<ApiResponse, ApiError> {
    let id = parse_id(raw_id, NOTE_NOT_FOUND)?;
    app.note_service()?
        .delete_note(id)
        .map_err(note_error("Failed to delete note"))?;
    ApiResponse::ok(&json!({ "message": "Note deleted successfully" }))
}

fn note_error(context: &'static str) -> impl FnOnce(NoteServiceError) -> ApiError {
    move |err| match err {
        NoteServiceError::Validation(err) => ApiError::BadRequest(err.to_string()),
        NoteServiceError::NoteNotFound(_) => ApiError::NotFound(NOTE_NOT_FOUND),
        other => ApiError::internal(context, other),
    }
}
