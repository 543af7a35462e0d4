//! `/api/vault` handlers. Callers must pass the access gate first.

use crate::api::dto::{VaultFileDto, VaultSaveBody, VaultUpdateBody};
use crate::api::{ApiError, ApiRequest, ApiResponse, App};
use notela_core::{VaultError, VaultServiceError};
use serde_json::json;

const FILE_NOT_FOUND: &str = "File not found";

pub(super) fn list(app: &mut App, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let files = app
        .vault()
        .list_files(request.query_param("q"))
        .map_err(vault_error("Failed to read vault"))?;
    let files: Vec<VaultFileDto> = files.into_iter().map(VaultFileDto::from).collect();
    ApiResponse::ok(&json!({ "files": files }))
}

pub(super) fn save(app: &mut App, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let body: VaultSaveBody = request.json()?;
    let filename = app
        .vault()
        .save_file(body.filename.as_deref(), body.content.as_deref())
        .map_err(|err| match err {
            VaultServiceError::MissingField(_) => {
                ApiError::BadRequest("Content and filename are required".to_string())
            }
            other => vault_error("Failed to save to vault")(other),
        })?;
    ApiResponse::ok(&json!({ "success": true, "filename": filename }))
}

pub(super) fn read(app: &mut App, filename: &str) -> Result<ApiResponse, ApiError> {
    let document = app
        .vault()
        .read_file(filename)
        .map_err(vault_error("Failed to read file"))?;
    ApiResponse::ok(&json!({
        "content": document.content,
        "filename": document.filename,
    }))
}

pub(super) fn update(
    app: &mut App,
    filename: &str,
    request: &ApiRequest,
) -> Result<ApiResponse, ApiError> {
    let body: VaultUpdateBody = request.json()?;
    app.vault()
        .update_file(filename, body.content.as_deref())
        .map_err(|err| match err {
            VaultServiceError::MissingField(_) => {
                ApiError::BadRequest("Content is required".to_string())
            }
            other => vault_error("Failed to update file")(other),
        })?;
    ApiResponse::ok(&json!({ "success": true, "filename": filename }))
}

pub(super) fn delete(app: &mut App, filename: &str) -> Result<ApiResponse, ApiError> {
    app.vault()
        .delete_file(filename)
        .map_err(vault_error("Failed to delete file"))?;
    ApiResponse::ok(&json!({ "success": true }))
}

fn vault_error(context: &'static str) -> impl FnOnce(VaultServiceError) -> ApiError {
    move |err| match err {
        VaultServiceError::Vault(VaultError::NotFound(_)) => ApiError::NotFound(FILE_NOT_FOUND),
        VaultServiceError::Vault(VaultError::InvalidFilename(_)) => {
            ApiError::BadRequest("Invalid filename".to_string())
        }
        VaultServiceError::MissingField(field) => {
            ApiError::BadRequest(format!("Missing required field `{field}`"))
        }
        other => ApiError::internal(context, other),
    }
}
