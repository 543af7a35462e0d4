//! REST handlers over `notela_core`.
//!
//! # Responsibility
//! - Decode [`ApiRequest`]s, route them, and run the matching use-case.
//! - Map domain errors to HTTP status codes and `{ "error": ... }` bodies.
//!
//! # Invariants
//! - Handlers never panic; every failure becomes an [`ApiResponse`].
//! - User-facing messages stay generic; underlying errors are only logged.
//! - Vault routes pass the [`AccessGate`] before touching the vault.
//!
//! The HTTP transport lives in [`crate::server`]; nothing here depends on it,
//! so handlers are tested with plain request values.

mod dto;
mod notes;
mod router;
mod status;
mod tasks;
mod vault;

pub use dto::{format_timestamp, parse_due_date};
pub use router::{percent_decode, Route};

use log::{error, info, warn};
use notela_core::{
    AccessGate, FsVaultStore, NoteService, RepoError, SqliteNoteRepository,
    SqliteTaskRepository, TaskService, VaultService, VAULT_PASSWORD_HEADER,
};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// HTTP method subset the API understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Other,
}

impl Method {
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "DELETE" => Self::Delete,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Other => "OTHER",
        }
    }
}

/// Transport-independent request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Raw path, still percent-encoded.
    pub path: String,
    /// Decoded query parameters in order of appearance.
    pub query: Vec<(String, String)>,
    /// Header names are stored lowercase.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ApiRequest {
    /// Builds a request from a method and a request target (`/path?query`).
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, router::parse_query(query)),
            None => (target, Vec::new()),
        };
        Self {
            method,
            path: path.to_string(),
            query,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// First query value for `name`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Decodes the JSON body. An empty body reads as `{}`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let body: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &self.body
        };
        serde_json::from_slice(body).map_err(|err| {
            warn!(
                "event=http_request module=api status=error method={} path={} reason=invalid_json error={err}",
                self.method.as_str(),
                self.path
            );
            ApiError::BadRequest("Invalid JSON body".to_string())
        })
    }
}

/// Status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn json<T: Serialize>(status: u16, body: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_value(body).map_err(|err| ApiError::Internal {
            message: "Failed to encode response",
            source: Box::new(err),
        })?;
        Ok(Self { status, body })
    }

    pub fn ok<T: Serialize>(body: &T) -> Result<Self, ApiError> {
        Self::json(200, body)
    }

    pub fn created<T: Serialize>(body: &T) -> Result<Self, ApiError> {
        Self::json(201, body)
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
        }
    }
}

/// Handler failure with its HTTP mapping.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
    NotFound(&'static str),
    MethodNotAllowed,
    /// Unexpected failure; only `message` reaches the client.
    Internal {
        message: &'static str,
        source: Box<dyn Error + Send + Sync>,
    },
}

impl ApiError {
    pub fn internal(message: &'static str, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Internal {
            message,
            source: source.into(),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthorized => 401,
            Self::NotFound(_) => 404,
            Self::MethodNotAllowed => 405,
            Self::Internal { .. } => 500,
        }
    }

    pub fn into_response(self) -> ApiResponse {
        let status = self.status();
        match self {
            Self::BadRequest(message) => ApiResponse::error(status, &message),
            Self::Unauthorized => ApiResponse::error(status, "Unauthorized"),
            Self::NotFound(message) => ApiResponse::error(status, message),
            Self::MethodNotAllowed => ApiResponse::error(status, "Method not allowed"),
            Self::Internal { message, source } => {
                error!("event=api_error module=api status=error message={message:?} error={source}");
                ApiResponse::error(status, message)
            }
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::NotFound(message) => write!(f, "not found: {message}"),
            Self::MethodNotAllowed => write!(f, "method not allowed"),
            Self::Internal { message, source } => write!(f, "{message}: {source}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Internal { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Application state shared by every handler.
pub struct App {
    conn: Connection,
    vault: VaultService<FsVaultStore>,
    gate: Box<dyn AccessGate>,
}

impl App {
    /// `conn` must already be migrated (see `notela_core::open_db`).
    pub fn new(conn: Connection, vault: FsVaultStore, gate: Box<dyn AccessGate>) -> Self {
        info!(
            "event=app_init module=api status=ok vault_gate={}",
            gate.name()
        );
        Self {
            conn,
            vault: VaultService::new(vault),
            gate,
        }
    }

    /// Runs one request to completion.
    pub fn handle(&mut self, request: &ApiRequest) -> ApiResponse {
        let started = Instant::now();
        let response = self
            .dispatch(request)
            .unwrap_or_else(ApiError::into_response);
        info!(
            "event=http_request module=api status={} method={} path={} elapsed_ms={}",
            response.status,
            request.method.as_str(),
            request.path,
            started.elapsed().as_millis()
        );
        response
    }

    fn dispatch(&mut self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let route = Route::parse(&request.path).ok_or(ApiError::NotFound("Not found"))?;
        match (route, request.method) {
            (Route::Notes, Method::Get) => notes::list(self, request),
            (Route::Notes, Method::Post) => notes::create(self, request),
            (Route::NoteSearch, Method::Get) => notes::search(self, request),
            (Route::Note(id), Method::Get) => notes::get(self, &id),
            (Route::Note(id), Method::Put) => notes::update(self, &id, request),
            (Route::Note(id), Method::Delete) => notes::delete(self, &id),
            (Route::Tasks, Method::Get) => tasks::list(self, request),
            (Route::Tasks, Method::Post) => tasks::create(self, request),
            (Route::Task(id), Method::Get) => tasks::get(self, &id),
            (Route::Task(id), Method::Put) => tasks::update(self, &id, request),
            (Route::Task(id), Method::Delete) => tasks::delete(self, &id),
            (Route::TaskToggle(id), Method::Post) => tasks::toggle(self, &id),
            (Route::Tags, Method::Get) => status::tags(self),
            (Route::Status, Method::Get) => status::status(self),
            (Route::Vault, Method::Get) => {
                self.authorize(request)?;
                vault::list(self, request)
            }
            (Route::Vault, Method::Post) => {
                self.authorize(request)?;
                vault::save(self, request)
            }
            (Route::VaultFile(filename), Method::Get) => {
                self.authorize(request)?;
                vault::read(self, &filename)
            }
            (Route::VaultFile(filename), Method::Put) => {
                self.authorize(request)?;
                vault::update(self, &filename, request)
            }
            (Route::VaultFile(filename), Method::Delete) => {
                self.authorize(request)?;
                vault::delete(self, &filename)
            }
            _ => Err(ApiError::MethodNotAllowed),
        }
    }

    fn authorize(&self, request: &ApiRequest) -> Result<(), ApiError> {
        self.gate
            .check(request.header(VAULT_PASSWORD_HEADER))
            .map_err(|err| {
                warn!(
                    "event=vault_auth module=api status=denied gate={} reason={err}",
                    self.gate.name()
                );
                ApiError::Unauthorized
            })
    }

    fn note_service(&mut self) -> Result<NoteService<SqliteNoteRepository<'_>>, ApiError> {
        let repo = SqliteNoteRepository::try_new(&mut self.conn).map_err(repo_init_error)?;
        Ok(NoteService::new(repo))
    }

    fn task_service(&mut self) -> Result<TaskService<SqliteTaskRepository<'_>>, ApiError> {
        let repo = SqliteTaskRepository::try_new(&mut self.conn).map_err(repo_init_error)?;
        Ok(TaskService::new(repo))
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }

    fn vault(&self) -> &VaultService<FsVaultStore> {
        &self.vault
    }
}

fn repo_init_error(err: RepoError) -> ApiError {
    ApiError::internal("Failed to connect to database", err)
}

/// Optional unsigned query parameter; malformed values are a 400.
fn query_u32(request: &ApiRequest, name: &str) -> Result<Option<u32>, ApiError> {
    match request.query_param(name).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("Invalid {name} `{raw}`"))),
    }
}

/// Parses a UUID path segment; malformed ids are reported as `not_found`.
fn parse_id(raw: &str, not_found: &'static str) -> Result<uuid::Uuid, ApiError> {
    uuid::Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(not_found))
}
