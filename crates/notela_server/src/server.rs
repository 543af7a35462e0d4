//! Blocking HTTP loop on `tiny_http`.
//!
//! # Invariants
//! - Requests are handled one at a time against one [`App`].
//! - Bodies above [`MAX_BODY_BYTES`] are rejected without being buffered.

use crate::api::{ApiError, ApiRequest, ApiResponse, App, Method};
use log::{info, warn};
use std::io::Read;
use tiny_http::{Header, Request, Response, Server};

pub const MAX_BODY_BYTES: u64 = 5 * 1024 * 1024;

/// Serves requests until the listener shuts down.
pub fn serve(server: &Server, app: &mut App) {
    info!("event=server_loop module=server status=start");
    for request in server.incoming_requests() {
        handle_request(request, app);
    }
    info!("event=server_loop module=server status=done");
}

fn handle_request(mut request: Request, app: &mut App) {
    let response = match read_request(&mut request) {
        Ok(api_request) => app.handle(&api_request),
        Err(err) => err.into_response(),
    };
    if let Err(err) = request.respond(to_http_response(&response)) {
        warn!("event=http_respond module=server status=error error={err}");
    }
}

fn read_request(request: &mut Request) -> Result<ApiRequest, ApiError> {
    let mut api_request = ApiRequest::new(Method::parse(request.method().as_str()), request.url());
    for header in request.headers() {
        api_request = api_request.with_header(header.field.as_str().as_str(), header.value.as_str());
    }

    let mut body = Vec::new();
    request
        .as_reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut body)
        .map_err(|err| ApiError::internal("Failed to read request", err))?;
    if body.len() as u64 > MAX_BODY_BYTES {
        return Err(ApiError::BadRequest("Request body too large".to_string()));
    }
    Ok(api_request.with_body(body))
}

fn to_http_response(response: &ApiResponse) -> Response<std::io::Cursor<Vec<u8>>> {
    let http = Response::from_string(response.body.to_string()).with_status_code(response.status);
    match Header::from_bytes(&b"Content-Type"[..], &b"application/json; charset=utf-8"[..]) {
        Ok(header) => http.with_header(header),
        Err(()) => http,
    }
}
