use notela_core::{gate_from_secret, open_db_in_memory, FsVaultStore};
use notela_server::{ApiRequest, ApiResponse, App, Method};
use serde_json::{json, Value};
use tempfile::TempDir;

const SECRET: &str = "open-sesame";

fn app() -> (App, TempDir) {
    let vault_dir = tempfile::tempdir().unwrap();
    let app = App::new(
        open_db_in_memory().unwrap(),
        FsVaultStore::open(vault_dir.path()).unwrap(),
        gate_from_secret(Some(SECRET)),
    );
    (app, vault_dir)
}

fn send(app: &mut App, method: Method, target: &str, body: Option<Value>) -> ApiResponse {
    let mut request = ApiRequest::new(method, target);
    if let Some(body) = body {
        request = request.with_body(body.to_string());
    }
    app.handle(&request)
}

fn vault(app: &mut App, method: Method, target: &str, body: Option<Value>) -> ApiResponse {
    let mut request = ApiRequest::new(method, target).with_header("X-Vault-Password", SECRET);
    if let Some(body) = body {
        request = request.with_body(body.to_string());
    }
    app.handle(&request)
}

#[test]
fn note_lifecycle() {
    let (mut app, _vault) = app();

    let created = send(
        &mut app,
        Method::Post,
        "/api/notes",
        Some(json!({ "title": "Plan", "content": "ship it", "tags": ["Work"] })),
    );
    assert_eq!(created.status, 201);
    assert_eq!(created.body["title"], "Plan");
    assert_eq!(created.body["tags"][0]["name"], "work");
    assert_eq!(created.body["tags"][0]["color"], "#89b4fa");
    assert!(created.body["filename"].is_null());
    assert!(created.body["createdAt"].as_str().unwrap().ends_with('Z'));
    let id = created.body["id"].as_str().unwrap().to_string();

    let fetched = send(&mut app, Method::Get, &format!("/api/notes/{id}"), None);
    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.body["content"], "ship it");

    let updated = send(
        &mut app,
        Method::Put,
        &format!("/api/notes/{id}"),
        Some(json!({ "content": "shipped" })),
    );
    assert_eq!(updated.status, 200);
    assert_eq!(updated.body["title"], "Plan");
    assert_eq!(updated.body["content"], "shipped");
    assert_eq!(updated.body["tags"].as_array().unwrap().len(), 1);

    let listed = send(&mut app, Method::Get, "/api/notes?tag=work", None);
    assert_eq!(listed.body.as_array().unwrap().len(), 1);

    let deleted = send(&mut app, Method::Delete, &format!("/api/notes/{id}"), None);
    assert_eq!(deleted.status, 200);
    assert_eq!(deleted.body["message"], "Note deleted successfully");

    let missing = send(&mut app, Method::Get, &format!("/api/notes/{id}"), None);
    assert_eq!(missing.status, 404);
    assert_eq!(missing.body, json!({ "error": "Note not found" }));
}

#[test]
fn note_create_with_empty_body_uses_defaults() {
    let (mut app, _vault) = app();
    let created = send(&mut app, Method::Post, "/api/notes", None);
    assert_eq!(created.status, 201);
    assert_eq!(created.body["title"], "Untitled Note");
    assert_eq!(created.body["content"], "");
}

#[test]
fn note_errors_map_to_status_codes() {
    let (mut app, _vault) = app();

    let bad_json = app.handle(&ApiRequest::new(Method::Post, "/api/notes").with_body("{"));
    assert_eq!(bad_json.status, 400);

    let blank_tag = send(
        &mut app,
        Method::Post,
        "/api/notes",
        Some(json!({ "tags": ["  "] })),
    );
    assert_eq!(blank_tag.status, 400);

    let bad_limit = send(&mut app, Method::Get, "/api/notes?limit=many", None);
    assert_eq!(bad_limit.status, 400);

    let malformed = send(&mut app, Method::Delete, "/api/notes/not-a-uuid", None);
    assert_eq!(malformed.status, 404);

    let wrong_method = send(&mut app, Method::Delete, "/api/notes", None);
    assert_eq!(wrong_method.status, 405);

    let unknown = send(&mut app, Method::Get, "/api/nope", None);
    assert_eq!(unknown.status, 404);
    assert_eq!(unknown.body["error"], "Not found");
}

#[test]
fn note_search_finds_title_and_content() {
    let (mut app, _vault) = app();
    send(
        &mut app,
        Method::Post,
        "/api/notes",
        Some(json!({ "title": "Rust borrow", "content": "lifetimes explained" })),
    );
    send(
        &mut app,
        Method::Post,
        "/api/notes",
        Some(json!({ "title": "Groceries", "content": "milk" })),
    );

    let hits = send(&mut app, Method::Get, "/api/notes/search?q=lifetimes", None);
    assert_eq!(hits.status, 200);
    let hits = hits.body.as_array().unwrap().clone();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["title"], "Rust borrow");
    assert!(hits[0]["snippet"].as_str().unwrap().contains("[lifetimes]"));

    let empty = send(&mut app, Method::Get, "/api/notes/search?q=", None);
    assert_eq!(empty.body, json!([]));
}

#[test]
fn task_lifecycle_and_filters() {
    let (mut app, _vault) = app();

    let created = send(
        &mut app,
        Method::Post,
        "/api/tasks",
        Some(json!({ "title": "Taxes", "priority": "urgent", "dueDate": "2024-03-01" })),
    );
    assert_eq!(created.status, 201);
    assert_eq!(created.body["priority"], "URGENT");
    assert_eq!(created.body["completed"], false);
    assert_eq!(created.body["dueDate"], "2024-03-01T00:00:00.000Z");
    let id = created.body["id"].as_str().unwrap().to_string();

    let defaults = send(&mut app, Method::Post, "/api/tasks", Some(json!({})));
    assert_eq!(defaults.body["title"], "Untitled Task");
    assert_eq!(defaults.body["priority"], "MEDIUM");
    assert!(defaults.body["dueDate"].is_null());

    let toggled = send(&mut app, Method::Post, &format!("/api/tasks/{id}/toggle"), None);
    assert_eq!(toggled.status, 200);
    assert_eq!(toggled.body["completed"], true);

    let done = send(&mut app, Method::Get, "/api/tasks?completed=true", None);
    assert_eq!(done.body.as_array().unwrap().len(), 1);
    let urgent = send(&mut app, Method::Get, "/api/tasks?priority=URGENT", None);
    assert_eq!(urgent.body.as_array().unwrap().len(), 1);
    let all = send(&mut app, Method::Get, "/api/tasks", None);
    assert_eq!(all.body.as_array().unwrap().len(), 2);

    let cleared = send(
        &mut app,
        Method::Put,
        &format!("/api/tasks/{id}"),
        Some(json!({ "dueDate": null, "completed": false })),
    );
    assert!(cleared.body["dueDate"].is_null());
    assert_eq!(cleared.body["completed"], false);
    assert_eq!(cleared.body["priority"], "URGENT");

    let deleted = send(&mut app, Method::Delete, &format!("/api/tasks/{id}"), None);
    assert_eq!(deleted.status, 200);
    let missing = send(&mut app, Method::Get, &format!("/api/tasks/{id}"), None);
    assert_eq!(missing.status, 404);
    assert_eq!(missing.body["error"], "Task not found");
}

#[test]
fn task_input_errors_are_bad_requests() {
    let (mut app, _vault) = app();
    let bad_priority = send(
        &mut app,
        Method::Post,
        "/api/tasks",
        Some(json!({ "priority": "someday" })),
    );
    assert_eq!(bad_priority.status, 400);

    let bad_date = send(
        &mut app,
        Method::Post,
        "/api/tasks",
        Some(json!({ "dueDate": "tomorrow-ish" })),
    );
    assert_eq!(bad_date.status, 400);

    let bad_filter = send(&mut app, Method::Get, "/api/tasks?completed=maybe", None);
    assert_eq!(bad_filter.status, 400);
}

#[test]
fn status_and_tags_report_counts() {
    let (mut app, _vault) = app();
    send(
        &mut app,
        Method::Post,
        "/api/notes",
        Some(json!({ "tags": ["b", "a"] })),
    );
    let task = send(&mut app, Method::Post, "/api/tasks", Some(json!({})));
    let id = task.body["id"].as_str().unwrap().to_string();
    send(&mut app, Method::Post, &format!("/api/tasks/{id}/toggle"), None);
    send(&mut app, Method::Post, "/api/tasks", Some(json!({})));

    let status = send(&mut app, Method::Get, "/api/status", None);
    assert_eq!(status.status, 200);
    assert_eq!(status.body["database"], "SQLite");
    assert_eq!(status.body["status"], "connected");
    assert_eq!(status.body["stats"]["notes"], 1);
    assert_eq!(
        status.body["stats"]["tasks"],
        json!({ "total": 2, "completed": 1, "pending": 1 })
    );
    assert_eq!(status.body["stats"]["tags"], 2);
    assert!(status.body["timestamp"].is_string());

    let tags = send(&mut app, Method::Get, "/api/tags", None);
    let names: Vec<_> = tags
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|tag| tag["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn vault_requires_password() {
    let (mut app, _vault) = app();

    let missing = send(&mut app, Method::Get, "/api/vault", None);
    assert_eq!(missing.status, 401);
    assert_eq!(missing.body, json!({ "error": "Unauthorized" }));

    let wrong = app.handle(
        &ApiRequest::new(Method::Get, "/api/vault").with_header("x-vault-password", "guess"),
    );
    assert_eq!(wrong.status, 401);

    let ok = vault(&mut app, Method::Get, "/api/vault", None);
    assert_eq!(ok.status, 200);
    assert_eq!(ok.body, json!({ "files": [] }));
}

#[test]
fn vault_is_locked_without_configured_secret() {
    let vault_dir = tempfile::tempdir().unwrap();
    let mut app = App::new(
        open_db_in_memory().unwrap(),
        FsVaultStore::open(vault_dir.path()).unwrap(),
        gate_from_secret(None),
    );
    let response = app.handle(
        &ApiRequest::new(Method::Get, "/api/vault").with_header("x-vault-password", ""),
    );
    assert_eq!(response.status, 401);
}

#[test]
fn vault_file_lifecycle() {
    let (mut app, vault_dir) = app();

    let saved = vault(
        &mut app,
        Method::Post,
        "/api/vault",
        Some(json!({ "filename": "trip.md", "content": "# Oslo\npack socks" })),
    );
    assert_eq!(saved.status, 200);
    assert_eq!(saved.body, json!({ "success": true, "filename": "trip.md" }));
    assert!(vault_dir.path().join("trip.md").is_file());

    let listed = vault(&mut app, Method::Get, "/api/vault?q=oslo", None);
    let files = listed.body["files"].as_array().unwrap().clone();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["title"], "Oslo");
    assert_eq!(files[0]["size"], 17);
    assert!(files[0]["lastModified"].is_string());

    let none = vault(&mut app, Method::Get, "/api/vault?q=paris", None);
    assert_eq!(none.body, json!({ "files": [] }));

    let read = vault(&mut app, Method::Get, "/api/vault/trip.md", None);
    assert_eq!(
        read.body,
        json!({ "content": "# Oslo\npack socks", "filename": "trip.md" })
    );

    let updated = vault(
        &mut app,
        Method::Put,
        "/api/vault/trip.md",
        Some(json!({ "content": "# Oslo\nbooked" })),
    );
    assert_eq!(updated.body, json!({ "success": true, "filename": "trip.md" }));

    let deleted = vault(&mut app, Method::Delete, "/api/vault/trip.md", None);
    assert_eq!(deleted.body, json!({ "success": true }));

    let gone = vault(&mut app, Method::Get, "/api/vault/trip.md", None);
    assert_eq!(gone.status, 404);
    assert_eq!(gone.body["error"], "File not found");
    let gone_delete = vault(&mut app, Method::Delete, "/api/vault/trip.md", None);
    assert_eq!(gone_delete.status, 404);
}

#[test]
fn vault_validation_errors() {
    let (mut app, _vault) = app();

    let missing = vault(
        &mut app,
        Method::Post,
        "/api/vault",
        Some(json!({ "filename": "a.md" })),
    );
    assert_eq!(missing.status, 400);
    assert_eq!(missing.body["error"], "Content and filename are required");

    let empty_put = vault(
        &mut app,
        Method::Put,
        "/api/vault/a.md",
        Some(json!({ "content": "" })),
    );
    assert_eq!(empty_put.status, 400);
    assert_eq!(empty_put.body["error"], "Content is required");

    let traversal = vault(&mut app, Method::Get, "/api/vault/..%2Fsecret.md", None);
    assert_eq!(traversal.status, 400);

    let bad_name = vault(
        &mut app,
        Method::Post,
        "/api/vault",
        Some(json!({ "filename": "../x.md", "content": "x" })),
    );
    assert_eq!(bad_name.status, 400);

    for filename in ["x.txt", ".md", "config.json"] {
        let not_markdown = vault(
            &mut app,
            Method::Post,
            "/api/vault",
            Some(json!({ "filename": filename, "content": "x" })),
        );
        assert_eq!(not_markdown.status, 400, "{filename} was accepted");
        assert_eq!(not_markdown.body["error"], "Invalid filename");
    }
    let listed = vault(&mut app, Method::Get, "/api/vault", None);
    assert_eq!(listed.body["files"].as_array().map(Vec::len), Some(0));
}
