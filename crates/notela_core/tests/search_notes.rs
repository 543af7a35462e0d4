use notela_core::db::migrations::{apply_migrations, latest_version};
use notela_core::db::open_db_in_memory;
use notela_core::{
    search_notes, NoteInput, NoteService, SearchError, SearchQuery, SqliteNoteRepository,
};
use rusqlite::Connection;
use std::collections::HashSet;

fn note(title: &str, content: &str) -> NoteInput {
    NoteInput {
        title: Some(title.to_string()),
        content: Some(content.to_string()),
        ..NoteInput::default()
    }
}

#[test]
fn search_matches_title_and_content() {
    let mut conn = open_db_in_memory().unwrap();
    let (by_title, by_body) = {
        let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
        let a = service.create_note(note("Rust borrow notes", "nothing")).unwrap();
        let b = service.create_note(note("Misc", "hello rust search")).unwrap();
        (a.id, b.id)
    };

    let hits = search_notes(&conn, &SearchQuery::new("rust")).unwrap();
    let ids: HashSet<_> = hits.iter().map(|hit| hit.note_id).collect();
    assert_eq!(ids, HashSet::from([by_title, by_body]));

    let body_hit = hits.iter().find(|hit| hit.note_id == by_body).unwrap();
    assert_eq!(body_hit.title, "Misc");
    assert!(body_hit.snippet.contains("[rust]"));
}

#[test]
fn search_reflects_updated_and_deleted_notes() {
    let mut conn = open_db_in_memory().unwrap();
    let id = {
        let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
        let created = service.create_note(note("t", "alpha text")).unwrap();
        service
            .update_note(
                created.id,
                NoteInput {
                    content: Some("beta text".to_string()),
                    ..NoteInput::default()
                },
            )
            .unwrap();
        created.id
    };

    assert!(search_notes(&conn, &SearchQuery::new("alpha")).unwrap().is_empty());
    let hits = search_notes(&conn, &SearchQuery::new("beta")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].note_id, id);

    {
        let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
        service.delete_note(id).unwrap();
    }
    assert!(search_notes(&conn, &SearchQuery::new("beta")).unwrap().is_empty());
}

#[test]
fn all_terms_must_match() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
        service.create_note(note("a", "plan meeting agenda")).unwrap();
        service.create_note(note("b", "plan vacation")).unwrap();
    }

    let hits = search_notes(&conn, &SearchQuery::new("plan agenda")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "a");
}

#[test]
fn search_limit_is_applied() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
        for suffix in ["a", "b", "c"] {
            service
                .create_note(note(suffix, &format!("token common {suffix}")))
                .unwrap();
        }
    }

    let hits = search_notes(&conn, &SearchQuery::new("token").with_limit(2)).unwrap();
    assert_eq!(hits.len(), 2);

    let hits = search_notes(&conn, &SearchQuery::new("token").with_limit(0)).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn blank_query_returns_empty_results() {
    let conn = open_db_in_memory().unwrap();
    let hits = search_notes(&conn, &SearchQuery::new("   ")).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn escaped_query_text_does_not_fail_on_common_symbols() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
        service.create_note(note("x", "alpha beta")).unwrap();
    }

    let hits = search_notes(&conn, &SearchQuery::new("a:b \"c")).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn raw_fts_syntax_reports_invalid_query() {
    let conn = open_db_in_memory().unwrap();

    let mut query = SearchQuery::new("\"unterminated");
    query.raw_fts_syntax = true;

    let err = search_notes(&conn, &query).unwrap_err();
    assert!(matches!(err, SearchError::InvalidQuery { .. }));
}

#[test]
fn fts_migration_indexes_existing_notes() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    conn.execute_batch(include_str!("../src/db/migrations/0001_init.sql"))
        .unwrap();
    conn.execute_batch(
        "INSERT INTO notes (id, title, content, created_at, updated_at)
         VALUES ('11111111-2222-4333-8444-555555555555', 'old', 'legacy indexed term', 1, 1);",
    )
    .unwrap();
    conn.execute_batch("PRAGMA user_version = 1;").unwrap();

    apply_migrations(&mut conn).unwrap();
    let current_version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(current_version, latest_version());

    let hits = search_notes(&conn, &SearchQuery::new("legacy")).unwrap();
    assert_eq!(hits.len(), 1);
}
