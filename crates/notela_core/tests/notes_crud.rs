use notela_core::db::open_db_in_memory;
use notela_core::model::note::DEFAULT_NOTE_TITLE;
use notela_core::model::validation::ValidationError;
use notela_core::{
    NoteInput, NoteRepository, NoteService, NoteServiceError, RepoError, SqliteNoteRepository,
};
use rusqlite::{params, Connection};

fn tags(values: &[&str]) -> Option<Vec<String>> {
    Some(values.iter().map(|value| value.to_string()).collect())
}

#[test]
fn create_applies_defaults() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());

    let created = service.create_note(NoteInput::default()).unwrap();
    assert_eq!(created.title, DEFAULT_NOTE_TITLE);
    assert_eq!(created.content, "");
    assert!(created.filename.is_none());
    assert!(created.tags.is_empty());
    assert!(created.created_at > 0);
    assert_eq!(created.created_at, created.updated_at);
}

#[test]
fn create_normalizes_and_links_tags() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());

    let created = service
        .create_note(NoteInput {
            title: Some("  Groceries ".to_string()),
            content: Some("- milk".to_string()),
            filename: None,
            tags: tags(&["Home", " errands", "home"]),
        })
        .unwrap();

    assert_eq!(created.title, "Groceries");
    assert_eq!(created.tag_names(), vec!["errands", "home"]);
    let all_tags = service.list_tags().unwrap();
    assert_eq!(all_tags.len(), 2);
    assert!(all_tags.iter().all(|tag| tag.color == "#89b4fa"));
}

#[test]
fn blank_tag_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());

    let err = service
        .create_note(NoteInput {
            tags: tags(&["ok", "  "]),
            ..NoteInput::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Validation(ValidationError::BlankTag)
    ));
    assert_eq!(service.count_notes().unwrap(), 0);
}

#[test]
fn unsafe_filename_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());

    let err = service
        .create_note(NoteInput {
            filename: Some("../etc/passwd".to_string()),
            ..NoteInput::default()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        NoteServiceError::Validation(ValidationError::InvalidFilename(_))
    ));
}

#[test]
fn partial_update_keeps_omitted_fields_and_tags() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
    let created = service
        .create_note(NoteInput {
            title: Some("Plan".to_string()),
            content: Some("v1".to_string()),
            filename: Some("plan.md".to_string()),
            tags: tags(&["work"]),
        })
        .unwrap();

    let updated = service
        .update_note(
            created.id,
            NoteInput {
                content: Some("v2".to_string()),
                ..NoteInput::default()
            },
        )
        .unwrap();
    assert_eq!(updated.title, "Plan");
    assert_eq!(updated.content, "v2");
    assert_eq!(updated.filename.as_deref(), Some("plan.md"));
    assert_eq!(updated.tag_names(), vec!["work"]);
    assert_eq!(updated.created_at, created.created_at);

    let retagged = service
        .update_note(
            created.id,
            NoteInput {
                tags: tags(&["Personal"]),
                filename: Some(String::new()),
                ..NoteInput::default()
            },
        )
        .unwrap();
    assert_eq!(retagged.tag_names(), vec!["personal"]);
    assert!(retagged.filename.is_none());
}

#[test]
fn update_and_delete_missing_note_report_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
    let missing = uuid::Uuid::new_v4();

    assert!(matches!(
        service.update_note(missing, NoteInput::default()),
        Err(NoteServiceError::NoteNotFound(id)) if id == missing
    ));
    assert!(matches!(
        service.delete_note(missing),
        Err(NoteServiceError::NoteNotFound(id)) if id == missing
    ));
    assert!(service.get_note(missing).unwrap().is_none());
}

#[test]
fn delete_removes_links_but_keeps_tags() {
    let mut conn = open_db_in_memory().unwrap();
    let id = {
        let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
        let created = service
            .create_note(NoteInput {
                tags: tags(&["keep"]),
                ..NoteInput::default()
            })
            .unwrap();
        service.delete_note(created.id).unwrap();
        assert!(service.get_note(created.id).unwrap().is_none());
        created.id
    };

    assert_eq!(count(&conn, "SELECT COUNT(*) FROM note_tags;"), 0);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM tags;"), 1);
    assert_eq!(
        count_param(&conn, "SELECT COUNT(*) FROM notes WHERE id = ?1;", &id.to_string()),
        0
    );
}

#[test]
fn list_orders_by_updated_at_and_filters_by_tag() {
    let mut conn = open_db_in_memory().unwrap();
    let (first, second, third) = {
        let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
        let first = service
            .create_note(NoteInput {
                tags: tags(&["work"]),
                ..NoteInput::default()
            })
            .unwrap();
        let second = service.create_note(NoteInput::default()).unwrap();
        let third = service
            .create_note(NoteInput {
                tags: tags(&["Work"]),
                ..NoteInput::default()
            })
            .unwrap();
        (first.id, second.id, third.id)
    };

    set_updated_at(&conn, "notes", &first.to_string(), 3000);
    set_updated_at(&conn, "notes", &second.to_string(), 2000);
    set_updated_at(&conn, "notes", &third.to_string(), 1000);

    let service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
    let all = service.list_notes(None, None, 0).unwrap();
    let ids: Vec<_> = all.iter().map(|note| note.id).collect();
    assert_eq!(ids, vec![first, second, third]);

    let work = service.list_notes(Some("WORK"), None, 0).unwrap();
    let ids: Vec<_> = work.iter().map(|note| note.id).collect();
    assert_eq!(ids, vec![first, third]);

    let page = service.list_notes(None, Some(1), 1).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, second);

    let tail = service.list_notes(None, None, 2).unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].id, third);
}

#[test]
fn find_by_filename_returns_latest_match() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
    service
        .create_note(NoteInput {
            filename: Some("journal.md".to_string()),
            ..NoteInput::default()
        })
        .unwrap();

    assert!(service.find_by_filename("journal.md").unwrap().is_some());
    assert!(service.find_by_filename("other.md").unwrap().is_none());
}

#[test]
fn repository_requires_migrated_connection() {
    let mut conn = Connection::open_in_memory().unwrap();
    let err = SqliteNoteRepository::try_new(&mut conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("notes")));
}

#[test]
fn corrupt_row_is_reported_as_invalid_data() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO notes (id, title, content, created_at, updated_at)
         VALUES ('not-a-uuid', 'x', '', 1, 1);",
        [],
    )
    .unwrap();

    let repo = SqliteNoteRepository::try_new(&mut conn).unwrap();
    let err = repo.list_notes(&Default::default()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

fn set_updated_at(conn: &Connection, table: &str, id: &str, value: i64) {
    conn.execute(
        &format!("UPDATE {table} SET updated_at = ?1 WHERE id = ?2;"),
        params![value, id],
    )
    .unwrap();
}

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

fn count_param(conn: &Connection, sql: &str, param: &str) -> i64 {
    conn.query_row(sql, [param], |row| row.get(0)).unwrap()
}
