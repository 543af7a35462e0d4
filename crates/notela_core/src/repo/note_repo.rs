//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide note CRUD on top of the `notes` table.
//! - Keep note writes and their tag links in one transaction.
//!
//! # Invariants
//! - Note lists are ordered by `updated_at DESC, id ASC`.
//! - Every write refreshes `updated_at`; `created_at` is set once.
//! - Deleting a note removes its tag links (FK cascade), never the tags.

use crate::db::NOW_EPOCH_MS_SQL;
use crate::model::note::{Note, NoteId};
use crate::model::tag::Tag;
use crate::repo::schema_check::ensure_tables;
use crate::repo::tag_links::{self, load_tags, replace_tags, TagOwner};
use crate::repo::{normalize_list_limit, parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    filename,
    created_at,
    updated_at
FROM notes";

/// Query options for note list use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListQuery {
    /// Optional single-tag exact match filter (case-insensitive).
    pub tag: Option<String>,
    /// Maximum rows to return; `None` returns every note.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for note operations.
pub trait NoteRepository {
    /// Inserts one note together with its tag set.
    fn create_note(&mut self, note: &Note, tags: &[String]) -> RepoResult<NoteId>;
    /// Replaces title, content and filename; replaces tags when `Some`.
    fn update_note(&mut self, note: &Note, tags: Option<&[String]>) -> RepoResult<()>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Most recently updated note carrying `filename`.
    fn find_note_by_filename(&self, filename: &str) -> RepoResult<Option<Note>>;
    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>>;
    fn delete_note(&mut self, id: NoteId) -> RepoResult<()>;
    fn count_notes(&self) -> RepoResult<u64>;
    /// Returns all known tags sorted by name.
    fn list_tags(&self) -> RepoResult<Vec<Tag>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - [`RepoError::MissingRequiredTable`] when migrations have not run.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["notes", "tags", "note_tags"])?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&mut self, note: &Note, tags: &[String]) -> RepoResult<NoteId> {
        note.validate()?;

        let id_text = note.id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            &format!(
                "INSERT INTO notes (id, title, content, filename, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, {NOW_EPOCH_MS_SQL}, {NOW_EPOCH_MS_SQL});"
            ),
            params![
                id_text.as_str(),
                note.title.as_str(),
                note.content.as_str(),
                note.filename.as_deref(),
            ],
        )?;
        replace_tags(&tx, TagOwner::Note, id_text.as_str(), tags)?;
        tx.commit()?;

        Ok(note.id)
    }

    fn update_note(&mut self, note: &Note, tags: Option<&[String]>) -> RepoResult<()> {
        note.validate()?;

        let id_text = note.id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            &format!(
                "UPDATE notes
                 SET
                    title = ?2,
                    content = ?3,
                    filename = ?4,
                    updated_at = {NOW_EPOCH_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![
                id_text.as_str(),
                note.title.as_str(),
                note.content.as_str(),
                note.filename.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }

        if let Some(tags) = tags {
            replace_tags(&tx, TagOwner::Note, id_text.as_str(), tags)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(self.note_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_note_by_filename(&self, filename: &str) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE filename = ?1
             ORDER BY updated_at DESC, id ASC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([filename])?;
        match rows.next()? {
            Some(row) => Ok(Some(self.note_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>> {
        let mut sql = format!("{NOTE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(tag) = query.tag.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM note_tags nt
                    INNER JOIN tags t ON t.id = nt.tag_id
                    WHERE nt.note_id = notes.id
                      AND t.name = ? COLLATE NOCASE
                )",
            );
            bind_values.push(Value::Text(tag.clone()));
        }

        sql.push_str(" ORDER BY updated_at DESC, id ASC");
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(self.note_from_row(row)?);
        }
        Ok(notes)
    }

    fn delete_note(&mut self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn count_notes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn list_tags(&self) -> RepoResult<Vec<Tag>> {
        tag_links::list_tags(self.conn)
    }
}

impl SqliteNoteRepository<'_> {
    fn note_from_row(&self, row: &Row<'_>) -> RepoResult<Note> {
        let id_text: String = row.get("id")?;
        let id = parse_uuid(&id_text, "notes.id")?;
        let note = Note {
            id,
            title: row.get("title")?,
            content: row.get("content")?,
            filename: row.get("filename")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            tags: load_tags(self.conn, TagOwner::Note, &id_text)?,
        };
        note.validate()
            .map_err(|err| RepoError::InvalidData(format!("note {id}: {err}")))?;
        Ok(note)
    }
}

/// Appends `LIMIT`/`OFFSET` clauses, normalizing the limit first.
pub(crate) fn push_pagination(
    sql: &mut String,
    bind_values: &mut Vec<Value>,
    limit: Option<u32>,
    offset: u32,
) {
    match normalize_list_limit(limit) {
        Some(limit) => {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(offset)));
            }
        }
        None if offset > 0 => {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(offset)));
        }
        None => {}
    }
}
