//! Tag persistence shared by notes and tasks.
//!
//! # Invariants
//! - Tag rows are created on first use and never deleted implicitly.
//! - Link replacement is full-set: callers pass the complete tag list.
//! - Names passed in are already normalized (see `model::tag`).

use crate::model::tag::Tag;
use crate::repo::RepoResult;
use rusqlite::{params, Connection};

/// Record kind that can carry tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagOwner {
    Note,
    Task,
}

impl TagOwner {
    fn link_table(self) -> &'static str {
        match self {
            Self::Note => "note_tags",
            Self::Task => "task_tags",
        }
    }

    fn owner_column(self) -> &'static str {
        match self {
            Self::Note => "note_id",
            Self::Task => "task_id",
        }
    }
}

/// Replaces every tag link of one owner.
///
/// Must run inside the caller's transaction so the owner write and its tag
/// set commit together.
pub(crate) fn replace_tags(
    conn: &Connection,
    owner: TagOwner,
    owner_id: &str,
    tags: &[String],
) -> RepoResult<()> {
    let table = owner.link_table();
    let column = owner.owner_column();
    conn.execute(
        &format!("DELETE FROM {table} WHERE {column} = ?1;"),
        [owner_id],
    )?;

    for tag in tags {
        conn.execute(
            "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
            [tag.as_str()],
        )?;
        conn.execute(
            &format!(
                "INSERT OR IGNORE INTO {table} ({column}, tag_id)
                 SELECT ?1, id
                 FROM tags
                 WHERE name = ?2 COLLATE NOCASE;"
            ),
            params![owner_id, tag.as_str()],
        )?;
    }
    Ok(())
}

/// Loads the tags linked to one owner, sorted by name.
pub(crate) fn load_tags(conn: &Connection, owner: TagOwner, owner_id: &str) -> RepoResult<Vec<Tag>> {
    let table = owner.link_table();
    let column = owner.owner_column();
    let mut stmt = conn.prepare(&format!(
        "SELECT t.id, t.name, t.color
         FROM {table} link
         INNER JOIN tags t ON t.id = link.tag_id
         WHERE link.{column} = ?1
         ORDER BY t.name COLLATE NOCASE ASC;"
    ))?;
    let mut rows = stmt.query([owner_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(tag_from_row(row)?);
    }
    Ok(tags)
}

/// Returns all known tags sorted by name.
pub fn list_tags(conn: &Connection) -> RepoResult<Vec<Tag>> {
    let mut stmt =
        conn.prepare("SELECT id, name, color FROM tags ORDER BY name COLLATE NOCASE ASC;")?;
    let mut rows = stmt.query([])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(tag_from_row(row)?);
    }
    Ok(tags)
}

/// Total number of tag rows.
pub fn count_tags(conn: &Connection) -> RepoResult<u64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM tags;", [], |row| row.get(0))?;
    Ok(count.max(0) as u64)
}

fn tag_from_row(row: &rusqlite::Row<'_>) -> RepoResult<Tag> {
    let name: String = row.get(1)?;
    Ok(Tag {
        id: row.get(0)?,
        name: name.to_lowercase(),
        color: row.get(2)?,
    })
}
