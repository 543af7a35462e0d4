//! Guards that a connection was migrated before a repository uses it.

use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;

/// Fails with [`RepoError::MissingRequiredTable`] for the first absent table.
pub(crate) fn ensure_tables(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    for table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [*table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}
