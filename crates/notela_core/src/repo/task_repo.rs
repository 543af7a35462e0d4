//! Task repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Task lists are ordered by `created_at DESC, id ASC` (newest first).
//! - `priority` is stored lowercase; unknown stored values are rejected.

use crate::db::NOW_EPOCH_MS_SQL;
use crate::model::task::{Task, TaskId, TaskPriority};
use crate::repo::note_repo::push_pagination;
use crate::repo::schema_check::ensure_tables;
use crate::repo::tag_links::{load_tags, replace_tags, TagOwner};
use crate::repo::{bool_to_int, parse_bool, parse_uuid, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    completed,
    priority,
    due_date,
    created_at,
    updated_at
FROM tasks";

/// Query options for task list use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    pub completed: Option<bool>,
    pub priority: Option<TaskPriority>,
    /// Optional single-tag exact match filter (case-insensitive).
    pub tag: Option<String>,
    /// Maximum rows to return; `None` returns every task.
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for task operations.
pub trait TaskRepository {
    fn create_task(&mut self, task: &Task, tags: &[String]) -> RepoResult<TaskId>;
    /// Replaces all scalar fields; replaces tags when `Some`.
    fn update_task(&mut self, task: &Task, tags: Option<&[String]>) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn delete_task(&mut self, id: TaskId) -> RepoResult<()>;
    /// Counts tasks, optionally restricted to one completion state.
    fn count_tasks(&self, completed: Option<bool>) -> RepoResult<u64>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["tasks", "tags", "task_tags"])?;
        Ok(Self { conn })
    }

    fn task_from_row(&self, row: &Row<'_>) -> RepoResult<Task> {
        let id_text: String = row.get("id")?;
        let id = parse_uuid(&id_text, "tasks.id")?;
        let priority_text: String = row.get("priority")?;
        let priority = priority_text.parse::<TaskPriority>().map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid priority `{priority_text}` in tasks.priority"
            ))
        })?;

        let task = Task {
            id,
            title: row.get("title")?,
            description: row.get("description")?,
            completed: parse_bool(row.get("completed")?, "tasks.completed")?,
            priority,
            due_date: row.get("due_date")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            tags: load_tags(self.conn, TagOwner::Task, &id_text)?,
        };
        task.validate()
            .map_err(|err| RepoError::InvalidData(format!("task {id}: {err}")))?;
        Ok(task)
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&mut self, task: &Task, tags: &[String]) -> RepoResult<TaskId> {
        task.validate()?;

        let id_text = task.id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            &format!(
                "INSERT INTO tasks (
                    id,
                    title,
                    description,
                    completed,
                    priority,
                    due_date,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, {NOW_EPOCH_MS_SQL}, {NOW_EPOCH_MS_SQL});"
            ),
            params![
                id_text.as_str(),
                task.title.as_str(),
                task.description.as_str(),
                bool_to_int(task.completed),
                task.priority.as_str(),
                task.due_date,
            ],
        )?;
        replace_tags(&tx, TagOwner::Task, id_text.as_str(), tags)?;
        tx.commit()?;

        Ok(task.id)
    }

    fn update_task(&mut self, task: &Task, tags: Option<&[String]>) -> RepoResult<()> {
        task.validate()?;

        let id_text = task.id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            &format!(
                "UPDATE tasks
                 SET
                    title = ?2,
                    description = ?3,
                    completed = ?4,
                    priority = ?5,
                    due_date = ?6,
                    updated_at = {NOW_EPOCH_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![
                id_text.as_str(),
                task.title.as_str(),
                task.description.as_str(),
                bool_to_int(task.completed),
                task.priority.as_str(),
                task.due_date,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(task.id));
        }

        if let Some(tags) = tags {
            replace_tags(&tx, TagOwner::Task, id_text.as_str(), tags)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(self.task_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(completed) = query.completed {
            sql.push_str(" AND completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }
        if let Some(priority) = query.priority {
            sql.push_str(" AND priority = ?");
            bind_values.push(Value::Text(priority.as_str().to_string()));
        }
        if let Some(tag) = query.tag.as_ref() {
            sql.push_str(
                " AND EXISTS (
                    SELECT 1
                    FROM task_tags tt
                    INNER JOIN tags t ON t.id = tt.tag_id
                    WHERE tt.task_id = tasks.id
                      AND t.name = ? COLLATE NOCASE
                )",
            );
            bind_values.push(Value::Text(tag.clone()));
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(self.task_from_row(row)?);
        }
        Ok(tasks)
    }

    fn delete_task(&mut self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn count_tasks(&self, completed: Option<bool>) -> RepoResult<u64> {
        let count: i64 = match completed {
            Some(value) => self.conn.query_row(
                "SELECT COUNT(*) FROM tasks WHERE completed = ?1;",
                [bool_to_int(value)],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))?,
        };
        Ok(count.max(0) as u64)
    }
}
