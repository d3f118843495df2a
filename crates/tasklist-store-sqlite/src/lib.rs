//! SQLite-backed task store with soft deletion.

mod error;

pub use error::SqliteStoreError;

use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::time::Duration;
use tasklist_core::dates::{format_date, parse_date};
use tasklist_core::{Priority, Task, TaskFields, TaskId};
use time::OffsetDateTime;
use tracing::{debug, info};

/// Version written to `PRAGMA user_version` once the schema is installed.
pub const SCHEMA_VERSION: i64 = 1;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS tasks (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  task TEXT NOT NULL,
  description TEXT NOT NULL DEFAULT '',
  priority TEXT NOT NULL CHECK (priority IN ('LOW', 'MEDIUM', 'HIGH')),
  due_date TEXT NOT NULL,
  status INTEGER NOT NULL DEFAULT 0,
  deleted_at INTEGER,
  created_at INTEGER NOT NULL,
  updated_at INTEGER NOT NULL,
  CHECK (updated_at >= created_at)
);

CREATE INDEX IF NOT EXISTS idx_tasks_active
  ON tasks(created_at DESC, id DESC)
  WHERE deleted_at IS NULL;
";

const SELECT_ACTIVE: &str = "SELECT id, task, description, priority, due_date, status, \
     deleted_at, created_at, updated_at \
     FROM tasks WHERE deleted_at IS NULL \
     ORDER BY created_at DESC, id DESC";

const SELECT_ONE: &str = "SELECT id, task, description, priority, due_date, status, \
     deleted_at, created_at, updated_at \
     FROM tasks WHERE id = ?1 AND deleted_at IS NULL";

const INSERT_TASK: &str = "INSERT INTO tasks \
     (task, description, priority, due_date, status, created_at, updated_at) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) \
     RETURNING id, task, description, priority, due_date, status, \
     deleted_at, created_at, updated_at";

const UPDATE_TASK: &str = "UPDATE tasks \
     SET task = ?1, description = ?2, priority = ?3, due_date = ?4, status = ?5, \
     updated_at = MAX(?6, updated_at) \
     WHERE id = ?7 AND deleted_at IS NULL \
     RETURNING id, task, description, priority, due_date, status, \
     deleted_at, created_at, updated_at";

const SOFT_DELETE_TASK: &str = "UPDATE tasks \
     SET deleted_at = MAX(?1, updated_at), updated_at = MAX(?1, updated_at) \
     WHERE id = ?2 AND deleted_at IS NULL \
     RETURNING id, task, description, priority, due_date, status, \
     deleted_at, created_at, updated_at";

/// Task storage backed by a single SQLite database file.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and install the schema.
    ///
    /// # Errors
    /// Returns an error if the parent directory cannot be created, the file
    /// cannot be opened, or it was written by a newer schema version.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteStoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let store = Self { conn };
        store.migrate()?;
        debug!(path = %path.display(), "Opened task database");
        Ok(store)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, SqliteStoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), SqliteStoreError> {
        let found: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        if found > SCHEMA_VERSION {
            return Err(SqliteStoreError::UnsupportedSchema {
                found,
                supported: SCHEMA_VERSION,
            });
        }
        if found < SCHEMA_VERSION {
            self.conn.execute_batch(SCHEMA)?;
            self.conn
                .pragma_update(None, "user_version", SCHEMA_VERSION)?;
            info!(from = found, to = SCHEMA_VERSION, "Installed task schema");
        }
        Ok(())
    }

    /// All tasks that are not soft-deleted, newest first.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row is malformed.
    pub fn list_active_tasks(&self) -> Result<Vec<Task>, SqliteStoreError> {
        let mut stmt = self.conn.prepare_cached(SELECT_ACTIVE)?;
        let rows = stmt
            .query_map([], TaskRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        let tasks = rows
            .into_iter()
            .map(TaskRow::into_task)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = tasks.len(), "Loaded active tasks");
        Ok(tasks)
    }

    /// Fetch a single active task.
    ///
    /// Soft-deleted tasks are reported as absent.
    ///
    /// # Errors
    /// Returns an error if the query fails or the row is malformed.
    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>, SqliteStoreError> {
        self.conn
            .query_row(SELECT_ONE, params![id.get()], TaskRow::from_row)
            .optional()?
            .map(TaskRow::into_task)
            .transpose()
    }

    /// Insert a new task and return it with its assigned id and timestamps.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn create_task(&self, fields: &TaskFields) -> Result<Task, SqliteStoreError> {
        let now = now_ms();
        let row = self.conn.query_row(
            INSERT_TASK,
            params![
                fields.title,
                fields.description,
                fields.priority.as_str(),
                format_date(fields.due_date),
                fields.status,
                now,
            ],
            TaskRow::from_row,
        )?;
        let task = row.into_task()?;
        info!(task = %task.id, priority = %task.priority, "Created task");
        Ok(task)
    }

    /// Overwrite the editable fields of an active task.
    ///
    /// Returns `None` when the task does not exist or has been soft-deleted.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub fn update_task(
        &self,
        id: TaskId,
        fields: &TaskFields,
    ) -> Result<Option<Task>, SqliteStoreError> {
        let now = now_ms();
        let row = self
            .conn
            .query_row(
                UPDATE_TASK,
                params![
                    fields.title,
                    fields.description,
                    fields.priority.as_str(),
                    format_date(fields.due_date),
                    fields.status,
                    now,
                    id.get(),
                ],
                TaskRow::from_row,
            )
            .optional()?;
        let Some(row) = row else {
            debug!(task = %id, "Update skipped for missing task");
            return Ok(None);
        };
        let task = row.into_task()?;
        info!(task = %task.id, status = task.status, "Updated task");
        Ok(Some(task))
    }

    /// Mark a task as deleted without removing its row.
    ///
    /// Returns `None` when the task does not exist or is already deleted.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub fn soft_delete_task(&self, id: TaskId) -> Result<Option<Task>, SqliteStoreError> {
        let row = self
            .conn
            .query_row(SOFT_DELETE_TASK, params![now_ms(), id.get()], TaskRow::from_row)
            .optional()?;
        let Some(row) = row else {
            debug!(task = %id, "Delete skipped for missing task");
            return Ok(None);
        };
        let task = row.into_task()?;
        info!(task = %task.id, "Soft-deleted task");
        Ok(Some(task))
    }
}

/// Column values exactly as SQLite returns them.
struct TaskRow {
    id: i64,
    title: String,
    description: String,
    priority: String,
    due_date: String,
    status: bool,
    deleted_at: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl TaskRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            priority: row.get(3)?,
            due_date: row.get(4)?,
            status: row.get(5)?,
            deleted_at: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_task(self) -> Result<Task, SqliteStoreError> {
        let raw_id = self.id;
        let invalid = |reason: String| SqliteStoreError::InvalidRow { id: raw_id, reason };

        let id = TaskId::new(raw_id).ok_or_else(|| invalid("non-positive id".into()))?;
        let priority: Priority = self
            .priority
            .parse()
            .map_err(|err| invalid(format!("{err}")))?;
        let due_date =
            parse_date(&self.due_date).map_err(|err| invalid(format!("due_date: {err}")))?;
        let deleted_at = self
            .deleted_at
            .map(from_ms)
            .transpose()
            .map_err(|err| invalid(format!("deleted_at: {err}")))?;
        let created_at =
            from_ms(self.created_at).map_err(|err| invalid(format!("created_at: {err}")))?;
        let updated_at =
            from_ms(self.updated_at).map_err(|err| invalid(format!("updated_at: {err}")))?;

        Ok(Task {
            id,
            title: self.title,
            description: self.description,
            priority,
            due_date,
            status: self.status,
            deleted_at,
            created_at,
            updated_at,
        })
    }
}

fn now_ms() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(nanos).unwrap_or(i64::MAX)
}

fn from_ms(ms: i64) -> Result<OffsetDateTime, time::error::ComponentRange> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
}
