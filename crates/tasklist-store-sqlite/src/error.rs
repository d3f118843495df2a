//! Error types for tasklist store operations.

use thiserror::Error;

/// Errors that can occur during `SqliteStore` operations.
#[derive(Error, Debug)]
pub enum SqliteStoreError {
    /// SQLite returned an error.
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row could not be turned into a task.
    #[error("Invalid row for task {id}: {reason}")]
    InvalidRow {
        /// Row identifier.
        id: i64,
        /// What was wrong with it.
        reason: String,
    },

    /// The database was written by a newer schema.
    #[error("Database schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema {
        /// Version recorded in the file.
        found: i64,
        /// Highest version this build understands.
        supported: i64,
    },
}
