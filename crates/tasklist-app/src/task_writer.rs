//! Validated task mutations shared by every front end.

use anyhow::Error;
use tasklist_core::{Submission, Task, TaskFields, TaskFormData, TaskId, ValidationError};
use tasklist_store_sqlite::{SqliteStore, SqliteStoreError};
use tracing::{debug, info};

/// Minimal storage abstraction required by [`TaskWriter`].
pub trait TaskStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<Error>;

    /// Every task that has not been soft-deleted, newest first.
    ///
    /// # Errors
    /// Returns a store-specific error when listing fails.
    fn list_active_tasks(&self) -> Result<Vec<Task>, Self::Error>;

    /// Fetch one active task; soft-deleted tasks are reported as `None`.
    ///
    /// # Errors
    /// Returns a store-specific error when the lookup fails.
    fn get_task(&self, id: TaskId) -> Result<Option<Task>, Self::Error>;

    /// Persist a new task.
    ///
    /// # Errors
    /// Returns a store-specific error when the insert fails.
    fn create_task(&self, fields: &TaskFields) -> Result<Task, Self::Error>;

    /// Overwrite an active task; `None` when it is missing or deleted.
    ///
    /// # Errors
    /// Returns a store-specific error when the update fails.
    fn update_task(&self, id: TaskId, fields: &TaskFields) -> Result<Option<Task>, Self::Error>;

    /// Soft-delete an active task; `None` when it is missing or already deleted.
    ///
    /// # Errors
    /// Returns a store-specific error when the update fails.
    fn soft_delete_task(&self, id: TaskId) -> Result<Option<Task>, Self::Error>;
}

/// Errors surfaced by [`TaskWriter`].
#[derive(thiserror::Error, Debug)]
pub enum TaskWriteError {
    /// The editor form was rejected before reaching the store.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Target task does not exist or has been deleted.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// Backing store returned an error.
    #[error("store error: {0}")]
    Store(#[from] Error),
}

/// Applies validated editor submissions and deletions to a [`TaskStore`].
pub struct TaskWriter<S> {
    store: S,
}

impl<S> TaskWriter<S> {
    /// Construct a new writer.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Expose a reference to the underlying store (read-only operations).
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: TaskStore> TaskWriter<S> {
    fn store_error(err: S::Error) -> TaskWriteError {
        TaskWriteError::Store(err.into())
    }

    /// Validate `form` and create or update the task it describes.
    ///
    /// # Errors
    /// Returns [`TaskWriteError::Validation`] for invalid input,
    /// [`TaskWriteError::NotFound`] when updating a missing task, or a store error.
    pub fn submit(&self, form: TaskFormData) -> Result<Task, TaskWriteError> {
        match form.validate()? {
            Submission::Create(fields) => {
                let task = self.store.create_task(&fields).map_err(Self::store_error)?;
                info!(task = %task.id, "Created task from editor");
                Ok(task)
            }
            Submission::Update(id, fields) => {
                let task = self
                    .store
                    .update_task(id, &fields)
                    .map_err(Self::store_error)?
                    .ok_or(TaskWriteError::NotFound(id))?;
                info!(task = %task.id, status = task.status, "Updated task from editor");
                Ok(task)
            }
        }
    }

    /// Soft-delete a task.
    ///
    /// # Errors
    /// Returns [`TaskWriteError::NotFound`] when the task is missing or already
    /// deleted, or a store error.
    pub fn delete(&self, id: TaskId) -> Result<Task, TaskWriteError> {
        let task = self
            .store
            .soft_delete_task(id)
            .map_err(Self::store_error)?
            .ok_or(TaskWriteError::NotFound(id))?;
        debug!(task = %id, "Deleted task");
        Ok(task)
    }

    /// Load a single active task.
    ///
    /// # Errors
    /// Returns [`TaskWriteError::NotFound`] when the task is missing, or a store error.
    pub fn load(&self, id: TaskId) -> Result<Task, TaskWriteError> {
        self.store
            .get_task(id)
            .map_err(Self::store_error)?
            .ok_or(TaskWriteError::NotFound(id))
    }
}

impl TaskStore for SqliteStore {
    type Error = SqliteStoreError;

    fn list_active_tasks(&self) -> Result<Vec<Task>, Self::Error> {
        Self::list_active_tasks(self)
    }

    fn get_task(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
        Self::get_task(self, id)
    }

    fn create_task(&self, fields: &TaskFields) -> Result<Task, Self::Error> {
        Self::create_task(self, fields)
    }

    fn update_task(&self, id: TaskId, fields: &TaskFields) -> Result<Option<Task>, Self::Error> {
        Self::update_task(self, id, fields)
    }

    fn soft_delete_task(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
        Self::soft_delete_task(self, id)
    }
}
