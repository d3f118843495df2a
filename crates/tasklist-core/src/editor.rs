//! Validation and normalization of task editor input.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Date;

use crate::{Priority, Task, TaskId};

/// Minimum title length in characters.
pub const TITLE_MIN_CHARS: usize = 2;
/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 255;

/// Reasons a form submission is refused before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Title shorter than [`TITLE_MIN_CHARS`].
    #[error("Task must be at least {min} characters.")]
    TitleTooShort {
        /// Required minimum.
        min: usize,
        /// Length that was submitted.
        actual: usize,
    },
    /// Title longer than [`TITLE_MAX_CHARS`].
    #[error("Task must be less than {max} characters")]
    TitleTooLong {
        /// Allowed maximum.
        max: usize,
        /// Length that was submitted.
        actual: usize,
    },
    /// No priority was chosen.
    #[error("Task and priority are required")]
    MissingPriority,
    /// No due date was chosen.
    #[error("A due date is required")]
    MissingDueDate,
}

/// Raw editor state, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskFormData {
    /// Present when editing an existing task.
    pub id: Option<TaskId>,
    /// Title text.
    pub title: String,
    /// Description text.
    #[serde(default)]
    pub description: String,
    /// Selected priority.
    pub priority: Option<Priority>,
    /// Selected due date.
    #[serde(default, with = "optional_date")]
    pub due_date: Option<Date>,
    /// Completion flag.
    #[serde(default)]
    pub status: bool,
}

/// Field values that passed validation, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    /// Trimmed title.
    pub title: String,
    /// Trimmed description.
    pub description: String,
    /// Priority level.
    pub priority: Priority,
    /// Due date.
    pub due_date: Date,
    /// Completion flag.
    pub status: bool,
}

/// What a validated form asks the store to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Create a new task.
    Create(TaskFields),
    /// Overwrite the editable fields of an existing task.
    Update(TaskId, TaskFields),
}

impl TaskFormData {
    /// Pre-fill the editor from an existing task.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone(),
            priority: Some(task.priority),
            due_date: Some(task.due_date),
            status: task.status,
        }
    }

    /// Validate the form and decide between create and update.
    ///
    /// Title and description are trimmed before the length check.
    ///
    /// # Errors
    /// Returns the first rule the form violates.
    pub fn validate(self) -> Result<Submission, ValidationError> {
        let title = self.title.trim().to_owned();
        let length = title.chars().count();
        if length < TITLE_MIN_CHARS {
            return Err(ValidationError::TitleTooShort {
                min: TITLE_MIN_CHARS,
                actual: length,
            });
        }
        if length > TITLE_MAX_CHARS {
            return Err(ValidationError::TitleTooLong {
                max: TITLE_MAX_CHARS,
                actual: length,
            });
        }
        let priority = self.priority.ok_or(ValidationError::MissingPriority)?;
        let due_date = self.due_date.ok_or(ValidationError::MissingDueDate)?;

        let fields = TaskFields {
            title,
            description: self.description.trim().to_owned(),
            priority,
            due_date,
            status: self.status,
        };
        Ok(match self.id {
            Some(id) => Submission::Update(id, fields),
            None => Submission::Create(fields),
        })
    }
}

mod optional_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(date: &Option<Date>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => crate::dates::serde_date::serialize(date, s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(d)?
            .map(|raw| crate::dates::parse_date(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
