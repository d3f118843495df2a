//! Domain types and the pure task list view-model.

/// Title ordering used by the view-model.
pub mod collation;
/// Calendar date parsing and formatting.
pub mod dates;
/// Field validation for the task editor.
pub mod editor;
/// Identifier types.
pub mod id;
/// Page-link window selection.
pub mod pagination;
/// Task priority levels.
pub mod priority;
/// Case-insensitive search matching.
pub mod text_matcher;
/// Filtering, sorting and pagination over a task snapshot.
pub mod view;

pub use crate::editor::{Submission, TaskFields, TaskFormData, ValidationError};
pub use crate::id::{ParseTaskIdError, TaskId};
pub use crate::pagination::page_window;
pub use crate::priority::Priority;
pub use crate::view::{
    PageRequest, PageRequestError, PriorityFilter, SortDirection, SortField, StatusFilter,
    TaskCounts, TaskPage, ViewParams, compute_view,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Date, OffsetDateTime};

/// A persisted to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Short human-readable title.
    pub title: String,
    /// Free-form description (empty when absent).
    #[serde(default)]
    pub description: String,
    /// Priority level.
    pub priority: Priority,
    /// Day the task is due.
    #[serde(with = "dates::serde_date")]
    pub due_date: Date,
    /// `true` once the task has been completed.
    pub status: bool,
    /// Soft-deletion timestamp.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
    /// Creation timestamp maintained by the store.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last modification timestamp maintained by the store.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Task {
    /// Whether the task carries a soft-deletion marker.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Human label for the completion flag.
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        if self.status { "Completed" } else { "Pending" }
    }
}

/// Error returned when a user-supplied token does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {token}")]
pub struct ParseEnumError {
    /// Name of the value being parsed (e.g. `priority`).
    pub kind: &'static str,
    /// Offending input.
    pub token: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, token: &str) -> Self {
        Self {
            kind,
            token: token.to_owned(),
        }
    }
}

/// Normalize a user token for enum parsing (`In-Progress ` -> `in_progress`).
pub(crate) fn normalize_token(token: &str) -> String {
    token.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    fn sample() -> Task {
        Task {
            id: TaskId::new(7).unwrap_or_else(|| panic!("positive id")),
            title: "Buy milk".into(),
            description: String::new(),
            priority: Priority::High,
            due_date: date!(2024 - 01 - 05),
            status: false,
            deleted_at: None,
            created_at: datetime!(2024-01-01 08:00 UTC),
            updated_at: datetime!(2024-01-02 09:30 UTC),
        }
    }

    #[test]
    fn task_serializes_with_wire_names() {
        let json = serde_json::to_value(sample()).unwrap_or_else(|err| panic!("serialize: {err}"));
        assert_eq!(json["id"], 7);
        assert_eq!(json["priority"], "HIGH");
        assert_eq!(json["due_date"], "2024-01-05");
        assert_eq!(json["deleted_at"], serde_json::Value::Null);
        assert_eq!(json["created_at"], "2024-01-01T08:00:00Z");
    }

    #[test]
    fn task_deserializes_without_description() {
        let raw = r#"{
            "id": 3,
            "title": "Call bank",
            "priority": "LOW",
            "due_date": "2024-01-01",
            "status": true,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(raw).unwrap_or_else(|err| panic!("deserialize: {err}"));
        assert_eq!(task.description, "");
        assert!(!task.is_deleted());
        assert_eq!(task.status_label(), "Completed");
    }

    #[test]
    fn normalize_token_folds_separators() {
        assert_eq!(normalize_token(" Due-Date "), "due_date");
        assert_eq!(normalize_token("due date"), "due_date");
    }
}
