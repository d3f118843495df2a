use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};
use thiserror::Error;

/// Identifier of a task (positive integer assigned by the store).
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TaskId(i64);

impl TaskId {
    /// Wrap a raw store identifier. Returns `None` unless `raw` is positive.
    #[must_use]
    pub const fn new(raw: i64) -> Option<Self> {
        if raw > 0 { Some(Self(raw)) } else { None }
    }

    /// Raw integer value as stored in the database.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Errors produced while parsing a [`TaskId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTaskIdError {
    /// Input is not an integer.
    #[error("task id must be an integer: {0}")]
    NotANumber(#[from] ParseIntError),
    /// Input is zero or negative.
    #[error("task id must be positive, got {0}")]
    NotPositive(i64),
}

impl TryFrom<i64> for TaskId {
    type Error = ParseTaskIdError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or(ParseTaskIdError::NotPositive(raw))
    }
}

impl From<TaskId> for i64 {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = ParseTaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i64 = s.trim().parse()?;
        Self::try_from(raw)
    }
}
