//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record (identifier, text, completion flag,
//!   creation timestamp).
//! - Provide constructors for the create path and for rows read back from
//!   storage.
//!
//! # Invariants
//! - `id` is assigned by storage and is `None` until the task is persisted.
//! - `created_at` is set once at construction and never rewritten.
//! - `text` is never blank after trimming.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned task identifier.
pub type TaskId = i64;

/// Persisted task entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// `None` until the storage layer assigns one.
    pub id: Option<TaskId>,
    /// Free-form task content.
    pub text: String,
    pub completed: bool,
    /// UTC creation time, stored with millisecond precision.
    pub created_at: DateTime<Utc>,
}

/// Domain validation failures for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    BlankText,
    NonPositiveId(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankText => write!(f, "task text must not be blank"),
            Self::NonPositiveId(id) => write!(f, "task id must be positive, got {id}"),
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Creates an unpersisted, open task stamped with the current time.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            completed: false,
            created_at: now_millis(),
        }
    }

    /// Rebuilds a persisted task from stored parts.
    pub fn from_parts(
        id: TaskId,
        text: impl Into<String>,
        completed: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            text: text.into(),
            completed,
            created_at,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Checks domain invariants before the task reaches storage.
    ///
    /// # Errors
    /// - `BlankText` when `text` is empty after trimming.
    /// - `NonPositiveId` when an assigned id is zero or negative.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::BlankText);
        }
        match self.id {
            Some(id) if id <= 0 => Err(TaskValidationError::NonPositiveId(id)),
            _ => Ok(()),
        }
    }
}

/// Current UTC time truncated to the millisecond precision used by storage.
pub(crate) fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
