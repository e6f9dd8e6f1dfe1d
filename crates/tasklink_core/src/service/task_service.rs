//! Task use-case service.
//!
//! # Responsibility
//! - Expose create/retrieve/update/partial-update/destroy/list over task
//!   representations.
//! - Translate validation, resolution and storage failures into one error
//!   type with stable codes.
//!
//! # Invariants
//! - Inbound data is validated in full before any write.
//! - Responses are built from the stored row, not from the request.
//! - Log lines carry ids and codes only, never task text.

use crate::model::task::TaskId;
use crate::repo::task_repo::{RepoError, TaskListQuery, TaskRepository};
use crate::representation::{
    ReferenceResolver, ResolutionError, TaskMapper, TaskRepresentation, ValidationError,
    WriteMode,
};
use log::{info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Largest page size served when no other limit is configured.
pub const DEFAULT_LIST_LIMIT_MAX: u32 = 100;

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Inbound data failed field constraints.
    Validation(ValidationError),
    /// The response reference address could not be computed.
    Resolution(ResolutionError),
    /// Target task does not exist.
    NotFound(TaskId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but read-back disagrees.
    InconsistentState(&'static str),
}

impl TaskServiceError {
    /// Stable machine-readable code for callers mapping errors to responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::Resolution(_) => "resolution_failed",
            Self::NotFound(_) => "task_not_found",
            Self::Repo(_) | Self::InconsistentState(_) => "storage_failed",
        }
    }

    /// Per-field details when this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Resolution(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Resolution(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NotFound(_) | Self::InconsistentState(_) => None,
        }
    }
}

impl From<ValidationError> for TaskServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ResolutionError> for TaskServiceError {
    fn from(value: ResolutionError) -> Self {
        Self::Resolution(value)
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Task service facade over a repository and a representation mapper.
pub struct TaskService<R: TaskRepository, V: ReferenceResolver> {
    repo: R,
    mapper: TaskMapper<V>,
    list_limit_max: u32,
}

impl<R: TaskRepository, V: ReferenceResolver> TaskService<R, V> {
    pub fn new(repo: R, resolver: V) -> Self {
        Self {
            repo,
            mapper: TaskMapper::new(resolver),
            list_limit_max: DEFAULT_LIST_LIMIT_MAX,
        }
    }

    /// Caps list page size; `0` is treated as `1`.
    pub fn with_list_limit_max(mut self, limit_max: u32) -> Self {
        self.list_limit_max = limit_max.max(1);
        self
    }

    pub fn mapper(&self) -> &TaskMapper<V> {
        &self.mapper
    }

    /// Validates `data`, stores a new task and returns its representation.
    pub fn create(&self, data: &Value) -> TaskServiceResult<TaskRepresentation> {
        let task = self
            .mapper
            .deserialize(data, WriteMode::Create)
            .and_then(|changes| changes.into_new_task())
            .inspect_err(|err| log_rejected("create", err))?;

        let id = self.repo.create_task(&task)?;
        let stored = self
            .repo
            .get_task(id)?
            .ok_or(TaskServiceError::InconsistentState(
                "created task not found in read-back",
            ))?;

        info!("event=task_create module=service status=ok id={id}");
        Ok(self.mapper.serialize(&stored)?)
    }

    pub fn retrieve(&self, id: TaskId) -> TaskServiceResult<TaskRepresentation> {
        let task = self
            .repo
            .get_task(id)?
            .ok_or(TaskServiceError::NotFound(id))?;
        Ok(self.mapper.serialize(&task)?)
    }

    /// Full update: `text` is required, `completed` is kept when omitted.
    pub fn update(&self, id: TaskId, data: &Value) -> TaskServiceResult<TaskRepresentation> {
        self.write(id, data, WriteMode::Update)
    }

    /// Partial update: only supplied writable fields change.
    pub fn partial_update(
        &self,
        id: TaskId,
        data: &Value,
    ) -> TaskServiceResult<TaskRepresentation> {
        self.write(id, data, WriteMode::PartialUpdate)
    }

    pub fn destroy(&self, id: TaskId) -> TaskServiceResult<()> {
        self.repo.delete_task(id)?;
        info!("event=task_destroy module=service status=ok id={id}");
        Ok(())
    }

    /// Lists task representations; `limit` is capped at the configured max.
    pub fn list(&self, query: &TaskListQuery) -> TaskServiceResult<Vec<TaskRepresentation>> {
        let capped = TaskListQuery {
            limit: Some(
                query
                    .limit
                    .map_or(self.list_limit_max, |limit| limit.min(self.list_limit_max)),
            ),
            ..query.clone()
        };
        let tasks = self.repo.list_tasks(&capped)?;
        Ok(self.mapper.serialize_many(&tasks)?)
    }

    fn write(
        &self,
        id: TaskId,
        data: &Value,
        mode: WriteMode,
    ) -> TaskServiceResult<TaskRepresentation> {
        let mut task = self
            .repo
            .get_task(id)?
            .ok_or(TaskServiceError::NotFound(id))?;
        let changes = self
            .mapper
            .deserialize(data, mode)
            .inspect_err(|err| log_rejected("update", err))?;

        changes.apply_to(&mut task);
        self.repo.update_task(&task)?;

        let stored = self
            .repo
            .get_task(id)?
            .ok_or(TaskServiceError::InconsistentState(
                "updated task not found in read-back",
            ))?;
        info!(
            "event=task_update module=service status=ok id={id} partial={}",
            mode == WriteMode::PartialUpdate
        );
        Ok(self.mapper.serialize(&stored)?)
    }
}

fn log_rejected(operation: &str, err: &ValidationError) {
    warn!(
        "event=task_{operation} module=service status=error error_code=validation_failed fields={}",
        err.fields().collect::<Vec<_>>().join(",")
    );
}

#[cfg(test)]
mod tests {
    use super::TaskServiceError;
    use crate::repo::task_repo::RepoError;
    use crate::representation::{ResolutionError, ValidationError};

    #[test]
    fn error_codes_are_stable() {
        let validation = TaskServiceError::from(ValidationError::single("text", "bad"));
        assert_eq!(validation.code(), "validation_failed");
        assert!(validation.validation().is_some());

        let resolution = TaskServiceError::from(ResolutionError::NotPersisted);
        assert_eq!(resolution.code(), "resolution_failed");

        let not_found = TaskServiceError::from(RepoError::NotFound(4));
        assert!(matches!(not_found, TaskServiceError::NotFound(4)));
        assert_eq!(not_found.code(), "task_not_found");

        let storage = TaskServiceError::from(RepoError::NotPersisted);
        assert_eq!(storage.code(), "storage_failed");
    }
}
