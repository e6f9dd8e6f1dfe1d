//! Core library for hyperlinked task representations.
//!
//! Maps persisted tasks to the `url, id, text, completed, created_at`
//! representation served by a web API, validates inbound representations,
//! and provides the storage and service layers around that mapping.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod representation;
pub mod service;

pub use config::{ConfigError, TaskLinkConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use repo::task_repo::{
    RepoError, RepoResult, SqliteTaskRepository, TaskListQuery, TaskRepository,
};
pub use representation::{
    ReferenceResolver, ResolutionError, RouteResolver, TaskChanges, TaskMapper,
    TaskRepresentation, ValidationError, WriteMode,
};
pub use service::task_service::{TaskService, TaskServiceError, TaskServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
