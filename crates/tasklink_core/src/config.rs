//! Runtime configuration for task storage, routing and logging.
//!
//! Sources, lowest to highest precedence: built-in defaults, a JSON config
//! file, then `TASKLINK_*` environment variables.

use crate::logging::{default_log_level, LogSettings};
use crate::representation::{ResolutionError, RouteResolver, DEFAULT_ROUTE_TEMPLATE};
use crate::service::task_service::DEFAULT_LIST_LIMIT_MAX;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE_NAME: &str = "tasklink.sqlite3";

pub const ENV_DB_PATH: &str = "TASKLINK_DB_PATH";
pub const ENV_ORIGIN: &str = "TASKLINK_ORIGIN";
pub const ENV_ROUTE_TEMPLATE: &str = "TASKLINK_ROUTE_TEMPLATE";
pub const ENV_LOG_LEVEL: &str = "TASKLINK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TASKLINK_LOG_DIR";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Route(ResolutionError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Route(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Route(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<ResolutionError> for ConfigError {
    fn from(value: ResolutionError) -> Self {
        Self::Route(value)
    }
}

/// Effective runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskLinkConfig {
    pub db_path: PathBuf,
    /// `scheme://host[:port]` prefixed to task addresses when set.
    pub origin: Option<String>,
    pub route_template: String,
    pub log_level: String,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub list_limit_max: u32,
}

impl Default for TaskLinkConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            origin: None,
            route_template: DEFAULT_ROUTE_TEMPLATE.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
            list_limit_max: DEFAULT_LIST_LIMIT_MAX,
        }
    }
}

impl TaskLinkConfig {
    /// Parses a JSON document; omitted keys keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Overrides fields from the process environment.
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Overrides fields from `lookup`; empty values are ignored.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = get(ENV_DB_PATH) {
            self.db_path = PathBuf::from(value);
        }
        if let Some(value) = get(ENV_ORIGIN) {
            self.origin = Some(value);
        }
        if let Some(value) = get(ENV_ROUTE_TEMPLATE) {
            self.route_template = value;
        }
        if let Some(value) = get(ENV_LOG_LEVEL) {
            self.log_level = value;
        }
        if let Some(value) = get(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(value));
        }
        self
    }

    /// Builds the reference resolver for task addresses.
    pub fn resolver(&self) -> Result<RouteResolver, ConfigError> {
        let resolver = RouteResolver::new(&self.route_template)?;
        Ok(match &self.origin {
            Some(origin) => resolver.with_origin(origin)?,
            None => resolver,
        })
    }

    /// Logger settings, or `None` when no log directory is configured.
    pub fn log_settings(&self) -> Option<LogSettings> {
        self.log_dir
            .as_ref()
            .map(|dir| LogSettings::new(self.log_level.clone(), dir.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, TaskLinkConfig, ENV_LOG_DIR, ENV_ORIGIN};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            TaskLinkConfig::from_json_str(r#"{"origin": "http://testserver"}"#).unwrap();
        assert_eq!(config.origin.as_deref(), Some("http://testserver"));
        assert_eq!(config.route_template, "/tasks/{id}/");
        assert_eq!(config.list_limit_max, 100);
        assert!(config.log_settings().is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = TaskLinkConfig::from_json_str(r#"{"colour": "blue"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn overrides_win_and_blank_values_are_ignored() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_ORIGIN, "https://api.example.com"),
            (ENV_LOG_DIR, "   "),
        ]);
        let config = TaskLinkConfig::default()
            .apply_overrides(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(config.origin.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.log_dir, None);
        assert_eq!(
            config.resolver().unwrap().reverse(5).unwrap(),
            "https://api.example.com/tasks/5/"
        );
    }

    #[test]
    fn bad_route_template_surfaces_as_config_error() {
        let config = TaskLinkConfig {
            route_template: "/tasks/".to_string(),
            ..TaskLinkConfig::default()
        };
        assert!(matches!(config.resolver(), Err(ConfigError::Route(_))));
        assert_eq!(
            TaskLinkConfig::default().db_path,
            PathBuf::from("tasklink.sqlite3")
        );
    }
}
