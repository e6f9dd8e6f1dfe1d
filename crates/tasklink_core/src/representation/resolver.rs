//! Reference address resolution for task representations.
//!
//! # Responsibility
//! - Turn a task identifier into the navigable address exposed as `url`.
//! - Keep the mapper independent of any concrete routing mechanism.
//!
//! # Invariants
//! - An unpersisted task never resolves.
//! - `RouteResolver` templates contain exactly one `{id}` placeholder.

use crate::model::task::TaskId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Route used when no template is configured.
pub const DEFAULT_ROUTE_TEMPLATE: &str = "/tasks/{id}/";

const ID_PLACEHOLDER: &str = "{id}";

/// The reference address for a task could not be computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The task has no identifier yet.
    NotPersisted,
    /// The identifier cannot address a stored task.
    InvalidIdentifier(TaskId),
    /// Route template or origin is malformed.
    InvalidRoute(String),
}

impl Display for ResolutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPersisted => write!(
                f,
                "cannot resolve reference address: task has not been persisted"
            ),
            Self::InvalidIdentifier(id) => {
                write!(f, "cannot resolve reference address for task id {id}")
            }
            Self::InvalidRoute(details) => write!(f, "invalid task route: {details}"),
        }
    }
}

impl Error for ResolutionError {}

/// Computes the reference address for a task identifier.
///
/// Closures of shape `Fn(TaskId) -> Result<String, ResolutionError>` are
/// resolvers too; a missing identifier is rejected before they are called.
pub trait ReferenceResolver {
    fn resolve(&self, id: Option<TaskId>) -> Result<String, ResolutionError>;
}

impl<F> ReferenceResolver for F
where
    F: Fn(TaskId) -> Result<String, ResolutionError>,
{
    fn resolve(&self, id: Option<TaskId>) -> Result<String, ResolutionError> {
        let id = id.ok_or(ResolutionError::NotPersisted)?;
        self(id)
    }
}

/// Template-based resolver with an optional request origin.
///
/// Without an origin the address is the bare path (`/tasks/7/`); with one it
/// is absolute (`https://api.example.com/tasks/7/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteResolver {
    origin: Option<String>,
    prefix: String,
    suffix: String,
}

impl RouteResolver {
    /// Builds a resolver from a template such as `/tasks/{id}/`.
    ///
    /// # Errors
    /// - `InvalidRoute` when the template is not rooted at `/` or does not
    ///   contain exactly one `{id}` placeholder.
    pub fn new(template: &str) -> Result<Self, ResolutionError> {
        let template = template.trim();
        if !template.starts_with('/') {
            return Err(ResolutionError::InvalidRoute(format!(
                "template `{template}` must start with `/`"
            )));
        }
        if template.matches(ID_PLACEHOLDER).count() != 1 {
            return Err(ResolutionError::InvalidRoute(format!(
                "template `{template}` must contain exactly one `{ID_PLACEHOLDER}`"
            )));
        }
        let (prefix, suffix) = template
            .split_once(ID_PLACEHOLDER)
            .ok_or_else(|| ResolutionError::InvalidRoute(template.to_string()))?;

        Ok(Self {
            origin: None,
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Makes resolved addresses absolute under `origin` (`scheme://host[:port]`).
    ///
    /// # Errors
    /// - `InvalidRoute` when the scheme is not http(s), the host is empty, or
    ///   the origin carries a path or whitespace.
    pub fn with_origin(mut self, origin: &str) -> Result<Self, ResolutionError> {
        let origin = origin.trim().trim_end_matches('/');
        let host = origin
            .strip_prefix("https://")
            .or_else(|| origin.strip_prefix("http://"))
            .ok_or_else(|| {
                ResolutionError::InvalidRoute(format!("origin `{origin}` must be http(s)"))
            })?;
        if host.is_empty() || host.contains('/') || host.contains(char::is_whitespace) {
            return Err(ResolutionError::InvalidRoute(format!(
                "origin `{origin}` must be `scheme://host[:port]`"
            )));
        }
        self.origin = Some(origin.to_string());
        Ok(self)
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Resolves the address for a known identifier.
    pub fn reverse(&self, id: TaskId) -> Result<String, ResolutionError> {
        if id <= 0 {
            return Err(ResolutionError::InvalidIdentifier(id));
        }
        let origin = self.origin.as_deref().unwrap_or("");
        Ok(format!("{origin}{}{id}{}", self.prefix, self.suffix))
    }
}

impl Default for RouteResolver {
    fn default() -> Self {
        Self {
            origin: None,
            prefix: "/tasks/".to_string(),
            suffix: "/".to_string(),
        }
    }
}

impl ReferenceResolver for RouteResolver {
    fn resolve(&self, id: Option<TaskId>) -> Result<String, ResolutionError> {
        self.reverse(id.ok_or(ResolutionError::NotPersisted)?)
    }
}
