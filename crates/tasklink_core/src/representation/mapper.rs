//! Task Representation Mapper.
//!
//! # Responsibility
//! - Serialize a `Task` into its hyperlinked, allowlisted representation.
//! - Validate inbound representations into writable field values.
//!
//! # Invariants
//! - Output carries exactly the `TASK_FIELDS` allowlist, in table order.
//! - Serialization never mutates the task.
//! - Read-only and unknown inbound keys never reach a task entity.
//! - Deserialization yields every validated field or fails as a whole.

use super::error::{ValidationError, NON_FIELD_ERRORS};
use super::fields::{lookup, writable_fields, MSG_REQUIRED, TASK_FIELDS};
use super::resolver::{ReferenceResolver, ResolutionError};
use crate::model::task::{now_millis, Task, TaskId};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Externally exposed view of a task.
///
/// Field declaration order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRepresentation {
    /// Reference address derived from `id`.
    pub url: String,
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    /// RFC 3339 UTC timestamp with a `Z` suffix.
    pub created_at: String,
}

impl TaskRepresentation {
    /// Renders the representation as an ordered JSON object built from the
    /// field table.
    pub fn to_value(&self) -> Value {
        let mut object = Map::with_capacity(TASK_FIELDS.len());
        for field in &TASK_FIELDS {
            object.insert(field.name.to_string(), field.read(self));
        }
        Value::Object(object)
    }
}

/// How inbound data is going to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// New task: required fields must be present, defaults are applied.
    Create,
    /// Full replacement: required fields must be present, no defaults.
    Update,
    /// Only supplied fields are validated and returned.
    PartialUpdate,
}

/// Validated writable field values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }

    /// Builds an unpersisted task from create-mode changes.
    ///
    /// Identifier and creation time come from the system, never from the
    /// changes.
    ///
    /// # Errors
    /// - `ValidationError` on `text` when no text was supplied.
    pub fn into_new_task(self) -> Result<Task, ValidationError> {
        let text = self
            .text
            .ok_or_else(|| ValidationError::single("text", MSG_REQUIRED))?;
        Ok(Task {
            id: None,
            text,
            completed: self.completed.unwrap_or(false),
            created_at: now_millis(),
        })
    }

    /// Overwrites the writable fields present in these changes.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(text) = &self.text {
            task.text.clone_from(text);
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

/// Bidirectional mapper between tasks and their representation.
#[derive(Debug, Clone)]
pub struct TaskMapper<R> {
    resolver: R,
}

impl<R: ReferenceResolver> TaskMapper<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Produces the representation of one task.
    ///
    /// # Errors
    /// - `ResolutionError` when the resolver cannot address the task, e.g.
    ///   because it has no identifier yet.
    pub fn serialize(&self, task: &Task) -> Result<TaskRepresentation, ResolutionError> {
        let url = self.resolver.resolve(task.id).inspect_err(|err| {
            warn!(
                "event=task_serialize module=representation status=error error_code=resolution_failed error={err}"
            );
        })?;
        let id = task.id.ok_or(ResolutionError::NotPersisted)?;

        Ok(TaskRepresentation {
            url,
            id,
            text: task.text.clone(),
            completed: task.completed,
            created_at: format_timestamp(&task.created_at),
        })
    }

    /// Serializes a list of tasks, failing on the first unresolvable one.
    pub fn serialize_many(
        &self,
        tasks: &[Task],
    ) -> Result<Vec<TaskRepresentation>, ResolutionError> {
        tasks.iter().map(|task| self.serialize(task)).collect()
    }

    /// Validates inbound data for the given write mode.
    ///
    /// # Errors
    /// - `ValidationError` listing every field problem, or a
    ///   `non_field_errors` entry when `data` is not a JSON object.
    pub fn deserialize(
        &self,
        data: &Value,
        mode: WriteMode,
    ) -> Result<TaskChanges, ValidationError> {
        let Some(object) = data.as_object() else {
            return Err(ValidationError::single(
                NON_FIELD_ERRORS,
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    json_kind(data)
                ),
            ));
        };

        let mut changes = TaskChanges::default();
        let mut errors = ValidationError::default();

        for field in writable_fields() {
            let Some(writer) = field.writer() else {
                continue;
            };
            match object.get(field.name) {
                Some(value) => {
                    if let Err(message) = writer.assign(value, &mut changes) {
                        errors.push(field.name, message);
                    }
                }
                None if mode == WriteMode::PartialUpdate => {}
                None if writer.required => errors.push(field.name, MSG_REQUIRED),
                None if mode == WriteMode::Create => {
                    writer.apply_default(&mut changes);
                }
                None => {}
            }
        }

        let ignored = object
            .keys()
            .filter(|key| lookup(key).map_or(true, |field| field.is_read_only()))
            .count();
        if ignored > 0 {
            debug!("event=task_deserialize module=representation status=ok ignored_keys={ignored}");
        }

        if errors.is_empty() {
            Ok(changes)
        } else {
            debug!(
                "event=task_deserialize module=representation status=error error_code=validation_failed fields={}",
                errors.fields().collect::<Vec<_>>().join(",")
            );
            Err(errors)
        }
    }
}

/// Formats a timestamp as RFC 3339 UTC, `Z` suffixed, with fractional
/// seconds only when present.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, TaskChanges, TaskMapper, WriteMode};
    use crate::model::task::Task;
    use crate::representation::resolver::RouteResolver;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn mapper() -> TaskMapper<RouteResolver> {
        TaskMapper::new(RouteResolver::default())
    }

    #[test]
    fn timestamps_drop_empty_fraction() {
        let whole = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(&whole), "2024-01-01T00:00:00Z");

        let millis = Utc.timestamp_millis_opt(1_704_067_200_250).unwrap();
        assert_eq!(format_timestamp(&millis), "2024-01-01T00:00:00.250Z");
    }

    #[test]
    fn to_value_matches_derived_serialization() {
        let created_at = Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 0).unwrap();
        let task = Task::from_parts(2, "file taxes", true, created_at);
        let repr = mapper().serialize(&task).unwrap();

        assert_eq!(repr.to_value(), serde_json::to_value(&repr).unwrap());
        assert_eq!(
            serde_json::to_string(&repr).unwrap(),
            r#"{"url":"/tasks/2/","id":2,"text":"file taxes","completed":true,"created_at":"2024-03-09T08:30:00Z"}"#
        );
    }

    #[test]
    fn update_mode_requires_text_without_defaulting_completed() {
        let changes = mapper()
            .deserialize(&json!({"text": "rename"}), WriteMode::Update)
            .unwrap();
        assert_eq!(
            changes,
            TaskChanges {
                text: Some("rename".to_string()),
                completed: None,
            }
        );

        let err = mapper()
            .deserialize(&json!({"completed": true}), WriteMode::Update)
            .unwrap_err();
        assert_eq!(err.messages("text"), ["This field is required."]);
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = mapper()
            .deserialize(&json!(["text"]), WriteMode::Create)
            .unwrap_err();
        assert_eq!(
            err.messages("non_field_errors"),
            ["Invalid data. Expected a dictionary, but got array."]
        );
    }

    #[test]
    fn into_new_task_requires_text() {
        let err = TaskChanges::default().into_new_task().unwrap_err();
        assert!(err.contains("text"));
    }
}
