//! Statically declared field allowlist for task representations.
//!
//! # Responsibility
//! - Declare the exposed fields, their order, and how each is read and
//!   written.
//! - Hold the per-field input rules applied when inbound data is validated.
//!
//! # Invariants
//! - `TASK_FIELDS` is the complete allowlist; nothing outside it is exposed
//!   or accepted.
//! - Table order is wire order.
//! - Only entries with a writer can reach a task entity.

use super::mapper::{TaskChanges, TaskRepresentation};
use serde_json::Value;
use std::fmt::{Debug, Formatter};

pub(crate) const MSG_REQUIRED: &str = "This field is required.";
const MSG_NULL: &str = "This field may not be null.";
const MSG_BLANK: &str = "This field may not be blank.";
const MSG_NOT_STRING: &str = "Not a valid string.";
const MSG_NOT_BOOLEAN: &str = "Must be a valid boolean.";

const TRUE_WORDS: &[&str] = &["true", "t", "yes", "y", "on", "1"];
const FALSE_WORDS: &[&str] = &["false", "f", "no", "n", "off", "0"];

type Reader = fn(&TaskRepresentation) -> Value;
type Assign = fn(&Value, &mut TaskChanges) -> Result<(), &'static str>;

/// Input side of a writable field.
#[derive(Clone, Copy)]
pub struct FieldWriter {
    /// Must be present on create and full update.
    pub required: bool,
    assign: Assign,
    default: Option<fn(&mut TaskChanges)>,
}

/// One allowlisted field: name, accessor and optional validator.
#[derive(Clone, Copy)]
pub struct TaskField {
    pub name: &'static str,
    read: Reader,
    writer: Option<FieldWriter>,
}

impl TaskField {
    pub fn is_read_only(&self) -> bool {
        self.writer.is_none()
    }

    pub fn writer(&self) -> Option<&FieldWriter> {
        self.writer.as_ref()
    }

    pub(crate) fn read(&self, representation: &TaskRepresentation) -> Value {
        (self.read)(representation)
    }
}

impl Debug for TaskField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskField")
            .field("name", &self.name)
            .field("read_only", &self.is_read_only())
            .finish()
    }
}

impl FieldWriter {
    pub(crate) fn assign(
        &self,
        value: &Value,
        changes: &mut TaskChanges,
    ) -> Result<(), &'static str> {
        (self.assign)(value, changes)
    }

    /// Applies the creation default; returns `false` when the field has none.
    pub(crate) fn apply_default(&self, changes: &mut TaskChanges) -> bool {
        match self.default {
            Some(default) => {
                default(changes);
                true
            }
            None => false,
        }
    }
}

/// Exposed task fields in wire order.
pub static TASK_FIELDS: [TaskField; 5] = [
    TaskField {
        name: "url",
        read: |repr: &TaskRepresentation| Value::from(repr.url.as_str()),
        writer: None,
    },
    TaskField {
        name: "id",
        read: |repr: &TaskRepresentation| Value::from(repr.id),
        writer: None,
    },
    TaskField {
        name: "text",
        read: |repr: &TaskRepresentation| Value::from(repr.text.as_str()),
        writer: Some(FieldWriter {
            required: true,
            assign: |value: &Value, changes: &mut TaskChanges| {
                changes.text = Some(parse_text(value)?);
                Ok(())
            },
            default: None,
        }),
    },
    TaskField {
        name: "completed",
        read: |repr: &TaskRepresentation| Value::from(repr.completed),
        writer: Some(FieldWriter {
            required: false,
            assign: |value: &Value, changes: &mut TaskChanges| {
                changes.completed = Some(parse_boolean(value)?);
                Ok(())
            },
            default: Some(|changes: &mut TaskChanges| changes.completed = Some(false)),
        }),
    },
    TaskField {
        name: "created_at",
        read: |repr: &TaskRepresentation| Value::from(repr.created_at.as_str()),
        writer: None,
    },
];

/// Field names in wire order.
pub fn field_names() -> impl Iterator<Item = &'static str> {
    TASK_FIELDS.iter().map(|field| field.name)
}

/// Fields accepted from inbound data.
pub fn writable_fields() -> impl Iterator<Item = &'static TaskField> {
    TASK_FIELDS.iter().filter(|field| !field.is_read_only())
}

pub fn lookup(name: &str) -> Option<&'static TaskField> {
    TASK_FIELDS.iter().find(|field| field.name == name)
}

fn parse_text(value: &Value) -> Result<String, &'static str> {
    let text = match value {
        Value::Null => return Err(MSG_NULL),
        Value::String(raw) => raw.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => return Err(MSG_NOT_STRING),
    };
    if text.is_empty() {
        return Err(MSG_BLANK);
    }
    Ok(text)
}

fn parse_boolean(value: &Value) -> Result<bool, &'static str> {
    match value {
        Value::Null => Err(MSG_NULL),
        Value::Bool(flag) => Ok(*flag),
        Value::Number(number) => match number.as_f64() {
            Some(n) if n == 1.0 => Ok(true),
            Some(n) if n == 0.0 => Ok(false),
            _ => Err(MSG_NOT_BOOLEAN),
        },
        Value::String(raw) => {
            let word = raw.trim().to_ascii_lowercase();
            if TRUE_WORDS.contains(&word.as_str()) {
                Ok(true)
            } else if FALSE_WORDS.contains(&word.as_str()) {
                Ok(false)
            } else {
                Err(MSG_NOT_BOOLEAN)
            }
        }
        Value::Array(_) | Value::Object(_) => Err(MSG_NOT_BOOLEAN),
    }
}

#[cfg(test)]
mod tests {
    use super::{field_names, lookup, parse_boolean, parse_text, writable_fields};
    use serde_json::json;

    #[test]
    fn allowlist_order_is_fixed() {
        assert_eq!(
            field_names().collect::<Vec<_>>(),
            ["url", "id", "text", "completed", "created_at"]
        );
        assert_eq!(
            writable_fields().map(|f| f.name).collect::<Vec<_>>(),
            ["text", "completed"]
        );
    }

    #[test]
    fn lookup_reports_access() {
        assert!(lookup("url").unwrap().is_read_only());
        assert!(lookup("created_at").unwrap().is_read_only());
        assert!(lookup("text").unwrap().writer().unwrap().required);
        assert!(!lookup("completed").unwrap().writer().unwrap().required);
        assert!(lookup("owner").is_none());
    }

    #[test]
    fn text_rules() {
        assert_eq!(parse_text(&json!("  call mom ")), Ok("call mom".to_string()));
        assert_eq!(parse_text(&json!(42)), Ok("42".to_string()));
        assert_eq!(parse_text(&json!("   ")), Err("This field may not be blank."));
        assert_eq!(parse_text(&json!(null)), Err("This field may not be null."));
        assert_eq!(parse_text(&json!(true)), Err("Not a valid string."));
        assert_eq!(parse_text(&json!(["a"])), Err("Not a valid string."));
    }

    #[test]
    fn boolean_rules() {
        assert_eq!(parse_boolean(&json!(true)), Ok(true));
        assert_eq!(parse_boolean(&json!(" Yes ")), Ok(true));
        assert_eq!(parse_boolean(&json!("off")), Ok(false));
        assert_eq!(parse_boolean(&json!(1)), Ok(true));
        assert_eq!(parse_boolean(&json!(0)), Ok(false));
        assert_eq!(parse_boolean(&json!(2)), Err("Must be a valid boolean."));
        assert_eq!(parse_boolean(&json!("not-a-bool")), Err("Must be a valid boolean."));
        assert_eq!(parse_boolean(&json!(null)), Err("This field may not be null."));
    }
}
