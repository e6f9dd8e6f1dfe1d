//! Per-field validation failures for inbound task data.

use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Key used for problems that belong to the payload as a whole.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Inbound data failed field constraints.
///
/// Serializes as a plain mapping `{"field": ["message", ...]}` so a caller can
/// render field-level messages directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationError {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    /// Builds an error carrying a single message for one field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut error = Self::default();
        error.push(field, message);
        error
    }

    pub(crate) fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Field names with at least one problem, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Messages recorded for `field`; empty when the field is valid.
    pub fn messages(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid task data:")?;
        for (field, messages) in &self.errors {
            write!(f, " {field}: {};", messages.join(" "))?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::{ValidationError, NON_FIELD_ERRORS};

    #[test]
    fn serializes_as_field_message_mapping() {
        let mut error = ValidationError::single("text", "This field is required.");
        error.push("completed", "Must be a valid boolean.");

        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "completed": ["Must be a valid boolean."],
                "text": ["This field is required."],
            })
        );
        assert_eq!(error.fields().collect::<Vec<_>>(), ["completed", "text"]);
    }

    #[test]
    fn messages_for_valid_field_are_empty() {
        let error = ValidationError::single(NON_FIELD_ERRORS, "bad payload");
        assert!(error.messages("text").is_empty());
        assert!(error.contains(NON_FIELD_ERRORS));
        assert!(error.to_string().contains("non_field_errors: bad payload"));
    }
}
