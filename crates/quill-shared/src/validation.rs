//! Field-level validation errors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Messages collected per field, serialized as `{ field: [message, ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(transparent)]
#[error("validation failed for {} field(s)", .0.len())]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Record `message` under `field` when `value` is missing or blank.
    pub fn require(&mut self, field: &str, value: Option<&str>, message: &str) {
        if is_blank(value) {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Request bodies that check themselves before reaching a repository.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_accumulate_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "first");
        errors.add("title", "second");
        errors.add("content", "third");

        assert_eq!(
            errors.get("title"),
            Some(&["first".to_string(), "second".to_string()][..])
        );
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({ "content": ["third"], "title": ["first", "second"] })
        );
    }

    #[test]
    fn test_require_treats_whitespace_as_missing() {
        let mut errors = ValidationErrors::new();
        errors.require("a", None, "missing");
        errors.require("b", Some("   "), "blank");
        errors.require("c", Some("ok"), "never");

        assert!(errors.get("a").is_some());
        assert!(errors.get("b").is_some());
        assert!(errors.get("c").is_none());
        assert!(errors.into_result().is_err());
    }
}
