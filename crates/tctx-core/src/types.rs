//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A day-of-week value was outside 0 (Sunday) to 6 (Saturday).
    #[error("day of week must be between 0 (Sunday) and 6 (Saturday), got {value}")]
    DayOutOfRange { value: u8 },

    /// An hour value was outside 0 to 23.
    #[error("hour must be between 0 and 23, got {value}")]
    HourOutOfRange { value: u8 },

    /// Hour ranges do not wrap around midnight.
    #[error("hour range start ({start}) must not be after end ({end})")]
    InvertedHourRange { start: u8, end: u8 },

    /// The cron expression could not be parsed.
    #[error("invalid cron pattern '{expression}': {reason}")]
    InvalidCron { expression: String, reason: String },

    /// A context data entry had the wrong JSON type.
    #[error("context data '{key}' must be {expected}")]
    InvalidData {
        key: &'static str,
        expected: &'static str,
    },
}

/// A validated context identifier.
///
/// Context IDs must be non-empty strings. Uniqueness is enforced by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContextId(String);

impl ContextId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "context ID",
            });
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContextId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContextId> for String {
    fn from(id: ContextId) -> Self {
        id.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ContextId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_id_rejects_empty() {
        assert!(ContextId::new("").is_err());
        assert!(ContextId::new("   ").is_err());
        assert!(ContextId::new("work_hours").is_ok());
    }

    #[test]
    fn context_id_serde_is_plain_string() {
        let id = ContextId::new("focus_morning").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"focus_morning\"");
        let parsed: ContextId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn context_id_serde_rejects_empty() {
        let result: Result<ContextId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn validation_error_messages() {
        assert_eq!(
            ValidationError::InvertedHourRange { start: 22, end: 2 }.to_string(),
            "hour range start (22) must not be after end (2)"
        );
        assert_eq!(
            ValidationError::Empty { field: "name" }.to_string(),
            "name cannot be empty"
        );
    }
}
