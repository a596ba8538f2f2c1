// models/src/errors.rs

use std::fmt;
use std::io;

use serde::Serialize;
pub use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Patient not found: {0}")]
    NotFound(String),
    #[error("Patient ID already exists: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for PatientError {
    fn from(err: serde_json::Error) -> Self {
        PatientError::SerializationError(format!("JSON processing error: {}", err))
    }
}

/// A single violated constraint on a named field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// A validation error. Carries every constraint a record violated, not just
/// the first one.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("validation failed: {}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation::new(field, reason)])
    }

    /// Returns true when a violation was recorded against `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A type alias for a `Result` that returns a `PatientError` on failure.
pub type PatientResult<T> = Result<T, PatientError>;

/// A type alias for a `Result` that returns a `ValidationError` on failure.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_list_every_violation_in_message() {
        let err = ValidationError::new(vec![
            FieldViolation::new("age", "must be at most 120"),
            FieldViolation::new("gender", "must be one of male, female, other"),
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: age: must be at most 120; gender: must be one of male, female, other"
        );
        assert!(err.has_field("age"));
        assert!(!err.has_field("name"));
    }

    #[test]
    fn should_wrap_validation_error_transparently() {
        let err: PatientError = ValidationError::single("height", "field required").into();
        assert_eq!(err.to_string(), "validation failed: height: field required");
    }
}
