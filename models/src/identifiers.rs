// models/src/identifiers.rs

use core::ops::Deref;
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::{ValidationError, ValidationResult};

/// A patient identifier. Identifiers are non-empty strings that uniquely
/// identify a record within a store and never change after creation.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new identifier.
    ///
    /// # Errors
    /// Returns a `ValidationError` against the `id` field if `value` is empty.
    pub fn new(value: String) -> ValidationResult<Self> {
        if value.is_empty() {
            return Err(ValidationError::single("id", "must not be empty"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for PatientId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for PatientId {
    type Err = ValidationError;

    fn from_str(s: &str) -> ValidationResult<Self> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for PatientId {
    type Error = ValidationError;

    fn try_from(value: String) -> ValidationResult<Self> {
        Self::new(value)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PatientId> for String {
    fn from(value: PatientId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::PatientId;
    use core::str::FromStr;

    #[test]
    fn should_not_create_empty_identifier() {
        let identifier = PatientId::new("".to_string());
        assert!(identifier.is_err());
        assert!(identifier.unwrap_err().has_field("id"));
    }

    #[test]
    fn should_accept_whitespace_identifier() {
        let identifier = PatientId::new(" ".to_string()).unwrap();
        assert_eq!(identifier.as_str(), " ");
    }

    #[test]
    fn should_create_identifier_from_str() {
        let identifier = PatientId::from_str("P001");
        assert!(identifier.is_ok());
        assert_eq!(identifier.unwrap().as_str(), "P001");
    }

    #[test]
    fn should_reject_empty_identifier_when_deserializing() {
        let parsed: Result<PatientId, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
    }
}
