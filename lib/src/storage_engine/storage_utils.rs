// lib/src/storage_engine/storage_utils.rs

use models::errors::{PatientError, PatientResult};
use serde_json::Value;

use super::storage_engine::PatientMap;

/// Helper to serialize the full patient mapping to JSON bytes.
pub fn serialize_patients(patients: &PatientMap) -> PatientResult<Vec<u8>> {
    serde_json::to_vec(patients)
        .map_err(|e| PatientError::SerializationError(e.to_string()))
}

/// Helper to deserialize JSON bytes into a patient mapping. Blank input is an
/// empty store; any top-level value other than an object is rejected.
pub fn deserialize_patients(bytes: &[u8]) -> PatientResult<PatientMap> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(PatientMap::new());
    }
    match serde_json::from_slice::<Value>(bytes)
        .map_err(|e| PatientError::SerializationError(e.to_string()))?
    {
        Value::Object(patients) => Ok(patients),
        other => Err(PatientError::StorageError(format!(
            "expected a JSON object of patients, found {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
