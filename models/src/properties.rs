// models/src/properties.rs

//! Raw field mappings and the coercion rules applied to them before any
//! range or enum check runs.

use serde_json::{Map, Value};

use crate::errors::FieldViolation;

/// A mapping of field names to raw JSON values, in insertion order.
pub type FieldMap = Map<String, Value>;

/// Coerces a raw value to a string. Only JSON strings are accepted.
pub fn coerce_text(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(format!("must be a string, found {}", kind_of(other))),
    }
}

/// Coerces a raw value to an integer. Accepts JSON integers, floats with no
/// fractional part and strings holding an integer.
pub fn coerce_integer(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
                _ => Err("must be a valid integer".to_string()),
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| "must be a valid integer".to_string()),
        other => Err(format!("must be a valid integer, found {}", kind_of(other))),
    }
}

/// Coerces a raw value to a finite float. Accepts any JSON number and strings
/// holding a number.
pub fn coerce_float(value: &Value) -> Result<f64, String> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        other => return Err(format!("must be a valid number, found {}", kind_of(other))),
    };
    match parsed {
        Some(f) if f.is_finite() => Ok(f),
        _ => Err("must be a valid number".to_string()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reads fields out of a `FieldMap`, collecting a violation for every field
/// that is missing or cannot be coerced instead of stopping at the first.
pub struct FieldReader<'a> {
    fields: &'a FieldMap,
    violations: Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a FieldMap) -> Self {
        Self {
            fields,
            violations: Vec::new(),
        }
    }

    /// Reads a field that must be present. `null` counts as missing.
    pub fn required<T>(&mut self, name: &str, coerce: fn(&Value) -> Result<T, String>) -> Option<T> {
        match self.fields.get(name) {
            None | Some(Value::Null) => {
                self.reject(name, "field required");
                None
            }
            Some(value) => self.coerce(name, value, coerce),
        }
    }

    /// Reads a field that may be absent. `null` is treated as absent.
    pub fn optional<T>(&mut self, name: &str, coerce: fn(&Value) -> Result<T, String>) -> Option<T> {
        match self.fields.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => self.coerce(name, value, coerce),
        }
    }

    fn coerce<T>(&mut self, name: &str, value: &Value, coerce: fn(&Value) -> Result<T, String>) -> Option<T> {
        match coerce(value) {
            Ok(v) => Some(v),
            Err(reason) => {
                self.reject(name, reason);
                None
            }
        }
    }

    /// Records a violation unless `holds` is true.
    pub fn check(&mut self, name: &str, holds: bool, reason: &str) {
        if !holds {
            self.reject(name, reason);
        }
    }

    pub fn reject(&mut self, name: &str, reason: impl Into<String>) {
        self.violations.push(FieldViolation::new(name, reason));
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }
}
