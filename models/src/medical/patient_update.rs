// models/src/medical/patient_update.rs

use serde_json::Value;

use crate::errors::{ValidationError, ValidationResult};
use crate::medical::patient::{validate_and_construct, Gender, PatientRecord};
use crate::properties::{coerce_float, coerce_integer, coerce_text, FieldMap, FieldReader};

/// A partial patient record. Absent fields leave the stored value alone.
///
/// The update form only admits `male` and `female` for `gender`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub city: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<Gender>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl PatientUpdate {
    /// Parses a partial field mapping. `null` counts as absent and unknown
    /// keys (`id`, `bmi`, `verdict`, ...) are ignored.
    pub fn from_fields(fields: &FieldMap) -> ValidationResult<Self> {
        let mut reader = FieldReader::new(fields);

        let name = reader.optional("name", coerce_text);
        let city = reader.optional("city", coerce_text);
        let age = reader.optional("age", coerce_integer);
        let gender = reader.optional("gender", coerce_text);
        let height = reader.optional("height", coerce_float);
        let weight = reader.optional("weight", coerce_float);

        if let Some(age) = age {
            reader.check("age", age > 0, "must be greater than 0");
        }
        if let Some(height) = height {
            reader.check("height", height > 0.0, "must be greater than 0");
        }
        if let Some(weight) = weight {
            reader.check("weight", weight > 0.0, "must be greater than 0");
        }
        let gender = gender.and_then(|g| match g.as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => {
                reader.reject("gender", "must be one of male, female");
                None
            }
        });

        let violations = reader.into_violations();
        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }
        Ok(Self {
            name,
            city,
            age,
            gender,
            height,
            weight,
        })
    }

    /// Overwrites the matching keys of `fields` with every present value.
    fn merge_into(&self, fields: &mut FieldMap) {
        if let Some(name) = &self.name {
            fields.insert("name".to_string(), Value::from(name.clone()));
        }
        if let Some(city) = &self.city {
            fields.insert("city".to_string(), Value::from(city.clone()));
        }
        if let Some(age) = self.age {
            fields.insert("age".to_string(), Value::from(age));
        }
        if let Some(gender) = self.gender {
            fields.insert("gender".to_string(), Value::from(gender.as_str()));
        }
        if let Some(height) = self.height {
            fields.insert("height".to_string(), Value::from(height));
        }
        if let Some(weight) = self.weight {
            fields.insert("weight".to_string(), Value::from(weight));
        }
    }
}

/// Merges `patch` over `existing` and validates the result as a fresh record.
/// The id always comes from `existing`.
pub fn apply_partial_update(existing: &PatientRecord, patch: &PatientUpdate) -> ValidationResult<PatientRecord> {
    let mut fields = existing.to_fields();
    patch.merge_into(&mut fields);
    fields.insert("id".to_string(), Value::from(existing.id().to_string()));
    validate_and_construct(&fields)
}
