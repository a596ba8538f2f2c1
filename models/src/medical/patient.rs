// models/src/medical/patient.rs

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::{ValidationError, ValidationResult};
use crate::identifiers::PatientId;
use crate::medical::bmi::{classify_verdict, round_bmi, Verdict};
use crate::properties::{coerce_float, coerce_integer, coerce_text, FieldMap, FieldReader};

pub const AGE_RANGE: RangeInclusive<i64> = 0..=120;
pub const HEIGHT_RANGE: RangeInclusive<f64> = 0.5..=2.5;
pub const WEIGHT_RANGE: RangeInclusive<f64> = 2.0..=500.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err("must be one of male, female, other".to_string()),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated patient record. Only `validate_and_construct` and
/// `apply_partial_update` produce one, so every instance satisfies the field
/// constraints. `bmi` and `verdict` are derived on every call.
#[derive(Clone, Debug, PartialEq)]
pub struct PatientRecord {
    pub(crate) id: PatientId,
    pub(crate) name: String,
    pub(crate) city: String,
    pub(crate) age: u8,
    pub(crate) gender: Gender,
    pub(crate) height: f64,
    pub(crate) weight: f64,
}

impl PatientRecord {
    pub fn id(&self) -> &PatientId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn bmi(&self) -> f64 {
        // height >= 0.5 is guaranteed by construction
        round_bmi(self.weight, self.height)
    }

    pub fn verdict(&self) -> Verdict {
        classify_verdict(self.bmi())
    }

    /// Rebuilds a record from a store entry keyed by `id`. Stored `bmi` and
    /// `verdict` values are ignored and recomputed.
    pub fn from_stored(id: &str, stored: &FieldMap) -> ValidationResult<Self> {
        let mut fields = stored.clone();
        fields.insert("id".to_string(), Value::String(id.to_string()));
        validate_and_construct(&fields)
    }

    /// Full field mapping including the derived `bmi` and `verdict`.
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("id".to_string(), Value::String(self.id.to_string()));
        fields.extend(self.to_stored_fields());
        fields
    }

    /// Field mapping as written to a store: everything except `id`, which is
    /// the entry's key.
    pub fn to_stored_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("name".to_string(), Value::from(self.name.clone()));
        fields.insert("city".to_string(), Value::from(self.city.clone()));
        fields.insert("age".to_string(), Value::from(self.age));
        fields.insert("gender".to_string(), Value::from(self.gender.as_str()));
        fields.insert("height".to_string(), Value::from(self.height));
        fields.insert("weight".to_string(), Value::from(self.weight));
        fields.insert("bmi".to_string(), Value::from(self.bmi()));
        fields.insert("verdict".to_string(), Value::from(self.verdict().as_str()));
        fields
    }
}

impl Serialize for PatientRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PatientRecord", 9)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("city", &self.city)?;
        state.serialize_field("age", &self.age)?;
        state.serialize_field("gender", &self.gender)?;
        state.serialize_field("height", &self.height)?;
        state.serialize_field("weight", &self.weight)?;
        state.serialize_field("bmi", &self.bmi())?;
        state.serialize_field("verdict", &self.verdict())?;
        state.end()
    }
}

/// Validates a raw field mapping and builds a record from it.
///
/// Every required field is read and checked; the error lists one entry per
/// violated constraint. Unknown keys, including `bmi` and `verdict`, are
/// ignored.
pub fn validate_and_construct(fields: &FieldMap) -> ValidationResult<PatientRecord> {
    let mut reader = FieldReader::new(fields);

    let id = reader.required("id", coerce_text);
    let name = reader.required("name", coerce_text);
    let city = reader.required("city", coerce_text);
    let age = reader.required("age", coerce_integer);
    let gender = reader.required("gender", coerce_text);
    let height = reader.required("height", coerce_float);
    let weight = reader.required("weight", coerce_float);

    for (field, value) in [("id", &id), ("name", &name), ("city", &city)] {
        if let Some(value) = value {
            reader.check(field, !value.is_empty(), "must not be empty");
        }
    }
    let age = age.and_then(|age| {
        reader.check("age", age >= *AGE_RANGE.start(), "must be greater than or equal to 0");
        reader.check("age", age <= *AGE_RANGE.end(), "must be less than or equal to 120");
        u8::try_from(age).ok().filter(|_| AGE_RANGE.contains(&age))
    });
    let gender = gender.and_then(|g| match g.parse::<Gender>() {
        Ok(g) => Some(g),
        Err(reason) => {
            reader.reject("gender", reason);
            None
        }
    });
    if let Some(height) = height {
        reader.check("height", height >= *HEIGHT_RANGE.start(), "must be greater than or equal to 0.5");
        reader.check("height", height <= *HEIGHT_RANGE.end(), "must be less than or equal to 2.5");
    }
    if let Some(weight) = weight {
        reader.check("weight", weight >= *WEIGHT_RANGE.start(), "must be greater than or equal to 2");
        reader.check("weight", weight <= *WEIGHT_RANGE.end(), "must be less than or equal to 500");
    }

    let violations = reader.into_violations();
    match (id, name, city, age, gender, height, weight) {
        (Some(id), Some(name), Some(city), Some(age), Some(gender), Some(height), Some(weight))
            if violations.is_empty() =>
        {
            Ok(PatientRecord {
                id: PatientId::new(id)?,
                name,
                city,
                age,
                gender,
                height,
                weight,
            })
        }
        _ => Err(ValidationError::new(violations)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap()
    }

    fn sample() -> FieldMap {
        fields(json!({
            "id": "P001",
            "name": "Ananya Verma",
            "city": "Guwahati",
            "age": 28,
            "gender": "female",
            "height": 1.75,
            "weight": 70.5
        }))
    }

    #[test]
    fn should_construct_valid_record() {
        let record = validate_and_construct(&sample()).unwrap();
        assert_eq!(record.id().as_str(), "P001");
        assert_eq!(record.age(), 28);
        assert_eq!(record.gender(), Gender::Female);
        assert_eq!(record.bmi(), 23.02);
        assert_eq!(record.verdict(), Verdict::Normal);
    }

    #[test]
    fn should_report_every_violation() {
        let mut input = sample();
        input.insert("age".into(), json!(121));
        input.insert("gender".into(), json!("unknown"));
        input.insert("height".into(), json!(0.3));
        input.remove("city");
        let err = validate_and_construct(&input).unwrap_err();
        assert_eq!(err.violations.len(), 4);
        for field in ["age", "gender", "height", "city"] {
            assert!(err.has_field(field), "missing violation for {field}");
        }
    }

    #[test]
    fn should_accept_range_boundaries() {
        let mut input = sample();
        input.insert("age".into(), json!(0));
        input.insert("height".into(), json!(2.5));
        input.insert("weight".into(), json!(2));
        assert!(validate_and_construct(&input).is_ok());

        input.insert("age".into(), json!(120));
        input.insert("height".into(), json!(0.5));
        input.insert("weight".into(), json!(500));
        assert!(validate_and_construct(&input).is_ok());
    }

    #[test]
    fn should_reject_out_of_range_values() {
        let mut input = sample();
        input.insert("age".into(), json!(-1));
        input.insert("weight".into(), json!(500.01));
        let err = validate_and_construct(&input).unwrap_err();
        assert!(err.has_field("age"));
        assert!(err.has_field("weight"));
    }

    #[test]
    fn should_reject_empty_strings() {
        let mut input = sample();
        input.insert("id".into(), json!(""));
        input.insert("name".into(), json!(""));
        let err = validate_and_construct(&input).unwrap_err();
        assert!(err.has_field("id"));
        assert!(err.has_field("name"));
    }

    #[test]
    fn should_accept_whitespace_only_strings() {
        let mut input = sample();
        input.insert("name".into(), json!(" "));
        input.insert("city".into(), json!("\t"));
        let record = validate_and_construct(&input).unwrap();
        assert_eq!(record.name(), " ");
        assert_eq!(record.city(), "\t");
    }

    #[test]
    fn should_coerce_numeric_strings() {
        let mut input = sample();
        input.insert("age".into(), json!("28"));
        input.insert("height".into(), json!("1.75"));
        let record = validate_and_construct(&input).unwrap();
        assert_eq!(record.age(), 28);
        assert_eq!(record.height(), 1.75);
    }

    #[test]
    fn should_ignore_supplied_derived_fields() {
        let mut input = sample();
        input.insert("bmi".into(), json!(99.0));
        input.insert("verdict".into(), json!("Obese"));
        let record = validate_and_construct(&input).unwrap();
        assert_eq!(record.bmi(), 23.02);
        assert_eq!(record.verdict(), Verdict::Normal);
    }

    #[test]
    fn should_round_trip_through_stored_fields() {
        let record = validate_and_construct(&sample()).unwrap();
        let stored = record.to_stored_fields();
        assert!(!stored.contains_key("id"));
        assert_eq!(stored["bmi"], json!(23.02));
        assert_eq!(stored["verdict"], json!("Normal"));

        let restored = PatientRecord::from_stored("P001", &stored).unwrap();
        assert_eq!(restored, record);
        assert_eq!(restored.bmi(), record.bmi());
        assert_eq!(restored.verdict(), record.verdict());
    }

    #[test]
    fn should_serialize_with_derived_fields() {
        let mut input = sample();
        input.insert("height".into(), json!(1.6));
        input.insert("weight".into(), json!(40));
        let record = validate_and_construct(&input).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], json!("P001"));
        assert_eq!(value["gender"], json!("female"));
        assert_eq!(value["bmi"], json!(15.63));
        assert_eq!(value["verdict"], json!("Underweight"));
        assert_eq!(value, Value::Object(record.to_fields()));
    }
}
