// lib/src/sorting.rs

use std::fmt;
use std::str::FromStr;

use log::warn;
use models::errors::PatientError;
use models::FieldMap;
use serde_json::Value;

use crate::storage_engine::PatientMap;

/// Numeric keys a patient listing can be sorted on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Height => "height",
            SortField::Weight => "weight",
            SortField::Bmi => "bmi",
        }
    }
}

impl FromStr for SortField {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "height" => Ok(SortField::Height),
            "weight" => Ok(SortField::Weight),
            "bmi" => Ok(SortField::Bmi),
            _ => Err(PatientError::InvalidInput(
                "Invalid sort_by field. Must be one of ['height', 'weight', 'bmi']".to_string(),
            )),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(PatientError::InvalidInput(
                "Invalid order. Must be 'asc' or 'desc'".to_string(),
            )),
        }
    }
}

/// Sorts stored entries by `field`. Each returned entry carries its `id`.
///
/// A missing or non-numeric key sorts as 0. The sort is stable in both
/// directions: entries with equal keys keep their store order.
pub fn sort_entries(patients: &PatientMap, field: SortField, order: SortOrder) -> Vec<FieldMap> {
    let mut entries: Vec<(f64, FieldMap)> = patients
        .iter()
        .filter_map(|(id, entry)| match entry {
            Value::Object(fields) => {
                let key = fields.get(field.as_str()).and_then(Value::as_f64).unwrap_or(0.0);
                let mut with_id = FieldMap::new();
                with_id.insert("id".to_string(), Value::String(id.clone()));
                with_id.extend(fields.iter().filter(|(k, _)| *k != "id").map(|(k, v)| (k.clone(), v.clone())));
                Some((key, with_id))
            }
            _ => {
                warn!("Skipping stored patient {} that is not an object", id);
                None
            }
        })
        .collect();

    match order {
        SortOrder::Asc => entries.sort_by(|a, b| a.0.total_cmp(&b.0)),
        SortOrder::Desc => entries.sort_by(|a, b| b.0.total_cmp(&a.0)),
    }
    entries.into_iter().map(|(_, fields)| fields).collect()
}
