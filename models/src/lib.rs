// models/src/lib.rs

//! Patient record model: field validation, partial updates and the derived
//! body-mass index and weight verdict.

pub mod errors;
pub mod identifiers;
pub mod medical;
pub mod properties;

pub use errors::{FieldViolation, PatientError, PatientResult, ValidationError, ValidationResult};
pub use identifiers::PatientId;
pub use medical::{
    apply_partial_update, classify_verdict, compute_bmi, validate_and_construct, Gender, PatientRecord,
    PatientUpdate, Verdict,
};
pub use properties::FieldMap;
