// models/src/medical/mod.rs

pub mod bmi;
pub mod patient;
pub mod patient_update;

pub use bmi::{classify_verdict, compute_bmi, Verdict};
pub use patient::{validate_and_construct, Gender, PatientRecord};
pub use patient_update::{apply_partial_update, PatientUpdate};
