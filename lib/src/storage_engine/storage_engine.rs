// lib/src/storage_engine/storage_engine.rs

use std::fmt::Debug;

use async_trait::async_trait;
use models::errors::PatientResult;
use serde_json::{Map, Value};

/// The whole store: patient id to the raw stored fields of that patient.
pub type PatientMap = Map<String, Value>;

/// A flat patient store. Every call moves the complete mapping; there is no
/// partial read or write.
#[async_trait]
pub trait PatientStore: Send + Sync + Debug {
    /// Reads every stored patient.
    async fn load(&self) -> PatientResult<PatientMap>;

    /// Replaces the stored contents with `patients`.
    async fn save(&self, patients: &PatientMap) -> PatientResult<()>;

    fn get_type(&self) -> &'static str;
}
