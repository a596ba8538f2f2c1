// lib/src/database.rs

use std::sync::Arc;

use log::{debug, info};
use models::errors::{PatientError, PatientResult};
use models::{apply_partial_update, validate_and_construct, FieldMap, PatientRecord, PatientUpdate};
use serde_json::Value;

use crate::sorting::{sort_entries, SortField, SortOrder};
use crate::storage_engine::{create_storage, PatientMap, PatientStore, StorageConfig};

/// Patient operations over an explicitly passed store handle.
///
/// Every operation loads the full mapping; mutations validate first and only
/// write the store once the new record is known to be valid, so a failed call
/// leaves the stored data untouched.
#[derive(Debug, Clone)]
pub struct Database {
    storage_engine: Arc<dyn PatientStore>,
}

impl Database {
    pub fn new(storage_engine: Arc<dyn PatientStore>) -> Self {
        Database { storage_engine }
    }

    /// Creates a database backed by the engine named in `config`.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(create_storage(config))
    }

    /// Returns a reference to the underlying storage engine.
    pub fn storage(&self) -> &Arc<dyn PatientStore> {
        &self.storage_engine
    }

    /// Returns the raw stored mapping as is.
    pub async fn view_all(&self) -> PatientResult<PatientMap> {
        self.storage_engine.load().await
    }

    /// Looks up one patient and rebuilds the record with fresh `bmi` and
    /// `verdict`.
    pub async fn get_patient(&self, id: &str) -> PatientResult<PatientRecord> {
        let patients = self.storage_engine.load().await?;
        debug!("Looking up patient {}", id);
        stored_record(&patients, id)
    }

    pub async fn sort_patients(&self, field: SortField, order: SortOrder) -> PatientResult<Vec<FieldMap>> {
        let patients = self.storage_engine.load().await?;
        debug!("Sorting {} patients by {} {:?}", patients.len(), field, order);
        Ok(sort_entries(&patients, field, order))
    }

    /// Validates `fields` as a full record and stores it under its id.
    ///
    /// # Errors
    /// `Validation` for constraint violations, `Conflict` when the id is taken.
    pub async fn create_patient(&self, fields: &FieldMap) -> PatientResult<PatientRecord> {
        let record = validate_and_construct(fields)?;
        let mut patients = self.storage_engine.load().await?;
        if patients.contains_key(record.id().as_str()) {
            return Err(PatientError::Conflict(record.id().to_string()));
        }
        patients.insert(record.id().to_string(), Value::Object(record.to_stored_fields()));
        self.storage_engine.save(&patients).await?;
        info!("Created patient {}", record.id());
        Ok(record)
    }

    /// Applies a partial update to an existing patient. The patch is checked
    /// against the update rules first, then the merged record is validated as
    /// a whole before anything is written.
    pub async fn update_patient(&self, id: &str, patch_fields: &FieldMap) -> PatientResult<PatientRecord> {
        let patch = PatientUpdate::from_fields(patch_fields)?;
        let mut patients = self.storage_engine.load().await?;
        let existing = stored_record(&patients, id)?;
        let updated = apply_partial_update(&existing, &patch)?;
        patients.insert(id.to_string(), Value::Object(updated.to_stored_fields()));
        self.storage_engine.save(&patients).await?;
        info!("Updated patient {}", id);
        Ok(updated)
    }

    pub async fn delete_patient(&self, id: &str) -> PatientResult<()> {
        let mut patients = self.storage_engine.load().await?;
        if patients.shift_remove(id).is_none() {
            return Err(PatientError::NotFound(id.to_string()));
        }
        self.storage_engine.save(&patients).await?;
        info!("Deleted patient {}", id);
        Ok(())
    }
}

fn stored_record(patients: &PatientMap, id: &str) -> PatientResult<PatientRecord> {
    match patients.get(id) {
        None => Err(PatientError::NotFound(id.to_string())),
        Some(Value::Object(fields)) => PatientRecord::from_stored(id, fields)
            .map_err(|e| PatientError::StorageError(format!("stored patient {} is invalid: {}", id, e))),
        Some(_) => Err(PatientError::StorageError(format!("stored patient {} is not an object", id))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage_engine::{InMemoryStorage, JsonFileStorage, StorageEngineType};
    use models::Verdict;
    use serde_json::json;
    use tempfile::tempdir;

    fn fields(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap()
    }

    fn patient(id: &str, height: f64, weight: f64) -> FieldMap {
        fields(json!({
            "id": id,
            "name": "Neha Sinha",
            "city": "Bangalore",
            "age": 30,
            "gender": "female",
            "height": height,
            "weight": weight
        }))
    }

    fn database() -> Database {
        Database::new(Arc::new(InMemoryStorage::new()))
    }

    #[tokio::test]
    async fn should_create_and_read_back_patient() {
        let db = database();
        let created = db.create_patient(&patient("P001", 1.75, 70.5)).await.unwrap();
        let fetched = db.get_patient("P001").await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.bmi(), 23.02);
        assert_eq!(fetched.verdict(), Verdict::Normal);

        let stored = db.view_all().await.unwrap();
        assert_eq!(stored["P001"]["bmi"], json!(23.02));
        assert_eq!(stored["P001"]["verdict"], json!("Normal"));
        assert!(stored["P001"].get("id").is_none());
    }

    #[tokio::test]
    async fn should_reject_duplicate_id() {
        let db = database();
        db.create_patient(&patient("P001", 1.75, 70.5)).await.unwrap();
        let err = db.create_patient(&patient("P001", 1.6, 40.0)).await.unwrap_err();
        assert!(matches!(err, PatientError::Conflict(ref id) if id == "P001"));
        assert_eq!(db.get_patient("P001").await.unwrap().weight(), 70.5);
    }

    #[tokio::test]
    async fn should_not_store_invalid_patient() {
        let db = database();
        let err = db.create_patient(&patient("P001", 3.0, 70.5)).await.unwrap_err();
        assert!(matches!(err, PatientError::Validation(ref e) if e.has_field("height")));
        assert!(db.view_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_report_unknown_ids() {
        let db = database();
        assert!(matches!(db.get_patient("P404").await, Err(PatientError::NotFound(_))));
        assert!(matches!(db.delete_patient("P404").await, Err(PatientError::NotFound(_))));
        let patch = fields(json!({ "city": "Delhi" }));
        assert!(matches!(db.update_patient("P404", &patch).await, Err(PatientError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_update_and_recompute() {
        let db = database();
        db.create_patient(&patient("P001", 1.6, 40.0)).await.unwrap();
        assert_eq!(db.get_patient("P001").await.unwrap().verdict(), Verdict::Underweight);

        let updated = db
            .update_patient("P001", &fields(json!({ "weight": 80, "id": "P999" })))
            .await
            .unwrap();
        assert_eq!(updated.id().as_str(), "P001");
        assert_eq!(updated.bmi(), 31.25);
        assert_eq!(updated.verdict(), Verdict::Obese);

        let stored = db.view_all().await.unwrap();
        assert!(!stored.contains_key("P999"));
        assert_eq!(stored["P001"]["bmi"], json!(31.25));
        assert_eq!(stored["P001"]["verdict"], json!("Obese"));
    }

    #[tokio::test]
    async fn should_leave_store_untouched_on_failed_update() {
        let db = database();
        db.create_patient(&patient("P001", 1.75, 70.5)).await.unwrap();
        let before = db.view_all().await.unwrap();

        let err = db.update_patient("P001", &fields(json!({ "gender": "other" }))).await.unwrap_err();
        assert!(matches!(err, PatientError::Validation(ref e) if e.has_field("gender")));

        let err = db.update_patient("P001", &fields(json!({ "weight": 900 }))).await.unwrap_err();
        assert!(matches!(err, PatientError::Validation(ref e) if e.has_field("weight")));

        assert_eq!(db.view_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn should_delete_patient() {
        let db = database();
        db.create_patient(&patient("P001", 1.75, 70.5)).await.unwrap();
        db.create_patient(&patient("P002", 1.6, 40.0)).await.unwrap();
        db.delete_patient("P001").await.unwrap();
        let stored = db.view_all().await.unwrap();
        assert_eq!(stored.keys().collect::<Vec<_>>(), vec!["P002"]);
    }

    #[tokio::test]
    async fn should_sort_created_patients() {
        let db = database();
        db.create_patient(&patient("P001", 1.75, 70.5)).await.unwrap();
        db.create_patient(&patient("P002", 1.6, 40.0)).await.unwrap();
        db.create_patient(&patient("P003", 1.8, 95.0)).await.unwrap();

        let sorted = db.sort_patients(SortField::Bmi, SortOrder::Desc).await.unwrap();
        let ids: Vec<&str> = sorted.iter().map(|e| e["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["P003", "P001", "P002"]);
    }

    #[tokio::test]
    async fn should_surface_invalid_stored_entry_as_storage_error() {
        let mut patients = PatientMap::new();
        patients.insert("P001".into(), json!({ "name": "Ghost" }));
        let db = Database::new(Arc::new(InMemoryStorage::with_patients(patients)));
        assert!(matches!(db.get_patient("P001").await, Err(PatientError::StorageError(_))));
    }

    #[tokio::test]
    async fn should_persist_through_json_file() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            engine: StorageEngineType::JsonFile,
            data_file: dir.path().join("patients.json"),
        };
        let db = Database::from_config(&config);
        assert_eq!(db.storage().get_type(), "JsonFile");
        db.create_patient(&patient("P001", 1.75, 70.5)).await.unwrap();

        let reopened = Database::new(Arc::new(JsonFileStorage::new(config.data_file.clone())));
        let record = reopened.get_patient("P001").await.unwrap();
        assert_eq!(record.bmi(), 23.02);
        assert_eq!(record.verdict(), Verdict::Normal);
    }
}
