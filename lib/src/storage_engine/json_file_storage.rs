// lib/src/storage_engine/json_file_storage.rs

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, error};
use models::errors::PatientResult;
use tokio::fs;

use super::storage_engine::{PatientMap, PatientStore};
use super::storage_utils::{deserialize_patients, serialize_patients};

/// Stores every patient in one JSON object on disk. Each load reads the whole
/// file and each save rewrites it.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PatientStore for JsonFileStorage {
    async fn load(&self) -> PatientResult<PatientMap> {
        match fs::read(&self.path).await {
            Ok(bytes) => {
                let patients = deserialize_patients(&bytes)?;
                debug!("Loaded {} patients from {:?}", patients.len(), self.path);
                Ok(patients)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Patient file {:?} does not exist yet, starting empty", self.path);
                Ok(PatientMap::new())
            }
            Err(e) => {
                error!("Failed to read patient file {:?}: {}", self.path, e);
                Err(e.into())
            }
        }
    }

    async fn save(&self, patients: &PatientMap) -> PatientResult<()> {
        let bytes = serialize_patients(patients)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, bytes).await.map_err(|e| {
            error!("Failed to write patient file {:?}: {}", self.path, e);
            e
        })?;
        debug!("Saved {} patients to {:?}", patients.len(), self.path);
        Ok(())
    }

    fn get_type(&self) -> &'static str {
        "JsonFile"
    }
}
