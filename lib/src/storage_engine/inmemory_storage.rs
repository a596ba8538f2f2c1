// lib/src/storage_engine/inmemory_storage.rs

use std::sync::Arc;

use async_trait::async_trait;
use models::errors::PatientResult;
use tokio::sync::RwLock;

use super::storage_engine::{PatientMap, PatientStore};

/// Keeps the patient mapping in memory. Contents are lost when the process
/// exits.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStorage {
    patients: Arc<RwLock<PatientMap>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patients(patients: PatientMap) -> Self {
        InMemoryStorage {
            patients: Arc::new(RwLock::new(patients)),
        }
    }
}

#[async_trait]
impl PatientStore for InMemoryStorage {
    async fn load(&self) -> PatientResult<PatientMap> {
        let patients = self.patients.read().await;
        Ok(patients.clone())
    }

    async fn save(&self, patients: &PatientMap) -> PatientResult<()> {
        let mut stored = self.patients.write().await;
        *stored = patients.clone();
        Ok(())
    }

    fn get_type(&self) -> &'static str {
        "InMemory"
    }
}
