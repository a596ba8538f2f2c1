// lib/src/storage_engine/mod.rs

pub mod config;
pub mod inmemory_storage;
pub mod json_file_storage;
pub mod storage_engine;
pub mod storage_utils;

pub use config::{StorageConfig, StorageEngineType, DEFAULT_DATA_FILE};
pub use inmemory_storage::InMemoryStorage;
pub use json_file_storage::JsonFileStorage;
pub use storage_engine::{PatientMap, PatientStore};

use std::sync::Arc;

use log::info;

/// Creates a storage engine instance based on the provided configuration.
pub fn create_storage(config: &StorageConfig) -> Arc<dyn PatientStore> {
    match config.engine {
        StorageEngineType::JsonFile => {
            info!("Using JSON file storage at {:?}", config.data_file);
            Arc::new(JsonFileStorage::new(config.data_file.clone()))
        }
        StorageEngineType::InMemory => {
            info!("Using in-memory storage");
            Arc::new(InMemoryStorage::new())
        }
    }
}
