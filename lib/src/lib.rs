// lib/src/lib.rs

//! Patient store boundary and the record operations built on it.

pub mod database;
pub mod sorting;
pub mod storage_engine;

pub use crate::database::Database;
pub use crate::sorting::{sort_entries, SortField, SortOrder};
pub use crate::storage_engine::{
    create_storage, InMemoryStorage, JsonFileStorage, PatientMap, PatientStore, StorageConfig, StorageEngineType,
};
