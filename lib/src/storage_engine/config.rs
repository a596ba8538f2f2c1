// lib/src/storage_engine/config.rs

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use models::errors::PatientError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATA_FILE: &str = "patients.json";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum StorageEngineType {
    #[default]
    JsonFile,
    InMemory,
}

impl FromStr for StorageEngineType {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json_file" | "json" | "file" => Ok(StorageEngineType::JsonFile),
            "in_memory" | "inmemory" | "memory" => Ok(StorageEngineType::InMemory),
            _ => Err(PatientError::InvalidInput(format!("Unknown storage engine type: {}", s))),
        }
    }
}

impl TryFrom<String> for StorageEngineType {
    type Error = PatientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StorageEngineType> for String {
    fn from(value: StorageEngineType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for StorageEngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageEngineType::JsonFile => write!(f, "json_file"),
            StorageEngineType::InMemory => write!(f, "in_memory"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub engine: StorageEngineType,
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            engine: StorageEngineType::JsonFile,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}
