// rest_api/src/cli.rs

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use patient_lib::StorageEngineType;

use crate::config::{load_app_config, AppConfig};

/// Command-line arguments. Every flag overrides the matching value from the
/// config file.
#[derive(Debug, Parser)]
#[command(name = "patient-api", version, about = "Patient records REST API with BMI classification")]
pub struct CliArgs {
    /// Path to a YAML config file.
    #[arg(short, long, env = "PATIENT_API_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "PATIENT_API_HOST")]
    pub host: Option<String>,

    #[arg(short, long, env = "PATIENT_API_PORT")]
    pub port: Option<u16>,

    /// JSON file holding the patient records.
    #[arg(long, env = "PATIENT_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Storage engine: json_file or in_memory.
    #[arg(long, env = "PATIENT_STORAGE_ENGINE")]
    pub engine: Option<StorageEngineType>,
}

impl CliArgs {
    /// Loads the config file (if any) and applies the command-line overrides.
    pub fn resolve_config(&self) -> Result<AppConfig> {
        let config = load_app_config(self.config.as_deref())?;
        Ok(self.apply_overrides(config))
    }

    pub fn apply_overrides(&self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(data_file) = &self.data_file {
            config.storage.data_file = data_file.clone();
        }
        if let Some(engine) = self.engine {
            config.storage.engine = engine;
        }
        config
    }
}
