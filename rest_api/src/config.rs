// rest_api/src/config.rs

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use patient_lib::StorageConfig;
use serde::{Deserialize, Serialize};
use tokio::net::lookup_host;

pub const DEFAULT_REST_API_HOST: &str = "127.0.0.1";
pub const DEFAULT_REST_API_PORT: u16 = 8000;

/// Represents the configuration for the REST API server itself.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RestApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RestApiConfig {
    fn default() -> Self {
        RestApiConfig {
            host: DEFAULT_REST_API_HOST.to_string(),
            port: DEFAULT_REST_API_PORT,
        }
    }
}

impl RestApiConfig {
    /// Resolves `host` (an IP literal or a hostname such as `localhost`) to
    /// the first matching listen address.
    pub async fn socket_addr(&self) -> Result<SocketAddr> {
        lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))?
            .next()
            .with_context(|| format!("No address found for {}:{}", self.host, self.port))
    }
}

/// Top-level application configuration, mirroring the YAML file layout:
///
/// ```yaml
/// server:
///   host: 127.0.0.1
///   port: 8000
/// storage:
///   engine: json_file
///   data_file: patients.json
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: RestApiConfig,
    pub storage: StorageConfig,
}

/// Parses an application config from YAML text. Missing keys keep their
/// defaults.
pub fn parse_app_config(content: &str) -> Result<AppConfig> {
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    serde_yaml2::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))
}

/// Loads the application configuration from `config_file_path`, or returns
/// the defaults when no path is given.
pub fn load_app_config(config_file_path: Option<&Path>) -> Result<AppConfig> {
    let Some(path) = config_file_path else {
        return Ok(AppConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_app_config(&content).with_context(|| format!("Invalid config file {}", path.display()))
}
