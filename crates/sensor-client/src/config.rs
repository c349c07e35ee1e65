//! Configuration types for the sensor dashboard client

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "SENSOR_DASHBOARD_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub sensors: SensorListConfig,
}

/// Where the REST API lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Session token persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Key the token is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// File used by the file-backed session store (native builds)
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            token_file: None,
        }
    }
}

/// Sensor list behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorListConfig {
    /// Must match the server's page size
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Jump back to page 1 whenever the search term changes
    #[serde(default)]
    pub reset_page_on_search: bool,
}

impl Default for SensorListConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            reset_page_on_search: false,
        }
    }
}

impl Config {
    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            self.apply_api_url(Some(&url));
        }
    }

    /// Replace the API base URL when a non-empty value is given
    pub fn apply_api_url(&mut self, url: Option<&str>) {
        if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
            tracing::debug!("Overriding API base URL with {}", url);
            self.api.base_url = url.to_string();
        }
    }

    /// Check values that serde defaults cannot guard
    pub fn validate(&self) -> crate::Result<()> {
        if self.sensors.page_size == 0 {
            return Err(crate::DashboardError::Config(
                "sensors.page_size must be at least 1".to_string(),
            ));
        }
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(crate::DashboardError::Config(format!(
                "api.base_url must be an http(s) URL, got {:?}",
                self.api.base_url
            )));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_storage_key() -> String {
    crate::session::TOKEN_KEY.to_string()
}

fn default_page_size() -> u32 {
    10
}

/// Load configuration from a JSON file, then apply environment overrides
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::DashboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let mut config: Config = serde_json::from_str(&content)?;
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}
