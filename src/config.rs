use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "dashboard.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Dashboard settings. Every field has a default, so the file may be absent
/// or list only what it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Launch records file (`.csv`, `.json`, `.parquet`).
    pub data_path: PathBuf,
    pub host: String,
    pub port: u16,
    /// Page heading.
    pub title: String,
    /// Range slider step in kilograms.
    pub slider_step: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("spacex_launch_dash.csv"),
            host: "127.0.0.1".to_string(),
            port: 8050,
            title: "SpaceX Launch Records Dashboard".to_string(),
            slider_step: 1000.0,
        }
    }
}

impl DashboardConfig {
    /// Load `dashboard.json` from the working directory, or defaults if it
    /// does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            log::info!("Reading configuration from {}", path.display());
            Self::load_from_path(path)
        } else {
            log::info!("No {CONFIG_FILE} found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be non-zero".into()));
        }
        if !self.slider_step.is_finite() || self.slider_step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "slider_step must be a positive number, got {}",
                self.slider_step
            )));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
