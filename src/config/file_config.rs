//! Configuration file support for ads-metrics.
//!
//! This module provides plain TOML parsing and writing of the configuration
//! file. [`load_config`](super::load_config) layers environment variables on
//! top of the same format.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! endpoint = "https://api.adsabs.harvard.edu/v1"
//! token = "your-ads-token"
//! timeout_secs = 30
//! page_size = 2000
//!
//! [output]
//! directory = "./metrics"
//! format = "csv"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every key can be overridden from the environment with the
//! `ADS_METRICS__<SECTION>__<KEY>` form, e.g. `ADS_METRICS__API__TIMEOUT_SECS=60`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{ApiConfig, Config, LoggingConfig, OutputConfig};

/// Configuration file structure
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// API section
    #[serde(default)]
    pub api: ApiConfig,

    /// Output section
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging section
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Config {
            api: file.api,
            output: file.output,
            logging: file.logging,
        }
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
