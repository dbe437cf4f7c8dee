//! Configuration management.

pub mod file_config;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sources::{ADS_API_BASE, MAX_SEARCH_ROWS};

/// Environment variables checked for an ADS API token, in order
pub const TOKEN_ENV_VARS: [&str; 2] = ["ADS_DEV_KEY", "ADS_API_TOKEN"];

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API endpoint and credentials
    #[serde(default)]
    pub api: ApiConfig,

    /// Export settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Everything a fetch needs to reach the API.
///
/// Passed explicitly to [`AdsClient::new`](crate::sources::AdsClient::new);
/// nothing is read from global state once the client exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the ADS API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer token
    #[serde(default)]
    pub token: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Rows requested per search page (clamped to the server maximum)
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            token: None,
            timeout_secs: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Fill in the token from the environment or the credential file if unset.
    ///
    /// Lookup order: `ADS_DEV_KEY`, `ADS_API_TOKEN`, then `~/.ads/dev_key`.
    pub fn resolve_token(mut self) -> Self {
        if self.token.as_deref().is_some_and(|t| !t.trim().is_empty()) {
            return self;
        }

        self.token = TOKEN_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .map(|t| t.trim().to_string())
            .find(|t| !t.is_empty())
            .or_else(|| credential_file().and_then(|p| read_token_file(&p)));

        if self.token.is_none() {
            tracing::warn!(
                "No ADS token found; set ADS_DEV_KEY or write it to ~/.ads/dev_key"
            );
        }
        self
    }
}

fn default_endpoint() -> String {
    ADS_API_BASE.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> usize {
    MAX_SEARCH_ROWS
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory that CSV/JSON/text exports are written to
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// Default export format (`csv` or `json`)
    #[serde(default = "default_output_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            format: default_output_format(),
        }
    }
}

fn default_output_format() -> String {
    "csv".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Location of the legacy ADS credential file (`~/.ads/dev_key`)
pub fn credential_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ads").join("dev_key"))
}

/// Read a token from a file, ignoring surrounding whitespace
pub fn read_token_file(path: &Path) -> Option<String> {
    let token = std::fs::read_to_string(path).ok()?.trim().to_string();
    if token.is_empty() {
        None
    } else {
        tracing::debug!("Loaded ADS token from {}", path.display());
        Some(token)
    }
}

/// Load configuration from a file, layered with `ADS_METRICS_*` environment variables
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("ADS_METRICS").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Look for a configuration file in the working directory, then the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("ads-metrics.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("ads-metrics").join("config.toml"))
        .filter(|p| p.is_file())
}

/// Get the default configuration
pub fn get_config() -> Config {
    Config::default()
}
