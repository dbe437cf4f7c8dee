//! HTTP client utilities.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::sources::SourceError;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client with bearer authentication and a bounded per-request timeout
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client from an explicit API configuration.
    ///
    /// Fails if the token is missing or cannot be sent as a header value.
    pub fn new(config: &ApiConfig) -> Result<Self, SourceError> {
        let token = config
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| SourceError::Config("no ADS API token configured".to_string()))?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|e| SourceError::Config(format!("invalid token: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(10).min(config.timeout()))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| SourceError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }
}
