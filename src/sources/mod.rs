//! Transport layer for the NASA ADS API.
//!
//! This module defines the [`PageSource`] trait the pagination reconciler
//! drives, the [`AdsClient`] that implements it over HTTP, and a
//! [`MockSource`] for tests.
//!
//! Every fetch carries its configuration explicitly: the client is built from
//! an [`ApiConfig`](crate::config::ApiConfig) value and holds no process-wide
//! credential state.

mod ads;
pub mod mock;

pub use ads::{
    AdsClient, SearchPage, ADS_API_BASE, LIBRARY_PAGE_SIZE, MAX_METRICS_BIBCODES,
    MAX_SEARCH_ROWS, RECORD_FIELDS,
};
pub use mock::MockSource;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::FetchPage;

/// A paginated collection on the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// Documents matching a search query
    Search {
        /// Query string (e.g. `orcid:0000-0001-2345-6789`)
        query: String,
        /// Comma-separated field list (`fl`)
        fields: String,
        /// Sort clause, if any
        sort: Option<String>,
    },

    /// Bibcodes stored in a private library
    Library(String),
}

impl Resource {
    /// Search resource returning the per-article fields used for records
    pub fn records(query: impl Into<String>) -> Self {
        Resource::Search {
            query: query.into(),
            fields: RECORD_FIELDS.to_string(),
            sort: Some("date desc".to_string()),
        }
    }

    /// Short identifier used in log lines
    pub fn id(&self) -> &str {
        match self {
            Resource::Search { query, .. } => query,
            Resource::Library(id) => id,
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resource::Search { query, .. } => write!(f, "search '{}'", query),
            Resource::Library(id) => write!(f, "library {}", id),
        }
    }
}

/// A server that can return one bounded page of a [`Resource`] at a time.
///
/// Implementations return the raw JSON items of the page in server order.
/// They must not retry; failures surface to the caller immediately.
#[async_trait]
pub trait PageSource: Send + Sync + std::fmt::Debug {
    /// Largest page size the server accepts
    fn max_page_size(&self) -> usize;

    /// Fetch the items in `page.start .. page.start + page.rows`
    async fn fetch_page(
        &self,
        resource: &Resource,
        page: FetchPage,
    ) -> Result<Vec<Value>, SourceError>;
}

/// Errors that can occur when talking to the API
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error (includes request timeouts)
    #[error("Network error: {0}")]
    Network(String),

    /// Response body did not have the expected structure
    #[error("Parse error: {0}")]
    Parse(String),

    /// Non-success status returned by the API
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Client could not be configured (missing token, bad endpoint)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

impl From<url::ParseError> for SourceError {
    fn from(err: url::ParseError) -> Self {
        SourceError::Config(format!("invalid endpoint URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_display() {
        assert_eq!(
            Resource::records("orcid:0000-0002").to_string(),
            "search 'orcid:0000-0002'"
        );
        assert_eq!(Resource::Library("abc".into()).to_string(), "library abc");
        assert_eq!(Resource::Library("abc".into()).id(), "abc");
    }

    #[test]
    fn test_error_display() {
        let err = SourceError::Api {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert_eq!(err.to_string(), "API error (status 401): Unauthorized");
    }
}
