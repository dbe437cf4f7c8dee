//! # ADS Metrics
//!
//! Bibliometric statistics for NASA ADS authors, queries and libraries.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`sources`]: The [`PageSource`](sources::PageSource) trait, the ADS REST client and a mock source
//! - [`metrics`]: Pagination, normalization, year alignment, indicators and step paths
//! - [`models`]: Core data structures (Record, YearSeries, IndicatorSet, StepPath, ...)
//! - [`utils`]: HTTP client, progress reporting, exports and terminal tables
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```rust,no_run
//! use ads_metrics::config::ApiConfig;
//! use ads_metrics::metrics::{fetch_all, parse_records, publication_counts};
//! use ads_metrics::sources::{AdsClient, Resource};
//! use ads_metrics::utils::ProgressReporter;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ApiConfig::default().resolve_token();
//! let client = AdsClient::new(&config)?;
//!
//! let query = "orcid:0000-0002-4110-3511";
//! let total = client.count(query).await?;
//! let docs = fetch_all(
//!     &client,
//!     &Resource::records(query),
//!     total,
//!     config.page_size,
//!     &ProgressReporter::quiet("records", total),
//!     &CancellationToken::new(),
//! )
//! .await?;
//!
//! let counts = publication_counts(&parse_records(&docs)?);
//! println!("{:?}", counts.years);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod metrics;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use metrics::MetricsError;
pub use models::{IndicatorSet, Record, StepPath, YearSeries};
pub use sources::{AdsClient, PageSource, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
