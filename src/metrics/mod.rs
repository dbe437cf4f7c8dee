//! Bibliometric computations.
//!
//! The pieces compose in one direction: [`fetch_all`] pulls raw pages from a
//! [`PageSource`](crate::sources::PageSource), [`normalize`] turns a tagged
//! [`RawPayload`] into records, series or distributions, [`align`] puts
//! per-year maps on a shared axis, and the indicator and step functions
//! derive scalars and plot paths from the result. Everything after the fetch
//! is pure.

mod align;
mod indicators;
mod normalize;
mod paginate;
mod step;

pub use align::align;
pub use indicators::{g_index, h_index, i_index, m_quotient, median};
pub use normalize::{
    citation_histogram, normalize, parse_bibcodes, parse_records, parse_year, publication_counts,
    publication_histogram, read_histogram, time_series, Normalized, PublicationCounts, RawPayload,
};
pub use paginate::fetch_all;
pub use step::build_step;

use crate::models::YearSeries;
use crate::sources::SourceError;

/// Errors produced while fetching or deriving metrics
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// The underlying request failed
    #[error(transparent)]
    Transport(#[from] SourceError),

    /// A raw item lacked a required field or carried an invalid value
    #[error("Malformed record ({context}): {reason}")]
    MalformedRecord { context: String, reason: String },

    /// The server returned a different number of items than it declared
    #[error("Pagination mismatch: expected {expected} items, got {actual}")]
    PaginationMismatch { expected: usize, actual: usize },

    /// A non-empty series was required
    #[error("No data to compute metrics from")]
    EmptySeries,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl MetricsError {
    pub(crate) fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        MetricsError::MalformedRecord {
            context: context.into(),
            reason: reason.into(),
        }
    }
}

/// Reject an empty series where the caller cannot proceed without data
pub fn require_non_empty(series: YearSeries) -> Result<YearSeries, MetricsError> {
    if series.is_empty() {
        Err(MetricsError::EmptySeries)
    } else {
        Ok(series)
    }
}
