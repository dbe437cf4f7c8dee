//! Core data models for bibliometric records and derived series.

mod facet;
mod indicators;
mod library;
mod record;
mod series;
mod step;
mod summary;

pub use facet::PivotField;
pub use indicators::IndicatorSet;
pub use library::{Library, LibraryContents};
pub use record::{FetchPage, Record};
pub use series::{Channel, YearSeries};
pub use step::{LabeledStepPath, StepPath};
pub use summary::{BasicStats, CitationStats, Indicators, MetricsSummary, SummaryRow};
