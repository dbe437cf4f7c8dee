//! Utility modules supporting metrics operations.
//!
//! - [`HttpClient`]: authenticated HTTP client with a bounded timeout
//! - [`ProgressReporter`]: per-page progress logging with an optional terminal bar
//! - `save_*` / `write_*`: CSV, JSON and text exports
//! - `*_table`: comfy-table renderings for the terminal
//!
//! # Exporting a series
//!
//! ```rust,no_run
//! use ads_metrics::metrics::align;
//! use ads_metrics::utils::save_series;
//! use std::collections::BTreeMap;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let series = align([("refereed", BTreeMap::from([(2020, 3.0)]))]);
//! save_series(std::path::Path::new("number.csv"), &series)?;
//! # Ok(())
//! # }
//! ```

mod display;
mod export;
mod http;
mod progress;

pub use display::{indicator_table, library_table, series_table, summary_table};
pub use export::{
    format_value, save_distribution, save_json, save_libraries, save_records, save_series,
    save_step_paths, save_summary, write_distribution, write_libraries, write_records,
    write_series, write_step_paths, write_summary,
};
pub use http::{HttpClient, USER_AGENT};
pub use progress::ProgressReporter;
