//! Progress tracking for paginated fetches.
//!
//! Every update is emitted as a `tracing` event. When stderr is a terminal
//! and the reporter is not quiet, an indicatif bar is drawn as well.
//!
//! # Usage
//!
//! ```ignore
//! use ads_metrics::utils::ProgressReporter;
//!
//! let reporter = ProgressReporter::new("Fetching records", 3);
//! for page in 1..=3 {
//!     // Fetch a page...
//!     reporter.page(page, 3);
//! }
//! reporter.finish();
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Progress reporter with optional terminal output
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    /// Name of the operation being tracked
    name: String,

    /// Total units of work (0 if unknown)
    total: usize,

    /// Current progress
    current: Arc<AtomicUsize>,

    /// Start time for the completion summary
    start_time: Instant,

    /// Terminal bar, absent in quiet mode or when stderr is not a TTY
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Create a new progress reporter
    ///
    /// - `name`: Description of the operation
    /// - `total`: Total number of units of work (0 for indeterminate)
    pub fn new(name: &str, total: usize) -> Self {
        let bar = std::io::stderr().is_terminal().then(|| {
            let pb = ProgressBar::new(total as u64);
            if let Ok(style) =
                ProgressStyle::with_template("{msg} {wide_bar:.cyan/blue} {pos}/{len} pages")
            {
                pb.set_style(style.progress_chars("█▉ "));
            }
            pb.set_message(name.to_string());
            pb
        });

        Self {
            bar,
            ..Self::quiet(name, total)
        }
    }

    /// Create a reporter that only emits tracing events
    pub fn quiet(name: &str, total: usize) -> Self {
        Self {
            name: name.to_string(),
            total,
            current: Arc::new(AtomicUsize::new(0)),
            start_time: Instant::now(),
            bar: None,
        }
    }

    /// Record that page `index` (1-based) of `count` has been fetched
    pub fn page(&self, index: usize, count: usize) {
        tracing::info!("{}: Pagination {} out of {}", self.name, index, count);
        self.current.store(index, Ordering::SeqCst);
        if let Some(bar) = &self.bar {
            bar.set_position(index as u64);
        }
    }

    /// Finish the progress and log final stats
    pub fn finish(&self) {
        let current = self.current();
        let elapsed = self.start_time.elapsed();

        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
        tracing::debug!(
            "{}: completed {}/{} in {:?}",
            self.name,
            current,
            self.total,
            elapsed
        );
    }

    /// Abandon the bar without a completion line (used on failure)
    pub fn abandon(&self) {
        if let Some(bar) = &self.bar {
            bar.abandon();
        }
    }

    /// Get the current progress count
    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }
}
