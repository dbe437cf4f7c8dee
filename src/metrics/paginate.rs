//! Pagination reconciler.

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::metrics::MetricsError;
use crate::models::FetchPage;
use crate::sources::{PageSource, Resource};
use crate::utils::ProgressReporter;

/// Fetch every item of `resource`, one page at a time.
///
/// Pages are requested strictly in order at offsets `0, page_size, ...` and
/// concatenated as received. The result holds exactly `total` items or the
/// call fails; partial results are never returned.
pub async fn fetch_all(
    source: &dyn PageSource,
    resource: &Resource,
    total: usize,
    page_size: usize,
    progress: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<Vec<Value>, MetricsError> {
    if page_size == 0 {
        return Err(MetricsError::InvalidArgument(
            "page size must be positive".to_string(),
        ));
    }

    let max = source.max_page_size().max(1);
    let rows = if page_size > max {
        tracing::debug!("Clamping page size {} to server maximum {}", page_size, max);
        max
    } else {
        page_size
    };

    let pages = FetchPage::page_count(total, rows);
    tracing::debug!("Fetching {} items of {} in {} pages", total, resource, pages);

    let mut items = Vec::with_capacity(total);
    for index in 0..pages {
        let page = FetchPage {
            start: index * rows,
            rows,
            total,
        };

        let batch = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::warn!("Fetch of {} cancelled after {} pages", resource, index);
                progress.abandon();
                return Err(MetricsError::Cancelled);
            }
            result = source.fetch_page(resource, page) => result.inspect_err(|_| progress.abandon())?,
        };

        if batch.is_empty() {
            progress.abandon();
            return Err(MetricsError::PaginationMismatch {
                expected: total,
                actual: items.len(),
            });
        }

        if batch.len() != page.expected_len() {
            tracing::debug!(
                "Page at offset {} returned {} items, expected {}",
                page.start,
                batch.len(),
                page.expected_len()
            );
        }

        items.extend(batch);
        progress.page(index + 1, pages);
    }
    progress.finish();

    if items.len() != total {
        return Err(MetricsError::PaginationMismatch {
            expected: total,
            actual: items.len(),
        });
    }

    Ok(items)
}
