//! Mock page source for testing purposes.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use crate::models::FetchPage;
use crate::sources::{PageSource, Resource, SourceError};

/// A mock source that serves pages out of a fixed item list and records every request.
#[derive(Debug)]
pub struct MockSource {
    items: Vec<Value>,
    max_page_size: usize,
    fail_at_start: Option<usize>,
    drop_last: usize,
    requests: Mutex<Vec<FetchPage>>,
}

impl MockSource {
    /// Create a mock source serving `items`
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items,
            max_page_size: 2000,
            fail_at_start: None,
            drop_last: 0,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock source serving `count` synthetic documents
    pub fn with_documents(count: usize) -> Self {
        Self::new(
            (0..count)
                .map(|i| serde_json::json!({ "bibcode": format!("doc{:04}", i) }))
                .collect(),
        )
    }

    /// Cap the page size the source reports
    pub fn with_max_page_size(mut self, max: usize) -> Self {
        self.max_page_size = max;
        self
    }

    /// Fail the page that starts at `start`
    pub fn fail_at(mut self, start: usize) -> Self {
        self.fail_at_start = Some(start);
        self
    }

    /// Pretend the server lost the last `n` items
    pub fn drop_last(mut self, n: usize) -> Self {
        self.drop_last = n;
        self
    }

    /// Pages requested so far, in order
    pub fn requests(&self) -> Vec<FetchPage> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PageSource for MockSource {
    fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    async fn fetch_page(
        &self,
        _resource: &Resource,
        page: FetchPage,
    ) -> Result<Vec<Value>, SourceError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(page);
        }

        if self.fail_at_start == Some(page.start) {
            return Err(SourceError::Parse(format!(
                "mock failure at offset {}",
                page.start
            )));
        }

        let available = self.items.len().saturating_sub(self.drop_last);
        let start = page.start.min(available);
        let end = (page.start + page.rows).min(available);
        Ok(self.items[start..end].to_vec())
    }
}
