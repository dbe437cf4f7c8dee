//! Per-article bibliographic record and pagination state.

use serde::{Deserialize, Serialize};

/// One bibliographic item, as normalized from an ADS search document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// ADS bibcode (unique within a fetch)
    pub bibcode: String,

    /// Publication year
    pub year: i32,

    /// Whether the item carries the `REFEREED` property
    pub refereed: bool,

    /// Number of citations
    pub citation_count: u64,

    /// Number of reads
    pub read_count: u64,
}

impl Record {
    /// Create a new record
    pub fn new(bibcode: impl Into<String>, year: i32) -> Self {
        Self {
            bibcode: bibcode.into(),
            year,
            refereed: false,
            citation_count: 0,
            read_count: 0,
        }
    }

    /// Mark the record as refereed
    pub fn refereed(mut self, refereed: bool) -> Self {
        self.refereed = refereed;
        self
    }

    /// Set the citation count
    pub fn citations(mut self, count: u64) -> Self {
        self.citation_count = count;
        self
    }

    /// Set the read count
    pub fn reads(mut self, count: u64) -> Self {
        self.read_count = count;
        self
    }
}

/// Window of a paginated request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchPage {
    /// Offset of the first item on this page
    pub start: usize,

    /// Page size requested
    pub rows: usize,

    /// Total item count declared by the server
    pub total: usize,
}

impl FetchPage {
    /// Number of pages needed to cover `total` items at `rows` per page
    pub fn page_count(total: usize, rows: usize) -> usize {
        if rows == 0 {
            0
        } else {
            total.div_ceil(rows)
        }
    }

    /// Items this page is expected to hold if the server is consistent
    pub fn expected_len(&self) -> usize {
        self.total.saturating_sub(self.start).min(self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = Record::new("2020ApJ...1..1A", 2020)
            .refereed(true)
            .citations(12)
            .reads(40);
        assert_eq!(record.year, 2020);
        assert!(record.refereed);
        assert_eq!(record.citation_count, 12);
        assert_eq!(record.read_count, 40);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(FetchPage::page_count(55, 25), 3);
        assert_eq!(FetchPage::page_count(50, 25), 2);
        assert_eq!(FetchPage::page_count(0, 25), 0);
        assert_eq!(FetchPage::page_count(10, 0), 0);
    }

    #[test]
    fn test_expected_len() {
        let last = FetchPage {
            start: 50,
            rows: 25,
            total: 55,
        };
        assert_eq!(last.expected_len(), 5);
    }
}
