//! Scalar bibliometric indicators.

use serde::{Deserialize, Serialize};

/// Scalar indicators computed once per fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// Number of items the indicators were computed over
    pub paper_count: usize,

    /// Sum of citation counts
    pub total_citations: u64,

    /// Mean citations per item
    pub average_citations: f64,

    /// Median citations per item
    pub median_citations: f64,

    /// Sum of read counts
    pub total_reads: u64,

    /// Mean reads per item
    pub average_reads: f64,

    /// Median reads per item
    pub median_reads: f64,

    /// Hirsch index over citation counts
    pub h: usize,

    /// Egghe g-index over citation counts
    pub g: usize,

    /// Items with at least 10 citations
    pub i10: usize,

    /// Items with at least 100 citations
    pub i100: usize,

    /// h-index divided by career length in years
    pub m: f64,

    /// Hirsch index over read counts
    pub read_h: usize,
}

impl IndicatorSet {
    /// True when no items contributed
    pub fn is_empty(&self) -> bool {
        self.paper_count == 0
    }
}
