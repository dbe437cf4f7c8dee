//! Order-statistic indicators over citation and read counts.
//!
//! All functions are pure and return 0 for empty input.

use crate::models::{IndicatorSet, Record};

fn sorted_desc(counts: &[u64]) -> Vec<u64> {
    let mut sorted = counts.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted
}

/// Hirsch index: the largest `h` such that `h` items have at least `h` counts each.
pub fn h_index(counts: &[u64]) -> usize {
    let sorted = sorted_desc(counts);
    sorted
        .iter()
        .enumerate()
        .position(|(i, &c)| (i as u64) >= c)
        .unwrap_or(sorted.len())
}

/// Egghe g-index: the largest `g` such that the top `g` items sum to at least `g²`.
pub fn g_index(counts: &[u64]) -> usize {
    let mut running: u128 = 0;
    let mut g = 0;
    for (i, &c) in sorted_desc(counts).iter().enumerate() {
        running += u128::from(c);
        let rank = (i + 1) as u128;
        if running >= rank * rank {
            g = i + 1;
        }
    }
    g
}

/// Number of items with a count of at least `threshold`
pub fn i_index(counts: &[u64], threshold: u64) -> usize {
    counts.iter().filter(|&&c| c >= threshold).count()
}

/// h-index divided by the career length in years (0 for an empty career)
pub fn m_quotient(h: usize, first_year: i32, current_year: i32) -> f64 {
    let span = i64::from(current_year) - i64::from(first_year) + 1;
    if span <= 0 {
        0.0
    } else {
        h as f64 / span as f64
    }
}

/// Median of the counts (mean of the two middle values for even lengths)
pub fn median(counts: &[u64]) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }
    let mut sorted = counts.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[mid] as f64
    }
}

fn mean(total: u64, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        total as f64 / n as f64
    }
}

impl IndicatorSet {
    /// Compute every indicator from per-article records.
    ///
    /// The m-quotient uses the earliest record year as the start of the career.
    pub fn from_records(records: &[Record], current_year: i32) -> Self {
        let citations: Vec<u64> = records.iter().map(|r| r.citation_count).collect();
        let reads: Vec<u64> = records.iter().map(|r| r.read_count).collect();

        let mut set = Self::from_counts(&citations, &reads);
        if let Some(first_year) = records.iter().map(|r| r.year).min() {
            set.m = m_quotient(set.h, first_year, current_year);
        }
        set
    }

    /// Compute indicators from bare count multisets (no year information, so `m` is 0).
    ///
    /// The paper count is the length of `citations`.
    pub fn from_counts(citations: &[u64], reads: &[u64]) -> Self {
        let total_citations: u64 = citations.iter().sum();
        let total_reads: u64 = reads.iter().sum();

        Self {
            paper_count: citations.len(),
            total_citations,
            average_citations: mean(total_citations, citations.len()),
            median_citations: median(citations),
            total_reads,
            average_reads: mean(total_reads, reads.len()),
            median_reads: median(reads),
            h: h_index(citations),
            g: g_index(citations),
            i10: i_index(citations, 10),
            i100: i_index(citations, 100),
            m: 0.0,
            read_h: h_index(reads),
        }
    }

    /// Indicators over the refereed subset of `records`
    pub fn refereed_from_records(records: &[Record], current_year: i32) -> Self {
        let refereed: Vec<Record> = records.iter().filter(|r| r.refereed).cloned().collect();
        Self::from_records(&refereed, current_year)
    }
}
