//! Scalar statistics returned by the ADS `/metrics` endpoint.

use serde::{Deserialize, Serialize};

/// Paper, read and download statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicStats {
    #[serde(rename = "number of papers")]
    pub number_of_papers: f64,

    #[serde(rename = "normalized paper count")]
    pub normalized_paper_count: f64,

    #[serde(rename = "total number of reads")]
    pub total_reads: f64,

    #[serde(rename = "average number of reads")]
    pub average_reads: f64,

    #[serde(rename = "median number of reads")]
    pub median_reads: f64,

    #[serde(rename = "total number of downloads")]
    pub total_downloads: f64,

    #[serde(rename = "average number of downloads")]
    pub average_downloads: f64,

    #[serde(rename = "median number of downloads")]
    pub median_downloads: f64,
}

/// Citation statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitationStats {
    #[serde(rename = "number of citing papers")]
    pub citing_papers: f64,

    #[serde(rename = "total number of citations")]
    pub total_citations: f64,

    #[serde(rename = "number of self-citations")]
    pub self_citations: f64,

    #[serde(rename = "average number of citations")]
    pub average_citations: f64,

    #[serde(rename = "median number of citations")]
    pub median_citations: f64,

    #[serde(rename = "normalized number of citations")]
    pub normalized_citations: f64,

    #[serde(rename = "total number of refereed citations")]
    pub total_refereed_citations: f64,

    #[serde(rename = "average number of refereed citations")]
    pub average_refereed_citations: f64,

    #[serde(rename = "median number of refereed citations")]
    pub median_refereed_citations: f64,

    #[serde(rename = "normalized number of refereed citations")]
    pub normalized_refereed_citations: f64,
}

/// Index-style indicators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Indicators {
    pub h: f64,
    pub m: f64,
    pub g: f64,
    pub i10: f64,
    pub i100: f64,
    pub tori: f64,
    pub riq: f64,
    pub read10: f64,
}

/// The scalar half of a `/metrics` response, for all papers and the refereed subset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    #[serde(rename = "basic stats", default)]
    pub basic: BasicStats,

    #[serde(rename = "basic stats refereed", default)]
    pub basic_refereed: BasicStats,

    #[serde(rename = "citation stats", default)]
    pub citations: CitationStats,

    #[serde(rename = "citation stats refereed", default)]
    pub citations_refereed: CitationStats,

    #[serde(rename = "indicators", default)]
    pub indicators: Indicators,

    #[serde(rename = "indicators refereed", default)]
    pub indicators_refereed: Indicators,
}

/// One line of a summary report: label, value for all papers, value for refereed papers
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub all: f64,
    pub refereed: f64,
    /// Whether the value is fractional and should be printed with one decimal
    pub fractional: bool,
}

impl MetricsSummary {
    /// Flatten into labelled rows, in report order
    pub fn rows(&self) -> Vec<SummaryRow> {
        let (b, br) = (&self.basic, &self.basic_refereed);
        let (c, cr) = (&self.citations, &self.citations_refereed);
        let (i, ir) = (&self.indicators, &self.indicators_refereed);

        let row = |label, all, refereed, fractional| SummaryRow {
            label,
            all,
            refereed,
            fractional,
        };

        vec![
            row("Number of papers", b.number_of_papers, br.number_of_papers, false),
            row("Normalized paper count", b.normalized_paper_count, br.normalized_paper_count, true),
            row("Number of citing papers", c.citing_papers, cr.citing_papers, false),
            row("Total citations", c.total_citations, cr.total_citations, false),
            row("Self-citations", c.self_citations, cr.self_citations, false),
            row("Average citations", c.average_citations, cr.average_citations, true),
            row("Median citations", c.median_citations, cr.median_citations, false),
            row("Normalized citations", c.normalized_citations, cr.normalized_citations, true),
            row("Refereed citations", c.total_refereed_citations, cr.total_refereed_citations, false),
            row("Average refereed citations", c.average_refereed_citations, cr.average_refereed_citations, true),
            row("Median refereed citations", c.median_refereed_citations, cr.median_refereed_citations, false),
            row("Normalized refereed citations", c.normalized_refereed_citations, cr.normalized_refereed_citations, true),
            row("h-index", i.h, ir.h, false),
            row("m-index", i.m, ir.m, true),
            row("g-index", i.g, ir.g, false),
            row("i10-index", i.i10, ir.i10, false),
            row("i100-index", i.i100, ir.i100, false),
            row("tori-index", i.tori, ir.tori, true),
            row("riq-index", i.riq, ir.riq, false),
            row("read10-index", i.read10, ir.read10, true),
            row("Total reads", b.total_reads, br.total_reads, false),
            row("Average reads", b.average_reads, br.average_reads, true),
            row("Median reads", b.median_reads, br.median_reads, false),
            row("Total downloads", b.total_downloads, br.total_downloads, false),
            row("Average downloads", b.average_downloads, br.average_downloads, true),
            row("Median downloads", b.median_downloads, br.median_downloads, false),
        ]
    }
}
