//! Normalization of raw ADS payloads into records, series and distributions.
//!
//! The caller always says which shape it holds by choosing a [`RawPayload`]
//! variant; nothing here tries to guess a payload's shape from its keys.

use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::metrics::{align, MetricsError};
use crate::models::{PivotField, Record, YearSeries};

/// Facet category for refereed items
const REFEREED: &str = "refereed";

/// Facet category for non-refereed items
const NOT_REFEREED: &str = "notrefereed";

/// Property flag marking a refereed article
const REFEREED_PROPERTY: &str = "REFEREED";

const YEAR_PATTERN: &str = r"^(\d{4})(?:-|$)";

static YEAR_RE: OnceLock<Regex> = OnceLock::new();

/// A raw payload, tagged by the endpoint it came from
#[derive(Debug, Clone)]
pub enum RawPayload {
    /// `category -> year -> count` mapping from the metrics endpoint
    Histogram { categories: Map<String, Value> },

    /// Search documents carrying per-article fields
    Articles(Vec<Value>),

    /// Entries of `facet_counts.facet_pivot["property,<field>"]`
    FacetPivot {
        field: PivotField,
        entries: Vec<Value>,
    },
}

/// Result of normalizing a [`RawPayload`]
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    /// Year-aligned channels
    Series(YearSeries),

    /// Per-article records, in input order
    Records(Vec<Record>),

    /// A count multiset sorted in descending order
    Distribution(Vec<u64>),
}

/// Normalize a tagged payload
pub fn normalize(payload: RawPayload) -> Result<Normalized, MetricsError> {
    match payload {
        RawPayload::Histogram { categories } => {
            Ok(Normalized::Series(align(histogram_channels(&categories)?)))
        }
        RawPayload::Articles(items) => Ok(Normalized::Records(parse_records(&items)?)),
        RawPayload::FacetPivot {
            field: PivotField::Year,
            entries,
        } => Ok(Normalized::Series(facet_years(&entries)?)),
        RawPayload::FacetPivot { field, entries } => {
            Ok(Normalized::Distribution(facet_distribution(field, &entries)?))
        }
    }
}

/// Extract a four-digit year from `YYYY` or a `YYYY-...` date
pub fn parse_year(raw: &str) -> Option<i32> {
    let re = YEAR_RE
        .get_or_init(|| Regex::new(YEAR_PATTERN).expect("YEAR_PATTERN is a valid regex"));
    re.captures(raw.trim())?.get(1)?.as_str().parse().ok()
}

/// A JSON integer year, held to the same four digits as [`parse_year`]
fn numeric_year(n: &serde_json::Number) -> Option<i32> {
    n.as_i64()
        .filter(|y| (1000..=9999).contains(y))
        .and_then(|y| i32::try_from(y).ok())
}

/// Parse search documents into records
pub fn parse_records(items: &[Value]) -> Result<Vec<Record>, MetricsError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_record(i, item))
        .collect()
}

/// Extract bibcodes from library documents (plain strings) or search documents
pub fn parse_bibcodes(items: &[Value]) -> Result<Vec<String>, MetricsError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let bibcode = match item {
                Value::String(s) => Some(s.trim()),
                Value::Object(doc) => doc.get("bibcode").and_then(Value::as_str).map(str::trim),
                _ => None,
            };
            bibcode
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or_else(|| MetricsError::malformed(format!("document {}", i), "missing bibcode"))
        })
        .collect()
}

fn parse_record(index: usize, item: &Value) -> Result<Record, MetricsError> {
    let doc = item.as_object().ok_or_else(|| {
        MetricsError::malformed(format!("document {}", index), "not a JSON object")
    })?;

    let bibcode = doc
        .get("bibcode")
        .or_else(|| doc.get("id"))
        .and_then(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .ok_or_else(|| {
            MetricsError::malformed(format!("document {}", index), "missing bibcode")
        })?;

    let year = record_year(doc)
        .map_err(|reason| MetricsError::malformed(bibcode.as_str(), reason))?;

    let refereed = doc
        .get("property")
        .and_then(Value::as_array)
        .is_some_and(|props| props.iter().any(|p| p.as_str() == Some(REFEREED_PROPERTY)));

    let citations = count_field(doc, "citation_count", &bibcode)?;
    let reads = count_field(doc, "read_count", &bibcode)?;

    Ok(Record::new(bibcode, year)
        .refereed(refereed)
        .citations(citations)
        .reads(reads))
}

fn record_year(doc: &Map<String, Value>) -> Result<i32, String> {
    match doc.get("year") {
        Some(Value::String(s)) => {
            return parse_year(s).ok_or_else(|| format!("invalid year '{}'", s));
        }
        Some(Value::Number(n)) => {
            return numeric_year(n).ok_or_else(|| format!("invalid year {}", n));
        }
        Some(Value::Null) | None => {}
        Some(other) => return Err(format!("invalid year {}", other)),
    }

    match doc.get("pubdate").and_then(Value::as_str) {
        Some(pubdate) => parse_year(pubdate).ok_or_else(|| format!("invalid pubdate '{}'", pubdate)),
        None => Err("no year or pubdate".to_string()),
    }
}

/// Non-negative integer field; absent or null reads as 0
fn count_field(doc: &Map<String, Value>, field: &str, context: &str) -> Result<u64, MetricsError> {
    match doc.get(field) {
        None | Some(Value::Null) => Ok(0),
        Some(value) => number_count(value)
            .ok_or_else(|| MetricsError::malformed(context, format!("invalid {} {}", field, value))),
    }
}

/// A non-negative integral JSON number
fn number_count(value: &Value) -> Option<u64> {
    let Value::Number(n) = value else {
        return None;
    };
    n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
            .map(|f| f as u64)
    })
}

/// A facet pivot key; Solr sends these as strings
fn pivot_count(value: &Value) -> Option<u64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        other => number_count(other),
    }
}

/// Per-year publication totals and refereed counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationCounts {
    /// Ascending years with at least one record
    pub years: Vec<i32>,

    /// All records per year
    pub total: Vec<u64>,

    /// Refereed records per year
    pub refereed: Vec<u64>,
}

impl PublicationCounts {
    /// Non-refereed records per year
    pub fn unrefereed(&self) -> Vec<u64> {
        self.total
            .iter()
            .zip(&self.refereed)
            .map(|(t, r)| t.saturating_sub(*r))
            .collect()
    }
}

impl From<PublicationCounts> for YearSeries {
    fn from(counts: PublicationCounts) -> Self {
        let channel = |values: &[u64]| -> BTreeMap<i32, f64> {
            counts
                .years
                .iter()
                .copied()
                .zip(values.iter().map(|&v| v as f64))
                .collect()
        };
        align([
            ("total", channel(&counts.total)),
            ("refereed", channel(&counts.refereed)),
        ])
    }
}

/// Count records per year, split into total and refereed
pub fn publication_counts(records: &[Record]) -> PublicationCounts {
    let mut buckets: BTreeMap<i32, (u64, u64)> = BTreeMap::new();
    for record in records {
        let bucket = buckets.entry(record.year).or_default();
        bucket.0 += 1;
        if record.refereed {
            bucket.1 += 1;
        }
    }

    let mut counts = PublicationCounts::default();
    for (year, (total, refereed)) in buckets {
        counts.years.push(year);
        counts.total.push(total);
        counts.refereed.push(refereed);
    }
    counts
}

fn histogram_channels(
    categories: &Map<String, Value>,
) -> Result<Vec<(String, BTreeMap<i32, f64>)>, MetricsError> {
    categories
        .iter()
        .map(|(name, by_year)| {
            let by_year = by_year.as_object().ok_or_else(|| {
                MetricsError::malformed(name.as_str(), "histogram category is not an object")
            })?;

            let mut values = BTreeMap::new();
            for (key, count) in by_year {
                let year = parse_year(key).ok_or_else(|| {
                    MetricsError::malformed(name.as_str(), format!("invalid year '{}'", key))
                })?;
                let value = count
                    .as_f64()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .ok_or_else(|| {
                        MetricsError::malformed(
                            name.as_str(),
                            format!("invalid count {} for {}", count, key),
                        )
                    })?;
                *values.entry(year).or_insert(0.0) += value;
            }
            Ok((name.clone(), values))
        })
        .collect()
}

fn subtree<'a>(metrics: &'a Value, path: &[&str]) -> Result<&'a Map<String, Value>, MetricsError> {
    path.iter()
        .try_fold(metrics, |node, key| node.get(key))
        .and_then(Value::as_object)
        .ok_or_else(|| MetricsError::malformed("metrics", format!("missing '{}'", path.join("."))))
}

/// Publication histogram (`histograms.publications`) of a metrics response
pub fn publication_histogram(metrics: &Value) -> Result<YearSeries, MetricsError> {
    Ok(align(histogram_channels(subtree(
        metrics,
        &["histograms", "publications"],
    )?)?))
}

/// Citation histogram (`histograms.citations`) of a metrics response
pub fn citation_histogram(metrics: &Value) -> Result<YearSeries, MetricsError> {
    Ok(align(histogram_channels(subtree(
        metrics,
        &["histograms", "citations"],
    )?)?))
}

/// Read histogram (`histograms.reads`) of a metrics response
pub fn read_histogram(metrics: &Value) -> Result<YearSeries, MetricsError> {
    Ok(align(histogram_channels(subtree(
        metrics,
        &["histograms", "reads"],
    )?)?))
}

/// Indicator time series (`time series`) with `read10` scaled down by 10
pub fn time_series(metrics: &Value) -> Result<YearSeries, MetricsError> {
    let mut channels = histogram_channels(subtree(metrics, &["time series"])?)?;
    for (name, values) in channels.iter_mut() {
        if name == "read10" {
            values.values_mut().for_each(|v| *v /= 10.0);
        }
    }
    Ok(align(channels))
}

/// Flatten the refereed and non-refereed pivots into `(category, value, count)` triples
fn pivot_pairs(entries: &[Value]) -> Result<Vec<(&str, &Value, u64)>, MetricsError> {
    let mut pairs = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let category = match entry.get("value") {
            Some(Value::String(category)) => category.as_str(),
            Some(other) => {
                return Err(MetricsError::malformed(
                    format!("facet entry {}", index),
                    format!("category {} is not a string", other),
                ))
            }
            None => {
                return Err(MetricsError::malformed(
                    format!("facet entry {}", index),
                    "missing category value",
                ))
            }
        };
        if category != REFEREED && category != NOT_REFEREED {
            continue;
        }

        let items = match entry.get("pivot") {
            Some(Value::Array(items)) => items.as_slice(),
            None | Some(Value::Null) => &[],
            Some(_) => return Err(MetricsError::malformed(category, "pivot is not a list")),
        };
        for item in items {
            let value = item
                .get("value")
                .ok_or_else(|| MetricsError::malformed(category, "pivot entry without value"))?;
            let count = item.get("count").and_then(number_count).ok_or_else(|| {
                MetricsError::malformed(category, format!("invalid count for pivot value {}", value))
            })?;
            pairs.push((category, value, count));
        }
    }
    Ok(pairs)
}

fn facet_years(entries: &[Value]) -> Result<YearSeries, MetricsError> {
    let mut refereed = BTreeMap::new();
    let mut unrefereed = BTreeMap::new();

    for (category, value, count) in pivot_pairs(entries)? {
        let year = match value {
            Value::String(s) => parse_year(s),
            Value::Number(n) => numeric_year(n),
            _ => None,
        }
        .ok_or_else(|| MetricsError::malformed(category, format!("invalid year {}", value)))?;

        let target = if category == REFEREED {
            &mut refereed
        } else {
            &mut unrefereed
        };
        *target.entry(year).or_insert(0.0) += count as f64;
    }

    Ok(align([("unrefereed", unrefereed), ("refereed", refereed)]))
}

fn facet_distribution(field: PivotField, entries: &[Value]) -> Result<Vec<u64>, MetricsError> {
    let mut multiset = Vec::new();
    for (category, value, count) in pivot_pairs(entries)? {
        let value = pivot_count(value).ok_or_else(|| {
            MetricsError::malformed(category, format!("invalid {} {}", field, value))
        })?;
        multiset.extend(std::iter::repeat(value).take(count as usize));
    }
    multiset.sort_unstable_by(|a, b| b.cmp(a));
    Ok(multiset)
}
