//! Year-bucket alignment.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Channel, YearSeries};

/// Put several per-year maps on one shared, ascending year axis.
///
/// The axis is the union of every channel's years. A channel missing a year
/// gets 0 there. Channels keep the order they were supplied in; a repeated
/// name is merged into its first occurrence by summation.
pub fn align<I, S>(channels: I) -> YearSeries
where
    I: IntoIterator<Item = (S, BTreeMap<i32, f64>)>,
    S: Into<String>,
{
    let mut merged: Vec<(String, BTreeMap<i32, f64>)> = Vec::new();
    for (name, values) in channels {
        let name = name.into();
        match merged.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => {
                for (year, value) in values {
                    *existing.entry(year).or_insert(0.0) += value;
                }
            }
            None => merged.push((name, values)),
        }
    }

    let years: Vec<i32> = merged
        .iter()
        .flat_map(|(_, values)| values.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let channels = merged
        .into_iter()
        .map(|(name, values)| Channel {
            values: years
                .iter()
                .map(|year| values.get(year).copied().unwrap_or(0.0))
                .collect(),
            name,
        })
        .collect();

    YearSeries::from_parts(years, channels)
}
