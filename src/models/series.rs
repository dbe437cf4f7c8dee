//! Year-aligned numeric series.

use serde::{Deserialize, Serialize};

/// One named column of a [`YearSeries`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel name (used as the CSV column header)
    pub name: String,

    /// One value per year of the owning series
    pub values: Vec<f64>,
}

/// Ordered mapping from calendar year to one or more named channels.
///
/// Years are strictly ascending and every channel has exactly one value per
/// year. Build one with [`crate::metrics::align`]; the fields are private so
/// that invariant cannot be broken afterwards, and deserialization checks it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesParts")]
pub struct YearSeries {
    years: Vec<i32>,
    channels: Vec<Channel>,
}

#[derive(Deserialize)]
struct SeriesParts {
    years: Vec<i32>,
    channels: Vec<Channel>,
}

impl TryFrom<SeriesParts> for YearSeries {
    type Error = String;

    fn try_from(parts: SeriesParts) -> Result<Self, Self::Error> {
        if !parts.years.windows(2).all(|w| w[0] < w[1]) {
            return Err("years must be strictly ascending".to_string());
        }
        if let Some(c) = parts
            .channels
            .iter()
            .find(|c| c.values.len() != parts.years.len())
        {
            return Err(format!(
                "channel '{}' has {} values for {} years",
                c.name,
                c.values.len(),
                parts.years.len()
            ));
        }
        Ok(Self::from_parts(parts.years, parts.channels))
    }
}

impl YearSeries {
    /// Assemble a series from an already aligned axis and channels.
    pub(crate) fn from_parts(years: Vec<i32>, channels: Vec<Channel>) -> Self {
        debug_assert!(years.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(channels.iter().all(|c| c.values.len() == years.len()));
        Self { years, channels }
    }

    /// The shared year axis
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// All channels, in the order they were supplied
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Channel names, in column order
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.name.as_str())
    }

    /// Values of the named channel
    pub fn channel(&self, name: &str) -> Option<&[f64]> {
        self.channels
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Value of a channel at a given year (0 when the year is outside the axis)
    pub fn value_at(&self, name: &str, year: i32) -> Option<f64> {
        let values = self.channel(name)?;
        Some(
            self.years
                .binary_search(&year)
                .map(|i| values[i])
                .unwrap_or(0.0),
        )
    }

    /// Number of years on the axis
    pub fn len(&self) -> usize {
        self.years.len()
    }

    /// True when the series has no years
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Sum of a channel over all years
    pub fn sum(&self, name: &str) -> Option<f64> {
        self.channel(name).map(|v| v.iter().sum())
    }

    /// Append the element-wise difference `minuend - subtrahend` as a new channel.
    ///
    /// Returns `false` (and leaves the series untouched) if either input
    /// channel does not exist.
    pub fn push_difference(&mut self, minuend: &str, subtrahend: &str, name: &str) -> bool {
        let (Some(a), Some(b)) = (self.channel(minuend), self.channel(subtrahend)) else {
            return false;
        };
        let values = a.iter().zip(b).map(|(x, y)| x - y).collect();
        self.channels.push(Channel {
            name: name.to_string(),
            values,
        });
        true
    }

    /// First year in which any channel is non-zero
    pub fn first_active_year(&self) -> Option<i32> {
        (0..self.years.len())
            .find(|&i| self.channels.iter().any(|c| c.values[i] != 0.0))
            .map(|i| self.years[i])
    }

    /// Iterate over rows of `(year, values in channel order)`
    pub fn rows(&self) -> impl Iterator<Item = (i32, Vec<f64>)> + '_ {
        self.years.iter().enumerate().map(move |(i, &year)| {
            let values = self.channels.iter().map(|c| c.values[i]).collect();
            (year, values)
        })
    }
}
