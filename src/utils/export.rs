//! CSV, JSON and plain-text exports.
//!
//! Every table starts with a `#`-prefixed header line so the files load
//! directly as commented-header text tables. Each `write_*` function targets
//! any [`Write`]r; the matching `save_*` function creates the file (and its
//! parent directories) first.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::metrics::MetricsError;
use crate::models::{LabeledStepPath, LibraryContents, MetricsSummary, Record, YearSeries};

/// Render a number without a trailing `.0` when it is integral
pub fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, MetricsError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    tracing::debug!("Writing {}", path.display());
    Ok(BufWriter::new(File::create(path)?))
}

/// `#year,<channel>,...` table, one row per year
pub fn write_series<W: Write>(writer: W, series: &YearSeries) -> Result<(), MetricsError> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["#year".to_string()];
    header.extend(series.channel_names().map(str::to_string));
    csv.write_record(&header)?;

    for (year, values) in series.rows() {
        let mut row = vec![year.to_string()];
        row.extend(values.into_iter().map(format_value));
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write a series table to `path`
pub fn save_series(path: &Path, series: &YearSeries) -> Result<(), MetricsError> {
    write_series(create(path)?, series)
}

/// `#bibcode,year,refereed,citation_count,read_count` table in fetch order
pub fn write_records<W: Write>(writer: W, records: &[Record]) -> Result<(), MetricsError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["#bibcode", "year", "refereed", "citation_count", "read_count"])?;
    for record in records {
        csv.write_record([
            record.bibcode.clone(),
            record.year.to_string(),
            record.refereed.to_string(),
            record.citation_count.to_string(),
            record.read_count.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write a per-record table to `path`
pub fn save_records(path: &Path, records: &[Record]) -> Result<(), MetricsError> {
    write_records(create(path)?, records)
}

/// `#index,<name>` table of a descending count multiset
pub fn write_distribution<W: Write>(
    writer: W,
    name: &str,
    values: &[u64],
) -> Result<(), MetricsError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["#index", name])?;
    for (index, value) in values.iter().enumerate() {
        csv.write_record([index.to_string(), value.to_string()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write a distribution table to `path`
pub fn save_distribution(path: &Path, name: &str, values: &[u64]) -> Result<(), MetricsError> {
    write_distribution(create(path)?, name, values)
}

/// `#name,num_documents,bibcodes` table; bibcodes are tab-separated
pub fn write_libraries<W: Write>(
    writer: W,
    libraries: &[LibraryContents],
) -> Result<(), MetricsError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["#name", "num_documents", "bibcodes"])?;
    for contents in libraries {
        csv.write_record([
            contents.library.name.replace(',', ";"),
            contents.library.num_documents.to_string(),
            contents.bibcodes.join("\t"),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write a libraries table to `path`
pub fn save_libraries(path: &Path, libraries: &[LibraryContents]) -> Result<(), MetricsError> {
    write_libraries(create(path)?, libraries)
}

/// Step paths as a JSON list of `{label, x, y}` objects
pub fn write_step_paths<W: Write>(
    mut writer: W,
    paths: &[LabeledStepPath],
) -> Result<(), MetricsError> {
    serde_json::to_writer_pretty(&mut writer, paths).map_err(std::io::Error::from)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write step paths to `path`
pub fn save_step_paths(path: &Path, paths: &[LabeledStepPath]) -> Result<(), MetricsError> {
    write_step_paths(create(path)?, paths)
}

/// Any serializable value as pretty JSON
pub fn save_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), MetricsError> {
    let mut writer = create(path)?;
    serde_json::to_writer_pretty(&mut writer, value).map_err(std::io::Error::from)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Two-column plain-text report of the summary scalars
pub fn write_summary<W: Write>(
    mut writer: W,
    summary: &MetricsSummary,
) -> Result<(), MetricsError> {
    writeln!(writer, "{:<32}{:>12}{:>12}", "", "All", "Refereed")?;
    for row in summary.rows() {
        let (all, refereed) = if row.fractional {
            (format!("{:.1}", row.all), format!("{:.1}", row.refereed))
        } else {
            (format_value(row.all), format_value(row.refereed))
        };
        writeln!(writer, "{:<32}{:>12}{:>12}", row.label, all, refereed)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the summary report to `path`
pub fn save_summary(path: &Path, summary: &MetricsSummary) -> Result<(), MetricsError> {
    write_summary(create(path)?, summary)
}
