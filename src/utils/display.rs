//! Terminal tables for CLI output.

use comfy_table::{presets, Attribute, Cell, CellAlignment, Table};

use crate::models::{IndicatorSet, Library, MetricsSummary, YearSeries};
use crate::utils::format_value;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_header(
        header
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );
    table
}

fn number(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

/// Locally computed indicators, optionally side by side with the refereed subset
pub fn indicator_table(all: &IndicatorSet, refereed: Option<&IndicatorSet>) -> Table {
    let mut header = vec!["Indicator", "All"];
    if refereed.is_some() {
        header.push("Refereed");
    }
    let mut table = new_table(header);

    let fields: [(&str, fn(&IndicatorSet) -> String); 13] = [
        ("Papers", |s| s.paper_count.to_string()),
        ("Total citations", |s| s.total_citations.to_string()),
        ("Average citations", |s| format!("{:.1}", s.average_citations)),
        ("Median citations", |s| format_value(s.median_citations)),
        ("Total reads", |s| s.total_reads.to_string()),
        ("Average reads", |s| format!("{:.1}", s.average_reads)),
        ("Median reads", |s| format_value(s.median_reads)),
        ("h-index", |s| s.h.to_string()),
        ("g-index", |s| s.g.to_string()),
        ("i10-index", |s| s.i10.to_string()),
        ("i100-index", |s| s.i100.to_string()),
        ("m-index", |s| format!("{:.2}", s.m)),
        ("read h-index", |s| s.read_h.to_string()),
    ];

    for (label, get) in fields {
        let mut row = vec![Cell::new(label), number(get(all))];
        if let Some(refereed) = refereed {
            row.push(number(get(refereed)));
        }
        table.add_row(row);
    }
    table
}

/// The ADS summary scalars, all papers against refereed papers
pub fn summary_table(summary: &MetricsSummary) -> Table {
    let mut table = new_table(vec!["Statistic", "All", "Refereed"]);
    for row in summary.rows() {
        let render = |v: f64| {
            if row.fractional {
                format!("{:.1}", v)
            } else {
                format_value(v)
            }
        };
        table.add_row(vec![
            Cell::new(row.label),
            number(render(row.all)),
            number(render(row.refereed)),
        ]);
    }
    table
}

/// One row per year, one column per channel
pub fn series_table(series: &YearSeries) -> Table {
    let mut header = vec!["Year"];
    header.extend(series.channel_names());
    let mut table = new_table(header);

    for (year, values) in series.rows() {
        let mut row = vec![Cell::new(year)];
        row.extend(values.into_iter().map(|v| number(format_value(v))));
        table.add_row(row);
    }
    table
}

/// Private libraries with their document counts
pub fn library_table(libraries: &[Library]) -> Table {
    let mut table = new_table(vec!["Name", "Documents", "ID"]);
    for library in libraries {
        table.add_row(vec![
            Cell::new(&library.name),
            number(library.num_documents),
            Cell::new(&library.id),
        ]);
    }
    table
}
