//! Facet pivot dimensions understood by the ADS search endpoint.

use serde::{Deserialize, Serialize};

/// Second dimension of a `property,<field>` facet pivot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotField {
    Year,
    CitationCount,
    ReadCount,
}

impl PivotField {
    /// Solr field name
    pub fn field(&self) -> &'static str {
        match self {
            PivotField::Year => "year",
            PivotField::CitationCount => "citation_count",
            PivotField::ReadCount => "read_count",
        }
    }

    /// Key of this pivot inside `facet_counts.facet_pivot`
    pub fn pivot_key(&self) -> String {
        format!("property,{}", self.field())
    }

    /// Sort order requested alongside the facet
    pub fn sort(&self) -> &'static str {
        match self {
            PivotField::Year => "date desc",
            PivotField::CitationCount => "citation_count desc",
            PivotField::ReadCount => "read_count desc",
        }
    }
}

impl std::fmt::Display for PivotField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field())
    }
}
