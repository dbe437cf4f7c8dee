//! ADS private library metadata.

use serde::{Deserialize, Serialize};

/// Summary of one ADS private library, as listed by `/biblib/libraries`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    /// Library identifier
    pub id: String,

    /// Library name
    pub name: String,

    /// Number of documents the server declares for this library
    pub num_documents: usize,

    /// Free-text description
    #[serde(default)]
    pub description: String,
}

/// A library together with all of its bibcodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryContents {
    /// Library metadata
    pub library: Library,

    /// Bibcodes, in the order the server paginated them
    pub bibcodes: Vec<String>,
}
