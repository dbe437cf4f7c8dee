//! Step-function polyline for filled-area plots.

use serde::{Deserialize, Serialize};

/// Paired x/y vertex sequences describing a filled step function
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepPath {
    /// Vertex x-coordinates (years, possibly offset by half a bin)
    pub x: Vec<f64>,

    /// Vertex y-coordinates
    pub y: Vec<f64>,
}

impl StepPath {
    /// Number of vertices
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when the path has no vertices
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Iterate over `(x, y)` vertices
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// A step path with the label a plotting backend should show for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledStepPath {
    /// Legend label
    pub label: String,

    /// The path itself
    #[serde(flatten)]
    pub path: StepPath,
}
