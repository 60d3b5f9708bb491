//! Calibration JSON schema types.

use serde::{Deserialize, Serialize};

/// Top-level calibration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationSpec {
    /// Calibration set name (e.g. a recommendation tag).
    #[serde(default)]
    pub name: Option<String>,
    /// Schema version.
    #[serde(default)]
    pub version: Option<String>,
    /// Named histograms.
    pub histograms: Vec<HistogramSpec>,
}

/// One histogram in a calibration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramSpec {
    /// Histogram name, unique within the file.
    pub name: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: Option<String>,
    /// Axes, outermost first (1 to 3).
    pub axes: Vec<AxisSpec>,
    /// Bin contents, row-major with the last axis fastest.
    ///
    /// Length must equal the product of the axis bin counts. Under/overflow
    /// cells are not stored; lookups clamp into the outermost bins instead.
    pub contents: Vec<f64>,
}

/// Axis binning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "binning", rename_all = "lowercase")]
pub enum AxisSpec {
    /// `n_bins` equal-width bins over `[low, high)`.
    Uniform {
        /// Number of bins.
        n_bins: usize,
        /// Lower edge of the first bin.
        low: f64,
        /// Upper edge of the last bin.
        high: f64,
    },
    /// Explicit bin edges, strictly increasing (length = n_bins + 1).
    Variable {
        /// Bin edges.
        edges: Vec<f64>,
    },
}
