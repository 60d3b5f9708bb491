//! Calibration histograms and multilinear interpolation.

use jc_core::{Error, Result};

use crate::axis::Axis;
use crate::schema::HistogramSpec;

/// Maximum number of axes a calibration histogram can have.
pub const MAX_DIMS: usize = 3;

/// An in-memory calibration histogram of 1 to 3 axes.
///
/// Contents are row-major with the last axis fastest and cover main bins
/// only; flow handling happens at lookup time by clamping coordinates.
#[derive(Debug, Clone)]
pub struct Histogram {
    name: String,
    title: String,
    axes: Vec<Axis>,
    contents: Vec<f64>,
}

impl Histogram {
    /// Build a histogram from validated parts.
    pub fn new(name: String, title: String, axes: Vec<Axis>, contents: Vec<f64>) -> Result<Self> {
        if axes.is_empty() || axes.len() > MAX_DIMS {
            return Err(Error::Validation(format!(
                "histogram '{}' has {} axes, expected 1 to {}",
                name,
                axes.len(),
                MAX_DIMS
            )));
        }
        let expected: usize = axes.iter().map(|a| a.n_bins()).product();
        if contents.len() != expected {
            return Err(Error::Validation(format!(
                "histogram '{}' has {} contents, expected {} (product of bin counts)",
                name,
                contents.len(),
                expected
            )));
        }
        Ok(Self { name, title, axes, contents })
    }

    /// Build a histogram from its schema representation.
    pub fn from_spec(spec: &HistogramSpec) -> Result<Self> {
        if spec.name.is_empty() {
            return Err(Error::Validation("histogram name must not be empty".into()));
        }
        let axes = spec
            .axes
            .iter()
            .map(Axis::from_spec)
            .collect::<Result<Vec<_>>>()
            .map_err(|e| Error::Validation(format!("histogram '{}': {}", spec.name, e)))?;
        Self::new(
            spec.name.clone(),
            spec.title.clone().unwrap_or_default(),
            axes,
            spec.contents.clone(),
        )
    }

    /// Histogram name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Histogram title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of axes.
    pub fn n_dims(&self) -> usize {
        self.axes.len()
    }

    /// The axes, outermost first.
    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Axis `d`.
    pub fn axis(&self, d: usize) -> &Axis {
        &self.axes[d]
    }

    /// Content of the bin addressed by one index per axis.
    pub fn bin_content(&self, indices: &[usize]) -> Result<f64> {
        Ok(self.contents[self.flat_index(indices)?])
    }

    fn flat_index(&self, indices: &[usize]) -> Result<usize> {
        if indices.len() != self.axes.len() {
            return Err(Error::Validation(format!(
                "histogram '{}' has {} axes, got {} indices",
                self.name,
                self.axes.len(),
                indices.len()
            )));
        }
        let mut flat = 0;
        for (d, (&i, axis)) in indices.iter().zip(&self.axes).enumerate() {
            if i >= axis.n_bins() {
                return Err(Error::Lookup(format!(
                    "bin index {} out of range on axis {} of histogram '{}' ({} bins)",
                    i,
                    d,
                    self.name,
                    axis.n_bins()
                )));
            }
            flat = flat * axis.n_bins() + i;
        }
        Ok(flat)
    }

    /// Multilinear interpolation at `coords` (one coordinate per axis).
    ///
    /// Per axis the coordinate is clamped to the range spanned by the
    /// outermost bin centers (no extrapolation) and the 2^d surrounding
    /// bin contents are combined with linear weights. A single-bin axis
    /// contributes its only content.
    pub fn interpolate(&self, coords: &[f64]) -> Result<f64> {
        if coords.len() != self.axes.len() {
            return Err(Error::Validation(format!(
                "histogram '{}' has {} axes, got {} coordinates",
                self.name,
                self.axes.len(),
                coords.len()
            )));
        }

        // Per axis: the left cell index and the fractional distance toward
        // the right cell, measured between bin centers.
        let mut cells = [(0usize, 0.0f64); MAX_DIMS];
        for (d, (&x, axis)) in coords.iter().zip(&self.axes).enumerate() {
            cells[d] = Self::center_cell(axis, x);
        }

        let mut value = 0.0;
        for corner in 0..(1usize << self.axes.len()) {
            let mut weight = 1.0;
            let mut indices = [0usize; MAX_DIMS];
            for (d, &(lo, frac)) in cells[..self.axes.len()].iter().enumerate() {
                if corner & (1 << d) == 0 {
                    weight *= 1.0 - frac;
                    indices[d] = lo;
                } else {
                    weight *= frac;
                    // frac is 0 on a single-bin axis, so lo + 1 is never
                    // weighted there; clamp keeps the index in range anyway.
                    indices[d] = (lo + 1).min(self.axes[d].n_bins() - 1);
                }
            }
            if weight > 0.0 {
                value += weight * self.bin_content(&indices[..self.axes.len()])?;
            }
        }
        Ok(value)
    }

    /// Find the interpolation cell for `x` on `axis`: the bin index whose
    /// center sits at or left of the (clamped) coordinate, and the fraction
    /// toward the next center.
    fn center_cell(axis: &Axis, x: f64) -> (usize, f64) {
        let n = axis.n_bins();
        if n == 1 || x <= axis.bin_center(0) {
            return (0, 0.0);
        }
        if x >= axis.bin_center(n - 1) {
            return (n - 2, 1.0);
        }
        // First bin whose center exceeds x, minus one; the guards above
        // keep the result within [0, n-2].
        let mut lo = 0;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if axis.bin_center(mid) <= x {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        let c0 = axis.bin_center(lo);
        let c1 = axis.bin_center(lo + 1);
        (lo, (x - c0) / (c1 - c0))
    }
}
