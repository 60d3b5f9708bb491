//! Opening and validating calibration files.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use jc_core::{Error, Result};

use crate::histogram::Histogram;
use crate::schema::CalibrationSpec;

/// An opened, fully validated calibration file.
///
/// Every histogram is checked at open time (axis specs, contents length,
/// duplicate names), so lookups afterwards cannot hit malformed data.
#[derive(Debug, Clone)]
pub struct CalibrationFile {
    name: Option<String>,
    version: Option<String>,
    histograms: HashMap<String, Histogram>,
}

impl CalibrationFile {
    /// Open a calibration file from disk.
    ///
    /// Files ending in `.gz` are transparently gunzipped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            Error::Validation(format!("failed to open calibration file '{}': {}", path.display(), e))
        })?;
        let reader = std::io::BufReader::new(file);
        let is_gz = path.extension().is_some_and(|ext| ext == "gz");
        let result = if is_gz {
            Self::from_reader(GzDecoder::new(reader))
        } else {
            Self::from_reader(reader)
        };
        result.map_err(|e| match e {
            Error::Validation(msg) => {
                Error::Validation(format!("{} (in '{}')", msg, path.display()))
            }
            other => other,
        })
    }

    /// Read a calibration document from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let spec: CalibrationSpec = serde_json::from_reader(reader)
            .map_err(|e| Error::Validation(format!("malformed calibration JSON: {}", e)))?;
        Self::from_spec(&spec)
    }

    /// Build from an in-memory document.
    pub fn from_spec(spec: &CalibrationSpec) -> Result<Self> {
        let mut histograms = HashMap::with_capacity(spec.histograms.len());
        for hist_spec in &spec.histograms {
            let hist = Histogram::from_spec(hist_spec)?;
            if histograms.insert(hist.name().to_string(), hist).is_some() {
                return Err(Error::Validation(format!(
                    "duplicate histogram name '{}'",
                    hist_spec.name
                )));
            }
        }
        Ok(Self { name: spec.name.clone(), version: spec.version.clone(), histograms })
    }

    /// Calibration set name, if the file declares one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Schema version, if the file declares one.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Number of histograms.
    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    /// Whether the file holds no histograms.
    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }

    /// Sorted histogram names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.histograms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Histograms sorted by name.
    pub fn histograms(&self) -> Vec<&Histogram> {
        let mut hists: Vec<&Histogram> = self.histograms.values().collect();
        hists.sort_unstable_by(|a, b| a.name().cmp(b.name()));
        hists
    }

    /// Histogram by name, if present.
    pub fn get(&self, name: &str) -> Option<&Histogram> {
        self.histograms.get(name)
    }

    /// Histogram by name, or a lookup error naming it.
    pub fn get_histogram(&self, name: &str) -> Result<&Histogram> {
        self.histograms
            .get(name)
            .ok_or_else(|| Error::Lookup(format!("histogram '{}' not found in calibration file", name)))
    }
}
