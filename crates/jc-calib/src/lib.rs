//! # jc-calib
//!
//! Calibration file support for jetcal.
//!
//! A calibration file is a JSON document (optionally gzipped) holding named
//! histograms of 1 to 3 axes. Axes are uniform or variable-width; bin
//! contents are stored row-major over the main bins only. Lookups clamp
//! out-of-range coordinates into the outermost bins and interpolate
//! multilinearly between bin centers.
//!
//! ## Example
//!
//! ```no_run
//! use jc_calib::CalibrationFile;
//!
//! let f = CalibrationFile::open("calib.json").unwrap();
//! for name in f.names() {
//!     println!("{}", name);
//! }
//! let h = f.get("jes_pt_eta").unwrap();
//! let v = h.interpolate(&[45.0, 1.3]).unwrap();
//! println!("correction: {}", v);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod axis;
pub mod file;
pub mod histogram;
pub mod schema;

pub use axis::{Axis, BinLocation, EDGE_OFFSET};
pub use file::CalibrationFile;
pub use histogram::{Histogram, MAX_DIMS};
pub use schema::{AxisSpec, CalibrationSpec, HistogramSpec};
