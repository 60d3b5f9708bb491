//! # jc-inputs
//!
//! The jetcal lookup engine: input variables that resolve named scalars
//! from a jet or the event context, and histogram inputs that turn those
//! scalars into axis coordinates of a calibration histogram and return the
//! interpolated value.
//!
//! ## Example
//!
//! ```no_run
//! use jc_core::{Jet, JetContext};
//! use jc_inputs::{HistoInput, VariableSpec};
//!
//! let mut input = HistoInput::new_2d(
//!     "jes",
//!     "calib.json",
//!     "jes_pt_eta",
//!     VariableSpec::jet("pt"),
//!     VariableSpec::jet("abseta"),
//! );
//! input.initialize().unwrap();
//!
//! let jet = Jet::new(45.0, 1.3, 0.2, 7.0);
//! let ctx = JetContext::new();
//! println!("correction: {}", input.value(&jet, &ctx).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod histo_input;
pub mod variable;

pub use histo_input::{HistoInput, VariableSpec};
pub use variable::InputVariable;
