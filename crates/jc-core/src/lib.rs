//! # jc-core
//!
//! Core types for jetcal: the shared error type, the jet four-momentum,
//! and the event context (string-keyed scalar inputs) that parametrize
//! calibration lookups.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod error;
pub mod jet;

pub use context::{ContextValue, JetContext, ERROR_VALUE};
pub use error::{Error, Result};
pub use jet::Jet;

/// Crate version, re-exported for bindings.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
