//! Event context: string-keyed scalar inputs for calibration lookups.
//!
//! A [`JetContext`] carries the per-event quantities that are not part of
//! the jet four-momentum (pile-up density, primary-vertex count, trigger
//! bits, ...). Values are typed, integers and floats are distinct, and
//! access with the wrong type is an error rather than a coercion.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sentinel resolved by input variables when a context key is missing.
///
/// The context itself never returns this value; it belongs to the
/// variable-resolution layer, which folds missing keys into an
/// out-of-range coordinate instead of failing the event.
pub const ERROR_VALUE: f64 = -999.0;

/// A scalar context value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    /// Integer-valued input (e.g. a vertex count).
    Int(i64),
    /// Floating-point input (e.g. a pile-up density).
    Float(f64),
}

impl From<i64> for ContextValue {
    fn from(v: i64) -> Self {
        ContextValue::Int(v)
    }
}

impl From<f64> for ContextValue {
    fn from(v: f64) -> Self {
        ContextValue::Float(v)
    }
}

/// String-keyed store of typed scalar inputs.
#[derive(Debug, Clone, Default)]
pub struct JetContext {
    vars: HashMap<String, ContextValue>,
}

impl JetContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under `name`.
    ///
    /// Fails if `name` is empty or already present; overwriting must be
    /// requested explicitly via [`JetContext::set_or_replace`].
    pub fn set<V: Into<ContextValue>>(&mut self, name: &str, value: V) -> Result<()> {
        if name.is_empty() {
            return Err(Error::Validation("context key must not be empty".into()));
        }
        if self.vars.contains_key(name) {
            return Err(Error::Validation(format!(
                "context key '{}' is already set (use set_or_replace to overwrite)",
                name
            )));
        }
        self.vars.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Insert a value under `name`, replacing any existing entry.
    pub fn set_or_replace<V: Into<ContextValue>>(&mut self, name: &str, value: V) -> Result<()> {
        if name.is_empty() {
            return Err(Error::Validation("context key must not be empty".into()));
        }
        self.vars.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Raw typed value under `name`, if present.
    pub fn get(&self, name: &str) -> Option<&ContextValue> {
        self.vars.get(name)
    }

    /// Integer value under `name`.
    ///
    /// Missing keys and float-typed entries are lookup errors.
    pub fn get_int(&self, name: &str) -> Result<i64> {
        match self.vars.get(name) {
            Some(ContextValue::Int(v)) => Ok(*v),
            Some(ContextValue::Float(_)) => Err(Error::Lookup(format!(
                "context key '{}' holds a float, not an int",
                name
            ))),
            None => Err(Error::Lookup(format!("context key '{}' is not set", name))),
        }
    }

    /// Float value under `name`.
    ///
    /// Missing keys and int-typed entries are lookup errors.
    pub fn get_float(&self, name: &str) -> Result<f64> {
        match self.vars.get(name) {
            Some(ContextValue::Float(v)) => Ok(*v),
            Some(ContextValue::Int(_)) => Err(Error::Lookup(format!(
                "context key '{}' holds an int, not a float",
                name
            ))),
            None => Err(Error::Lookup(format!("context key '{}' is not set", name))),
        }
    }

    /// Whether `name` is set.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the context is empty.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_typed_values() {
        let mut ctx = JetContext::new();
        ctx.set("mu", 32.5_f64).unwrap();
        ctx.set("npv", 18_i64).unwrap();

        assert!(ctx.contains("mu"));
        assert!(!ctx.contains("randomKey"));
        assert_eq!(ctx.get_float("mu").unwrap(), 32.5);
        assert_eq!(ctx.get_int("npv").unwrap(), 18);
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn duplicate_insert_requires_explicit_overwrite() {
        let mut ctx = JetContext::new();
        ctx.set("mu", 23.04_f64).unwrap();

        assert!(ctx.set("mu", 42.0_f64).is_err());
        assert_eq!(ctx.get_float("mu").unwrap(), 23.04);

        ctx.set_or_replace("mu", 42_i64).unwrap();
        assert_eq!(ctx.get_int("mu").unwrap(), 42);
    }

    #[test]
    fn empty_key_is_rejected() {
        let mut ctx = JetContext::new();
        assert!(ctx.set("", 10_i64).is_err());
        assert!(ctx.set_or_replace("", 10_i64).is_err());
    }

    #[test]
    fn wrong_type_access_is_an_error() {
        let mut ctx = JetContext::new();
        ctx.set("npv", 18_i64).unwrap();

        assert!(ctx.get_float("npv").is_err());
        assert!(ctx.get_int("missing").is_err());
        assert!(ctx.get_float("").is_err());
    }
}
