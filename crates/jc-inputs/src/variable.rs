//! Input variables: named scalar accessors over (jet, context).
//!
//! A variable is declared by `(name, var_type, is_jet_var)`. Jet variables
//! select a predefined kinematic quantity by name; context variables read a
//! typed entry from the [`JetContext`]. Unknown names and types are
//! construction errors, so a successfully built variable always resolves.

use jc_core::{ContextValue, Error, Jet, JetContext, Result, ERROR_VALUE};

/// Scale applied by [`InputVariable::set_gev`] (inputs in MeV, axes in GeV).
pub const GEV_SCALE: f64 = 1.0e-3;

#[derive(Debug, Clone, PartialEq)]
enum Kind {
    JetE,
    JetEt,
    JetPt,
    JetEta,
    JetAbsEta,
    JetRapidity,
    JetAbsRapidity,
    ContextInt,
    ContextFloat,
}

impl Kind {
    /// Dimensionful kinds are subject to the momentum scale.
    fn is_dimensionful(&self) -> bool {
        matches!(self, Kind::JetE | Kind::JetEt | Kind::JetPt)
    }
}

/// A named scalar accessor resolving one axis coordinate per query.
#[derive(Debug, Clone)]
pub struct InputVariable {
    name: String,
    kind: Kind,
    scale: f64,
}

impl InputVariable {
    /// Build a variable from its declaration.
    ///
    /// With `is_jet_var`, `name` must be one of the predefined jet
    /// kinematics (`e`, `et`, `pt`, `eta`, `abseta`/`|eta|`,
    /// `rapidity`/`y`, `absrapidity`/`|rapidity|`/`absy`/`|y|`) and
    /// `var_type` is ignored. Otherwise the value is read from the context
    /// under `name`, with `var_type` one of `int`/`float`.
    pub fn new(name: &str, var_type: &str, is_jet_var: bool) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::Validation("input variable name must not be empty".into()));
        }
        let kind = if is_jet_var {
            match name {
                "e" => Kind::JetE,
                "et" => Kind::JetEt,
                "pt" => Kind::JetPt,
                "eta" => Kind::JetEta,
                "abseta" | "|eta|" => Kind::JetAbsEta,
                "rapidity" | "y" => Kind::JetRapidity,
                "absrapidity" | "|rapidity|" | "absy" | "|y|" => Kind::JetAbsRapidity,
                other => {
                    return Err(Error::Validation(format!(
                        "unknown jet variable '{}'",
                        other
                    )))
                }
            }
        } else {
            match var_type {
                "int" => Kind::ContextInt,
                "float" => Kind::ContextFloat,
                other => {
                    return Err(Error::Validation(format!(
                        "unsupported context variable type '{}' for '{}' (expected int or float)",
                        other, name
                    )))
                }
            }
        };
        Ok(Self { name: name.to_string(), kind, scale: 1.0 })
    }

    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current momentum scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set an arbitrary momentum scale.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// Jet momenta are stored in MeV, histogram axes in GeV.
    pub fn set_gev(&mut self) {
        self.scale = GEV_SCALE;
    }

    /// Jet momenta and histogram axes share the same unit.
    pub fn set_mev(&mut self) {
        self.scale = 1.0;
    }

    /// Resolve the variable against a jet and its event context.
    ///
    /// Context variables resolve to [`ERROR_VALUE`] when the key is missing
    /// or holds the wrong type; the caller's axis clamp then folds that
    /// into the lowest bin rather than failing the event.
    pub fn value(&self, jet: &Jet, ctx: &JetContext) -> f64 {
        let raw = match self.kind {
            Kind::JetE => jet.e(),
            Kind::JetEt => jet.et(),
            Kind::JetPt => jet.pt(),
            Kind::JetEta => jet.eta(),
            Kind::JetAbsEta => jet.abs_eta(),
            Kind::JetRapidity => jet.rapidity(),
            Kind::JetAbsRapidity => jet.abs_rapidity(),
            Kind::ContextInt => match ctx.get(&self.name) {
                Some(ContextValue::Int(v)) => *v as f64,
                _ => return ERROR_VALUE,
            },
            Kind::ContextFloat => match ctx.get(&self.name) {
                Some(ContextValue::Float(v)) => *v,
                _ => return ERROR_VALUE,
            },
        };
        if self.kind.is_dimensionful() {
            raw * self.scale
        } else {
            raw
        }
    }
}
