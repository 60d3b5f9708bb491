//! Histogram inputs: interpolated lookups parametrized by input variables.

use rayon::prelude::*;

use jc_calib::{CalibrationFile, Histogram};
use jc_core::{Error, Jet, JetContext, Result};

use crate::variable::InputVariable;

/// Batch sizes at or above this run data-parallel.
const PAR_THRESHOLD: usize = 1024;

/// Declaration of one input variable of a histogram input.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSpec {
    /// Variable name (jet kinematic or context key).
    pub name: String,
    /// Value type for context variables (`int`/`float`); ignored for jet
    /// kinematics.
    pub var_type: String,
    /// Whether the variable reads from the jet rather than the context.
    pub is_jet_var: bool,
}

impl VariableSpec {
    /// Declare a variable explicitly.
    pub fn new(name: &str, var_type: &str, is_jet_var: bool) -> Self {
        Self { name: name.to_string(), var_type: var_type.to_string(), is_jet_var }
    }

    /// A predefined jet kinematic.
    pub fn jet(name: &str) -> Self {
        Self::new(name, "float", true)
    }

    /// A float-typed context value.
    pub fn context_float(name: &str) -> Self {
        Self::new(name, "float", false)
    }

    /// An int-typed context value.
    pub fn context_int(name: &str) -> Self {
        Self::new(name, "int", false)
    }
}

/// Built at initialization: the resolved variables and the owned histogram.
#[derive(Debug, Clone)]
struct Ready {
    histogram: Histogram,
    variables: Vec<InputVariable>,
}

/// An interpolated histogram lookup.
///
/// Configured from a calibration file path, a histogram name and one
/// variable declaration per histogram axis. Two-phase: construction stores
/// the configuration, [`HistoInput::initialize`] loads and validates, and
/// from then on the input is immutable and queried repeatedly (lookups take
/// `&self` and the type is `Send + Sync`).
#[derive(Debug, Clone)]
pub struct HistoInput {
    name: String,
    file_name: String,
    hist_name: String,
    specs: Vec<VariableSpec>,
    gev: bool,
    ready: Option<Ready>,
}

impl HistoInput {
    /// Configure an input with one variable declaration per axis.
    pub fn new(name: &str, file_name: &str, hist_name: &str, specs: Vec<VariableSpec>) -> Self {
        Self {
            name: name.to_string(),
            file_name: file_name.to_string(),
            hist_name: hist_name.to_string(),
            specs,
            gev: false,
            ready: None,
        }
    }

    /// Configure a 1D input.
    pub fn new_1d(name: &str, file_name: &str, hist_name: &str, var: VariableSpec) -> Self {
        Self::new(name, file_name, hist_name, vec![var])
    }

    /// Configure a 2D input.
    pub fn new_2d(
        name: &str,
        file_name: &str,
        hist_name: &str,
        var1: VariableSpec,
        var2: VariableSpec,
    ) -> Self {
        Self::new(name, file_name, hist_name, vec![var1, var2])
    }

    /// Configure a 3D input.
    pub fn new_3d(
        name: &str,
        file_name: &str,
        hist_name: &str,
        var1: VariableSpec,
        var2: VariableSpec,
        var3: VariableSpec,
    ) -> Self {
        Self::new(name, file_name, hist_name, vec![var1, var2, var3])
    }

    /// Input name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calibration file path this input reads from.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Histogram name inside the calibration file.
    pub fn hist_name(&self) -> &str {
        &self.hist_name
    }

    /// Whether [`HistoInput::initialize`] has completed.
    pub fn is_initialized(&self) -> bool {
        self.ready.is_some()
    }

    /// Treat jet momenta as MeV against GeV histogram axes.
    ///
    /// Applies to the dimensionful jet variables (`e`, `et`, `pt`) only.
    pub fn set_gev(&mut self) {
        self.gev = true;
        if let Some(ready) = &mut self.ready {
            for var in &mut ready.variables {
                var.set_gev();
            }
        }
    }

    /// Open the calibration file and resolve this input against it.
    pub fn initialize(&mut self) -> Result<()> {
        if self.ready.is_some() {
            return Err(Error::Validation(format!(
                "histogram input '{}' is already initialized",
                self.name
            )));
        }
        let file = CalibrationFile::open(&self.file_name)?;
        self.resolve(&file)
    }

    /// Resolve this input against an already opened calibration file.
    ///
    /// Several inputs usually read one file; opening it once and sharing it
    /// avoids re-parsing per input.
    pub fn initialize_with(&mut self, file: &CalibrationFile) -> Result<()> {
        if self.ready.is_some() {
            return Err(Error::Validation(format!(
                "histogram input '{}' is already initialized",
                self.name
            )));
        }
        self.resolve(file)
    }

    fn resolve(&mut self, file: &CalibrationFile) -> Result<()> {
        if self.specs.is_empty() || self.specs.len() > jc_calib::MAX_DIMS {
            return Err(Error::Validation(format!(
                "histogram input '{}' declares {} variables, expected 1 to {}",
                self.name,
                self.specs.len(),
                jc_calib::MAX_DIMS
            )));
        }

        let mut variables = Vec::with_capacity(self.specs.len());
        for spec in &self.specs {
            let mut var = InputVariable::new(&spec.name, &spec.var_type, spec.is_jet_var)
                .map_err(|e| {
                    Error::Validation(format!("histogram input '{}': {}", self.name, e))
                })?;
            if self.gev {
                var.set_gev();
            }
            variables.push(var);
        }

        let histogram = file.get_histogram(&self.hist_name).map_err(|_| {
            Error::Lookup(format!(
                "histogram '{}' not found in calibration file '{}'",
                self.hist_name, self.file_name
            ))
        })?;
        if histogram.n_dims() != variables.len() {
            return Err(Error::Validation(format!(
                "histogram '{}' has {} axes but input '{}' declares {} variables",
                self.hist_name,
                histogram.n_dims(),
                self.name,
                variables.len()
            )));
        }

        self.ready = Some(Ready { histogram: histogram.clone(), variables });
        Ok(())
    }

    /// Look up the interpolated value for one jet.
    ///
    /// Each variable is resolved, clamped onto its axis (out-of-range
    /// coordinates land just inside the edge bins) and the histogram is
    /// interpolated at the resulting point.
    pub fn value(&self, jet: &Jet, ctx: &JetContext) -> Result<f64> {
        let ready = self.ready.as_ref().ok_or_else(|| {
            Error::Validation(format!("histogram input '{}' is not initialized", self.name))
        })?;

        let mut coords = [0.0_f64; jc_calib::MAX_DIMS];
        for (d, var) in ready.variables.iter().enumerate() {
            coords[d] = ready.histogram.axis(d).clamp(var.value(jet, ctx));
        }
        ready.histogram.interpolate(&coords[..ready.variables.len()])
    }

    /// Boolean out-parameter form of [`HistoInput::value`].
    ///
    /// Returns `false` (leaving `out` untouched) instead of an error; kept
    /// for callers ported from the success-flag style.
    pub fn try_value(&self, jet: &Jet, ctx: &JetContext, out: &mut f64) -> bool {
        match self.value(jet, ctx) {
            Ok(v) => {
                *out = v;
                true
            }
            Err(_) => false,
        }
    }

    /// Look up a batch of jets against one context.
    ///
    /// Large batches are evaluated data-parallel.
    pub fn values(&self, jets: &[Jet], ctx: &JetContext) -> Result<Vec<f64>> {
        if jets.len() >= PAR_THRESHOLD {
            jets.par_iter().map(|jet| self.value(jet, ctx)).collect()
        } else {
            jets.iter().map(|jet| self.value(jet, ctx)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use jc_calib::{AxisSpec, CalibrationSpec, HistogramSpec};

    fn calib() -> CalibrationFile {
        CalibrationFile::from_spec(&CalibrationSpec {
            name: Some("test".into()),
            version: Some("1".into()),
            histograms: vec![
                HistogramSpec {
                    name: "jes_pt".into(),
                    title: None,
                    // Centers at 30, 50, 70, 90.
                    axes: vec![AxisSpec::Uniform { n_bins: 4, low: 20.0, high: 100.0 }],
                    contents: vec![1.06, 1.04, 1.02, 1.0],
                },
                HistogramSpec {
                    name: "jes_pt_abseta".into(),
                    title: None,
                    axes: vec![
                        AxisSpec::Uniform { n_bins: 2, low: 20.0, high: 100.0 },
                        AxisSpec::Variable { edges: vec![0.0, 1.2, 2.5, 4.5] },
                    ],
                    contents: vec![1.0, 1.1, 1.2, 0.9, 0.95, 1.0],
                },
                HistogramSpec {
                    name: "offset_mu".into(),
                    title: None,
                    // Centers at 10, 30, 50.
                    axes: vec![AxisSpec::Variable { edges: vec![0.0, 20.0, 40.0, 60.0] }],
                    contents: vec![0.5, 1.5, 2.5],
                },
                HistogramSpec {
                    name: "smear_pt_abseta_mu".into(),
                    title: None,
                    axes: vec![
                        AxisSpec::Uniform { n_bins: 2, low: 20.0, high: 100.0 },
                        AxisSpec::Uniform { n_bins: 2, low: 0.0, high: 4.0 },
                        AxisSpec::Uniform { n_bins: 2, low: 0.0, high: 80.0 },
                    ],
                    contents: (1..=8).map(f64::from).collect(),
                },
            ],
        })
        .unwrap()
    }

    fn ready_1d() -> HistoInput {
        let mut input = HistoInput::new_1d("jes", "mem", "jes_pt", VariableSpec::jet("pt"));
        input.initialize_with(&calib()).unwrap();
        input
    }

    #[test]
    fn lookup_interpolates_on_jet_pt() {
        let input = ready_1d();
        let ctx = JetContext::new();

        // At a bin center: exact content.
        let v = input.value(&Jet::new(30.0, 0.0, 0.0, 0.0), &ctx).unwrap();
        assert_relative_eq!(v, 1.06);

        // Between centers 50 and 70: halfway.
        let v = input.value(&Jet::new(60.0, 0.0, 0.0, 0.0), &ctx).unwrap();
        assert_relative_eq!(v, 1.03);
    }

    #[test]
    fn out_of_range_pt_is_clamped_not_extrapolated() {
        let input = ready_1d();
        let ctx = JetContext::new();

        let lo = input.value(&Jet::new(1.0, 0.0, 0.0, 0.0), &ctx).unwrap();
        assert_relative_eq!(lo, 1.06);

        let hi = input.value(&Jet::new(1e7, 0.0, 0.0, 0.0), &ctx).unwrap();
        assert_relative_eq!(hi, 1.0);
    }

    #[test]
    fn lookup_2d_uses_both_variables() {
        let mut input = HistoInput::new_2d(
            "jes2",
            "mem",
            "jes_pt_abseta",
            VariableSpec::jet("pt"),
            VariableSpec::jet("abseta"),
        );
        input.initialize_with(&calib()).unwrap();
        let ctx = JetContext::new();

        // pt center 40, abseta center 0.6: first row, first column.
        let v = input.value(&Jet::new(40.0, 0.6, 0.0, 0.0), &ctx).unwrap();
        assert_relative_eq!(v, 1.0);

        // Same pt, |eta| at last center (3.5): last column of first row.
        let v = input.value(&Jet::new(40.0, -3.5, 0.0, 0.0), &ctx).unwrap();
        assert_relative_eq!(v, 1.2);
    }

    #[test]
    fn context_variable_drives_the_lookup() {
        let mut input =
            HistoInput::new_1d("rho", "mem", "offset_mu", VariableSpec::context_float("mu"));
        input.initialize_with(&calib()).unwrap();
        let jet = Jet::new(40.0, 0.0, 0.0, 0.0);

        let mut ctx = JetContext::new();
        ctx.set("mu", 30.0_f64).unwrap();
        assert_relative_eq!(input.value(&jet, &ctx).unwrap(), 1.5);

        // Missing key: sentinel -999 clamps into the first bin.
        let empty = JetContext::new();
        assert_relative_eq!(input.value(&jet, &empty).unwrap(), 0.5);
    }

    #[test]
    fn lookup_3d_mixes_jet_and_context_variables() {
        let mut input = HistoInput::new_3d(
            "smear",
            "mem",
            "smear_pt_abseta_mu",
            VariableSpec::jet("pt"),
            VariableSpec::jet("abseta"),
            VariableSpec::context_float("mu"),
        );
        input.initialize_with(&calib()).unwrap();

        let mut ctx = JetContext::new();
        ctx.set("mu", 40.0_f64).unwrap();
        // Midpoint of the center grid on all three axes: mean of 1..=8.
        let v = input.value(&Jet::new(60.0, 2.0, 0.0, 0.0), &ctx).unwrap();
        assert_relative_eq!(v, 4.5);

        // At the (low, low, low) corner of centers: the first cell.
        let mut lo_ctx = JetContext::new();
        lo_ctx.set("mu", 20.0_f64).unwrap();
        let v = input.value(&Jet::new(40.0, 1.0, 0.0, 0.0), &lo_ctx).unwrap();
        assert_relative_eq!(v, 1.0);
    }

    #[test]
    fn gev_scale_converts_mev_jets() {
        let mut input = HistoInput::new_1d("jes", "mem", "jes_pt", VariableSpec::jet("pt"));
        input.set_gev();
        input.initialize_with(&calib()).unwrap();
        let ctx = JetContext::new();

        // 30 GeV jet stored in MeV.
        let v = input.value(&Jet::new(30_000.0, 0.0, 0.0, 0.0), &ctx).unwrap();
        assert_relative_eq!(v, 1.06);
    }

    #[test]
    fn initialize_is_single_shot() {
        let mut input = ready_1d();
        let err = input.initialize_with(&calib()).unwrap_err();
        assert!(err.to_string().contains("already initialized"));
    }

    #[test]
    fn query_before_initialize_fails() {
        let input = HistoInput::new_1d("jes", "mem", "jes_pt", VariableSpec::jet("pt"));
        let ctx = JetContext::new();
        assert!(input.value(&Jet::new(30.0, 0.0, 0.0, 0.0), &ctx).is_err());

        let mut out = f64::NAN;
        assert!(!input.try_value(&Jet::new(30.0, 0.0, 0.0, 0.0), &ctx, &mut out));
        assert!(out.is_nan());
    }

    #[test]
    fn try_value_writes_through_on_success() {
        let input = ready_1d();
        let ctx = JetContext::new();
        let mut out = 0.0;
        assert!(input.try_value(&Jet::new(30.0, 0.0, 0.0, 0.0), &ctx, &mut out));
        assert_relative_eq!(out, 1.06);
    }

    #[test]
    fn dimension_mismatch_is_an_init_error() {
        let mut input = HistoInput::new_2d(
            "jes",
            "mem",
            "jes_pt",
            VariableSpec::jet("pt"),
            VariableSpec::jet("abseta"),
        );
        let err = input.initialize_with(&calib()).unwrap_err();
        assert!(err.to_string().contains("axes"), "unexpected error: {}", err);
    }

    #[test]
    fn unknown_histogram_or_variable_fail_initialize() {
        let mut input = HistoInput::new_1d("jes", "mem", "nope", VariableSpec::jet("pt"));
        assert!(input.initialize_with(&calib()).is_err());

        let mut input = HistoInput::new_1d("jes", "mem", "jes_pt", VariableSpec::jet("funny_key"));
        assert!(input.initialize_with(&calib()).is_err());
    }

    #[test]
    fn batch_matches_single_lookups() {
        let input = ready_1d();
        let ctx = JetContext::new();
        let jets: Vec<Jet> =
            (0..2000).map(|i| Jet::new(20.0 + (i as f64 % 80.0), 0.0, 0.0, 0.0)).collect();

        let batch = input.values(&jets, &ctx).unwrap();
        assert_eq!(batch.len(), jets.len());
        for (jet, batched) in jets.iter().zip(&batch) {
            assert_relative_eq!(*batched, input.value(jet, &ctx).unwrap());
        }
    }
}
