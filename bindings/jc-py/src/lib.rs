//! Python bindings for jetcal

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use jc_core::{ContextValue, Jet as RustJet, JetContext as RustContext};
use jc_inputs::{HistoInput as RustHistoInput, VariableSpec};

/// Python wrapper for Jet
#[pyclass(name = "Jet")]
#[derive(Clone)]
struct PyJet {
    inner: RustJet,
}

#[pymethods]
impl PyJet {
    /// Create a jet from (pt, eta, phi, m).
    #[new]
    fn new(pt: f64, eta: f64, phi: f64, m: f64) -> Self {
        PyJet { inner: RustJet::new(pt, eta, phi, m) }
    }

    #[getter]
    fn pt(&self) -> f64 {
        self.inner.pt()
    }

    #[getter]
    fn eta(&self) -> f64 {
        self.inner.eta()
    }

    #[getter]
    fn phi(&self) -> f64 {
        self.inner.phi()
    }

    #[getter]
    fn m(&self) -> f64 {
        self.inner.m()
    }

    /// Energy.
    fn e(&self) -> f64 {
        self.inner.e()
    }

    /// Transverse energy.
    fn et(&self) -> f64 {
        self.inner.et()
    }

    /// Rapidity.
    fn rapidity(&self) -> f64 {
        self.inner.rapidity()
    }
}

/// Python wrapper for JetContext
#[pyclass(name = "JetContext")]
#[derive(Clone, Default)]
struct PyJetContext {
    inner: RustContext,
}

#[pymethods]
impl PyJetContext {
    #[new]
    fn new() -> Self {
        Self::default()
    }

    /// Set a value; Python ints stay ints, floats stay floats.
    ///
    /// Overwriting requires `overwrite=True`, matching the Rust API.
    #[pyo3(signature = (name, value, overwrite = false))]
    fn set_value(&mut self, name: &str, value: ContextScalar, overwrite: bool) -> PyResult<()> {
        let result = match (value, overwrite) {
            (ContextScalar::Int(v), false) => self.inner.set(name, v),
            (ContextScalar::Int(v), true) => self.inner.set_or_replace(name, v),
            (ContextScalar::Float(v), false) => self.inner.set(name, v),
            (ContextScalar::Float(v), true) => self.inner.set_or_replace(name, v),
        };
        result.map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Get a value as the type it was stored with.
    fn get_value(&self, py: Python<'_>, name: &str) -> PyResult<Py<PyAny>> {
        match self.inner.get(name) {
            Some(ContextValue::Int(v)) => Ok(v.into_pyobject(py)?.into_any().unbind()),
            Some(ContextValue::Float(v)) => Ok(v.into_pyobject(py)?.into_any().unbind()),
            None => Err(PyValueError::new_err(format!("context key '{}' is not set", name))),
        }
    }

    /// Whether a key is set.
    fn is_available(&self, name: &str) -> bool {
        self.inner.contains(name)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

/// Accepts Python int or float without collapsing them into one type.
#[derive(FromPyObject)]
enum ContextScalar {
    /// Python int
    Int(i64),
    /// Python float
    Float(f64),
}

/// Python wrapper for HistoInput
#[pyclass(name = "HistoInput")]
struct PyHistoInput {
    inner: RustHistoInput,
}

#[pymethods]
impl PyHistoInput {
    /// Configure an input with one (name, type, is_jet_var) triple per axis.
    #[new]
    fn new(
        name: &str,
        file_name: &str,
        hist_name: &str,
        variables: Vec<(String, String, bool)>,
    ) -> Self {
        let specs = variables
            .into_iter()
            .map(|(name, var_type, is_jet_var)| VariableSpec::new(&name, &var_type, is_jet_var))
            .collect();
        PyHistoInput { inner: RustHistoInput::new(name, file_name, hist_name, specs) }
    }

    /// Configure a 1D input.
    #[staticmethod]
    fn new_1d(
        name: &str,
        file_name: &str,
        hist_name: &str,
        var_name: &str,
        var_type: &str,
        is_jet_var: bool,
    ) -> Self {
        Self::new(name, file_name, hist_name, vec![(
            var_name.to_string(),
            var_type.to_string(),
            is_jet_var,
        )])
    }

    /// Configure a 2D input.
    #[staticmethod]
    #[allow(clippy::too_many_arguments)]
    fn new_2d(
        name: &str,
        file_name: &str,
        hist_name: &str,
        var_name1: &str,
        var_type1: &str,
        is_jet_var1: bool,
        var_name2: &str,
        var_type2: &str,
        is_jet_var2: bool,
    ) -> Self {
        Self::new(name, file_name, hist_name, vec![
            (var_name1.to_string(), var_type1.to_string(), is_jet_var1),
            (var_name2.to_string(), var_type2.to_string(), is_jet_var2),
        ])
    }

    /// Open the calibration file and resolve the input.
    fn initialize(&mut self) -> PyResult<()> {
        self.inner.initialize().map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Whether initialize() has completed.
    fn is_initialized(&self) -> bool {
        self.inner.is_initialized()
    }

    /// Treat jet momenta as MeV against GeV histogram axes.
    fn set_gev(&mut self) {
        self.inner.set_gev()
    }

    /// Interpolated value for one jet and its context.
    fn value(&self, jet: &PyJet, context: &PyJetContext) -> PyResult<f64> {
        self.inner
            .value(&jet.inner, &context.inner)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Interpolated values for a batch of jets sharing one context.
    fn values(&self, jets: Vec<PyJet>, context: &PyJetContext) -> PyResult<Vec<f64>> {
        let jets: Vec<RustJet> = jets.into_iter().map(|j| j.inner).collect();
        self.inner
            .values(&jets, &context.inner)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    #[getter]
    fn name(&self) -> String {
        self.inner.name().to_string()
    }

    #[getter]
    fn hist_name(&self) -> String {
        self.inner.hist_name().to_string()
    }

    #[getter]
    fn file_name(&self) -> String {
        self.inner.file_name().to_string()
    }
}

/// Python module: jetcal
#[pymodule]
fn jetcal(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", jc_core::VERSION)?;
    m.add("ERROR_VALUE", jc_core::ERROR_VALUE)?;

    m.add_class::<PyJet>()?;
    m.add_class::<PyJetContext>()?;
    m.add_class::<PyHistoInput>()?;

    Ok(())
}
