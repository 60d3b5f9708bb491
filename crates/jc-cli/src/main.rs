//! jetcal CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use jc_calib::{CalibrationFile, CalibrationSpec, Histogram};
use jc_core::{Jet, JetContext};
use jc_inputs::{HistoInput, VariableSpec};

#[derive(Parser)]
#[command(name = "jetcal")]
#[command(about = "jetcal - interpolated calibration-histogram lookups")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the histograms of a calibration file
    Inspect {
        /// Calibration file (JSON, optionally gzipped)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the listing (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate every histogram of a calibration file
    Validate {
        /// Calibration file (JSON, optionally gzipped)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the report (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Look up one interpolated value
    Lookup {
        /// Calibration file (JSON, optionally gzipped)
        #[arg(short, long)]
        input: PathBuf,

        /// Histogram name inside the calibration file
        #[arg(long)]
        hist: String,

        /// Input variable per histogram axis, as name:type:jet or
        /// name:type:ctx (e.g. pt:float:jet, mu:float:ctx)
        #[arg(long = "var", required = true)]
        vars: Vec<String>,

        /// Jet transverse momentum
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        pt: f64,

        /// Jet pseudorapidity
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        eta: f64,

        /// Jet azimuth
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        phi: f64,

        /// Jet mass
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        mass: f64,

        /// Context entries, as key=value (integer values stay integers)
        #[arg(long = "set")]
        sets: Vec<String>,

        /// Treat jet momenta as MeV against GeV histogram axes
        #[arg(long)]
        gev: bool,

        /// Output file for the result (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Commands::Inspect { input, output } => cmd_inspect(&input, output.as_ref()),
        Commands::Validate { input, output } => cmd_validate(&input, output.as_ref()),
        Commands::Lookup { input, hist, vars, pt, eta, phi, mass, sets, gev, output } => {
            cmd_lookup(&input, &hist, &vars, (pt, eta, phi, mass), &sets, gev, output.as_ref())
        }
    }
}

#[derive(Serialize)]
struct AxisReport {
    n_bins: usize,
    low: f64,
    high: f64,
}

#[derive(Serialize)]
struct HistogramReport {
    name: String,
    title: String,
    n_dims: usize,
    axes: Vec<AxisReport>,
}

#[derive(Serialize)]
struct InspectReport {
    name: Option<String>,
    version: Option<String>,
    histograms: Vec<HistogramReport>,
}

fn histogram_report(h: &Histogram) -> HistogramReport {
    HistogramReport {
        name: h.name().to_string(),
        title: h.title().to_string(),
        n_dims: h.n_dims(),
        axes: h
            .axes()
            .iter()
            .map(|a| AxisReport { n_bins: a.n_bins(), low: a.low(), high: a.high() })
            .collect(),
    }
}

fn cmd_inspect(input: &PathBuf, output: Option<&PathBuf>) -> Result<()> {
    tracing::info!(path = %input.display(), "opening calibration file");
    let file = CalibrationFile::open(input)
        .with_context(|| format!("failed to open '{}'", input.display()))?;
    tracing::info!(histograms = file.len(), "calibration file loaded");

    let report = InspectReport {
        name: file.name().map(str::to_string),
        version: file.version().map(str::to_string),
        histograms: file.histograms().into_iter().map(histogram_report).collect(),
    };
    write_json(&report, output)
}

#[derive(Serialize)]
struct ValidationEntry {
    name: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ValidationReport {
    ok: bool,
    histograms: Vec<ValidationEntry>,
}

fn cmd_validate(input: &PathBuf, output: Option<&PathBuf>) -> Result<()> {
    // Parse the raw document first so one bad histogram does not hide the
    // state of the others.
    let bytes = std::fs::read(input)
        .with_context(|| format!("failed to read '{}'", input.display()))?;
    let spec: CalibrationSpec = if input.extension().is_some_and(|ext| ext == "gz") {
        serde_json::from_reader(flate_reader(&bytes))
            .with_context(|| format!("malformed calibration JSON in '{}'", input.display()))?
    } else {
        serde_json::from_slice(&bytes)
            .with_context(|| format!("malformed calibration JSON in '{}'", input.display()))?
    };

    let mut entries = Vec::with_capacity(spec.histograms.len());
    let mut seen = std::collections::HashSet::new();
    for hist_spec in &spec.histograms {
        let mut error = Histogram::from_spec(hist_spec).err().map(|e| e.to_string());
        if !seen.insert(hist_spec.name.clone()) {
            error.get_or_insert_with(|| format!("duplicate histogram name '{}'", hist_spec.name));
        }
        entries.push(ValidationEntry {
            name: hist_spec.name.clone(),
            ok: error.is_none(),
            error,
        });
    }

    let ok = entries.iter().all(|e| e.ok);
    write_json(&ValidationReport { ok, histograms: entries }, output)?;
    if !ok {
        bail!("calibration file '{}' failed validation", input.display());
    }
    Ok(())
}

fn flate_reader(bytes: &[u8]) -> impl std::io::Read + '_ {
    flate2::read::GzDecoder::new(bytes)
}

#[derive(Serialize)]
struct LookupReport {
    hist: String,
    value: f64,
}

fn cmd_lookup(
    input: &PathBuf,
    hist: &str,
    vars: &[String],
    jet4: (f64, f64, f64, f64),
    sets: &[String],
    gev: bool,
    output: Option<&PathBuf>,
) -> Result<()> {
    let specs = vars.iter().map(|s| parse_var_spec(s)).collect::<Result<Vec<_>>>()?;

    let mut histo_input =
        HistoInput::new("cli-lookup", &input.to_string_lossy(), hist, specs);
    if gev {
        histo_input.set_gev();
    }
    tracing::info!(path = %input.display(), hist, "initializing histogram input");
    histo_input.initialize()?;

    let (pt, eta, phi, mass) = jet4;
    let jet = Jet::new(pt, eta, phi, mass);

    let mut ctx = JetContext::new();
    for pair in sets {
        let (key, raw) = pair
            .split_once('=')
            .with_context(|| format!("--set expects key=value, got '{}'", pair))?;
        if let Ok(v) = raw.parse::<i64>() {
            ctx.set_or_replace(key, v)?;
        } else {
            let v: f64 = raw
                .parse()
                .with_context(|| format!("--set value for '{}' is not a number: '{}'", key, raw))?;
            ctx.set_or_replace(key, v)?;
        }
    }

    let value = histo_input.value(&jet, &ctx)?;
    tracing::debug!(value, "lookup complete");
    write_json(&LookupReport { hist: hist.to_string(), value }, output)
}

fn parse_var_spec(s: &str) -> Result<VariableSpec> {
    let parts: Vec<&str> = s.split(':').collect();
    let [name, var_type, scope] = parts.as_slice() else {
        bail!("--var expects name:type:jet|ctx, got '{}'", s);
    };
    let is_jet_var = match *scope {
        "jet" => true,
        "ctx" | "context" => false,
        other => bail!("--var scope must be jet or ctx, got '{}'", other),
    };
    Ok(VariableSpec::new(name, var_type, is_jet_var))
}

fn write_json<T: Serialize>(value: &T, output: Option<&PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json.as_bytes())
                .with_context(|| format!("failed to write '{}'", path.display()))?;
        }
        None => println!("{}", json),
    }
    Ok(())
}
