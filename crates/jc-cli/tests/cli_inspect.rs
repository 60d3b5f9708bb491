use std::path::PathBuf;
use std::process::{Command, Output};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_jetcal"))
}

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures").join(name)
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

#[test]
fn inspect_lists_histograms_sorted() {
    let input = fixture_path("calib_r4.json");
    let out = run(&["inspect", "--input", input.to_string_lossy().as_ref()]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["name"], "Summer2026_R4");
    let hists = report["histograms"].as_array().unwrap();
    let names: Vec<&str> = hists.iter().map(|h| h["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["jes_pt", "jes_pt_abseta", "offset_mu"]);
    assert_eq!(hists[1]["n_dims"], 2);
    assert_eq!(hists[1]["axes"][1]["n_bins"], 3);
}

#[test]
fn inspect_reads_gzipped_files() {
    let input = fixture_path("calib_r4_gz.json.gz");
    let out = run(&["inspect", "--input", input.to_string_lossy().as_ref()]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["histograms"].as_array().unwrap().len(), 3);
}

#[test]
fn inspect_missing_file_fails() {
    let out = run(&["inspect", "--input", "/nonexistent/calib.json"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("/nonexistent/calib.json"), "stderr: {}", stderr);
}

#[test]
fn validate_reports_per_histogram_errors() {
    let input = fixture_path("calib_broken.json");
    let out = run(&["validate", "--input", input.to_string_lossy().as_ref()]);
    assert!(!out.status.success());

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["ok"], false);
    let hists = report["histograms"].as_array().unwrap();
    assert_eq!(hists[0]["name"], "bad_contents");
    assert_eq!(hists[0]["ok"], false);
    assert!(hists[0]["error"].as_str().unwrap().contains("contents"));
}

#[test]
fn validate_accepts_good_files() {
    let input = fixture_path("calib_r4.json");
    let out = run(&["validate", "--input", input.to_string_lossy().as_ref()]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["ok"], true);
}
