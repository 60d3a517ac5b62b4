use std::path::Path;
use std::process::{Command, Output};

use snlc_fits::{ColumnData, TableWriter};
use tempfile::tempdir;

fn snlc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_snlc"))
        .args(args)
        .env_remove("CADENCE_SIMS")
        .env_remove("RUST_LOG")
        .output()
        .expect("run snlc")
}

fn seed(dir: &Path) {
    let model = dir.join("baseline").join("LSST_WFD_MODEL11");
    std::fs::create_dir_all(&model).expect("dir");
    TableWriter::new("HEADER")
        .column("SNID", ColumnData::Int(vec![100, 200]))
        .column("RA", ColumnData::Float(vec![1.0, 2.0]))
        .column("DECL", ColumnData::Float(vec![-1.0, -2.0]))
        .column("MWEBV", ColumnData::Float(vec![0.01, 0.02]))
        .column("PTROBS_MIN", ColumnData::Int(vec![1, 4]))
        .column("PTROBS_MAX", ColumnData::Int(vec![3, 2]))
        .column("SIM_MODEL_NAME", ColumnData::Text(vec!["SALT2".into(), "SALT2".into()]))
        .write(&model.join("run_HEAD.FITS"))
        .expect("header");
    TableWriter::new("PHOTOMETRY")
        .column("MJD", ColumnData::Float(vec![58000.5, 58000.1, 58000.9]))
        .column("FLT", ColumnData::Text(vec!["g".into(), "r".into(), "i".into()]))
        .column("FIELD", ColumnData::Text(vec!["WFD".into(); 3]))
        .column("PHOTFLAG", ColumnData::Int(vec![0, 4096, 6144]))
        .column("PHOTPROB", ColumnData::Float(vec![1.0; 3]))
        .column("FLUXCAL", ColumnData::Float(vec![10.0, 20.0, 30.0]))
        .column("FLUXCALERR", ColumnData::Float(vec![1.0; 3]))
        .column("PSF_SIG1", ColumnData::Float(vec![2.0; 3]))
        .column("ZEROPT", ColumnData::Float(vec![27.5; 3]))
        .write(&model.join("run_PHOT.FITS"))
        .expect("photometry");
}

#[test]
fn summary_reports_excluded_records() {
    let dir = tempdir().expect("tmp");
    seed(dir.path());
    let root = dir.path().to_str().expect("utf8 path");

    let output = snlc(&["summary", "--cadence", "baseline", "--data-root", root]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(summary["objects"], 1);
    assert_eq!(summary["observations"], 3);
    assert_eq!(summary["diagnostics"].as_array().map(Vec::len), Some(1));

    let strict = snlc(&["summary", "--cadence", "baseline", "--data-root", root, "--strict"]);
    assert!(!strict.status.success());
}

#[test]
fn export_writes_csv() {
    let dir = tempdir().expect("tmp");
    seed(dir.path());
    let out = dir.path().join("curves.csv");
    let output = snlc(&[
        "export",
        "--cadence",
        "baseline",
        "--data-root",
        dir.path().to_str().expect("utf8 path"),
        "--out",
        out.to_str().expect("utf8 path"),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let text = std::fs::read_to_string(&out).expect("csv");
    assert_eq!(text.lines().count(), 4);
    assert!(text.lines().nth(1).expect("row").starts_with("100,58000.1,lsstr,"));
}

#[test]
fn show_prints_one_curve() {
    let dir = tempdir().expect("tmp");
    seed(dir.path());
    let header = dir.path().join("baseline/LSST_WFD_MODEL11/run_HEAD.FITS");
    let output = snlc(&["show", "--header", header.to_str().expect("utf8"), "--snid", "100"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let curve: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(curve["record"]["model_code"], 11);
    assert_eq!(curve["observations"][0]["mjd"], 58000.1);

    let excluded = snlc(&["show", "--header", header.to_str().expect("utf8"), "--snid", "200"]);
    assert!(!excluded.status.success());
}

#[test]
fn models_lists_duplicate_codes() {
    let output = snlc(&["models", "--code", "14"]);
    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let names: Vec<_> = entries
        .as_array()
        .expect("array")
        .iter()
        .map(|entry| entry["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["SNCC-II", "SNCC-IIn"]);
}

#[test]
fn doctor_flags_missing_root() {
    let output = snlc(&["doctor"]);
    assert!(!output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["status"], "needs-attention");
}
