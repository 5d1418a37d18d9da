//! Integration tests for the geoscope binary
//!
//! These tests verify that JSON output is a single valid document and that a
//! model trained from the command line can be used for detection.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const TRAINING_DATA: &str = r#"{"text": "Eiffel tower and the Louvre in Paris", "lat": 48.8584, "lng": 2.2945}
{"text": "Louvre museum near the Seine", "lat": 48.8606, "lng": 2.3376}
{"text": "Brandenburg gate in Berlin", "lat": 52.5163, "lng": 13.3777}

not json at all
{"text": "Berlin wall memorial on the Spree", "lat": 52.5351, "lng": 13.3903}
{"text": "Opera house in Sydney harbour", "lat": -33.8568, "lng": 151.2153}
"#;

fn geoscope() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_geoscope"));
    for var in [
        "GEOSCOPE_GRID_SIZES",
        "GEOSCOPE_FINE_GRID_SIZE",
        "GEOSCOPE_CACHE_UPPER",
        "GEOSCOPE_CACHE_LOWER",
        "GEOSCOPE_MAX_NGRAM",
    ] {
        command.env_remove(var);
    }
    command.env("RUST_LOG", "warn");
    command
}

fn run(dir: &Path, args: &[&str]) -> Output {
    geoscope()
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to execute geoscope")
}

fn json_stdout(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("Output should be valid JSON")
}

fn train(dir: &TempDir) -> PathBuf {
    let input = dir.path().join("training.jsonl");
    std::fs::write(&input, TRAINING_DATA).unwrap();

    let output = run(
        dir.path(),
        &["train", "training.jsonl", "--output", "model.json", "--fine-grid-size", "1", "--grid-sizes", "10", "--json"],
    );
    assert!(output.status.success(), "train failed: {}", String::from_utf8_lossy(&output.stderr));

    let parsed = json_stdout(&output);
    assert_eq!(parsed["status"], "success");
    assert_eq!(parsed["data"]["documents"], 5);
    assert_eq!(parsed["data"]["skipped_lines"], 1);
    dir.path().join("model.json")
}

#[test]
fn test_train_then_detect() {
    let dir = TempDir::new().unwrap();
    let model = train(&dir);
    assert!(model.exists());

    let output = run(
        dir.path(),
        &["detect", "walking along the Seine to the Louvre", "--fine-grid-size", "1", "--grid-sizes", "10", "--json"],
    );
    assert!(output.status.success(), "detect failed: {}", String::from_utf8_lossy(&output.stderr));

    let parsed = json_stdout(&output);
    let result = &parsed["data"][0];
    assert_eq!(result["status"], "completed");
    assert_eq!(result["stages"][0]["cell"], "(18|13)");
    assert_eq!(result["stages"][1]["cell"], "(182|138)");
    let lat = result["coordinate"]["lat"].as_f64().unwrap();
    assert!((lat - 48.86).abs() < 0.05);
}

#[test]
fn test_detect_unknown_text_has_no_coordinate() {
    let dir = TempDir::new().unwrap();
    train(&dir);

    let output = run(dir.path(), &["detect", "qwerty", "--grid-sizes", "10", "--json"]);
    assert!(output.status.success());
    let parsed = json_stdout(&output);
    assert_eq!(parsed["data"][0]["status"], "unclassified");
    assert!(parsed["data"][0]["coordinate"].is_null());
}

#[test]
fn test_detect_rejects_cascade_too_fine_for_model() {
    let dir = TempDir::new().unwrap();
    train(&dir);

    let output = run(dir.path(), &["detect", "Berlin", "--grid-sizes", "10,1.5"]);
    assert!(!output.status.success());
}

#[test]
fn test_detect_missing_model() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["detect", "Paris", "--model", "missing.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.json"));
}

#[test]
fn test_inspect_json() {
    let dir = TempDir::new().unwrap();
    train(&dir);

    let output = run(dir.path(), &["inspect", "--json"]);
    assert!(output.status.success());
    let parsed = json_stdout(&output);
    assert_eq!(parsed["data"]["fine_grid_size"], 1.0);
    assert_eq!(parsed["data"]["categories"], 3);
    assert_eq!(parsed["data"]["top_categories"][0]["documents"], 2);
}

#[test]
fn test_config_reports_sources() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("geoscope.toml"), "cache_upper = 500\ncache_lower = 400\n").unwrap();

    let output = run(dir.path(), &["config", "--json", "--max-ngram", "2"]);
    assert!(output.status.success());
    let parsed = json_stdout(&output);
    let rows = parsed["data"].as_array().unwrap();
    let source_of = |key: &str| {
        rows.iter()
            .find(|row| row["key"] == key)
            .map(|row| row["source"].as_str().unwrap().to_string())
            .unwrap()
    };
    assert_eq!(source_of("cache_upper"), "File");
    assert_eq!(source_of("max_ngram"), "Cli");
    assert_eq!(source_of("grid_sizes"), "Default");
}
