//! CLI argument validation tests.
//!
//! Tests command-line argument parsing, validation, and the error paths
//! that do not require an installed detector model.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use assert_cmd::Command;
use predicates::prelude::*;
use tryon_qc_test_support::SyntheticImage;

// === Missing/Invalid Path Tests ===

#[test]
fn test_missing_path_shows_error() {
    let mut cmd = Command::cargo_bin("tryon-qc").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No paths specified"));
}

#[test]
fn test_finish_missing_source_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("tryon-qc").unwrap();
    cmd.arg("finish")
        .arg("--source")
        .arg(temp_dir.path().join("missing.png"))
        .arg("--generated")
        .arg(temp_dir.path().join("also-missing.png"))
        .arg("--out")
        .arg(temp_dir.path().join("out.png"));

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read"));
}

// === Threshold Validation Tests ===

#[test]
fn test_max_center_above_one_rejected() {
    let mut cmd = Command::cargo_bin("tryon-qc").unwrap();
    cmd.arg("--max-center").arg("1.5").arg("candidate.png");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("1.5 is not in"));
}

#[test]
fn test_non_numeric_fraction_rejected() {
    let mut cmd = Command::cargo_bin("tryon-qc").unwrap();
    cmd.arg("--min-area").arg("tiny").arg("candidate.png");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not a valid number"));
}

#[test]
fn test_invalid_format_rejected() {
    let mut cmd = Command::cargo_bin("tryon-qc").unwrap();
    cmd.arg("--format").arg("xml").arg("candidate.png");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("json").or(predicate::str::contains("jsonl")));
}

// === Missing Model Tests ===

#[test]
fn test_gate_without_installed_model_points_at_fetch() {
    let temp_dir = tempfile::tempdir().unwrap();
    let candidate = temp_dir.path().join("candidate.png");
    SyntheticImage::flat(64, 64, [120, 120, 120])
        .save(&candidate)
        .unwrap();

    let mut cmd = Command::cargo_bin("tryon-qc").unwrap();
    cmd.arg("gate")
        .arg("--models-dir")
        .arg(temp_dir.path().join("no-models-here"))
        .arg(&candidate);

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("models fetch"));
}

// === Models Subcommand Tests ===

#[test]
fn test_models_path_prints_directory() {
    let mut cmd = Command::cargo_bin("tryon-qc").unwrap();
    cmd.arg("models").arg("path");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("models"));
}

#[test]
fn test_models_list_names_the_detector_model() {
    let mut cmd = Command::cargo_bin("tryon-qc").unwrap();
    cmd.arg("models").arg("list");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("seeta-frontal"));
}
