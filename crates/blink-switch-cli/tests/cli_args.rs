//! CLI argument validation tests.
//!
//! Tests command-line argument parsing, validation, and error handling.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use assert_cmd::Command;
use predicates::prelude::*;

fn blink_switch() -> Command {
    Command::cargo_bin("blink-switch").unwrap()
}

// === Missing/Invalid Stream Tests ===

#[test]
fn test_missing_stream_shows_error() {
    let mut cmd = blink_switch();
    // No stream argument at all - error goes to stderr
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("No stream specified"));
}

#[test]
fn test_nonexistent_stream_is_skipped_item() {
    // A missing file surfaces as one skipped item, not a hard failure
    let mut cmd = blink_switch();
    cmd.arg("/nonexistent/stream.jsonl").arg("--quiet");

    cmd.assert().code(1);
}

// === Threshold Validation Tests ===

#[test]
fn test_ear_threshold_above_one_rejected() {
    let mut cmd = blink_switch();
    cmd.arg("--ear-threshold").arg("1.5").arg("stream.jsonl");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("0.0..=1.0").or(predicate::str::contains("invalid")));
}

#[test]
fn test_ear_threshold_non_numeric_rejected() {
    let mut cmd = blink_switch();
    cmd.arg("--ear-threshold").arg("abc").arg("stream.jsonl");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not a valid number"));
}

#[test]
fn test_negative_redraw_threshold_rejected() {
    let mut cmd = blink_switch();
    cmd.arg("--redraw-threshold")
        .arg("-5.0")
        .arg("stream.jsonl");

    cmd.assert().failure();
}

#[test]
fn test_zero_long_blink_rejected() {
    let mut cmd = blink_switch();
    cmd.arg("--long-blink-ms").arg("0").arg("stream.jsonl");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("positive"));
}

// === Format Validation Tests ===

#[test]
fn test_invalid_format_rejected() {
    let mut cmd = blink_switch();
    cmd.arg("--format").arg("xml").arg("stream.jsonl");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("json").or(predicate::str::contains("jsonl")));
}

#[test]
fn test_valid_formats_accepted() {
    let temp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), "{\"t\":0.0,\"faces\":[]}\n").unwrap();

    for format in ["json", "jsonl"] {
        let mut cmd = blink_switch();
        cmd.arg("--format")
            .arg(format)
            .arg("--quiet")
            .arg(temp.path());
        cmd.assert().code(0);
    }
}

// === Synth Command Tests ===

#[test]
fn test_synth_requires_scenario() {
    let mut cmd = blink_switch();
    cmd.arg("synth");

    cmd.assert().failure();
}

#[test]
fn test_synth_rejects_unknown_scenario() {
    let mut cmd = blink_switch();
    cmd.arg("synth").arg("wink");

    cmd.assert().failure();
}

#[test]
fn test_synth_rejects_zero_fps() {
    let mut cmd = blink_switch();
    cmd.arg("synth").arg("long-blink").arg("--fps").arg("0");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("positive"));
}

#[test]
fn test_synth_writes_stream_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let out = temp_dir.path().join("demo.jsonl");

    let mut cmd = blink_switch();
    cmd.arg("synth")
        .arg("short-blink")
        .arg("-o")
        .arg(&out);
    cmd.assert().code(0);

    let content = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert!(lines.len() > 30, "expected a multi-second stream");

    // Every line is a frame record
    for line in lines {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value["t"].is_number());
        assert!(value["faces"].is_array());
    }
}

#[test]
fn test_synth_writes_to_stdout_by_default() {
    let mut cmd = blink_switch();
    cmd.arg("synth").arg("multi-face");

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().count() > 30);
}
