//! Binary-level configuration layering tests.
//!
//! Verifies XDG config, project-local config, and CLI flag precedence.

#![allow(clippy::unwrap_used, deprecated)]

use std::io::Write;

use assert_cmd::Command;
use blink_switch_core::FrameRecord;
use blink_switch_test_support::{StreamBuilder, SyntheticFaceBuilder};
use serde_json::Value;

fn write_stream(frames: &[FrameRecord], dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("stream.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    for frame in frames {
        writeln!(file, "{}", serde_json::to_string(frame).unwrap()).unwrap();
    }
    path
}

fn short_blink_frames() -> Vec<FrameRecord> {
    StreamBuilder::short_blink()
}

#[test]
fn test_project_config_sets_output_format() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(
        temp.path().join(".blink-switch.toml"),
        "[output]\nformat = 'json'\n",
    )
    .unwrap();
    let stream = write_stream(&short_blink_frames(), temp.path());

    let mut cmd = Command::cargo_bin("blink-switch").unwrap();
    cmd.current_dir(temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join("xdg"))
        .arg("--quiet")
        .arg(&stream);

    let output = cmd.output().unwrap();
    assert_eq!(output.status.code().unwrap(), 0);

    // Config turned the default JSONL into a single JSON array
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value.is_array());
}

#[test]
fn test_cli_flag_overrides_project_config() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(
        temp.path().join(".blink-switch.toml"),
        "[output]\nformat = 'json'\n",
    )
    .unwrap();
    let stream = write_stream(&short_blink_frames(), temp.path());

    let mut cmd = Command::cargo_bin("blink-switch").unwrap();
    cmd.current_dir(temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join("xdg"))
        .arg("--quiet")
        .arg("--format")
        .arg("jsonl")
        .arg(&stream);

    let output = cmd.output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    // JSONL: every line parses on its own
    assert!(stdout.lines().filter(|l| !l.trim().is_empty()).count() > 1);
    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        let _: Value = serde_json::from_str(line).unwrap();
    }
}

#[test]
fn test_xdg_config_applies_detection_settings() {
    let temp = tempfile::tempdir().unwrap();
    let xdg = temp.path().join("xdg");
    std::fs::create_dir_all(xdg.join("blink-switch")).unwrap();
    // A 10 s deadline turns the 1.5 s closure into a short blink
    std::fs::write(
        xdg.join("blink-switch/config.toml"),
        "[gesture]\nlong_blink_ms = 10000\n",
    )
    .unwrap();
    let stream = write_stream(&StreamBuilder::long_blink(), temp.path());

    let mut cmd = Command::cargo_bin("blink-switch").unwrap();
    cmd.current_dir(temp.path())
        .env("XDG_CONFIG_HOME", &xdg)
        .arg("--quiet")
        .arg(&stream);

    let output = cmd.output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let flips = stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str::<Value>(l).unwrap())
        .filter(|r| r["toggle_changed"] == true)
        .count();
    assert_eq!(flips, 1, "config deadline downgraded the long blink");
}

#[test]
fn test_project_config_overrides_xdg() {
    let temp = tempfile::tempdir().unwrap();
    let xdg = temp.path().join("xdg");
    std::fs::create_dir_all(xdg.join("blink-switch")).unwrap();
    std::fs::write(
        xdg.join("blink-switch/config.toml"),
        "[detection]\near_threshold = 0.01\n",
    )
    .unwrap();
    // Project config restores the standard threshold
    std::fs::write(
        temp.path().join(".blink-switch.toml"),
        "[detection]\near_threshold = 0.2\n",
    )
    .unwrap();

    let frames = vec![StreamBuilder::frame(
        0.0,
        vec![SyntheticFaceBuilder::closed_face()],
    )];
    let stream = write_stream(&frames, temp.path());

    let mut cmd = Command::cargo_bin("blink-switch").unwrap();
    cmd.current_dir(temp.path())
        .env("XDG_CONFIG_HOME", &xdg)
        .arg("--quiet")
        .arg(&stream);

    let output = cmd.output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(
        report["state"], "eyes_closed",
        "project threshold won over the permissive XDG one"
    );
}
