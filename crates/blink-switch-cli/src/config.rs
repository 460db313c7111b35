//! Configuration file support for blink-switch.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/blink-switch/config.toml` (lowest priority)
//! - Project-local: `.blink-switch.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Detection engine settings.
    pub detection: DetectionConfig,
    /// Gesture settings.
    pub gesture: GestureFileConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// Detection engine configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Eye aspect ratio threshold (0.0-1.0).
    pub ear_threshold: Option<f64>,
    /// Overlay redraw displacement threshold, in frame units.
    pub redraw_threshold: Option<f64>,
    /// Capture orientation: "portrait" or "landscape".
    pub orientation: Option<String>,
    /// Landmark fallback: "hold_last" or "assume_open".
    pub missing_landmarks: Option<String>,
}

/// Gesture configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GestureFileConfig {
    /// Long-blink duration in milliseconds.
    pub long_blink_ms: Option<u64>,
    /// Ring the terminal bell on a long blink.
    pub bell: Option<bool>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/blink-switch/config.toml`
    /// 2. Project-local: `.blink-switch.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load XDG config (lowest priority)
        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        // Load project-local config (higher priority, merged)
        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        // Validate merged config
        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if let Some(t) = self.detection.ear_threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(format!("detection.ear_threshold must be 0.0-1.0, got {t}"));
            }
        }
        if let Some(t) = self.detection.redraw_threshold {
            if t < 0.0 {
                return Err(format!(
                    "detection.redraw_threshold must be non-negative, got {t}"
                ));
            }
        }
        if let Some(ref o) = self.detection.orientation {
            if o != "portrait" && o != "landscape" {
                return Err(format!(
                    "detection.orientation must be 'portrait' or 'landscape', got '{o}'"
                ));
            }
        }
        if let Some(ref m) = self.detection.missing_landmarks {
            if m != "hold_last" && m != "assume_open" {
                return Err(format!(
                    "detection.missing_landmarks must be 'hold_last' or 'assume_open', got '{m}'"
                ));
            }
        }
        if let Some(ms) = self.gesture.long_blink_ms {
            if ms == 0 {
                return Err("gesture.long_blink_ms must be positive".to_string());
            }
        }
        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!("output.format must be 'json' or 'jsonl', got '{f}'"));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // Detection
        self.detection.ear_threshold = other
            .detection
            .ear_threshold
            .or(self.detection.ear_threshold);
        self.detection.redraw_threshold = other
            .detection
            .redraw_threshold
            .or(self.detection.redraw_threshold);
        self.detection.orientation = other
            .detection
            .orientation
            .or_else(|| self.detection.orientation.take());
        self.detection.missing_landmarks = other
            .detection
            .missing_landmarks
            .or_else(|| self.detection.missing_landmarks.take());

        // Gesture
        self.gesture.long_blink_ms = other.gesture.long_blink_ms.or(self.gesture.long_blink_ms);
        self.gesture.bell = other.gesture.bell.or(self.gesture.bell);

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("blink-switch").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.blink-switch.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".blink-switch.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
