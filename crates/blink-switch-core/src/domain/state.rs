//! Per-frame classification results reported to the host.

use serde::{Deserialize, Serialize};

use super::Rect;

/// Classification of a single frame. Exactly one value per frame.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionState {
    /// No faces in the frame.
    NoFaces,
    /// Exactly one face, both eyes scored at or above the openness threshold.
    EyesOpen,
    /// Exactly one face, at least one eye scored below the openness threshold.
    EyesClosed,
    /// Two or more faces; eye state is not evaluated.
    MultipleFaces,
}

impl DetectionState {
    /// Short lowercase name, as used in log output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoFaces => "no_faces",
            Self::EyesOpen => "eyes_open",
            Self::EyesClosed => "eyes_closed",
            Self::MultipleFaces => "multiple_faces",
        }
    }
}

/// What the host should do with the face overlay after a frame.
///
/// `Keep` is the positional-hysteresis outcome: the face moved less than the
/// redraw threshold, so the overlay stays where it was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OverlayCommand {
    /// Leave the overlay as previously drawn.
    Keep,
    /// Draw the overlay at the given rectangle.
    Redraw {
        /// Rectangle to draw, already grown for display.
        rect: Rect,
    },
    /// Remove the overlay from display.
    Clear,
}

/// Engine output for one processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    /// The frame's classification.
    pub state: DetectionState,
    /// Overlay instruction for the host renderer.
    pub overlay: OverlayCommand,
    /// Whether this frame's transition flipped the toggle (a short blink).
    /// Long-blink flips happen at deadline fire, between frames, and are
    /// announced through the feedback sink instead.
    pub toggle_changed: bool,
    /// Current value of the toggle switch.
    pub toggle_value: bool,
}

/// A [`FrameResult`] paired with its position in a replayed stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Zero-based frame index within the stream.
    pub frame: u64,
    /// Stream timestamp of the frame, in seconds.
    #[serde(rename = "t")]
    pub timestamp_s: f64,
    /// The engine's result for the frame.
    #[serde(flatten)]
    pub result: FrameResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serializes_snake_case() {
        let json = serde_json::to_string(&DetectionState::MultipleFaces).expect("serialize");
        assert_eq!(json, r#""multiple_faces""#);
    }

    #[test]
    fn test_overlay_command_tagged() {
        let cmd = OverlayCommand::Redraw {
            rect: Rect::new(1.0, 2.0, 3.0, 4.0),
        };
        let json = serde_json::to_string(&cmd).expect("serialize");
        assert!(json.contains(r#""action":"redraw""#));

        let keep = serde_json::to_string(&OverlayCommand::Keep).expect("serialize");
        assert!(keep.contains(r#""action":"keep""#));
    }

    #[test]
    fn test_frame_report_flattens_result() {
        let report = FrameReport {
            frame: 3,
            timestamp_s: 0.1,
            result: FrameResult {
                state: DetectionState::EyesOpen,
                overlay: OverlayCommand::Keep,
                toggle_changed: false,
                toggle_value: true,
            },
        };

        let value: serde_json::Value =
            serde_json::to_value(report).expect("serialize");
        assert_eq!(value["frame"], 3);
        assert_eq!(value["state"], "eyes_open");
        assert_eq!(value["toggle_value"], true);
    }
}
