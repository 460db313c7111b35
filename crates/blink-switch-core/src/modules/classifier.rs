//! Per-frame face-state classification.
//!
//! Folds one frame's observations into a [`DetectionState`] and an overlay
//! instruction. Multi-face frames short-circuit before any eye scoring, and
//! small face movements are absorbed by positional hysteresis so tracking
//! jitter does not flicker the overlay.

use tracing::{debug, trace};

use crate::domain::{
    CaptureOrientation, DetectionState, DetectorError, FaceObservation, OverlayCommand, Point2D,
};
use crate::modules::ear::eye_aspect_ratio;

/// Fallback when a single-face observation arrives without eye landmarks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingLandmarkPolicy {
    /// Report the previous frame's state again. This reproduces the
    /// renderer the engine was extracted from, where a landmark-less frame
    /// simply left the published state untouched.
    #[default]
    HoldLast,
    /// Treat the face as having open eyes.
    AssumeOpen,
}

/// Configuration for per-frame classification.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// EAR threshold below which an eye counts as closed. An EAR exactly at
    /// the threshold counts as open.
    pub ear_threshold: f64,
    /// Overlay redraw threshold: the face origin must move strictly more
    /// than this many units before the overlay is redrawn.
    pub redraw_threshold: f64,
    /// Factor by which the bounding box is grown for the drawn overlay.
    pub overlay_scale: f64,
    /// Capture orientation, for EAR normalization.
    pub orientation: CaptureOrientation,
    /// Fallback policy for landmark-less single-face frames.
    pub missing_landmarks: MissingLandmarkPolicy,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.2,
            redraw_threshold: 20.0,
            overlay_scale: 0.5,
            orientation: CaptureOrientation::Portrait,
            missing_landmarks: MissingLandmarkPolicy::HoldLast,
        }
    }
}

/// Result of classifying one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// The frame's detection state.
    pub state: DetectionState,
    /// What to do with the face overlay.
    pub overlay: OverlayCommand,
}

/// Stateful per-frame classifier.
///
/// Owns the tracked overlay origin and the last published state; both are
/// scoped to one detection session and cleared by [`reset`](Self::reset).
#[derive(Debug)]
pub struct FaceStateClassifier {
    config: ClassifierConfig,
    tracked_origin: Option<Point2D>,
    last_state: DetectionState,
}

impl FaceStateClassifier {
    /// Creates a classifier with the given configuration.
    #[must_use]
    pub const fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            tracked_origin: None,
            last_state: DetectionState::NoFaces,
        }
    }

    /// Returns the classifier configuration.
    #[must_use]
    pub const fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// The most recently published state.
    #[must_use]
    pub const fn last_state(&self) -> DetectionState {
        self.last_state
    }

    /// Classifies one frame's observations.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::DegenerateGeometry`] if an eye contour
    /// cannot be scored. No internal state is modified on error, so the
    /// caller can skip the frame and continue.
    pub fn classify(
        &mut self,
        observations: &[FaceObservation],
    ) -> Result<Classification, DetectorError> {
        match observations {
            [] => {
                self.tracked_origin = None;
                self.last_state = DetectionState::NoFaces;
                Ok(Classification {
                    state: DetectionState::NoFaces,
                    overlay: OverlayCommand::Clear,
                })
            }
            [face] => self.classify_single(face),
            _ => {
                // Any frame with two or more faces skips eye evaluation
                // entirely; eye state is only defined for the single-face
                // case.
                debug!(count = observations.len(), "multiple faces in frame");
                self.tracked_origin = None;
                self.last_state = DetectionState::MultipleFaces;
                Ok(Classification {
                    state: DetectionState::MultipleFaces,
                    overlay: OverlayCommand::Clear,
                })
            }
        }
    }

    fn classify_single(
        &mut self,
        face: &FaceObservation,
    ) -> Result<Classification, DetectorError> {
        // Score eyes before touching any retained state, so a degenerate
        // frame leaves both the origin and the published state unchanged.
        let state = match (&face.left_eye, &face.right_eye) {
            (Some(left), Some(right)) => {
                let left_ear =
                    eye_aspect_ratio(left, &face.bounding_box, self.config.orientation)?;
                let right_ear =
                    eye_aspect_ratio(right, &face.bounding_box, self.config.orientation)?;
                trace!(left_ear, right_ear, "eye aspect ratios");

                if left_ear < self.config.ear_threshold || right_ear < self.config.ear_threshold {
                    DetectionState::EyesClosed
                } else {
                    DetectionState::EyesOpen
                }
            }
            _ => match self.config.missing_landmarks {
                MissingLandmarkPolicy::HoldLast => {
                    trace!(held = self.last_state.as_str(), "no eye landmarks, holding");
                    self.last_state
                }
                MissingLandmarkPolicy::AssumeOpen => DetectionState::EyesOpen,
            },
        };

        let origin = face.bounding_box.origin();
        let overlay = if let Some(previous) = self.tracked_origin {
            let displacement = previous.distance_to(&origin);
            if displacement > self.config.redraw_threshold {
                trace!(displacement, "overlay redraw");
                self.tracked_origin = Some(origin);
                OverlayCommand::Redraw {
                    rect: face.bounding_box.scaled_up(self.config.overlay_scale),
                }
            } else {
                OverlayCommand::Keep
            }
        } else {
            self.tracked_origin = Some(origin);
            OverlayCommand::Redraw {
                rect: face.bounding_box.scaled_up(self.config.overlay_scale),
            }
        };

        if state != self.last_state {
            debug!(from = self.last_state.as_str(), to = state.as_str(), "state change");
        }
        self.last_state = state;

        Ok(Classification { state, overlay })
    }

    /// Clears tracked origin and published state for a fresh session.
    pub fn reset(&mut self) {
        self.tracked_origin = None;
        self.last_state = DetectionState::NoFaces;
    }
}
