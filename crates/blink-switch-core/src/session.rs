//! Detection session facade.
//!
//! Composes the classifier and the gesture controller behind the single
//! `process_frame` entry point a host calls once per captured frame.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::domain::{
    CaptureOrientation, DetectorError, FaceObservation, FrameResult,
};
use crate::modules::{
    BlinkGestureController, ClassifierConfig, FaceStateClassifier, GestureConfig,
    MissingLandmarkPolicy,
};
use crate::ports::{FeedbackSink, GestureScheduler};

/// Configuration for a detection session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// EAR threshold below which an eye counts as closed.
    pub ear_threshold: f64,
    /// Minimum face-origin displacement, in frame units, before the overlay
    /// is redrawn.
    pub redraw_threshold: f64,
    /// Closure duration that promotes a blink to a long blink.
    pub long_blink: Duration,
    /// Capture orientation of the incoming frames.
    pub orientation: CaptureOrientation,
    /// Fallback for landmark-less single-face frames.
    pub missing_landmarks: MissingLandmarkPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.2,
            redraw_threshold: 20.0,
            long_blink: Duration::from_secs(1),
            orientation: CaptureOrientation::Portrait,
            missing_landmarks: MissingLandmarkPolicy::HoldLast,
        }
    }
}

/// One running detection session.
///
/// Owns all per-session state (tracked overlay origin, gesture phase,
/// toggle). Frames must be fed in capture order; the engine itself never
/// reorders. State is discarded by [`reset`](Self::reset) when the host
/// restarts its capture session.
pub struct DetectionSession {
    classifier: FaceStateClassifier,
    gesture: BlinkGestureController,
}

impl DetectionSession {
    /// Creates a session over the host's scheduler and feedback sink.
    #[must_use]
    pub fn new(
        config: &SessionConfig,
        scheduler: Arc<dyn GestureScheduler>,
        feedback: Arc<dyn FeedbackSink>,
    ) -> Self {
        let classifier = FaceStateClassifier::new(ClassifierConfig {
            ear_threshold: config.ear_threshold,
            redraw_threshold: config.redraw_threshold,
            orientation: config.orientation,
            missing_landmarks: config.missing_landmarks,
            ..ClassifierConfig::default()
        });
        let gesture = BlinkGestureController::new(
            GestureConfig {
                long_blink: config.long_blink,
            },
            scheduler,
            feedback,
        );
        Self { classifier, gesture }
    }

    /// Processes one frame's observations.
    ///
    /// # Errors
    ///
    /// Returns the frame's contract violation
    /// ([`DetectorError::DegenerateGeometry`] from eye scoring). The frame
    /// is skipped: neither classifier nor gesture state advances, and the
    /// host should continue with the next frame.
    pub fn process_frame(
        &mut self,
        observations: &[FaceObservation],
    ) -> Result<FrameResult, DetectorError> {
        let classification = match self.classifier.classify(observations) {
            Ok(c) => c,
            Err(err) => {
                warn!(error = %err, "frame skipped");
                return Err(err);
            }
        };

        let update = self.gesture.update(classification.state);

        Ok(FrameResult {
            state: classification.state,
            overlay: classification.overlay,
            toggle_changed: update.toggle_changed,
            toggle_value: update.toggle_value,
        })
    }

    /// Current value of the toggle switch.
    #[must_use]
    pub fn toggle_value(&self) -> bool {
        self.gesture.toggle_value()
    }

    /// Cancels any pending gesture deadline and clears all session state.
    pub fn reset(&mut self) {
        self.classifier.reset();
        self.gesture.reset();
    }
}
