//! Error kinds surfaced by the engine and its collaborators.

use thiserror::Error;

use super::observation::EYE_LANDMARK_COUNT;

/// Errors the detection core reports to its host.
///
/// Geometric and contract errors apply to a single frame: the frame is
/// skipped and prior state is left unchanged. The camera variants are never
/// produced by the core itself; they exist so capture-side failures from the
/// host's camera collaborator share one error vocabulary.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DetectorError {
    /// An eye contour did not contain exactly six points.
    #[error("eye contour must have exactly {EYE_LANDMARK_COUNT} points, got {count}")]
    InvalidLandmarks {
        /// Number of points actually supplied.
        count: usize,
    },

    /// Eye landmarks were collinear or collapsed: the horizontal span of the
    /// contour is zero, so the aspect ratio is undefined.
    #[error("degenerate eye geometry: zero horizontal span")]
    DegenerateGeometry,

    /// The capture device could not be opened or produced no frames.
    #[error("camera unavailable: {reason}")]
    CameraUnavailable {
        /// Host-provided description of the capture failure.
        reason: String,
    },

    /// Camera access was denied by the user or platform.
    #[error("camera permission denied")]
    PermissionDenied,
}
