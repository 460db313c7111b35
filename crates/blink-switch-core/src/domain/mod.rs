//! Core domain types for face-state detection.

mod error;
mod geometry;
mod observation;
mod state;

pub use error::DetectorError;
pub use geometry::{Point2D, Rect};
pub use observation::{
    CaptureOrientation, EyeLandmarks, FaceObservation, FrameRecord, EYE_LANDMARK_COUNT,
};
pub use state::{DetectionState, FrameReport, FrameResult, OverlayCommand};
