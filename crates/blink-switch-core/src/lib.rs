//! Blink Switch Core - Face-state classification and gesture control
//!
//! This crate contains the domain types, the port traits, and the engine
//! itself: eye-openness scoring, per-frame face-state classification with
//! overlay hysteresis, and the long-blink-to-toggle gesture state machine.

pub mod domain;
pub mod modules;
pub mod ports;
pub mod session;

pub use domain::{
    CaptureOrientation, DetectionState, DetectorError, EyeLandmarks, FaceObservation, FrameRecord,
    FrameReport, FrameResult, OverlayCommand, Point2D, Rect,
};
pub use ports::{
    FeedbackSink, GestureScheduler, ObservationSource, ProgressEvent, ProgressSink, ResultOutput,
    TimerCallback, TimerHandle,
};
pub use session::{DetectionSession, SessionConfig};
