//! Engine modules: eye scoring, frame classification, gesture control.

pub mod classifier;
pub mod ear;
pub mod gesture;

pub use classifier::{Classification, ClassifierConfig, FaceStateClassifier, MissingLandmarkPolicy};
pub use ear::eye_aspect_ratio;
pub use gesture::{BlinkGestureController, GestureConfig, GestureUpdate};
