//! Test support utilities for blink-switch.
//!
//! Provides mocks for every core port and builders for synthetic face
//! observations and frame streams.
//!
//! # Example
//!
//! ```
//! use blink_switch_test_support::{MockScheduler, StreamBuilder, SyntheticFaceBuilder};
//!
//! // A face with a known open-eye score
//! let face = SyntheticFaceBuilder::open_face();
//!
//! // A 30 fps stream holding the eyes closed for 1.5 seconds
//! let frames = StreamBuilder::long_blink();
//!
//! // A scheduler whose deadlines fire only when the test says so
//! let scheduler = MockScheduler::new();
//! ```

mod builders;
mod mocks;

pub use builders::{StreamBuilder, SyntheticFaceBuilder, DEFAULT_FACE_BOX};
pub use mocks::{
    MockFeedbackSink, MockObservationSource, MockProgressSink, MockResultOutput, MockScheduler,
};
