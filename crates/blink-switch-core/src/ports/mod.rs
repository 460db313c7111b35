//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the detection core and its
//! external collaborators: the observation stream, the timer, the feedback
//! cue, and the result/progress consumers.

mod feedback;
mod observation_source;
mod progress;
mod result_output;
mod scheduler;

pub use feedback::FeedbackSink;
pub use observation_source::ObservationSource;
pub use progress::{ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;
pub use scheduler::{GestureScheduler, TimerCallback, TimerHandle};
