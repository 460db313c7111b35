//! One-shot timer port for the gesture deadline.

use std::time::Duration;

/// Callback invoked when a scheduled deadline elapses.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a scheduled deadline.
///
/// Dropping the handle cancels the deadline. Cancellation is idempotent:
/// cancelling an already-fired or already-cancelled deadline is a no-op.
pub trait TimerHandle: Send {
    /// Cancels the deadline if it has not fired yet.
    fn cancel(&mut self);
}

/// Port for scheduling one-shot deadlines.
///
/// The gesture controller holds at most one live handle at a time, so an
/// implementation never needs to arbitrate between deadlines from the same
/// controller.
pub trait GestureScheduler: Send + Sync {
    /// Schedules `callback` to run once, `delay` from now.
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> Box<dyn TimerHandle>;
}
