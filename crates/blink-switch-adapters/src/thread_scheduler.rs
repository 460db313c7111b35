//! Wall-clock one-shot timer adapter.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use blink_switch_core::{GestureScheduler, TimerCallback, TimerHandle};
use tracing::trace;

/// Real-time scheduler backed by one short-lived thread per deadline.
///
/// The timer thread parks on a channel with a timeout: a cancellation
/// message (or the handle being dropped) wakes it before the deadline and
/// the callback never runs; otherwise the timeout elapses and the callback
/// runs on the timer thread.
#[derive(Debug, Default)]
pub struct ThreadScheduler;

impl ThreadScheduler {
    /// Creates a new scheduler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl GestureScheduler for ThreadScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> Box<dyn TimerHandle> {
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();

        thread::spawn(move || match cancel_rx.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => callback(),
            // Explicit cancel or handle dropped
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                trace!("deadline cancelled before firing");
            }
        });

        Box::new(ThreadTimerHandle {
            cancel_tx: Some(cancel_tx),
        })
    }
}

/// Handle to a pending [`ThreadScheduler`] deadline.
struct ThreadTimerHandle {
    cancel_tx: Option<Sender<()>>,
}

impl TimerHandle for ThreadTimerHandle {
    fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            // The send fails if the timer already fired and the thread is
            // gone; cancellation is a no-op then
            let _ = tx.send(());
        }
    }
}
