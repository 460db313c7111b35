//! Deterministic scheduler driven by an explicit clock.
//!
//! Replay and tests advance time manually; deadlines fire synchronously,
//! in deadline order, inside [`VirtualScheduler::advance_to`]. Advancing to
//! a frame's timestamp before processing the frame gives the deterministic
//! tie-break for the fire/cancel race: a deadline due at or before the
//! frame fires first.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use blink_switch_core::{GestureScheduler, TimerCallback, TimerHandle};
use tracing::trace;

struct PendingDeadline {
    id: u64,
    due: Duration,
    callback: TimerCallback,
}

#[derive(Default)]
struct VirtualInner {
    now: Duration,
    next_id: u64,
    pending: Vec<PendingDeadline>,
}

/// Manual-clock scheduler for deterministic replay.
#[derive(Clone, Default)]
pub struct VirtualScheduler {
    inner: Arc<Mutex<VirtualInner>>,
}

impl VirtualScheduler {
    /// Creates a scheduler with its clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).now
    }

    /// Number of deadlines currently pending.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .len()
    }

    /// Advances the clock to `target`, firing every due deadline in
    /// deadline order (insertion order breaks exact ties). The clock never
    /// moves backwards; a target before the current time is a no-op.
    pub fn advance_to(&self, target: Duration) {
        loop {
            let callback = {
                let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

                let due_index = inner
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| d.due <= target)
                    .min_by_key(|(_, d)| (d.due, d.id))
                    .map(|(index, _)| index);

                match due_index {
                    Some(index) => {
                        let deadline = inner.pending.swap_remove(index);
                        inner.now = inner.now.max(deadline.due);
                        trace!(due = ?deadline.due, "virtual deadline firing");
                        deadline.callback
                    }
                    None => {
                        inner.now = inner.now.max(target);
                        return;
                    }
                }
            };

            // Fire outside the lock so the callback can schedule or cancel
            callback();
        }
    }

    /// Advances the clock by `delta`.
    pub fn advance_by(&self, delta: Duration) {
        let target = self.now() + delta;
        self.advance_to(target);
    }
}

impl GestureScheduler for VirtualScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> Box<dyn TimerHandle> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.next_id += 1;
        let id = inner.next_id;
        let due = inner.now + delay;
        inner.pending.push(PendingDeadline { id, due, callback });

        Box::new(VirtualTimerHandle {
            inner: Arc::clone(&self.inner),
            id,
        })
    }
}

struct VirtualTimerHandle {
    inner: Arc<Mutex<VirtualInner>>,
    id: u64,
}

impl TimerHandle for VirtualTimerHandle {
    fn cancel(&mut self) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.pending.retain(|d| d.id != self.id);
    }
}

impl Drop for VirtualTimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn recorder(log: &Arc<Mutex<Vec<u32>>>, tag: u32) -> TimerCallback {
        let log = Arc::clone(log);
        Box::new(move || log.lock().unwrap().push(tag))
    }

    #[test]
    fn test_fires_at_deadline() {
        let scheduler = VirtualScheduler::new();
        let fired = Arc::new(AtomicU32::new(0));

        let counter = Arc::clone(&fired);
        let _handle = scheduler.schedule(
            Duration::from_secs(1),
            Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        scheduler.advance_to(Duration::from_millis(999));
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        // Deadline exactly at the advance target fires
        scheduler.advance_to(Duration::from_secs(1));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let scheduler = VirtualScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let _late = scheduler.schedule(Duration::from_secs(3), recorder(&log, 3));
        let _early = scheduler.schedule(Duration::from_secs(1), recorder(&log, 1));
        let _middle = scheduler.schedule(Duration::from_secs(2), recorder(&log, 2));

        scheduler.advance_to(Duration::from_secs(5));
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_equal_deadlines_fire_in_schedule_order() {
        let scheduler = VirtualScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let _a = scheduler.schedule(Duration::from_secs(1), recorder(&log, 1));
        let _b = scheduler.schedule(Duration::from_secs(1), recorder(&log, 2));

        scheduler.advance_to(Duration::from_secs(1));
        assert_eq!(*log.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_cancel_removes_deadline() {
        let scheduler = VirtualScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut handle = scheduler.schedule(Duration::from_secs(1), recorder(&log, 1));
        handle.cancel();
        handle.cancel();

        scheduler.advance_to(Duration::from_secs(2));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_clock_is_monotonic() {
        let scheduler = VirtualScheduler::new();

        scheduler.advance_to(Duration::from_secs(5));
        scheduler.advance_to(Duration::from_secs(2));
        assert_eq!(scheduler.now(), Duration::from_secs(5));
    }

    #[test]
    fn test_drop_cancels() {
        let scheduler = VirtualScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let handle = scheduler.schedule(Duration::from_secs(1), recorder(&log, 1));
        drop(handle);

        scheduler.advance_to(Duration::from_secs(2));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_callback_can_schedule_again() {
        let scheduler = VirtualScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let held: Arc<Mutex<Vec<Box<dyn TimerHandle>>>> = Arc::new(Mutex::new(Vec::new()));

        let chained = {
            let scheduler = scheduler.clone();
            let log = Arc::clone(&log);
            let held = Arc::clone(&held);
            Box::new(move || {
                log.lock().unwrap().push(1);
                let next = scheduler.schedule(Duration::from_secs(1), recorder(&log, 2));
                held.lock().unwrap().push(next);
            })
        };
        let _first = scheduler.schedule(Duration::from_secs(1), chained);

        scheduler.advance_to(Duration::from_secs(3));
        assert_eq!(*log.lock().unwrap(), vec![1, 2]);
    }
}
