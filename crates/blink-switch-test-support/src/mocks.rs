//! Mock implementations of core port traits.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use blink_switch_core::ports::{
    FeedbackSink, GestureScheduler, ObservationSource, ProgressEvent, ProgressSink, ResultOutput,
    TimerCallback, TimerHandle,
};
use blink_switch_core::{FrameRecord, FrameReport};

/// Mock implementation of `ObservationSource` for testing.
///
/// Yields pre-built frames and tracks iteration for assertions.
pub struct MockObservationSource {
    frames: Vec<FrameRecord>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockObservationSource {
    /// Creates a new mock source with the given frames.
    #[must_use]
    pub fn new(frames: Vec<FrameRecord>) -> Self {
        Self {
            frames,
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObservationSource for MockObservationSource {
    fn frames(&self) -> Box<dyn Iterator<Item = anyhow::Result<FrameRecord>> + Send + '_> {
        let count = Arc::clone(&self.iteration_count);
        if let Ok(mut c) = count.lock() {
            *c += 1;
        }
        Box::new(self.frames.iter().cloned().map(Ok))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.frames.len())
    }
}

/// Mock scheduler that captures deadlines for manual firing.
///
/// Scheduled callbacks never fire on their own; tests pop and invoke them
/// through [`fire_next`](Self::fire_next) to simulate the deadline elapsing,
/// or leave them captured to simulate time never reaching the deadline.
#[derive(Default, Clone)]
pub struct MockScheduler {
    inner: Arc<Mutex<MockSchedulerInner>>,
}

#[derive(Default)]
struct MockSchedulerInner {
    queue: VecDeque<(u64, Duration, Option<TimerCallback>)>,
    next_id: u64,
    cancelled: Vec<u64>,
}

impl MockScheduler {
    /// Creates a new mock scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of deadlines scheduled so far (fired or not).
    #[must_use]
    pub fn scheduled_count(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        usize::try_from(inner.next_id).unwrap_or(usize::MAX)
    }

    /// Number of cancellation calls observed.
    #[must_use]
    pub fn cancelled_count(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.cancelled.len()
    }

    /// Delay of the most recently scheduled deadline.
    #[must_use]
    pub fn last_delay(&self) -> Option<Duration> {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.queue.back().map(|(_, delay, _)| *delay)
    }

    /// Fires the oldest still-pending deadline. Returns false if none was
    /// pending (all fired or cancelled).
    pub fn fire_next(&self) -> bool {
        let callback = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            let cancelled = inner.cancelled.clone();
            inner
                .queue
                .iter_mut()
                .find(|(id, _, callback)| callback.is_some() && !cancelled.contains(id))
                .and_then(|(_, _, callback)| callback.take())
        };

        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

impl GestureScheduler for MockScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> Box<dyn TimerHandle> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.queue.push_back((id, delay, Some(callback)));

        Box::new(MockTimerHandle {
            inner: Arc::clone(&self.inner),
            id,
            cancelled: false,
        })
    }
}

struct MockTimerHandle {
    inner: Arc<Mutex<MockSchedulerInner>>,
    id: u64,
    cancelled: bool,
}

impl TimerHandle for MockTimerHandle {
    fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.cancelled.push(self.id);
        if let Some((_, _, callback)) = inner.queue.iter_mut().find(|(id, _, _)| *id == self.id) {
            callback.take();
        }
    }
}

/// Mock implementation of `FeedbackSink` for testing.
#[derive(Default)]
pub struct MockFeedbackSink {
    cues: Arc<Mutex<usize>>,
}

impl MockFeedbackSink {
    /// Creates a new mock feedback sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of long-blink cues received.
    #[must_use]
    pub fn cue_count(&self) -> usize {
        *self.cues.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FeedbackSink for MockFeedbackSink {
    fn long_blink(&self) {
        *self.cues.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures reports for later assertions.
pub struct MockResultOutput {
    reports: Arc<Mutex<Vec<FrameReport>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured reports.
    #[must_use]
    pub fn reports(&self) -> Vec<FrameReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, report: &FrameReport) -> anyhow::Result<()> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*report);
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Ok(mut c) = self.flush_count.lock() {
            *c += 1;
        }
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
#[derive(Default)]
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Skipped { .. }))
            .count()
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { processed, skipped } => Some((*processed, *skipped)),
            _ => None,
        })
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
