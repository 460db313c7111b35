//! Long-blink gesture control.
//!
//! Layers a timed state machine over the per-frame [`DetectionState`]
//! stream. Entering `EyesClosed` arms a one-shot deadline; if the eyes stay
//! closed until it fires, the toggle flips and the feedback cue sounds (a
//! long blink). Reopening early cancels the deadline and flips the toggle
//! silently (a short blink). Leaving through `NoFaces`/`MultipleFaces`
//! cancels with no action.
//!
//! The deadline callback runs asynchronously with respect to frame
//! processing, so every toggle/phase mutation goes through one mutex-guarded
//! cell. An armed period is identified by a generation counter: a callback
//! whose generation no longer matches lost the race to a cancellation and
//! does nothing.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, info};

use crate::domain::DetectionState;
use crate::ports::{FeedbackSink, GestureScheduler, TimerHandle};

/// Configuration for the gesture controller.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// How long the eyes must stay closed for a blink to count as long.
    pub long_blink: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_blink: Duration::from_secs(1),
        }
    }
}

/// Phase of the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GesturePhase {
    /// No closure in progress.
    Idle,
    /// Eyes closed, deadline pending. The generation ties the armed period
    /// to its scheduled callback.
    Armed { generation: u64 },
    /// The deadline fired; the reopen that follows must not act again.
    Consumed,
}

/// State shared between frame processing and the deadline callback.
#[derive(Debug)]
struct GestureCell {
    phase: GesturePhase,
    toggle: bool,
    generation: u64,
}

/// Outcome of feeding one state into the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureUpdate {
    /// Whether this update flipped the toggle (short blink).
    pub toggle_changed: bool,
    /// Toggle value after the update.
    pub toggle_value: bool,
}

/// The long-blink-to-toggle state machine.
pub struct BlinkGestureController {
    config: GestureConfig,
    scheduler: Arc<dyn GestureScheduler>,
    feedback: Arc<dyn FeedbackSink>,
    cell: Arc<Mutex<GestureCell>>,
    pending: Option<Box<dyn TimerHandle>>,
    last_state: DetectionState,
}

impl BlinkGestureController {
    /// Creates a controller using the given scheduler and feedback sink.
    #[must_use]
    pub fn new(
        config: GestureConfig,
        scheduler: Arc<dyn GestureScheduler>,
        feedback: Arc<dyn FeedbackSink>,
    ) -> Self {
        Self {
            config,
            scheduler,
            feedback,
            cell: Arc::new(Mutex::new(GestureCell {
                phase: GesturePhase::Idle,
                toggle: false,
                generation: 0,
            })),
            pending: None,
            last_state: DetectionState::NoFaces,
        }
    }

    /// Current toggle value.
    #[must_use]
    pub fn toggle_value(&self) -> bool {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner).toggle
    }

    /// Feeds the next frame's detection state into the state machine.
    pub fn update(&mut self, state: DetectionState) -> GestureUpdate {
        let entering_closed =
            state == DetectionState::EyesClosed && self.last_state != DetectionState::EyesClosed;
        let leaving_closed =
            state != DetectionState::EyesClosed && self.last_state == DetectionState::EyesClosed;
        self.last_state = state;

        if entering_closed {
            self.arm();
            return GestureUpdate {
                toggle_changed: false,
                toggle_value: self.toggle_value(),
            };
        }

        if leaving_closed {
            return self.disarm(state);
        }

        GestureUpdate {
            toggle_changed: false,
            toggle_value: self.toggle_value(),
        }
    }

    /// Arms the deadline on a transition into `EyesClosed`.
    ///
    /// At most one deadline is ever pending: arming only happens on a
    /// transition into `EyesClosed`, and the state cannot re-enter without
    /// first leaving (which disarms).
    fn arm(&mut self) {
        let generation = {
            let mut cell = self.cell.lock().unwrap_or_else(PoisonError::into_inner);
            cell.generation += 1;
            cell.phase = GesturePhase::Armed {
                generation: cell.generation,
            };
            cell.generation
        };
        debug!(generation, "long-blink deadline armed");

        let cell = Arc::clone(&self.cell);
        let feedback = Arc::clone(&self.feedback);
        let handle = self.scheduler.schedule(
            self.config.long_blink,
            Box::new(move || {
                {
                    let mut cell = cell.lock().unwrap_or_else(PoisonError::into_inner);
                    if cell.phase != (GesturePhase::Armed { generation }) {
                        // Lost the race to a cancellation (or already fired)
                        debug!(generation, "stale deadline ignored");
                        return;
                    }
                    cell.toggle = !cell.toggle;
                    cell.phase = GesturePhase::Consumed;
                    info!(toggle = cell.toggle, "long blink fired");
                }
                // Cue outside the lock: the sink is fire-and-forget and must
                // not hold up frame processing
                feedback.long_blink();
            }),
        );

        // Dropping a still-armed handle cancels its timer; the generation
        // bump above already made any previous callback inert
        self.pending = Some(handle);
    }

    /// Disarms on any transition out of `EyesClosed`.
    fn disarm(&mut self, state: DetectionState) -> GestureUpdate {
        if let Some(mut handle) = self.pending.take() {
            handle.cancel();
        }

        let mut cell = self.cell.lock().unwrap_or_else(PoisonError::into_inner);
        match cell.phase {
            GesturePhase::Armed { .. } => {
                cell.phase = GesturePhase::Idle;
                if state == DetectionState::EyesOpen {
                    // Short blink: the quick open/close cycle flips the
                    // toggle without feedback
                    cell.toggle = !cell.toggle;
                    info!(toggle = cell.toggle, "short blink toggled");
                    return GestureUpdate {
                        toggle_changed: true,
                        toggle_value: cell.toggle,
                    };
                }
                debug!(to = state.as_str(), "armed deadline cancelled without action");
            }
            GesturePhase::Consumed => {
                // The long blink already fired; this reopen is consumed
                // without a second action
                cell.phase = GesturePhase::Idle;
            }
            GesturePhase::Idle => {}
        }

        GestureUpdate {
            toggle_changed: false,
            toggle_value: cell.toggle,
        }
    }

    /// Cancels any pending deadline and returns to the initial state.
    pub fn reset(&mut self) {
        if let Some(mut handle) = self.pending.take() {
            handle.cancel();
        }
        let mut cell = self.cell.lock().unwrap_or_else(PoisonError::into_inner);
        cell.generation += 1;
        cell.phase = GesturePhase::Idle;
        cell.toggle = false;
        self.last_state = DetectionState::NoFaces;
    }
}

impl std::fmt::Debug for BlinkGestureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlinkGestureController")
            .field("config", &self.config)
            .field("cell", &self.cell)
            .field("last_state", &self.last_state)
            .finish_non_exhaustive()
    }
}
