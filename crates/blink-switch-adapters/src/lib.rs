//! Blink Switch Adapters - External adapters for blink-switch.
//!
//! This crate provides adapters for:
//! - Wall-clock and virtual-clock gesture deadlines
//! - JSONL observation stream loading
//! - Gesture feedback (log / terminal bell)

pub mod feedback;
pub mod jsonl;
pub mod thread_scheduler;
pub mod virtual_clock;

pub use feedback::{LogFeedback, TerminalBellFeedback};
pub use jsonl::JsonlObservationSource;
pub use thread_scheduler::ThreadScheduler;
pub use virtual_clock::VirtualScheduler;
