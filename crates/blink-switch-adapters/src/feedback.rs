//! Feedback sink adapters.

use std::io::Write;

use blink_switch_core::FeedbackSink;
use tracing::info;

/// Feedback sink that records the cue in the log stream.
#[derive(Debug, Default)]
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn long_blink(&self) {
        info!("long blink");
    }
}

/// Feedback sink that rings the terminal bell, the closest stand-in for the
/// audible cue of an embedded host.
#[derive(Debug, Default)]
pub struct TerminalBellFeedback;

impl FeedbackSink for TerminalBellFeedback {
    fn long_blink(&self) {
        let mut stderr = std::io::stderr();
        // Best effort; a closed stderr must not take down the session
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
    }
}
