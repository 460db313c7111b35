//! Wall-clock gesture timing tests.
//!
//! Runs a full detection session against the real thread scheduler, where
//! the deadline callback genuinely races frame delivery.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use blink_switch_adapters::ThreadScheduler;
use blink_switch_core::{
    DetectionState, EyeLandmarks, FaceObservation, FeedbackSink, Point2D, Rect, DetectionSession,
    SessionConfig,
};

#[derive(Default)]
struct CountingFeedback {
    cues: AtomicU32,
}

impl FeedbackSink for CountingFeedback {
    fn long_blink(&self) {
        self.cues.fetch_add(1, Ordering::SeqCst);
    }
}

fn eye(gap: f64) -> EyeLandmarks {
    EyeLandmarks::from_points([
        Point2D::new(0.0, 0.30),
        Point2D::new(0.10, 0.30 + gap / 2.0),
        Point2D::new(0.20, 0.30 + gap / 2.0),
        Point2D::new(0.30, 0.30),
        Point2D::new(0.20, 0.30 - gap / 2.0),
        Point2D::new(0.10, 0.30 - gap / 2.0),
    ])
}

fn face(gap: f64) -> FaceObservation {
    FaceObservation::new(Rect::new(100.0, 100.0, 160.0, 200.0), eye(gap), eye(gap))
}

fn session_with(long_blink: Duration) -> (DetectionSession, Arc<CountingFeedback>) {
    let feedback = Arc::new(CountingFeedback::default());
    let config = SessionConfig {
        long_blink,
        ..SessionConfig::default()
    };
    let session = DetectionSession::new(
        &config,
        Arc::new(ThreadScheduler::new()),
        Arc::clone(&feedback) as Arc<dyn FeedbackSink>,
    );
    (session, feedback)
}

#[test]
fn test_long_blink_in_real_time() {
    let (mut session, feedback) = session_with(Duration::from_millis(50));

    session.process_frame(&[face(0.16)]).unwrap();
    session.process_frame(&[face(0.02)]).unwrap();

    // Keep the eyes closed well past the deadline
    thread::sleep(Duration::from_millis(200));
    let closed = session.process_frame(&[face(0.02)]).unwrap();
    assert_eq!(closed.state, DetectionState::EyesClosed);
    assert!(closed.toggle_value, "deadline fired while closed");
    assert_eq!(feedback.cues.load(Ordering::SeqCst), 1);

    // Reopening afterwards must not double-apply
    let reopened = session.process_frame(&[face(0.16)]).unwrap();
    assert!(!reopened.toggle_changed);
    assert!(reopened.toggle_value);
    assert_eq!(feedback.cues.load(Ordering::SeqCst), 1);
}

#[test]
fn test_short_blink_in_real_time() {
    // Deadline far enough out that the reopen always wins the race
    let (mut session, feedback) = session_with(Duration::from_secs(5));

    session.process_frame(&[face(0.16)]).unwrap();
    session.process_frame(&[face(0.02)]).unwrap();
    let reopened = session.process_frame(&[face(0.16)]).unwrap();

    assert!(reopened.toggle_changed, "short blink flips the toggle");
    assert!(reopened.toggle_value);
    assert_eq!(feedback.cues.load(Ordering::SeqCst), 0);

    // Give a leaked timer every chance to misfire
    thread::sleep(Duration::from_millis(100));
    assert!(session.toggle_value());
    assert_eq!(feedback.cues.load(Ordering::SeqCst), 0);
}

#[test]
fn test_repeated_short_blinks_alternate_toggle() {
    let (mut session, feedback) = session_with(Duration::from_secs(5));

    for expected in [true, false, true] {
        session.process_frame(&[face(0.16)]).unwrap();
        session.process_frame(&[face(0.02)]).unwrap();
        let reopened = session.process_frame(&[face(0.16)]).unwrap();
        assert!(reopened.toggle_changed);
        assert_eq!(reopened.toggle_value, expected);
    }
    assert_eq!(feedback.cues.load(Ordering::SeqCst), 0);
}

#[test]
fn test_losing_the_face_cancels_the_deadline() {
    let (mut session, feedback) = session_with(Duration::from_millis(50));

    session.process_frame(&[face(0.02)]).unwrap();
    session.process_frame(&[]).unwrap();

    thread::sleep(Duration::from_millis(200));
    assert!(!session.toggle_value(), "cancelled deadline must not fire");
    assert_eq!(feedback.cues.load(Ordering::SeqCst), 0);
}
