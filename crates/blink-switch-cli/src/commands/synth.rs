//! Synth command - generate synthetic observation streams.
//!
//! Produces JSONL streams that exercise the gesture scenarios end to end,
//! for demos and for feeding `replay` without a recorded capture.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use blink_switch_core::{EyeLandmarks, FaceObservation, FrameRecord, Point2D, Rect};
use clap::{Args, ValueEnum};
use tracing::info;

/// Synthetic gesture scenario.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Scenario {
    /// Eyes closed for 1.5 s: the deadline fires mid-closure.
    LongBlink,
    /// Eyes closed for 0.1 s: a quick toggle without feedback.
    ShortBlink,
    /// A second face enters mid-stream and leaves again.
    MultiFace,
}

/// Parse and validate a positive frame rate.
fn parse_fps(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err("frame rate must be positive".to_string())
    }
}

/// Arguments for the synth command
#[derive(Args)]
pub struct SynthArgs {
    /// Scenario to generate
    #[arg(value_enum)]
    pub scenario: Scenario,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Frame rate of the generated stream
    #[arg(long, default_value = "30", value_parser = parse_fps)]
    pub fps: f64,
}

/// Face geometry of the generated streams: a 160x200 box with contours in
/// face-normalized coordinates.
const FACE_BOX: Rect = Rect::new(100.0, 100.0, 160.0, 200.0);

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

fn face_at(x: f64, gap: f64) -> FaceObservation {
    FaceObservation::new(
        Rect::new(x, FACE_BOX.y, FACE_BOX.width, FACE_BOX.height),
        eye(gap),
        eye(gap),
    )
}

fn open_face() -> FaceObservation {
    face_at(FACE_BOX.x, 0.16)
}

fn closed_face() -> FaceObservation {
    face_at(FACE_BOX.x, 0.02)
}

/// Run the synth command.
pub fn run(args: &SynthArgs) -> Result<()> {
    let frames = generate(args.scenario, args.fps);

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout().lock()),
    };

    for frame in &frames {
        let line = serde_json::to_string(frame)?;
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;

    if let Some(path) = &args.output {
        info!(
            frames = frames.len(),
            "wrote {:?} stream to {}",
            args.scenario,
            path.display()
        );
    }

    Ok(())
}

/// Build the scenario's frame sequence.
fn generate(scenario: Scenario, fps: f64) -> Vec<FrameRecord> {
    let seconds_of = |seconds: f64| -> usize {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let frames = (seconds * fps).round() as usize;
        frames.max(1)
    };

    let phases: Vec<(usize, fn() -> Vec<FaceObservation>)> = match scenario {
        Scenario::LongBlink => vec![
            (seconds_of(1.0), || vec![open_face()]),
            (seconds_of(1.5), || vec![closed_face()]),
            (seconds_of(1.0), || vec![open_face()]),
        ],
        Scenario::ShortBlink => vec![
            (seconds_of(1.0), || vec![open_face()]),
            (seconds_of(0.1), || vec![closed_face()]),
            (seconds_of(1.0), || vec![open_face()]),
        ],
        Scenario::MultiFace => vec![
            (seconds_of(1.0), || vec![open_face()]),
            (seconds_of(1.0), || {
                vec![open_face(), face_at(400.0, 0.16)]
            }),
            (seconds_of(1.0), || vec![open_face()]),
        ],
    };

    let interval = 1.0 / fps;
    let mut frames = Vec::new();
    let mut index = 0usize;
    for (count, faces) in phases {
        for _ in 0..count {
            #[allow(clippy::cast_precision_loss)]
            frames.push(FrameRecord {
                timestamp_s: index as f64 * interval,
                faces: faces(),
            });
            index += 1;
        }
    }
    frames
}
