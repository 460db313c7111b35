//! Replay command - drive a recorded observation stream through the engine.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use blink_switch_adapters::{
    JsonlObservationSource, LogFeedback, TerminalBellFeedback, ThreadScheduler, VirtualScheduler,
};
use blink_switch_core::{
    modules::MissingLandmarkPolicy, CaptureOrientation, DetectionSession, FeedbackSink,
    FrameReport, ObservationSource, ProgressEvent, ProgressSink, ResultOutput, SessionConfig,
};
use clap::{Args, ValueEnum};
use tracing::{debug, info, warn};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// Output format for frame reports.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per frame)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Hardcoded default values for engine parameters.
mod defaults {
    pub const EAR_THRESHOLD: f64 = 0.2;
    pub const REDRAW_THRESHOLD: f64 = 20.0;
    pub const LONG_BLINK_MS: u64 = 1000;
}

/// Parse and validate a threshold value (0.0-1.0).
fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0.0..=1.0"))
    }
}

/// Parse and validate a non-negative displacement value.
fn parse_displacement(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} is negative"))
    }
}

/// Parse and validate a positive millisecond duration.
fn parse_positive_ms(s: &str) -> Result<u64, String> {
    let value: u64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value > 0 {
        Ok(value)
    } else {
        Err("duration must be positive".to_string())
    }
}

/// Shared arguments for stream replay.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct ReplayArgs {
    /// Observation stream to replay (JSONL, one frame per line)
    pub stream: Option<PathBuf>,

    /// Eye aspect ratio threshold (0.0-1.0)
    #[arg(long, value_parser = parse_threshold)]
    pub ear_threshold: Option<f64>,

    /// Overlay redraw displacement threshold, in frame units
    #[arg(long, value_parser = parse_displacement)]
    pub redraw_threshold: Option<f64>,

    /// Long-blink duration in milliseconds
    #[arg(long, value_parser = parse_positive_ms)]
    pub long_blink_ms: Option<u64>,

    /// Treat the stream as landscape capture
    #[arg(long)]
    pub landscape: bool,

    /// Treat landmark-less faces as open-eyed instead of holding the
    /// previous state
    #[arg(long)]
    pub assume_open: bool,

    /// Pace frames against the wall clock instead of the virtual clock
    #[arg(long)]
    pub realtime: bool,

    /// Ring the terminal bell on a long blink
    #[arg(long)]
    pub bell: bool,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,
}

impl ReplayArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    ///
    /// For boolean flags: an explicit CLI flag always wins; config applies
    /// only when the flag wasn't passed.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        args.ear_threshold = args.ear_threshold.or(config.detection.ear_threshold);
        args.redraw_threshold = args.redraw_threshold.or(config.detection.redraw_threshold);
        args.long_blink_ms = args.long_blink_ms.or(config.gesture.long_blink_ms);

        if !args.landscape {
            args.landscape = config.detection.orientation.as_deref() == Some("landscape");
        }
        if !args.assume_open {
            args.assume_open =
                config.detection.missing_landmarks.as_deref() == Some("assume_open");
        }
        if !args.bell {
            args.bell = config.gesture.bell.unwrap_or(false);
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args
    }

    /// Get EAR threshold with fallback to hardcoded default.
    fn ear_threshold(&self) -> f64 {
        self.ear_threshold.unwrap_or(defaults::EAR_THRESHOLD)
    }

    /// Get redraw threshold with fallback to hardcoded default.
    fn redraw_threshold(&self) -> f64 {
        self.redraw_threshold.unwrap_or(defaults::REDRAW_THRESHOLD)
    }

    /// Get long-blink duration with fallback to hardcoded default.
    fn long_blink(&self) -> Duration {
        Duration::from_millis(self.long_blink_ms.unwrap_or(defaults::LONG_BLINK_MS))
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Jsonl)
    }

    /// Build the engine configuration from merged args.
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            ear_threshold: self.ear_threshold(),
            redraw_threshold: self.redraw_threshold(),
            long_blink: self.long_blink(),
            orientation: if self.landscape {
                CaptureOrientation::Landscape
            } else {
                CaptureOrientation::Portrait
            },
            missing_landmarks: if self.assume_open {
                MissingLandmarkPolicy::AssumeOpen
            } else {
                MissingLandmarkPolicy::HoldLast
            },
        }
    }
}

/// Result of running the replay command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct ReplayResult {
    /// Number of frames processed.
    pub processed: usize,
    /// Number of frames skipped.
    pub skipped: usize,
    /// Number of toggle flips observed during the replay.
    pub toggles: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Frame pacing strategy.
enum Clock {
    /// Advance a virtual scheduler to each frame's timestamp.
    Virtual(VirtualScheduler),
    /// Sleep until each frame's timestamp relative to replay start.
    Wall(Instant),
}

impl Clock {
    fn advance_to(&self, timestamp: Duration) {
        match self {
            Self::Virtual(scheduler) => scheduler.advance_to(timestamp),
            Self::Wall(start) => {
                let elapsed = start.elapsed();
                if let Some(remaining) = timestamp.checked_sub(elapsed) {
                    std::thread::sleep(remaining);
                }
            }
        }
    }
}

/// Run the replay command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &ReplayArgs) -> Result<ReplayResult> {
    let Some(ref stream) = args.stream else {
        anyhow::bail!("No stream specified");
    };

    info!("Replaying {}", stream.display());

    let source = JsonlObservationSource::new(stream);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let output = JsonOutput::stdout();

    let feedback: Arc<dyn FeedbackSink> = if args.bell {
        Arc::new(TerminalBellFeedback)
    } else {
        Arc::new(LogFeedback)
    };

    let session_config = args.session_config();
    debug!(?session_config, realtime = args.realtime, "replay configuration");

    if args.realtime {
        let mut session =
            DetectionSession::new(&session_config, Arc::new(ThreadScheduler::new()), feedback);
        let clock = Clock::Wall(Instant::now());
        process_stream(&source, &mut session, &clock, &output, &progress, args)
    } else {
        let scheduler = VirtualScheduler::new();
        let mut session =
            DetectionSession::new(&session_config, Arc::new(scheduler.clone()), feedback);
        let clock = Clock::Virtual(scheduler);
        process_stream(&source, &mut session, &clock, &output, &progress, args)
    }
}

/// Drive every frame of the stream through the session.
fn process_stream(
    source: &JsonlObservationSource,
    session: &mut DetectionSession,
    clock: &Clock,
    output: &JsonOutput,
    progress: &ProgressBar,
    args: &ReplayArgs,
) -> Result<ReplayResult> {
    let total = source.count_hint();
    let mut processed = 0usize;
    let mut skipped = 0usize;
    let mut toggles = 0usize;
    let mut all_reports: Vec<FrameReport> = Vec::new();

    for (index, frame_result) in source.frames().enumerate() {
        let frame = match frame_result {
            Ok(frame) => frame,
            Err(e) => {
                progress.on_event(ProgressEvent::Skipped {
                    index,
                    reason: format!("{e:#}"),
                });
                skipped += 1;
                continue;
            }
        };

        let timestamp_s = frame.timestamp_s;
        if !timestamp_s.is_finite() || timestamp_s < 0.0 {
            progress.on_event(ProgressEvent::Skipped {
                index,
                reason: format!("invalid timestamp {timestamp_s}"),
            });
            skipped += 1;
            continue;
        }

        // Deadlines due at or before this frame fire first
        clock.advance_to(Duration::from_secs_f64(timestamp_s));

        progress.on_event(ProgressEvent::Started { index, total });

        let result = match session.process_frame(&frame.faces) {
            Ok(result) => result,
            Err(e) => {
                warn!(frame = index, error = %e, "frame skipped");
                progress.on_event(ProgressEvent::Skipped {
                    index,
                    reason: e.to_string(),
                });
                skipped += 1;
                continue;
            }
        };

        if result.toggle_changed {
            toggles += 1;
        }

        let report = FrameReport {
            frame: index as u64,
            timestamp_s,
            result,
        };

        progress.on_event(ProgressEvent::Completed { report });

        match args.format() {
            OutputFormat::Jsonl => output.write(&report)?,
            OutputFormat::Json => all_reports.push(report),
        }

        processed += 1;
    }

    if matches!(args.format(), OutputFormat::Json) {
        output.write_array(&all_reports, args.pretty)?;
    }
    output.flush()?;

    progress.on_event(ProgressEvent::Finished { processed, skipped });
    info!(
        processed,
        skipped,
        toggles,
        toggle = session.toggle_value(),
        "replay finished"
    );

    let exit_code = if skipped > 0 {
        ExitCode::FramesSkipped
    } else {
        ExitCode::Success
    };

    Ok(ReplayResult {
        processed,
        skipped,
        toggles,
        exit_code,
    })
}
