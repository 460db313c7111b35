//! CLI command definitions and handlers.

pub mod replay;
pub mod synth;

use clap::{Parser, Subcommand};

/// Blink Switch - Face-state classification and long-blink gesture replay
#[derive(Parser)]
#[command(name = "blink-switch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared replay arguments (stream path, thresholds, flags).
    #[command(flatten)]
    pub replay: replay::ReplayArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Replay a recorded observation stream through the engine
    Replay(replay::ReplayArgs),
    /// Generate synthetic observation streams
    Synth(synth::SynthArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every frame processed cleanly.
    Success,
    /// One or more frames were skipped (decode or contract errors).
    FramesSkipped,
    /// The command itself failed.
    Error,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::from(0),
            ExitCode::FramesSkipped => Self::from(1),
            ExitCode::Error => Self::from(2),
        }
    }
}
