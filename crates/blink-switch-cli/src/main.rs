//! Blink Switch CLI - Replay and inspection tool for the blink-switch engine.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let app_config = AppConfig::load();

    let exit_code = match cli.command {
        Some(Commands::Replay(args)) => {
            let args = commands::replay::ReplayArgs::with_config(args, &app_config);
            match commands::replay::run(&args) {
                Ok(result) => result.exit_code,
                Err(e) => {
                    eprintln!("error: {e:#}");
                    ExitCode::Error
                }
            }
        }
        Some(Commands::Synth(args)) => match commands::synth::run(&args) {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::Error
            }
        },
        None => {
            // Default behavior: run replay with flattened args
            if cli.replay.stream.is_none() {
                eprintln!("error: No stream specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            let args = commands::replay::ReplayArgs::with_config(cli.replay, &app_config);
            match commands::replay::run(&args) {
                Ok(result) => result.exit_code,
                Err(e) => {
                    eprintln!("error: {e:#}");
                    ExitCode::Error
                }
            }
        }
    };

    exit_code.into()
}
