//! Progress bar adapter using indicatif.

use blink_switch_core::{DetectionState, ProgressEvent, ProgressSink};
use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};

/// Progress bar adapter for CLI output.
pub struct ProgressBar {
    bar: Option<IndicatifBar>,
    quiet: bool,
}

impl ProgressBar {
    /// Creates a new progress bar.
    ///
    /// # Arguments
    ///
    /// * `total` - Total number of frames, if known
    /// * `quiet` - If true, suppress all output
    /// * `show_bar` - If true, show progress bar; otherwise show per-event status
    #[must_use]
    pub fn new(total: Option<u64>, quiet: bool, show_bar: bool) -> Self {
        if quiet {
            return Self {
                bar: None,
                quiet: true,
            };
        }

        let bar = if show_bar {
            let bar = total.map_or_else(IndicatifBar::new_spinner, IndicatifBar::new);

            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            ) {
                bar.set_style(style.progress_chars("#>-"));
            }

            Some(bar)
        } else {
            None
        };

        Self { bar, quiet }
    }
}

impl ProgressSink for ProgressBar {
    fn on_event(&self, event: ProgressEvent) {
        if self.quiet {
            return;
        }

        match event {
            ProgressEvent::Started { index, total } => {
                if let Some(bar) = &self.bar {
                    if let Some(t) = total {
                        bar.set_length(t as u64);
                    }
                    bar.set_position(index as u64);
                }
            }
            ProgressEvent::Completed { report } => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                    if report.result.toggle_changed {
                        bar.set_message(format!(
                            "toggle -> {}",
                            if report.result.toggle_value { "on" } else { "off" }
                        ));
                    }
                } else if report.result.toggle_changed
                    || report.result.state == DetectionState::MultipleFaces
                {
                    eprintln!(
                        "frame {} ({:.3}s): {} toggle={}",
                        report.frame,
                        report.timestamp_s,
                        report.result.state.as_str(),
                        report.result.toggle_value,
                    );
                }
            }
            ProgressEvent::Skipped { index, reason } => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                }
                eprintln!("WARN: Skipping frame {index}: {reason}");
            }
            ProgressEvent::Finished { processed, skipped } => {
                if let Some(bar) = &self.bar {
                    bar.finish_with_message(format!(
                        "Done: {processed} processed, {skipped} skipped"
                    ));
                }
            }
        }
    }
}
