//! JSONL adapter for recorded observation streams.
//!
//! A stream file holds one frame per line: a JSON object with a `t`
//! timestamp in seconds and a `faces` array of observations. This is the
//! format the CLI replays and the synth command writes.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blink_switch_core::{FrameRecord, ObservationSource};
use tracing::debug;

/// Observation source reading a JSONL stream file.
pub struct JsonlObservationSource {
    path: PathBuf,
}

impl JsonlObservationSource {
    /// Creates a source for the given stream file.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> Result<BufReader<File>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open stream: {}", self.path.display()))?;
        Ok(BufReader::new(file))
    }
}

impl ObservationSource for JsonlObservationSource {
    fn frames(&self) -> Box<dyn Iterator<Item = Result<FrameRecord>> + Send + '_> {
        let reader = match self.open() {
            Ok(r) => r,
            Err(e) => return Box::new(std::iter::once(Err(e))),
        };

        Box::new(
            reader
                .lines()
                .enumerate()
                .filter(|(_, line)| {
                    line.as_ref().map_or(true, |l| !l.trim().is_empty())
                })
                .map(|(number, line)| {
                    let line = line.with_context(|| format!("Failed to read line {number}"))?;
                    serde_json::from_str::<FrameRecord>(&line)
                        .with_context(|| format!("Malformed frame record on line {number}"))
                }),
        )
    }

    fn count_hint(&self) -> Option<usize> {
        let reader = self.open().ok()?;
        let count = reader
            .lines()
            .map_while(Result::ok)
            .filter(|line| !line.trim().is_empty())
            .count();
        debug!(count, "counted stream frames");
        Some(count)
    }
}
