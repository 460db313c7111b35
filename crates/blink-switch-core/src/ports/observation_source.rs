//! Observation source port for frame streams.

use crate::domain::FrameRecord;

/// Port for obtaining a stream of per-frame face observations.
///
/// The engine does no image processing itself; a source wraps whatever
/// produces landmark observations — a recorded stream, a live detector
/// bridge, or a test fixture.
pub trait ObservationSource: Send + Sync {
    /// Returns an iterator over frames, in capture order.
    ///
    /// # Errors
    ///
    /// Individual items may be errors if a frame fails to decode; the
    /// stream continues past them.
    fn frames(&self) -> Box<dyn Iterator<Item = anyhow::Result<FrameRecord>> + Send + '_>;

    /// Returns the total number of frames, if known.
    fn count_hint(&self) -> Option<usize>;
}
