//! Synthetic observation builders for testing.

use blink_switch_core::{EyeLandmarks, FaceObservation, FrameRecord, Point2D, Rect};

/// Default face bounding box used by the builders: a 160x200 box, the
/// portrait aspect of a typical front-camera face crop.
pub const DEFAULT_FACE_BOX: Rect = Rect::new(100.0, 100.0, 160.0, 200.0);

/// Builder for synthetic face observations with known eye-openness scores.
pub struct SyntheticFaceBuilder;

impl SyntheticFaceBuilder {
    /// Creates a 6-point contour with corners 0.3 apart and the given lid
    /// gap, centered in face-normalized coordinates.
    #[must_use]
    pub fn eye_with_lid_gap(gap: f64) -> EyeLandmarks {
        EyeLandmarks::from_points([
            Point2D::new(0.0, 0.30),
            Point2D::new(0.10, 0.30 + gap / 2.0),
            Point2D::new(0.20, 0.30 + gap / 2.0),
            Point2D::new(0.30, 0.30),
            Point2D::new(0.20, 0.30 - gap / 2.0),
            Point2D::new(0.10, 0.30 - gap / 2.0),
        ])
    }

    /// A clearly open eye: EAR ≈ 0.43 against [`DEFAULT_FACE_BOX`].
    #[must_use]
    pub fn open_eye() -> EyeLandmarks {
        Self::eye_with_lid_gap(0.16)
    }

    /// A clearly closed eye: EAR ≈ 0.05 against [`DEFAULT_FACE_BOX`].
    #[must_use]
    pub fn closed_eye() -> EyeLandmarks {
        Self::eye_with_lid_gap(0.02)
    }

    /// A collapsed contour whose aspect ratio is undefined.
    #[must_use]
    pub fn degenerate_eye() -> EyeLandmarks {
        EyeLandmarks::from_points([Point2D::new(0.5, 0.5); 6])
    }

    /// A face with both eyes open, at the default position.
    #[must_use]
    pub fn open_face() -> FaceObservation {
        FaceObservation::new(DEFAULT_FACE_BOX, Self::open_eye(), Self::open_eye())
    }

    /// A face with both eyes closed, at the default position.
    #[must_use]
    pub fn closed_face() -> FaceObservation {
        FaceObservation::new(DEFAULT_FACE_BOX, Self::closed_eye(), Self::closed_eye())
    }

    /// An open-eyed face with its bounding box origin at `(x, y)`.
    #[must_use]
    pub fn open_face_at(x: f64, y: f64) -> FaceObservation {
        FaceObservation::new(
            Rect::new(x, y, DEFAULT_FACE_BOX.width, DEFAULT_FACE_BOX.height),
            Self::open_eye(),
            Self::open_eye(),
        )
    }

    /// A face the detector saw but returned no eye landmarks for.
    #[must_use]
    pub fn face_without_landmarks() -> FaceObservation {
        FaceObservation::without_landmarks(DEFAULT_FACE_BOX)
    }
}

/// Builder for frame streams.
pub struct StreamBuilder;

impl StreamBuilder {
    /// Wraps observations into a frame at the given timestamp.
    #[must_use]
    pub fn frame(timestamp_s: f64, faces: Vec<FaceObservation>) -> FrameRecord {
        FrameRecord {
            timestamp_s,
            faces,
        }
    }

    /// Frames at a fixed interval, each built from its index.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn at_interval(
        count: usize,
        interval_s: f64,
        mut faces_for: impl FnMut(usize) -> Vec<FaceObservation>,
    ) -> Vec<FrameRecord> {
        (0..count)
            .map(|index| Self::frame(index as f64 * interval_s, faces_for(index)))
            .collect()
    }

    /// A blink scenario at 30 fps: a second of open eyes, `closed_s`
    /// seconds of closed eyes, then a second of open eyes.
    #[must_use]
    pub fn blink(closed_s: f64) -> Vec<FrameRecord> {
        let fps = 30.0;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let closed_frames = (closed_s * fps) as usize;
        let open_frames = 30;

        Self::at_interval(open_frames + closed_frames + open_frames, 1.0 / fps, |i| {
            if i >= open_frames && i < open_frames + closed_frames {
                vec![SyntheticFaceBuilder::closed_face()]
            } else {
                vec![SyntheticFaceBuilder::open_face()]
            }
        })
    }

    /// A long blink: eyes closed for 1.5 s, past the default deadline.
    #[must_use]
    pub fn long_blink() -> Vec<FrameRecord> {
        Self::blink(1.5)
    }

    /// A short blink: eyes closed for 0.1 s, well under the deadline.
    #[must_use]
    pub fn short_blink() -> Vec<FrameRecord> {
        Self::blink(0.1)
    }
}
