//! Per-frame face observations delivered by the landmark detector.

use serde::{Deserialize, Serialize};

use super::{DetectorError, Point2D, Rect};

/// Number of points in an eye contour.
pub const EYE_LANDMARK_COUNT: usize = 6;

/// A 6-point eye contour, indices fixed by convention:
/// 0 and 3 are the corners, 1/2 the upper lid, 4/5 the lower lid.
///
/// Can only be constructed (or deserialized) from exactly six points, so
/// downstream code never sees a malformed contour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point2D>", into = "Vec<Point2D>")]
pub struct EyeLandmarks {
    points: [Point2D; EYE_LANDMARK_COUNT],
}

impl EyeLandmarks {
    /// Wraps a fixed-size contour. Infallible by construction.
    #[must_use]
    pub const fn from_points(points: [Point2D; EYE_LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Builds a contour from a slice, rejecting any arity other than six.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::InvalidLandmarks`] if `points` does not
    /// contain exactly six entries.
    pub fn new(points: &[Point2D]) -> Result<Self, DetectorError> {
        let points: [Point2D; EYE_LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| DetectorError::InvalidLandmarks {
                count: points.len(),
            })?;
        Ok(Self { points })
    }

    /// The contour points, in convention order.
    #[must_use]
    pub const fn points(&self) -> &[Point2D; EYE_LANDMARK_COUNT] {
        &self.points
    }
}

impl TryFrom<Vec<Point2D>> for EyeLandmarks {
    type Error = DetectorError;

    fn try_from(points: Vec<Point2D>) -> Result<Self, Self::Error> {
        Self::new(&points)
    }
}

impl From<EyeLandmarks> for Vec<Point2D> {
    fn from(eye: EyeLandmarks) -> Self {
        eye.points.to_vec()
    }
}

/// One detector report of a face within a single frame.
///
/// Ephemeral: observations live for the duration of one
/// `process_frame` call and are never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceObservation {
    /// Face bounding box in frame-relative coordinates.
    pub bounding_box: Rect,
    /// Left eye contour, if the detector located it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_eye: Option<EyeLandmarks>,
    /// Right eye contour, if the detector located it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_eye: Option<EyeLandmarks>,
}

impl FaceObservation {
    /// Creates an observation with both eye contours present.
    #[must_use]
    pub const fn new(bounding_box: Rect, left_eye: EyeLandmarks, right_eye: EyeLandmarks) -> Self {
        Self {
            bounding_box,
            left_eye: Some(left_eye),
            right_eye: Some(right_eye),
        }
    }

    /// Creates an observation without eye landmarks.
    #[must_use]
    pub const fn without_landmarks(bounding_box: Rect) -> Self {
        Self {
            bounding_box,
            left_eye: None,
            right_eye: None,
        }
    }
}

/// All observations for one captured frame, with its stream timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Seconds since the start of the stream.
    #[serde(rename = "t")]
    pub timestamp_s: f64,
    /// Detected faces; zero, one, or many.
    #[serde(default)]
    pub faces: Vec<FaceObservation>,
}

/// Capture orientation of the camera feed.
///
/// The bounding box's reported width/height convention flips under rotated
/// capture, which the eye-openness normalization corrects for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureOrientation {
    /// Portrait capture (the default for front cameras).
    #[default]
    Portrait,
    /// Landscape capture.
    Landscape,
}
