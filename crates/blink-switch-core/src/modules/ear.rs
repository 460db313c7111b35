//! Eye-openness scoring.
//!
//! Computes the eye aspect ratio (EAR) from a 6-point eye contour: the mean
//! of the two vertical lid distances over the horizontal corner distance.
//! Lower means more closed; a fully open eye scores roughly 0.3–0.5.

use crate::domain::{CaptureOrientation, DetectorError, EyeLandmarks, Point2D, Rect};

/// Scores eye openness for one eye.
///
/// Landmark coordinates are normalized against the face bounding box before
/// measuring: `x` by the box width and `y` by the box height in portrait
/// capture, swapped in landscape, where the reported width/height convention
/// flips. The ratio is invariant under uniform translation of the contour
/// and under uniform scaling of the box.
///
/// # Errors
///
/// Returns [`DetectorError::DegenerateGeometry`] when the contour's
/// horizontal span (or either box dimension) is zero and the ratio is
/// undefined. Callers treat this as a skipped frame, never as a score.
pub fn eye_aspect_ratio(
    eye: &EyeLandmarks,
    face_box: &Rect,
    orientation: CaptureOrientation,
) -> Result<f64, DetectorError> {
    let (x_divisor, y_divisor) = match orientation {
        CaptureOrientation::Portrait => (face_box.width, face_box.height),
        CaptureOrientation::Landscape => (face_box.height, face_box.width),
    };

    if x_divisor <= 0.0 || y_divisor <= 0.0 {
        return Err(DetectorError::DegenerateGeometry);
    }

    let p: Vec<Point2D> = eye
        .points()
        .iter()
        .map(|point| Point2D::new(point.x / x_divisor, point.y / y_divisor))
        .collect();

    let vertical1 = p[1].distance_to(&p[5]);
    let vertical2 = p[2].distance_to(&p[4]);
    let horizontal = p[0].distance_to(&p[3]);

    if horizontal <= f64::EPSILON {
        return Err(DetectorError::DegenerateGeometry);
    }

    Ok((vertical1 + vertical2) / (2.0 * horizontal))
}
