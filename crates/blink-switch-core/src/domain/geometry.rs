//! Planar geometry primitives shared across the engine.

use serde::{Deserialize, Serialize};

/// A 2D point.
///
/// Eye landmarks use coordinates normalized to the face bounding box
/// (roughly `[0, 1]` per axis); overlay origins use the frame-relative
/// units of the bounding box itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point2D {
    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx.hypot(dy)
    }
}

/// An axis-aligned rectangle in frame-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Origin x.
    pub x: f64,
    /// Origin y.
    pub y: f64,
    /// Width; strictly positive for a valid face bounding box.
    pub width: f64,
    /// Height; strictly positive for a valid face bounding box.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from origin and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle's origin corner.
    #[must_use]
    pub const fn origin(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Returns the rectangle grown symmetrically around its center by
    /// `factor` of its own size, the shape drawn for the face overlay.
    #[must_use]
    pub fn scaled_up(&self, factor: f64) -> Self {
        let dx = self.width * factor / 2.0;
        let dy = self.height * factor / 2.0;
        Self {
            x: self.x - dx,
            y: self.y - dy,
            width: self.width + 2.0 * dx,
            height: self.height + 2.0 * dy,
        }
    }
}
