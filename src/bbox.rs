//! Axis-aligned bounding boxes in frame pixel coordinates.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box `(x1, y1, x2, y2)`.
///
/// `(x1, y1)` is the top-left corner and `(x2, y2)` the bottom-right corner,
/// in the pixel coordinate space of the source frame. Degenerate boxes
/// (zero or negative extent) are representable; geometric queries on them
/// degrade to zero rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Create a bounding box from corner coordinates.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Center point of the box.
    pub fn center(&self) -> Point2<f64> {
        Point2::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Top-left corner of the box.
    pub fn top_left(&self) -> Point2<f64> {
        Point2::new(self.x1, self.y1)
    }

    /// Area of the intersection with `other`, zero when the boxes are disjoint.
    pub fn intersection_area(&self, other: &BoundingBox) -> f64 {
        let inter_x1 = self.x1.max(other.x1);
        let inter_y1 = self.y1.max(other.y1);
        let inter_x2 = self.x2.min(other.x2);
        let inter_y2 = self.y2.min(other.y2);

        let inter_w = (inter_x2 - inter_x1).max(0.0);
        let inter_h = (inter_y2 - inter_y1).max(0.0);
        inter_w * inter_h
    }

    /// Fraction of `ball`'s area covered by this box.
    ///
    /// Measures how much of the ball footprint lies inside a player's box,
    /// which is the overlap proxy for the ball being held or occluded by that
    /// player. A ball box with zero or negative area yields 0.0 for every
    /// player rather than a division error.
    pub fn containment_ratio(&self, ball: &BoundingBox) -> f64 {
        let ball_area = ball.area();
        if ball_area <= 0.0 {
            return 0.0;
        }
        self.intersection_area(ball) / ball_area
    }
}
