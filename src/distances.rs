//! Ball-to-player distance scoring.
//!
//! Distance from the ball to a player is not measured to a single reference
//! point: a ball held low, tucked at the hip, or overhead sits near very
//! different parts of the player's box. Instead the box is sampled at a fixed
//! set of anchor points and the minimum anchor distance is taken.

use nalgebra::{distance, Point2};

use crate::BoundingBox;

/// Anchor points on a player's box used for ball-assignment scoring.
///
/// Always includes the four corners, the four edge midpoints, the center,
/// and a point one-third down from the top-center (roughly chest height on a
/// standing player). When the ball center's y lies strictly inside the box's
/// vertical span, the two points where that horizontal line crosses the left
/// and right edges are added; likewise for the ball center's x and the top
/// and bottom edges.
pub fn assignment_points(player_box: &BoundingBox, ball_center: &Point2<f64>) -> Vec<Point2<f64>> {
    let BoundingBox { x1, y1, x2, y2 } = *player_box;
    let mid_x = x1 + player_box.width() / 2.0;
    let mid_y = y1 + player_box.height() / 2.0;

    let mut points = Vec::with_capacity(14);

    if ball_center.y > y1 && ball_center.y < y2 {
        points.push(Point2::new(x1, ball_center.y));
        points.push(Point2::new(x2, ball_center.y));
    }
    if ball_center.x > x1 && ball_center.x < x2 {
        points.push(Point2::new(ball_center.x, y1));
        points.push(Point2::new(ball_center.x, y2));
    }

    points.extend([
        Point2::new(mid_x, y1),
        Point2::new(x2, y1),
        Point2::new(x1, y1),
        Point2::new(x2, mid_y),
        Point2::new(x1, mid_y),
        Point2::new(mid_x, mid_y),
        Point2::new(x2, y2),
        Point2::new(x1, y2),
        Point2::new(mid_x, y2),
        Point2::new(mid_x, y1 + player_box.height() / 3.0),
    ]);

    points
}

/// Minimum Euclidean distance from the ball center to any anchor point on the
/// player's box.
pub fn min_distance_to_ball(ball_center: &Point2<f64>, player_box: &BoundingBox) -> f64 {
    assignment_points(player_box, ball_center)
        .iter()
        .map(|anchor| distance(ball_center, anchor))
        .fold(f64::INFINITY, f64::min)
}
