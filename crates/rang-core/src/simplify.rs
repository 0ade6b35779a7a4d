//! Stroke point thinning.

use kurbo::Point;

/// Default minimum distance between retained points.
pub const DEFAULT_TOLERANCE: f64 = 5.0;

/// Thin a stroke's points with a sequential distance filter.
///
/// The first and last points are always kept. Every point in between is kept
/// only if it lies at least `tolerance` away from the previously kept point.
/// Sequences of two or fewer points are returned unchanged.
pub fn simplify_stroke(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let last_index = points.len() - 1;
    let mut result = vec![points[0]];
    let mut anchor = points[0];

    for &point in &points[1..last_index] {
        if point.distance(anchor) >= tolerance {
            result.push(point);
            anchor = point;
        }
    }

    result.push(points[last_index]);
    result
}
