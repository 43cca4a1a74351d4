use image::GrayImage;
use imageproc::contours::find_contours as trace_borders;
use imageproc::point::Point;

use crate::models::Polygon;

/// Trace every border in a binary mask (outer borders and holes, at all
/// nesting levels) and simplify each one to its corner points.
/// Any non-zero pixel counts as foreground.
pub fn find_contours(mask: &GrayImage) -> Vec<Polygon> {
    trace_borders::<i32>(mask)
        .into_iter()
        .map(|contour| simplify_chain(&contour.points))
        .collect()
}

/// Drop points that lie in the middle of a straight horizontal, vertical
/// or diagonal run, keeping only the run endpoints.
pub fn simplify_chain(points: &[Point<i32>]) -> Polygon {
    if points.len() < 3 {
        return points.to_vec();
    }

    let n = points.len();
    let step = |from: Point<i32>, to: Point<i32>| {
        ((to.x - from.x).signum(), (to.y - from.y).signum())
    };

    let mut simplified = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let curr = points[i];
        let next = points[(i + 1) % n];
        if step(prev, curr) != step(curr, next) {
            simplified.push(curr);
        }
    }

    // A closed straight run has no corner; keep its ends so the bounds survive
    if simplified.is_empty() {
        simplified.push(points[0]);
        simplified.push(points[n - 1]);
    }
    simplified
}
