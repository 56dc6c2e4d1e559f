//! Small helpers for assembling closed profile outlines. Every handler
//! builds its outline in the x/r half-plane and hands it to the kernel
//! for a full revolution about the x axis.

use rocket_types::{Point2, ProfileEdge};

/// Segments shorter than this are dropped rather than emitted as
/// degenerate edges. Shoulders and caps with matching radii routinely
/// produce zero-length connector segments.
const MIN_EDGE: f64 = 1e-9;

/// Append a straight edge from `a` to `b`, skipping it when the two
/// points coincide.
pub(crate) fn push_line(edges: &mut Vec<ProfileEdge>, a: Point2, b: Point2) {
    if a.distance_to(&b) > MIN_EDGE {
        edges.push(ProfileEdge::line(a, b));
    }
}

/// Append a spline edge through `points`. A two-point run degrades to a
/// straight edge; runs shorter than that are skipped.
pub(crate) fn push_spline(edges: &mut Vec<ProfileEdge>, points: Vec<Point2>) {
    match points.len() {
        0 | 1 => {}
        2 => push_line(edges, points[0], points[1]),
        _ => edges.push(ProfileEdge::spline(points)),
    }
}

/// Reverse a sampled meridian so it runs aft-to-fore.
pub(crate) fn reversed(mut points: Vec<Point2>) -> Vec<Point2> {
    points.reverse();
    points
}
