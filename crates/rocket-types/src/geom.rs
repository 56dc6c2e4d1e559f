use serde::{Deserialize, Serialize};

/// A point on the body-of-revolution meridian: axial position `x`,
/// radius `r` measured from the rocket's long axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub r: f64,
}

impl Point2 {
    pub fn new(x: f64, r: f64) -> Self {
        Self { x, r }
    }

    pub fn distance_to(&self, other: &Point2) -> f64 {
        let dx = other.x - self.x;
        let dr = other.r - self.r;
        (dx * dx + dr * dr).sqrt()
    }
}

/// A single 2-D edge of a profile outline. An ordered list of these,
/// traversed start to end, forms the closed wire that gets revolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProfileEdge {
    /// Straight segment.
    Line { start: Point2, end: Point2 },
    /// Circular arc through three points (start, interior, end).
    Arc {
        start: Point2,
        mid: Point2,
        end: Point2,
    },
    /// Interpolating spline through the given points (at least two).
    Spline { points: Vec<Point2> },
}

impl ProfileEdge {
    pub fn line(start: Point2, end: Point2) -> Self {
        ProfileEdge::Line { start, end }
    }

    pub fn arc(start: Point2, mid: Point2, end: Point2) -> Self {
        ProfileEdge::Arc { start, mid, end }
    }

    pub fn spline(points: Vec<Point2>) -> Self {
        ProfileEdge::Spline { points }
    }

    pub fn start(&self) -> Point2 {
        match self {
            ProfileEdge::Line { start, .. } => *start,
            ProfileEdge::Arc { start, .. } => *start,
            ProfileEdge::Spline { points } => points[0],
        }
    }

    pub fn end(&self) -> Point2 {
        match self {
            ProfileEdge::Line { end, .. } => *end,
            ProfileEdge::Arc { end, .. } => *end,
            ProfileEdge::Spline { points } => points[points.len() - 1],
        }
    }
}

/// Axis-aligned bounding box in 3-D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Empty box ready to accumulate points.
    pub fn empty() -> Self {
        Self {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        }
    }

    pub fn update(&mut self, p: [f64; 3]) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut out = *self;
        out.update(other.min);
        out.update(other.max);
        out
    }

    /// Extent along the axial (x) direction.
    pub fn length_x(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    /// Largest distance from the x-axis in the y/z plane.
    pub fn max_radius(&self) -> f64 {
        let mut r: f64 = 0.0;
        for v in [self.min[1], self.max[1], self.min[2], self.max[2]] {
            r = r.max(v.abs());
        }
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_endpoints() {
        let e = ProfileEdge::spline(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 2.0),
            Point2::new(3.0, 4.0),
        ]);
        assert_eq!(e.start(), Point2::new(0.0, 0.0));
        assert_eq!(e.end(), Point2::new(3.0, 4.0));
    }

    #[test]
    fn bounding_box_accumulates() {
        let mut b = BoundingBox::empty();
        b.update([0.0, -3.0, 1.0]);
        b.update([10.0, 2.0, -1.0]);
        assert_eq!(b.length_x(), 10.0);
        assert_eq!(b.max_radius(), 3.0);
    }
}
