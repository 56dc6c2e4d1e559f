//! MockKernel — deterministic test double implementing `GeometryKernel`.
//!
//! Flattens edges to polylines, enforces the wire-closure contract with the
//! same tolerance as a real kernel, and computes measurable bounding boxes
//! and meridian samples so tests can verify the revolved geometry.

use std::collections::HashMap;

use rocket_types::{BoundingBox, Point2, ProfileEdge};

use crate::traits::{GeometryKernel, WIRE_TOLERANCE};
use crate::types::{FaceId, KernelError, SolidHandle, WireId};

/// Number of segments used to flatten an arc edge.
const ARC_SEGMENTS: usize = 16;

#[derive(Debug, Clone)]
struct MockWire {
    /// Flattened closed polyline, deduplicated, first point not repeated.
    polyline: Vec<Point2>,
}

#[derive(Debug, Clone)]
struct MockFace {
    polyline: Vec<Point2>,
    area: f64,
}

#[derive(Debug, Clone)]
struct MockSolid {
    bbox: BoundingBox,
    /// Profile samples for solids built by revolution, empty otherwise.
    meridian: Vec<Point2>,
}

/// Deterministic test double for the external geometry kernel.
pub struct MockKernel {
    next_id: u64,
    wires: HashMap<u64, MockWire>,
    faces: HashMap<u64, MockFace>,
    solids: HashMap<u64, MockSolid>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            wires: HashMap::new(),
            faces: HashMap::new(),
            solids: HashMap::new(),
        }
    }

    fn alloc(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Flatten a single edge into sample points, including both endpoints.
    fn flatten_edge(edge: &ProfileEdge) -> Vec<Point2> {
        match edge {
            ProfileEdge::Line { start, end } => vec![*start, *end],
            ProfileEdge::Spline { points } => points.clone(),
            ProfileEdge::Arc { start, mid, end } => flatten_arc(*start, *mid, *end),
        }
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryKernel for MockKernel {
    fn make_wire(&mut self, edges: &[ProfileEdge]) -> Result<WireId, KernelError> {
        if edges.is_empty() {
            return Err(KernelError::DegenerateWire {
                reason: "empty edge list".to_string(),
            });
        }

        // Consecutive endpoints must coincide, wrapping around to close.
        for i in 0..edges.len() {
            let gap = edges[i]
                .end()
                .distance_to(&edges[(i + 1) % edges.len()].start());
            if gap > WIRE_TOLERANCE {
                return Err(KernelError::OpenWire { gap });
            }
        }

        let mut polyline: Vec<Point2> = Vec::new();
        for edge in edges {
            for p in MockKernel::flatten_edge(edge) {
                if polyline
                    .last()
                    .map_or(true, |q| q.distance_to(&p) > WIRE_TOLERANCE)
                {
                    polyline.push(p);
                }
            }
        }
        // Drop the wrap-around duplicate of the first point.
        if polyline.len() > 1
            && polyline[0].distance_to(&polyline[polyline.len() - 1]) <= WIRE_TOLERANCE
        {
            polyline.pop();
        }

        if polyline.len() < 3 {
            return Err(KernelError::DegenerateWire {
                reason: format!("only {} distinct points", polyline.len()),
            });
        }

        let id = self.alloc();
        self.wires.insert(id, MockWire { polyline });
        Ok(WireId(id))
    }

    fn make_face(&mut self, wire: WireId) -> Result<FaceId, KernelError> {
        let wire = self.wires.get(&wire.0).ok_or(KernelError::UnknownEntity)?;
        let area = shoelace_area(&wire.polyline);
        if area.abs() < WIRE_TOLERANCE {
            return Err(KernelError::ZeroAreaFace);
        }
        let polyline = wire.polyline.clone();
        let id = self.alloc();
        self.faces.insert(id, MockFace { polyline, area });
        Ok(FaceId(id))
    }

    fn revolve(
        &mut self,
        face: FaceId,
        axis_origin: [f64; 3],
        axis_direction: [f64; 3],
        angle_deg: f64,
    ) -> Result<SolidHandle, KernelError> {
        let face = self.faces.get(&face.0).ok_or(KernelError::UnknownEntity)?;
        let axis = coordinate_axis(axis_direction)?;
        if angle_deg.abs() < WIRE_TOLERANCE {
            return Err(KernelError::InvalidParameter {
                reason: "revolution angle is zero".to_string(),
            });
        }

        // Profile points live in the x-r plane; the revolved extent along
        // the axis is the x range, the radial extent the largest |r|.
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut max_r: f64 = 0.0;
        for p in &face.polyline {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            max_r = max_r.max(p.r.abs());
        }

        let mut bbox = BoundingBox::empty();
        for s in [min_x, max_x] {
            for u in [-max_r, max_r] {
                for v in [-max_r, max_r] {
                    let mut p = axis_origin;
                    p[axis.0] += s * axis.1;
                    p[(axis.0 + 1) % 3] += u;
                    p[(axis.0 + 2) % 3] += v;
                    bbox.update(p);
                }
            }
        }

        let meridian = face.polyline.clone();
        let id = self.alloc();
        self.solids.insert(id, MockSolid { bbox, meridian });
        Ok(SolidHandle(id))
    }

    fn extrude(
        &mut self,
        face: FaceId,
        origin: [f64; 3],
        direction: [f64; 3],
    ) -> Result<SolidHandle, KernelError> {
        let face = self.faces.get(&face.0).ok_or(KernelError::UnknownEntity)?;
        let len = (direction[0] * direction[0]
            + direction[1] * direction[1]
            + direction[2] * direction[2])
            .sqrt();
        if len < WIRE_TOLERANCE {
            return Err(KernelError::InvalidParameter {
                reason: "zero-length extrusion direction".to_string(),
            });
        }

        // Face coordinates are x/y in the base plane at `origin`.
        let mut bbox = BoundingBox::empty();
        for p in &face.polyline {
            let base = [origin[0] + p.x, origin[1] + p.r, origin[2]];
            bbox.update(base);
            bbox.update([
                base[0] + direction[0],
                base[1] + direction[1],
                base[2] + direction[2],
            ]);
        }

        let id = self.alloc();
        self.solids.insert(
            id,
            MockSolid {
                bbox,
                meridian: Vec::new(),
            },
        );
        Ok(SolidHandle(id))
    }

    fn fuse(&mut self, a: &SolidHandle, b: &SolidHandle) -> Result<SolidHandle, KernelError> {
        let sa = self.solids.get(&a.0).ok_or(KernelError::UnknownEntity)?;
        let sb = self.solids.get(&b.0).ok_or(KernelError::UnknownEntity)?;
        let fused = MockSolid {
            bbox: sa.bbox.union(&sb.bbox),
            meridian: Vec::new(),
        };
        let id = self.alloc();
        self.solids.insert(id, fused);
        Ok(SolidHandle(id))
    }

    fn make_cylinder(
        &mut self,
        radius: f64,
        height: f64,
        origin: [f64; 3],
        axis_direction: [f64; 3],
    ) -> Result<SolidHandle, KernelError> {
        if radius <= 0.0 || height <= 0.0 {
            return Err(KernelError::InvalidParameter {
                reason: format!("cylinder radius {radius} / height {height}"),
            });
        }
        let axis = coordinate_axis(axis_direction)?;

        let mut bbox = BoundingBox::empty();
        for s in [0.0, height * axis.1] {
            for u in [-radius, radius] {
                for v in [-radius, radius] {
                    let mut p = origin;
                    p[axis.0] += s;
                    p[(axis.0 + 1) % 3] += u;
                    p[(axis.0 + 2) % 3] += v;
                    bbox.update(p);
                }
            }
        }

        let id = self.alloc();
        self.solids.insert(
            id,
            MockSolid {
                bbox,
                meridian: Vec::new(),
            },
        );
        Ok(SolidHandle(id))
    }

    fn bounding_box(&self, solid: &SolidHandle) -> Result<BoundingBox, KernelError> {
        self.solids
            .get(&solid.0)
            .map(|s| s.bbox)
            .ok_or(KernelError::UnknownEntity)
    }

    fn meridian_samples(&self, solid: &SolidHandle) -> Result<&[Point2], KernelError> {
        self.solids
            .get(&solid.0)
            .map(|s| s.meridian.as_slice())
            .ok_or(KernelError::UnknownEntity)
    }
}

/// Map an axis direction onto a coordinate axis index and sign.
/// The mock only models revolution/extrusion about coordinate axes.
fn coordinate_axis(dir: [f64; 3]) -> Result<(usize, f64), KernelError> {
    let len = (dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2]).sqrt();
    if len < WIRE_TOLERANCE {
        return Err(KernelError::InvalidParameter {
            reason: "zero-length axis direction".to_string(),
        });
    }
    for i in 0..3 {
        if (dir[i].abs() / len - 1.0).abs() < 1e-9 {
            return Ok((i, dir[i].signum()));
        }
    }
    Err(KernelError::InvalidParameter {
        reason: "mock kernel supports coordinate-axis directions only".to_string(),
    })
}

/// Signed polygon area of a closed polyline (first point not repeated).
fn shoelace_area(points: &[Point2]) -> f64 {
    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        sum += a.x * b.r - b.x * a.r;
    }
    sum / 2.0
}

/// Sample a circular arc through three points. Collinear points degrade
/// to the straight chord.
fn flatten_arc(start: Point2, mid: Point2, end: Point2) -> Vec<Point2> {
    let d = 2.0 * (start.x * (mid.r - end.r) + mid.x * (end.r - start.r) + end.x * (start.r - mid.r));
    if d.abs() < 1e-12 {
        return vec![start, end];
    }
    let sq = |p: Point2| p.x * p.x + p.r * p.r;
    let cx = (sq(start) * (mid.r - end.r) + sq(mid) * (end.r - start.r) + sq(end) * (start.r - mid.r)) / d;
    let cr = (sq(start) * (end.x - mid.x) + sq(mid) * (start.x - end.x) + sq(end) * (mid.x - start.x)) / d;
    let radius = ((start.x - cx).powi(2) + (start.r - cr).powi(2)).sqrt();

    let a0 = (start.r - cr).atan2(start.x - cx);
    let am = (mid.r - cr).atan2(mid.x - cx);
    let a1 = (end.r - cr).atan2(end.x - cx);

    // Choose the sweep direction that passes through the interior point.
    let ccw_span = |from: f64, to: f64| {
        let mut s = to - from;
        while s < 0.0 {
            s += std::f64::consts::TAU;
        }
        s
    };
    let (span, sign) = if ccw_span(a0, am) <= ccw_span(a0, a1) {
        (ccw_span(a0, a1), 1.0)
    } else {
        (ccw_span(a1, a0), -1.0)
    };

    let mut points = Vec::with_capacity(ARC_SEGMENTS + 1);
    for i in 0..=ARC_SEGMENTS {
        let t = i as f64 / ARC_SEGMENTS as f64;
        let a = a0 + sign * span * t;
        points.push(Point2::new(cx + radius * a.cos(), cr + radius * a.sin()));
    }
    // Snap endpoints exactly to avoid tolerance drift.
    points[0] = start;
    points[ARC_SEGMENTS] = end;
    points
}
