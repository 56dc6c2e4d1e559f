//! Transition shape handler.
//!
//! A transition joins two body diameters: fore radius at x = 0, aft
//! radius at x = length. The outline builders compose per-end blocks so
//! shoulders can be present on either end, both, or neither; the shared
//! return path runs along the inner wall (wall styles) or the core bore
//! line (solid styles).

use geometry_kernel::{GeometryKernel, SolidHandle};
use rocket_types::{CapStyle, Point2, ProfileEdge, ShapeFamily, ShapeStyle};
use tracing::debug;

use crate::caps::fuse_cap_bars;
use crate::outline::{push_line, push_spline, reversed};
use crate::params::{
    check_cap, check_coefficient, check_shoulder, ShapeError, ShoulderParams, TransitionParams,
};
use crate::profiles::{sample_transition, tangent_ogive_rho, transition_radius, Profile};

pub struct TransitionShapeHandler {
    params: TransitionParams,
}

impl TransitionShapeHandler {
    pub fn new(params: TransitionParams) -> Self {
        TransitionShapeHandler { params }
    }

    // ── Validation ─────────────────────────────────────────────────────

    pub fn is_valid_shape(&self) -> Result<(), ShapeError> {
        let p = &self.params;
        if p.length <= 0.0 {
            return Err(ShapeError::validation("transition length must be > 0"));
        }
        if p.fore_radius < 0.0 || p.aft_radius < 0.0 {
            return Err(ShapeError::validation("transition radii must be >= 0"));
        }
        if p.fore_radius == 0.0 && p.aft_radius == 0.0 {
            return Err(ShapeError::validation(
                "at least one transition radius must be > 0",
            ));
        }
        if p.resolution < 2 {
            return Err(ShapeError::validation(
                "profile resolution must be at least 2 points",
            ));
        }
        check_coefficient(p.family, p.coefficient)?;

        if p.style.has_wall() {
            if p.fore_radius == 0.0 || p.aft_radius == 0.0 {
                return Err(ShapeError::validation(format!(
                    "{:?} transitions need positive radii at both ends",
                    p.style
                )));
            }
            if p.thickness <= 0.0 {
                return Err(ShapeError::validation(format!(
                    "wall thickness must be > 0 for {:?} transitions",
                    p.style
                )));
            }
            if p.thickness >= p.fore_radius.min(p.aft_radius) {
                return Err(ShapeError::validation(
                    "wall thickness must be less than the smaller end radius",
                ));
            }
        }
        if p.style == ShapeStyle::SolidCore {
            if p.core_radius <= 0.0 {
                return Err(ShapeError::validation(
                    "core radius must be > 0 for solid-core transitions",
                ));
            }
            if p.core_radius >= p.fore_radius.min(p.aft_radius) {
                return Err(ShapeError::validation(
                    "core radius must be less than the smaller end radius",
                ));
            }
            for (end, shoulder) in [("fore", &p.fore_shoulder), ("aft", &p.aft_shoulder)] {
                if let Some(s) = shoulder {
                    if p.core_radius >= s.radius {
                        return Err(ShapeError::validation(format!(
                            "core radius must be less than the {end} shoulder radius"
                        )));
                    }
                }
            }
        }
        if let Some(s) = &p.fore_shoulder {
            check_shoulder("fore", s, p.fore_radius, p.style)?;
        }
        if let Some(s) = &p.aft_shoulder {
            check_shoulder("aft", s, p.aft_radius, p.style)?;
        }
        if p.style == ShapeStyle::Capped {
            let fore_opening = match &p.fore_shoulder {
                Some(s) => s.radius - s.thickness,
                None => p.fore_radius - p.thickness,
            };
            check_cap("fore", p.fore_cap, p.fore_cap_bar_width, fore_opening)?;
            let aft_opening = match &p.aft_shoulder {
                Some(s) => s.radius - s.thickness,
                None => p.aft_radius - p.thickness,
            };
            check_cap("aft", p.aft_cap, p.aft_cap_bar_width, aft_opening)?;
        }
        Ok(())
    }

    // ── Drawing ────────────────────────────────────────────────────────

    pub fn draw(&self, kernel: &mut dyn GeometryKernel) -> Result<SolidHandle, ShapeError> {
        self.is_valid_shape()?;
        debug!(
            family = ?self.params.family,
            style = ?self.params.style,
            length = self.params.length,
            fore_radius = self.params.fore_radius,
            aft_radius = self.params.aft_radius,
            clipped = self.params.clipped,
            "drawing transition"
        );

        let edges = match self.params.style {
            ShapeStyle::Solid => self.solid_edges(0.0),
            ShapeStyle::SolidCore => self.solid_edges(self.params.core_radius),
            ShapeStyle::Hollow => self.hollow_edges(),
            ShapeStyle::Capped => self.capped_edges(
                self.params.fore_cap == CapStyle::Solid,
                self.params.aft_cap == CapStyle::Solid,
            ),
        };

        let wire = kernel.make_wire(&edges)?;
        let face = kernel.make_face(wire)?;
        let mut solid = kernel.revolve(face, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 360.0)?;

        // Bar patterns were left open in the outline; span their slabs
        // across each opening now and fuse them on.
        if self.params.style == ShapeStyle::Capped {
            let p = &self.params;
            if p.fore_cap != CapStyle::Solid {
                let (x_lo, x_hi, opening) = match p.fore_shoulder {
                    Some(s) => (-s.length, -s.length + s.thickness, s.radius - s.thickness),
                    None => (0.0, p.thickness, p.fore_radius - p.thickness),
                };
                solid =
                    fuse_cap_bars(kernel, solid, p.fore_cap, x_lo, x_hi, opening, p.fore_cap_bar_width)?;
            }
            if p.aft_cap != CapStyle::Solid {
                let (x_lo, x_hi, opening) = match p.aft_shoulder {
                    Some(s) => (
                        p.length + s.length - s.thickness,
                        p.length + s.length,
                        s.radius - s.thickness,
                    ),
                    None => (p.length - p.thickness, p.length, p.aft_radius - p.thickness),
                };
                solid =
                    fuse_cap_bars(kernel, solid, p.aft_cap, x_lo, x_hi, opening, p.aft_cap_bar_width)?;
            }
        }
        Ok(solid)
    }

    // ── Meridians ──────────────────────────────────────────────────────

    fn profile(&self) -> Profile {
        let p = &self.params;
        match p.family {
            ShapeFamily::Cone => Profile::Cone,
            ShapeFamily::Elliptical => Profile::Elliptical,
            // Transitions reduce the ogive variants to the tangent form
            // over the larger end radius.
            ShapeFamily::Ogive | ShapeFamily::SecantOgive | ShapeFamily::BluntedOgive => {
                Profile::Ogive {
                    rho: tangent_ogive_rho(p.length, p.fore_radius.max(p.aft_radius)),
                }
            }
            ShapeFamily::VonKarman => Profile::Haack { c: 0.0 },
            ShapeFamily::Parabola => Profile::Power { k: 0.5 },
            ShapeFamily::PowerSeries => Profile::Power { k: p.coefficient },
            ShapeFamily::ParabolicSeries => Profile::Parabolic { k: p.coefficient },
            ShapeFamily::HaackSeries => Profile::Haack { c: p.coefficient },
        }
    }

    fn outer_points(&self) -> Vec<Point2> {
        let p = &self.params;
        sample_transition(
            &self.profile(),
            p.length,
            p.fore_radius,
            p.aft_radius,
            p.clipped,
            p.resolution,
        )
    }

    fn outer_radius_at(&self, x: f64) -> f64 {
        let p = &self.params;
        transition_radius(
            &self.profile(),
            x,
            p.length,
            p.fore_radius,
            p.aft_radius,
            p.clipped,
        )
    }

    fn inner_radius_at(&self, x: f64) -> f64 {
        self.outer_radius_at(x) - self.params.thickness
    }

    /// Inner wall meridian over `[x_lo, x_hi]`, fore to aft, endpoints
    /// pinned to the exact values used by the connector lines.
    fn inner_points(&self, x_lo: f64, x_hi: f64) -> Vec<Point2> {
        let n = self.params.resolution.max(2);
        let mut points = Vec::with_capacity(n);
        for i in 0..n {
            let x = x_lo + (x_hi - x_lo) * i as f64 / (n - 1) as f64;
            points.push(Point2::new(x, self.inner_radius_at(x)));
        }
        points[0] = Point2::new(x_lo, self.inner_radius_at(x_lo));
        points[n - 1] = Point2::new(x_hi, self.inner_radius_at(x_hi));
        points
    }

    // ── Outline variants ───────────────────────────────────────────────

    /// Solid body, optionally with a core bore of radius `core`. The
    /// bore runs the full axial extent, shoulders included.
    fn solid_edges(&self, core: f64) -> Vec<ProfileEdge> {
        let p = &self.params;
        let (r1, r2, length) = (p.fore_radius, p.aft_radius, p.length);
        let mut edges = Vec::new();

        let x_start = match p.fore_shoulder {
            Some(s) => {
                push_line(&mut edges, Point2::new(-s.length, core), Point2::new(-s.length, s.radius));
                push_line(&mut edges, Point2::new(-s.length, s.radius), Point2::new(0.0, s.radius));
                push_line(&mut edges, Point2::new(0.0, s.radius), Point2::new(0.0, r1));
                -s.length
            }
            None => {
                push_line(&mut edges, Point2::new(0.0, core), Point2::new(0.0, r1));
                0.0
            }
        };

        push_spline(&mut edges, self.outer_points());

        let x_end = match p.aft_shoulder {
            Some(s) => {
                push_line(&mut edges, Point2::new(length, r2), Point2::new(length, s.radius));
                push_line(
                    &mut edges,
                    Point2::new(length, s.radius),
                    Point2::new(length + s.length, s.radius),
                );
                push_line(
                    &mut edges,
                    Point2::new(length + s.length, s.radius),
                    Point2::new(length + s.length, core),
                );
                length + s.length
            }
            None => {
                push_line(&mut edges, Point2::new(length, r2), Point2::new(length, core));
                length
            }
        };

        push_line(&mut edges, Point2::new(x_end, core), Point2::new(x_start, core));
        edges
    }

    fn hollow_edges(&self) -> Vec<ProfileEdge> {
        let p = &self.params;
        let (r1, r2, length, t) = (p.fore_radius, p.aft_radius, p.length, p.thickness);
        let mut edges = Vec::new();

        // Fore end, bottom-left anchor up to the outer curve start.
        match p.fore_shoulder {
            Some(s) => {
                push_line(
                    &mut edges,
                    Point2::new(-s.length, s.radius - s.thickness),
                    Point2::new(-s.length, s.radius),
                );
                push_line(&mut edges, Point2::new(-s.length, s.radius), Point2::new(0.0, s.radius));
                push_line(&mut edges, Point2::new(0.0, s.radius), Point2::new(0.0, r1));
            }
            None => {
                push_line(&mut edges, Point2::new(0.0, r1 - t), Point2::new(0.0, r1));
            }
        }

        push_spline(&mut edges, self.outer_points());

        // Aft end down to the inner wall.
        let x_hi = match p.aft_shoulder {
            Some(s) => {
                let inner_cut = length - t;
                push_line(&mut edges, Point2::new(length, r2), Point2::new(length, s.radius));
                push_line(
                    &mut edges,
                    Point2::new(length, s.radius),
                    Point2::new(length + s.length, s.radius),
                );
                push_line(
                    &mut edges,
                    Point2::new(length + s.length, s.radius),
                    Point2::new(length + s.length, s.radius - s.thickness),
                );
                push_line(
                    &mut edges,
                    Point2::new(length + s.length, s.radius - s.thickness),
                    Point2::new(inner_cut, s.radius - s.thickness),
                );
                push_line(
                    &mut edges,
                    Point2::new(inner_cut, s.radius - s.thickness),
                    Point2::new(inner_cut, self.inner_radius_at(inner_cut)),
                );
                inner_cut
            }
            None => {
                push_line(&mut edges, Point2::new(length, r2), Point2::new(length, r2 - t));
                length
            }
        };

        let x_lo = if p.fore_shoulder.is_some() { t } else { 0.0 };
        push_spline(&mut edges, reversed(self.inner_points(x_lo, x_hi)));

        // Close back to the fore anchor.
        if let Some(s) = p.fore_shoulder {
            push_line(
                &mut edges,
                Point2::new(t, self.inner_radius_at(t)),
                Point2::new(t, s.radius - s.thickness),
            );
            push_line(
                &mut edges,
                Point2::new(t, s.radius - s.thickness),
                Point2::new(-s.length, s.radius - s.thickness),
            );
        }
        edges
    }

    /// Capped outline with a per-end choice: a full disc for solid caps,
    /// an open wall (as for the hollow style) for the bar patterns, whose
    /// slabs are fused on after revolving. The disc sits in the shoulder
    /// when one is present, across the end opening otherwise.
    fn capped_edges(&self, fore_disc: bool, aft_disc: bool) -> Vec<ProfileEdge> {
        let p = &self.params;
        let (r1, r2, length, t) = (p.fore_radius, p.aft_radius, p.length, p.thickness);
        let mut edges = Vec::new();

        match (p.fore_shoulder, fore_disc) {
            (Some(s), true) => {
                push_line(&mut edges, Point2::new(-s.length, 0.0), Point2::new(-s.length, s.radius));
                push_line(&mut edges, Point2::new(-s.length, s.radius), Point2::new(0.0, s.radius));
                push_line(&mut edges, Point2::new(0.0, s.radius), Point2::new(0.0, r1));
            }
            (Some(s), false) => {
                push_line(
                    &mut edges,
                    Point2::new(-s.length, s.radius - s.thickness),
                    Point2::new(-s.length, s.radius),
                );
                push_line(&mut edges, Point2::new(-s.length, s.radius), Point2::new(0.0, s.radius));
                push_line(&mut edges, Point2::new(0.0, s.radius), Point2::new(0.0, r1));
            }
            (None, true) => {
                push_line(&mut edges, Point2::new(0.0, 0.0), Point2::new(0.0, r1));
            }
            (None, false) => {
                push_line(&mut edges, Point2::new(0.0, r1 - t), Point2::new(0.0, r1));
            }
        }

        push_spline(&mut edges, self.outer_points());

        // Aft end down to the inner wall; the inner spline then runs back
        // fore over [x_lo, x_hi].
        let x_hi = match (p.aft_shoulder, aft_disc) {
            (Some(s), true) => {
                let shoulder_end = length + s.length;
                let cap_x = shoulder_end - s.thickness;
                let inner_cut = length - t;
                push_line(&mut edges, Point2::new(length, r2), Point2::new(length, s.radius));
                push_line(
                    &mut edges,
                    Point2::new(length, s.radius),
                    Point2::new(shoulder_end, s.radius),
                );
                push_line(
                    &mut edges,
                    Point2::new(shoulder_end, s.radius),
                    Point2::new(shoulder_end, 0.0),
                );
                push_line(&mut edges, Point2::new(shoulder_end, 0.0), Point2::new(cap_x, 0.0));
                push_line(
                    &mut edges,
                    Point2::new(cap_x, 0.0),
                    Point2::new(cap_x, s.radius - s.thickness),
                );
                push_line(
                    &mut edges,
                    Point2::new(cap_x, s.radius - s.thickness),
                    Point2::new(inner_cut, s.radius - s.thickness),
                );
                push_line(
                    &mut edges,
                    Point2::new(inner_cut, s.radius - s.thickness),
                    Point2::new(inner_cut, self.inner_radius_at(inner_cut)),
                );
                inner_cut
            }
            (Some(s), false) => {
                let shoulder_end = length + s.length;
                let inner_cut = length - t;
                push_line(&mut edges, Point2::new(length, r2), Point2::new(length, s.radius));
                push_line(
                    &mut edges,
                    Point2::new(length, s.radius),
                    Point2::new(shoulder_end, s.radius),
                );
                push_line(
                    &mut edges,
                    Point2::new(shoulder_end, s.radius),
                    Point2::new(shoulder_end, s.radius - s.thickness),
                );
                push_line(
                    &mut edges,
                    Point2::new(shoulder_end, s.radius - s.thickness),
                    Point2::new(inner_cut, s.radius - s.thickness),
                );
                push_line(
                    &mut edges,
                    Point2::new(inner_cut, s.radius - s.thickness),
                    Point2::new(inner_cut, self.inner_radius_at(inner_cut)),
                );
                inner_cut
            }
            (None, true) => {
                let inner_cut = length - t;
                push_line(&mut edges, Point2::new(length, r2), Point2::new(length, 0.0));
                push_line(&mut edges, Point2::new(length, 0.0), Point2::new(inner_cut, 0.0));
                push_line(
                    &mut edges,
                    Point2::new(inner_cut, 0.0),
                    Point2::new(inner_cut, self.inner_radius_at(inner_cut)),
                );
                inner_cut
            }
            (None, false) => {
                push_line(&mut edges, Point2::new(length, r2), Point2::new(length, r2 - t));
                length
            }
        };

        let x_lo = if p.fore_shoulder.is_some() || fore_disc { t } else { 0.0 };
        push_spline(&mut edges, reversed(self.inner_points(x_lo, x_hi)));

        // Close back to the fore anchor.
        match (p.fore_shoulder, fore_disc) {
            (Some(s), true) => {
                let cap_x = -s.length + s.thickness;
                push_line(
                    &mut edges,
                    Point2::new(t, self.inner_radius_at(t)),
                    Point2::new(t, s.radius - s.thickness),
                );
                push_line(
                    &mut edges,
                    Point2::new(t, s.radius - s.thickness),
                    Point2::new(cap_x, s.radius - s.thickness),
                );
                push_line(
                    &mut edges,
                    Point2::new(cap_x, s.radius - s.thickness),
                    Point2::new(cap_x, 0.0),
                );
                push_line(&mut edges, Point2::new(cap_x, 0.0), Point2::new(-s.length, 0.0));
            }
            (Some(s), false) => {
                push_line(
                    &mut edges,
                    Point2::new(t, self.inner_radius_at(t)),
                    Point2::new(t, s.radius - s.thickness),
                );
                push_line(
                    &mut edges,
                    Point2::new(t, s.radius - s.thickness),
                    Point2::new(-s.length, s.radius - s.thickness),
                );
            }
            (None, true) => {
                push_line(
                    &mut edges,
                    Point2::new(t, self.inner_radius_at(t)),
                    Point2::new(t, 0.0),
                );
                push_line(&mut edges, Point2::new(t, 0.0), Point2::new(0.0, 0.0));
            }
            // The inner wall already ends on the fore anchor.
            (None, false) => {}
        }
        edges
    }
}
