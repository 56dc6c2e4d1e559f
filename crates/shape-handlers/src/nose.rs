//! Nose cone shape handler.
//!
//! Builds the closed meridian outline for a nose cone in the x/r
//! half-plane (tip at x = 0, base at x = length) and revolves it 360
//! degrees about the x axis. Six outline variants cover the style and
//! shoulder combinations.

use geometry_kernel::{GeometryKernel, SolidHandle};
use rocket_types::{CapStyle, Point2, ProfileEdge, ShapeFamily, ShapeStyle};
use tracing::debug;

use crate::caps::fuse_cap_bars;
use crate::outline::{push_line, push_spline, reversed};
use crate::params::{
    check_cap, check_coefficient, check_shoulder, NoseParams, ShapeError, ShoulderParams,
};
use crate::profiles::{blunted_tip, sample_nose, tangent_ogive_rho, BluntedTip, Profile};

/// Outer meridian from tip to base. For most families this is a single
/// spline; the blunted ogive prepends a spherical-cap arc and shortens
/// the part so the cap apex sits at x = 0.
struct OuterCurve {
    edges: Vec<ProfileEdge>,
    /// Axial position of the base plane.
    aft_x: f64,
}

pub struct NoseShapeHandler {
    params: NoseParams,
}

impl NoseShapeHandler {
    pub fn new(params: NoseParams) -> Self {
        NoseShapeHandler { params }
    }

    // ── Validation ─────────────────────────────────────────────────────

    /// Check the parameter snapshot before any kernel call. The first
    /// violation wins and carries a human-readable diagnostic.
    pub fn is_valid_shape(&self) -> Result<(), ShapeError> {
        let p = &self.params;
        if p.length <= 0.0 {
            return Err(ShapeError::validation("nose length must be > 0"));
        }
        if p.radius <= 0.0 {
            return Err(ShapeError::validation("nose base radius must be > 0"));
        }
        if p.resolution < 2 {
            return Err(ShapeError::validation(
                "profile resolution must be at least 2 points",
            ));
        }
        check_coefficient(p.family, p.coefficient)?;
        match p.family {
            ShapeFamily::SecantOgive => {
                let rho = p.ogive_diameter / 2.0;
                if rho < tangent_ogive_rho(p.length, p.radius) {
                    return Err(ShapeError::validation(
                        "secant ogive diameter is too small for this length and radius",
                    ));
                }
            }
            ShapeFamily::BluntedOgive => {
                let cap = p.blunted_diameter / 2.0;
                if cap <= 0.0 || cap >= p.radius {
                    return Err(ShapeError::validation(
                        "blunted tip diameter must be positive and smaller than the base diameter",
                    ));
                }
                let rho = tangent_ogive_rho(p.length, p.radius);
                if blunted_tip(p.length, p.radius, rho, cap).is_none() {
                    return Err(ShapeError::validation(
                        "blunted tip can not be made tangent to the ogive curve",
                    ));
                }
            }
            _ => {}
        }
        if p.style.has_wall() {
            if p.thickness <= 0.0 {
                return Err(ShapeError::validation(format!(
                    "wall thickness must be > 0 for {:?} nose cones",
                    p.style
                )));
            }
            if p.thickness >= p.radius {
                return Err(ShapeError::validation(
                    "wall thickness must be less than the base radius",
                ));
            }
        }
        if let Some(shoulder) = &p.shoulder {
            check_shoulder("aft", shoulder, p.radius, p.style)?;
        }
        if p.style == ShapeStyle::Capped {
            let opening = match &p.shoulder {
                Some(s) => s.radius - s.thickness,
                None => p.radius - p.thickness,
            };
            check_cap("aft", p.cap, p.cap_bar_width, opening)?;
        }
        Ok(())
    }

    // ── Drawing ────────────────────────────────────────────────────────

    /// Validate, assemble the outline for the style/shoulder variant, and
    /// revolve it into a solid.
    pub fn draw(&self, kernel: &mut dyn GeometryKernel) -> Result<SolidHandle, ShapeError> {
        self.is_valid_shape()?;
        debug!(
            family = ?self.params.family,
            style = ?self.params.style,
            length = self.params.length,
            radius = self.params.radius,
            "drawing nose cone"
        );

        let p = &self.params;
        let outer = self.outer_curve()?;
        let aft = outer.aft_x;
        // Bar patterns revolve the open hollow wall and fuse their slabs
        // across the opening afterwards.
        let bar_cap = p.style == ShapeStyle::Capped && p.cap != CapStyle::Solid;
        let edges = match (p.style, p.shoulder) {
            (ShapeStyle::Solid | ShapeStyle::SolidCore, None) => self.solid_edges(outer),
            (ShapeStyle::Solid | ShapeStyle::SolidCore, Some(s)) => {
                self.solid_shoulder_edges(outer, s)
            }
            (ShapeStyle::Hollow, None) => self.hollow_edges(outer),
            (ShapeStyle::Hollow, Some(s)) => self.hollow_shoulder_edges(outer, s),
            (ShapeStyle::Capped, None) if bar_cap => self.hollow_edges(outer),
            (ShapeStyle::Capped, Some(s)) if bar_cap => self.hollow_shoulder_edges(outer, s),
            (ShapeStyle::Capped, None) => self.capped_edges(outer),
            (ShapeStyle::Capped, Some(s)) => self.capped_shoulder_edges(outer, s),
        };

        let wire = kernel.make_wire(&edges)?;
        let face = kernel.make_face(wire)?;
        let solid = kernel.revolve(face, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 360.0)?;
        if bar_cap {
            let p = &self.params;
            let (x_lo, x_hi, opening) = match p.shoulder {
                Some(s) => (aft + s.length - s.thickness, aft + s.length, s.radius - s.thickness),
                None => (aft - p.thickness, aft, p.radius - p.thickness),
            };
            return Ok(fuse_cap_bars(
                kernel,
                solid,
                p.cap,
                x_lo,
                x_hi,
                opening,
                p.cap_bar_width,
            )?);
        }
        Ok(solid)
    }

    // ── Profile and meridians ──────────────────────────────────────────

    fn profile(&self) -> Profile {
        let p = &self.params;
        match p.family {
            ShapeFamily::Cone => Profile::Cone,
            ShapeFamily::Elliptical => Profile::Elliptical,
            ShapeFamily::Ogive | ShapeFamily::BluntedOgive => Profile::Ogive {
                rho: tangent_ogive_rho(p.length, p.radius),
            },
            ShapeFamily::SecantOgive => Profile::Ogive {
                rho: p.ogive_diameter / 2.0,
            },
            ShapeFamily::VonKarman => Profile::Haack { c: 0.0 },
            ShapeFamily::Parabola => Profile::Power { k: 0.5 },
            ShapeFamily::PowerSeries => Profile::Power { k: p.coefficient },
            ShapeFamily::ParabolicSeries => Profile::Parabolic { k: p.coefficient },
            ShapeFamily::HaackSeries => Profile::Haack { c: p.coefficient },
        }
    }

    fn outer_curve(&self) -> Result<OuterCurve, ShapeError> {
        let p = &self.params;
        let profile = self.profile();

        if p.family == ShapeFamily::BluntedOgive {
            let rho = tangent_ogive_rho(p.length, p.radius);
            let cap = p.blunted_diameter / 2.0;
            let tip = blunted_tip(p.length, p.radius, rho, cap).ok_or_else(|| {
                ShapeError::validation("blunted tip can not be made tangent to the ogive curve")
            })?;
            return Ok(self.blunted_outer(&profile, &tip, cap));
        }

        let points = sample_nose(&profile, p.length, p.radius, p.resolution);
        let mut edges = Vec::new();
        push_spline(&mut edges, points);
        Ok(OuterCurve {
            edges,
            aft_x: p.length,
        })
    }

    /// Spherical-cap arc plus the remaining ogive spline, shifted so the
    /// cap apex lands at x = 0. The part is shorter than the theoretical
    /// sharp-tip length by the tip truncation.
    fn blunted_outer(&self, profile: &Profile, tip: &BluntedTip, cap_radius: f64) -> OuterCurve {
        let p = &self.params;
        let shift = -tip.apex_x;

        let center = Point2::new(tip.sphere_center_x + shift, 0.0);
        let apex = Point2::new(0.0, 0.0);
        let tangent = Point2::new(tip.tangent.x + shift, tip.tangent.r);
        let tangent_angle = (tangent.r).atan2(tangent.x - center.x);
        let mid_angle = (std::f64::consts::PI + tangent_angle) / 2.0;
        let mid = Point2::new(
            center.x + cap_radius * mid_angle.cos(),
            cap_radius * mid_angle.sin(),
        );

        let mut edges = vec![ProfileEdge::arc(apex, mid, tangent)];

        let n = p.resolution.max(2);
        let mut points = Vec::with_capacity(n);
        for i in 0..n {
            let x = tip.tangent.x + (p.length - tip.tangent.x) * i as f64 / (n - 1) as f64;
            points.push(Point2::new(x + shift, profile.radius_at(x, p.length, p.radius)));
        }
        points[0] = tangent;
        points[n - 1] = Point2::new(p.length + shift, p.radius);
        push_spline(&mut edges, points);

        OuterCurve {
            edges,
            aft_x: p.length + shift,
        }
    }

    /// Inner wall meridian from the internal tip at x = thickness out to
    /// `x_hi`, as an offset copy of the family curve. Returned fore to
    /// aft.
    fn inner_points(&self, aft_x: f64, x_hi: f64) -> Vec<Point2> {
        let p = &self.params;
        let profile = self.profile();
        let t = p.thickness;
        let inner_len = aft_x - t;
        let inner_radius = p.radius - t;

        let n = p.resolution.max(2);
        let mut points = Vec::with_capacity(n);
        for i in 0..n {
            let u = (x_hi - t) * i as f64 / (n - 1) as f64;
            points.push(Point2::new(
                u + t,
                profile.radius_at(u, inner_len, inner_radius),
            ));
        }
        points[0] = Point2::new(t, 0.0);
        points
    }

    fn inner_radius_at(&self, aft_x: f64, x: f64) -> f64 {
        let p = &self.params;
        let profile = self.profile();
        profile.radius_at(x - p.thickness, aft_x - p.thickness, p.radius - p.thickness)
    }

    // ── Outline variants ───────────────────────────────────────────────

    fn solid_edges(&self, outer: OuterCurve) -> Vec<ProfileEdge> {
        let r = self.params.radius;
        let base = Point2::new(outer.aft_x, r);
        let mut edges = outer.edges;
        push_line(&mut edges, base, Point2::new(outer.aft_x, 0.0));
        push_line(&mut edges, Point2::new(outer.aft_x, 0.0), Point2::new(0.0, 0.0));
        edges
    }

    fn solid_shoulder_edges(
        &self,
        outer: OuterCurve,
        s: ShoulderParams,
    ) -> Vec<ProfileEdge> {
        let r = self.params.radius;
        let aft = outer.aft_x;
        let mut edges = outer.edges;
        push_line(&mut edges, Point2::new(aft, r), Point2::new(aft, s.radius));
        push_line(
            &mut edges,
            Point2::new(aft, s.radius),
            Point2::new(aft + s.length, s.radius),
        );
        push_line(
            &mut edges,
            Point2::new(aft + s.length, s.radius),
            Point2::new(aft + s.length, 0.0),
        );
        push_line(
            &mut edges,
            Point2::new(aft + s.length, 0.0),
            Point2::new(0.0, 0.0),
        );
        edges
    }

    fn hollow_edges(&self, outer: OuterCurve) -> Vec<ProfileEdge> {
        let p = &self.params;
        let aft = outer.aft_x;
        let inner = self.inner_points(aft, aft);
        let mut edges = outer.edges;
        push_line(
            &mut edges,
            Point2::new(aft, p.radius),
            Point2::new(aft, p.radius - p.thickness),
        );
        push_spline(&mut edges, reversed(inner));
        push_line(
            &mut edges,
            Point2::new(p.thickness, 0.0),
            Point2::new(0.0, 0.0),
        );
        edges
    }

    fn hollow_shoulder_edges(
        &self,
        outer: OuterCurve,
        s: ShoulderParams,
    ) -> Vec<ProfileEdge> {
        let p = &self.params;
        let aft = outer.aft_x;
        let inner_cut = aft - p.thickness;
        let inner = self.inner_points(aft, inner_cut);
        let inner_end_r = self.inner_radius_at(aft, inner_cut);

        let mut edges = outer.edges;
        push_line(&mut edges, Point2::new(aft, p.radius), Point2::new(aft, s.radius));
        push_line(
            &mut edges,
            Point2::new(aft, s.radius),
            Point2::new(aft + s.length, s.radius),
        );
        push_line(
            &mut edges,
            Point2::new(aft + s.length, s.radius),
            Point2::new(aft + s.length, s.radius - s.thickness),
        );
        push_line(
            &mut edges,
            Point2::new(aft + s.length, s.radius - s.thickness),
            Point2::new(inner_cut, s.radius - s.thickness),
        );
        push_line(
            &mut edges,
            Point2::new(inner_cut, s.radius - s.thickness),
            Point2::new(inner_cut, inner_end_r),
        );
        push_spline(&mut edges, reversed(inner));
        push_line(
            &mut edges,
            Point2::new(p.thickness, 0.0),
            Point2::new(0.0, 0.0),
        );
        edges
    }

    fn capped_edges(&self, outer: OuterCurve) -> Vec<ProfileEdge> {
        let p = &self.params;
        let aft = outer.aft_x;
        let cap_x = aft - p.thickness;
        let inner = self.inner_points(aft, cap_x);
        let inner_end_r = self.inner_radius_at(aft, cap_x);

        let mut edges = outer.edges;
        push_line(&mut edges, Point2::new(aft, p.radius), Point2::new(aft, 0.0));
        push_line(&mut edges, Point2::new(aft, 0.0), Point2::new(cap_x, 0.0));
        push_line(
            &mut edges,
            Point2::new(cap_x, 0.0),
            Point2::new(cap_x, inner_end_r),
        );
        push_spline(&mut edges, reversed(inner));
        push_line(
            &mut edges,
            Point2::new(p.thickness, 0.0),
            Point2::new(0.0, 0.0),
        );
        edges
    }

    fn capped_shoulder_edges(
        &self,
        outer: OuterCurve,
        s: ShoulderParams,
    ) -> Vec<ProfileEdge> {
        let p = &self.params;
        let aft = outer.aft_x;
        let shoulder_end = aft + s.length;
        let cap_x = shoulder_end - s.thickness;
        let inner_cut = aft - p.thickness;
        let inner = self.inner_points(aft, inner_cut);
        let inner_end_r = self.inner_radius_at(aft, inner_cut);

        let mut edges = outer.edges;
        push_line(&mut edges, Point2::new(aft, p.radius), Point2::new(aft, s.radius));
        push_line(
            &mut edges,
            Point2::new(aft, s.radius),
            Point2::new(shoulder_end, s.radius),
        );
        push_line(
            &mut edges,
            Point2::new(shoulder_end, s.radius),
            Point2::new(shoulder_end, 0.0),
        );
        push_line(
            &mut edges,
            Point2::new(shoulder_end, 0.0),
            Point2::new(cap_x, 0.0),
        );
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
            Point2::new(inner_cut, inner_end_r),
        );
        push_spline(&mut edges, reversed(inner));
        push_line(
            &mut edges,
            Point2::new(p.thickness, 0.0),
            Point2::new(0.0, 0.0),
        );
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometry_kernel::MockKernel;
    use rocket_types::{CapStyle, ShapeFamily, ShapeStyle};

    fn params(style: ShapeStyle) -> NoseParams {
        NoseParams {
            family: ShapeFamily::Ogive,
            style,
            length: 100.0,
            radius: 20.0,
            thickness: 2.0,
            coefficient: 0.0,
            ogive_diameter: 0.0,
            blunted_diameter: 0.0,
            resolution: 40,
            shoulder: None,
            cap: CapStyle::Solid,
            cap_bar_width: 0.0,
        }
    }

    #[test]
    fn solid_ogive_draws_with_expected_bounds() {
        let mut kernel = MockKernel::new();
        let handler = NoseShapeHandler::new(params(ShapeStyle::Solid));
        let solid = handler.draw(&mut kernel).unwrap();
        let bbox = kernel.bounding_box(&solid).unwrap();
        assert!((bbox.length_x() - 100.0).abs() < 1e-6);
        assert!((bbox.max_radius() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn shoulder_extends_past_the_base() {
        let mut kernel = MockKernel::new();
        let mut p = params(ShapeStyle::Solid);
        p.shoulder = Some(ShoulderParams {
            length: 15.0,
            radius: 18.0,
            thickness: 2.0,
        });
        let solid = NoseShapeHandler::new(p).draw(&mut kernel).unwrap();
        let bbox = kernel.bounding_box(&solid).unwrap();
        assert!((bbox.length_x() - 115.0).abs() < 1e-6);
        assert!((bbox.max_radius() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn every_style_and_shoulder_combination_closes() {
        for style in [
            ShapeStyle::Solid,
            ShapeStyle::Hollow,
            ShapeStyle::Capped,
        ] {
            for shoulder in [
                None,
                Some(ShoulderParams {
                    length: 10.0,
                    radius: 18.0,
                    thickness: 1.5,
                }),
            ] {
                let mut kernel = MockKernel::new();
                let mut p = params(style);
                p.shoulder = shoulder;
                let result = NoseShapeHandler::new(p).draw(&mut kernel);
                assert!(
                    result.is_ok(),
                    "style {:?} shoulder {} failed: {:?}",
                    style,
                    shoulder.is_some(),
                    result.err()
                );
            }
        }
    }

    #[test]
    fn cap_patterns_produce_distinct_solids() {
        // A solid cap closes the base with a revolved disc. The bar
        // patterns leave the wall open and fuse slabs across the opening,
        // so the result is no longer a single surface of revolution.
        let mut p = params(ShapeStyle::Capped);
        p.cap_bar_width = 6.0;

        let mut kernel = MockKernel::new();
        let capped = NoseShapeHandler::new(p.clone()).draw(&mut kernel).unwrap();
        let meridian = kernel.meridian_samples(&capped).unwrap();
        assert!(meridian.iter().any(|q| q.x > 90.0 && q.r.abs() < 1e-9));

        for cap in [CapStyle::Bar, CapStyle::Cross] {
            let mut kernel = MockKernel::new();
            let mut pc = p.clone();
            pc.cap = cap;
            let solid = NoseShapeHandler::new(pc).draw(&mut kernel).unwrap();
            assert!(
                kernel.meridian_samples(&solid).unwrap().is_empty(),
                "{cap:?} cap should fuse bar solids onto the wall"
            );
            let bbox = kernel.bounding_box(&solid).unwrap();
            assert!((bbox.length_x() - 100.0).abs() < 1e-6);
            assert!((bbox.max_radius() - 20.0).abs() < 1e-6);
        }
    }

    #[test]
    fn every_family_draws_solid() {
        for (family, coefficient, ogive_d, blunt_d) in [
            (ShapeFamily::Cone, 0.0, 0.0, 0.0),
            (ShapeFamily::Elliptical, 0.0, 0.0, 0.0),
            (ShapeFamily::Ogive, 0.0, 0.0, 0.0),
            (ShapeFamily::SecantOgive, 0.0, 600.0, 0.0),
            (ShapeFamily::BluntedOgive, 0.0, 0.0, 8.0),
            (ShapeFamily::VonKarman, 0.0, 0.0, 0.0),
            (ShapeFamily::Parabola, 0.0, 0.0, 0.0),
            (ShapeFamily::PowerSeries, 0.75, 0.0, 0.0),
            (ShapeFamily::ParabolicSeries, 0.5, 0.0, 0.0),
            (ShapeFamily::HaackSeries, 1.0 / 3.0, 0.0, 0.0),
        ] {
            let mut kernel = MockKernel::new();
            let mut p = params(ShapeStyle::Solid);
            p.family = family;
            p.coefficient = coefficient;
            p.ogive_diameter = ogive_d;
            p.blunted_diameter = blunt_d;
            let result = NoseShapeHandler::new(p).draw(&mut kernel);
            assert!(result.is_ok(), "{:?} failed: {:?}", family, result.err());
        }
    }

    #[test]
    fn blunted_ogive_is_shorter_than_sharp() {
        let mut kernel = MockKernel::new();
        let mut p = params(ShapeStyle::Solid);
        p.family = ShapeFamily::BluntedOgive;
        p.blunted_diameter = 10.0;
        let solid = NoseShapeHandler::new(p).draw(&mut kernel).unwrap();
        let bbox = kernel.bounding_box(&solid).unwrap();
        assert!(bbox.length_x() < 100.0);
        assert!(bbox.length_x() > 90.0);
    }

    #[test]
    fn validation_rejects_bad_parameters() {
        let cases: Vec<(NoseParams, &str)> = vec![
            (
                NoseParams {
                    length: 0.0,
                    ..params(ShapeStyle::Solid)
                },
                "zero length",
            ),
            (
                NoseParams {
                    thickness: 0.0,
                    ..params(ShapeStyle::Hollow)
                },
                "zero thickness on hollow",
            ),
            (
                NoseParams {
                    thickness: 25.0,
                    ..params(ShapeStyle::Capped)
                },
                "thickness exceeding radius",
            ),
            (
                NoseParams {
                    family: ShapeFamily::PowerSeries,
                    coefficient: 1.5,
                    ..params(ShapeStyle::Solid)
                },
                "power coefficient out of range",
            ),
            (
                NoseParams {
                    family: ShapeFamily::SecantOgive,
                    ogive_diameter: 50.0,
                    ..params(ShapeStyle::Solid)
                },
                "secant diameter too small",
            ),
            (
                NoseParams {
                    shoulder: Some(ShoulderParams {
                        length: 10.0,
                        radius: 30.0,
                        thickness: 1.0,
                    }),
                    ..params(ShapeStyle::Solid)
                },
                "shoulder wider than base",
            ),
            (
                NoseParams {
                    cap: CapStyle::Bar,
                    cap_bar_width: 0.0,
                    ..params(ShapeStyle::Capped)
                },
                "bar cap without a bar width",
            ),
            (
                NoseParams {
                    cap: CapStyle::Cross,
                    cap_bar_width: 40.0,
                    ..params(ShapeStyle::Capped)
                },
                "cap bar wider than the opening",
            ),
        ];
        for (p, what) in cases {
            let err = NoseShapeHandler::new(p).is_valid_shape();
            assert!(
                matches!(err, Err(ShapeError::Validation { .. })),
                "{what} should fail validation"
            );
        }
    }

    #[test]
    fn thickness_ignored_for_solid_styles() {
        let mut p = params(ShapeStyle::Solid);
        p.thickness = 0.0;
        assert!(NoseShapeHandler::new(p).is_valid_shape().is_ok());
    }
}
