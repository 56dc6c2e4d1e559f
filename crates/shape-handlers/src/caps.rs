//! Bar and cross cap patterns.
//!
//! A capped opening is closed by a full disc, a single bar, or a pair of
//! crossed bars. The disc is part of the revolved outline; the bar
//! patterns are rectangular slabs extruded through the opening and fused
//! onto the revolved body, leaving the rest of the opening clear.

use geometry_kernel::{GeometryKernel, SolidHandle};
use rocket_types::{CapStyle, Point2, ProfileEdge};

use crate::params::ShapeError;

/// Fuse the bar pattern for one capped opening onto `body`. The cap
/// occupies `[x_lo, x_hi]` axially across an opening of `opening_radius`;
/// `bar_width` is the slab width. Solid caps are drawn into the revolved
/// outline and need no extra solid.
pub(crate) fn fuse_cap_bars(
    kernel: &mut dyn GeometryKernel,
    body: SolidHandle,
    cap: CapStyle,
    x_lo: f64,
    x_hi: f64,
    opening_radius: f64,
    bar_width: f64,
) -> Result<SolidHandle, ShapeError> {
    match cap {
        CapStyle::Solid => Ok(body),
        CapStyle::Bar => {
            let bar = slab(kernel, x_lo, x_hi, opening_radius, bar_width)?;
            Ok(kernel.fuse(&body, &bar)?)
        }
        CapStyle::Cross => {
            let bar = slab(kernel, x_lo, x_hi, opening_radius, bar_width)?;
            let body = kernel.fuse(&body, &bar)?;
            // Second bar rotated a quarter turn about the axis: span and
            // width swap between y and z.
            let cross = slab(kernel, x_lo, x_hi, bar_width / 2.0, 2.0 * opening_radius)?;
            Ok(kernel.fuse(&body, &cross)?)
        }
    }
}

/// One rectangular slab through the opening: `[x_lo, x_hi]` by
/// `[-half_span, half_span]` in the base plane, extruded symmetrically
/// about the axis to `depth`.
fn slab(
    kernel: &mut dyn GeometryKernel,
    x_lo: f64,
    x_hi: f64,
    half_span: f64,
    depth: f64,
) -> Result<SolidHandle, ShapeError> {
    let p = Point2::new;
    let edges = vec![
        ProfileEdge::line(p(x_lo, -half_span), p(x_hi, -half_span)),
        ProfileEdge::line(p(x_hi, -half_span), p(x_hi, half_span)),
        ProfileEdge::line(p(x_hi, half_span), p(x_lo, half_span)),
        ProfileEdge::line(p(x_lo, half_span), p(x_lo, -half_span)),
    ];
    let wire = kernel.make_wire(&edges)?;
    let face = kernel.make_face(wire)?;
    let solid = kernel.extrude(face, [0.0, 0.0, -depth / 2.0], [0.0, 0.0, depth])?;
    Ok(solid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometry_kernel::MockKernel;

    #[test]
    fn bar_slab_spans_the_opening() {
        let mut kernel = MockKernel::new();
        let base = kernel
            .make_cylinder(1.0, 1.0, [50.0, 0.0, 0.0], [1.0, 0.0, 0.0])
            .unwrap();
        let solid =
            fuse_cap_bars(&mut kernel, base, CapStyle::Bar, 58.0, 60.0, 18.0, 6.0).unwrap();
        let bbox = kernel.bounding_box(&solid).unwrap();
        assert!((bbox.max[1] - 18.0).abs() < 1e-9);
        assert!((bbox.max[2] - 3.0).abs() < 1e-9);
        assert!((bbox.max[0] - 60.0).abs() < 1e-9);
    }

    #[test]
    fn cross_adds_the_perpendicular_bar() {
        let mut kernel = MockKernel::new();
        let base = kernel
            .make_cylinder(1.0, 1.0, [50.0, 0.0, 0.0], [1.0, 0.0, 0.0])
            .unwrap();
        let solid =
            fuse_cap_bars(&mut kernel, base, CapStyle::Cross, 58.0, 60.0, 18.0, 6.0).unwrap();
        let bbox = kernel.bounding_box(&solid).unwrap();
        assert!((bbox.max[1] - 18.0).abs() < 1e-9);
        assert!((bbox.max[2] - 18.0).abs() < 1e-9);
    }
}
