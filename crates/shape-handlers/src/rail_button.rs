//! Rail button shape handler.
//!
//! Buttons are built standing on the airframe surface with their axis
//! along +z: a narrow inner spool between two wider flanges. The round
//! variant fuses three cylinders; the airfoil variant extrudes a
//! teardrop outline (arc nose plus two tangent lines) per layer.

use geometry_kernel::{GeometryKernel, SolidHandle};
use rocket_types::{Point2, ProfileEdge, RailButtonKind};
use tracing::debug;

use crate::params::{RailButtonParams, ShapeError};

pub struct RailButtonShapeHandler {
    params: RailButtonParams,
}

impl RailButtonShapeHandler {
    pub fn new(params: RailButtonParams) -> Self {
        RailButtonShapeHandler { params }
    }

    pub fn is_valid_shape(&self) -> Result<(), ShapeError> {
        let p = &self.params;
        if p.outer_diameter <= 0.0 {
            return Err(ShapeError::validation("outer diameter must be greater than zero"));
        }
        if p.inner_diameter <= 0.0 {
            return Err(ShapeError::validation("inner diameter must be greater than zero"));
        }
        if p.outer_diameter <= p.inner_diameter {
            return Err(ShapeError::validation(
                "outer diameter must be greater than the inner diameter",
            ));
        }
        if p.top_thickness <= 0.0 {
            return Err(ShapeError::validation("top thickness must be greater than zero"));
        }
        if p.bottom_thickness <= 0.0 {
            return Err(ShapeError::validation("bottom thickness must be greater than zero"));
        }
        if p.thickness <= 0.0 {
            return Err(ShapeError::validation("thickness must be greater than zero"));
        }
        if p.thickness <= p.top_thickness + p.bottom_thickness {
            return Err(ShapeError::validation(
                "top and bottom thickness can not exceed the total thickness",
            ));
        }
        if p.kind == RailButtonKind::Airfoil {
            if p.length <= 0.0 {
                return Err(ShapeError::validation(
                    "length must be greater than zero for airfoil rail buttons",
                ));
            }
            if p.length <= p.outer_diameter {
                return Err(ShapeError::validation(
                    "length must be greater than the outer diameter for airfoil rail buttons",
                ));
            }
        }
        Ok(())
    }

    pub fn draw(&self, kernel: &mut dyn GeometryKernel) -> Result<SolidHandle, ShapeError> {
        self.is_valid_shape()?;
        debug!(kind = ?self.params.kind, "drawing rail button");
        match self.params.kind {
            RailButtonKind::Round => self.draw_round(kernel),
            RailButtonKind::Airfoil => self.draw_airfoil(kernel),
        }
    }

    fn draw_round(&self, kernel: &mut dyn GeometryKernel) -> Result<SolidHandle, ShapeError> {
        let p = &self.params;
        let z = [0.0, 0.0, 1.0];

        let spool = kernel.make_cylinder(p.inner_diameter / 2.0, p.thickness, [0.0; 3], z)?;
        let top = kernel.make_cylinder(
            p.outer_diameter / 2.0,
            p.top_thickness,
            [0.0, 0.0, p.thickness - p.top_thickness],
            z,
        )?;
        let spool = kernel.fuse(&spool, &top)?;
        let bottom = kernel.make_cylinder(p.outer_diameter / 2.0, p.bottom_thickness, [0.0; 3], z)?;
        let spool = kernel.fuse(&spool, &bottom)?;
        Ok(spool)
    }

    fn draw_airfoil(&self, kernel: &mut dyn GeometryKernel) -> Result<SolidHandle, ShapeError> {
        let p = &self.params;
        let inner_length = p.length - (p.outer_diameter - p.inner_diameter);

        let spool = airfoil_layer(kernel, 0.0, p.thickness, p.inner_diameter, inner_length)?;
        let top = airfoil_layer(
            kernel,
            p.thickness - p.top_thickness,
            p.top_thickness,
            p.outer_diameter,
            p.length,
        )?;
        let spool = kernel.fuse(&spool, &top)?;
        let bottom = airfoil_layer(kernel, 0.0, p.bottom_thickness, p.outer_diameter, p.length)?;
        let spool = kernel.fuse(&spool, &bottom)?;
        Ok(spool)
    }
}

/// One extruded teardrop layer: a circular nose arc joined to a tail
/// point by two straight lines, extruded from `base` by `height`.
fn airfoil_layer(
    kernel: &mut dyn GeometryKernel,
    base: f64,
    height: f64,
    diameter: f64,
    length: f64,
) -> Result<SolidHandle, ShapeError> {
    let radius = diameter / 2.0;
    let slope = (length - radius).atan2(radius);
    let tangent_upper = Point2::new(radius * slope.cos(), radius * slope.sin());
    let tangent_lower = Point2::new(tangent_upper.x, -tangent_upper.r);
    let nose = Point2::new(radius, 0.0);
    let tail = Point2::new(radius - length, 0.0);

    let edges = vec![
        ProfileEdge::arc(tangent_lower, nose, tangent_upper),
        ProfileEdge::line(tangent_upper, tail),
        ProfileEdge::line(tail, tangent_lower),
    ];
    let wire = kernel.make_wire(&edges)?;
    let face = kernel.make_face(wire)?;
    let solid = kernel.extrude(face, [0.0, 0.0, base], [0.0, 0.0, height])?;
    Ok(solid)
}
