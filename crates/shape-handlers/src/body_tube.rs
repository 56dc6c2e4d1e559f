//! Body tube shape handler: a plain cylindrical shell, revolved from a
//! rectangular ring in the x/r half-plane.

use geometry_kernel::{GeometryKernel, SolidHandle};
use rocket_types::Point2;
use tracing::debug;

use crate::outline::push_line;
use crate::params::{ShapeError, TubeParams};

pub struct BodyTubeShapeHandler {
    params: TubeParams,
}

impl BodyTubeShapeHandler {
    pub fn new(params: TubeParams) -> Self {
        BodyTubeShapeHandler { params }
    }

    pub fn is_valid_shape(&self) -> Result<(), ShapeError> {
        let p = &self.params;
        if p.length <= 0.0 {
            return Err(ShapeError::validation("body tube length must be > 0"));
        }
        if p.outer_radius <= 0.0 {
            return Err(ShapeError::validation("body tube radius must be > 0"));
        }
        if p.thickness <= 0.0 {
            return Err(ShapeError::validation("body tube thickness must be > 0"));
        }
        if p.thickness >= p.outer_radius {
            return Err(ShapeError::validation(
                "body tube thickness must be less than the radius",
            ));
        }
        Ok(())
    }

    pub fn draw(&self, kernel: &mut dyn GeometryKernel) -> Result<SolidHandle, ShapeError> {
        self.is_valid_shape()?;
        let p = &self.params;
        debug!(
            length = p.length,
            outer_radius = p.outer_radius,
            thickness = p.thickness,
            "drawing body tube"
        );

        let inner = p.outer_radius - p.thickness;
        let mut edges = Vec::new();
        push_line(&mut edges, Point2::new(0.0, inner), Point2::new(0.0, p.outer_radius));
        push_line(
            &mut edges,
            Point2::new(0.0, p.outer_radius),
            Point2::new(p.length, p.outer_radius),
        );
        push_line(
            &mut edges,
            Point2::new(p.length, p.outer_radius),
            Point2::new(p.length, inner),
        );
        push_line(&mut edges, Point2::new(p.length, inner), Point2::new(0.0, inner));

        let wire = kernel.make_wire(&edges)?;
        let face = kernel.make_face(wire)?;
        let solid = kernel.revolve(face, [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 360.0)?;
        Ok(solid)
    }
}
