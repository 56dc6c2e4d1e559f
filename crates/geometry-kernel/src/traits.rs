use rocket_types::{BoundingBox, Point2, ProfileEdge};

use crate::types::{FaceId, KernelError, SolidHandle, WireId};

/// Endpoint coincidence tolerance for wire closure.
pub const WIRE_TOLERANCE: f64 = 1e-7;

/// External geometry-kernel collaborator.
///
/// The engine core never constructs B-Rep topology itself; it hands an
/// ordered, closed 2-D edge list to an implementation of this trait and
/// receives a solid of revolution back. Implemented by `MockKernel`
/// (deterministic test double) and by adapters over a real CAD kernel.
pub trait GeometryKernel {
    /// Build a wire from ordered edges. Consecutive edge endpoints must
    /// coincide within `WIRE_TOLERANCE` and the wire must close.
    fn make_wire(&mut self, edges: &[ProfileEdge]) -> Result<WireId, KernelError>;

    /// Build a planar face from a closed wire.
    fn make_face(&mut self, wire: WireId) -> Result<FaceId, KernelError>;

    /// Revolve a face about an axis by `angle_deg` degrees.
    fn revolve(
        &mut self,
        face: FaceId,
        axis_origin: [f64; 3],
        axis_direction: [f64; 3],
        angle_deg: f64,
    ) -> Result<SolidHandle, KernelError>;

    /// Extrude a planar face into a prism. The face's 2-D coordinates are
    /// taken as x/y at `origin`; `direction`'s length is the prism height.
    fn extrude(
        &mut self,
        face: FaceId,
        origin: [f64; 3],
        direction: [f64; 3],
    ) -> Result<SolidHandle, KernelError>;

    /// Boolean-fuse two solids.
    fn fuse(&mut self, a: &SolidHandle, b: &SolidHandle) -> Result<SolidHandle, KernelError>;

    /// Right circular cylinder primitive.
    fn make_cylinder(
        &mut self,
        radius: f64,
        height: f64,
        origin: [f64; 3],
        axis_direction: [f64; 3],
    ) -> Result<SolidHandle, KernelError>;

    /// Axis-aligned bounding box of a solid.
    fn bounding_box(&self, solid: &SolidHandle) -> Result<BoundingBox, KernelError>;

    /// Sampled meridian of a revolved solid, in traversal order.
    /// Returns an empty slice for solids not built by revolution.
    fn meridian_samples(&self, solid: &SolidHandle) -> Result<&[Point2], KernelError>;
}
