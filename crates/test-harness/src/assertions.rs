//! Assertion helpers with diagnostic output.
//!
//! Every failure carries expected vs actual values in the error detail so
//! a failing scenario points straight at the divergence.

use component_engine::{ComponentId, Engine};
use geometry_kernel::{GeometryKernel, SolidHandle};
use rocket_types::BoundingBox;

use crate::helpers::HarnessError;

/// Assert two scalars agree within `tol`.
pub fn assert_close(actual: f64, expected: f64, tol: f64, ctx: &str) -> Result<(), HarnessError> {
    if (actual - expected).abs() <= tol {
        Ok(())
    } else {
        Err(HarnessError::AssertionFailed {
            detail: format!("[{ctx}] expected {expected:.6}, got {actual:.6} (tol={tol})"),
        })
    }
}

/// Assert the solid's bounding box matches expected corners within `tol`.
pub fn assert_bounding_box(
    kernel: &dyn GeometryKernel,
    solid: &SolidHandle,
    expected_min: [f64; 3],
    expected_max: [f64; 3],
    tol: f64,
    ctx: &str,
) -> Result<(), HarnessError> {
    let bbox: BoundingBox = kernel.bounding_box(solid)?;
    for i in 0..3 {
        if (bbox.min[i] - expected_min[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box min[{}]: expected {:.3}, got {:.3} (tol={})",
                    ctx, i, expected_min[i], bbox.min[i], tol,
                ),
            });
        }
        if (bbox.max[i] - expected_max[i]).abs() > tol {
            return Err(HarnessError::AssertionFailed {
                detail: format!(
                    "[{}] bounding box max[{}]: expected {:.3}, got {:.3} (tol={})",
                    ctx, i, expected_max[i], bbox.max[i], tol,
                ),
            });
        }
    }
    Ok(())
}

/// Assert the component's last recompute produced a solid and left no
/// diagnostic behind. Returns the handle for further measurement.
pub fn assert_solid_committed(
    engine: &Engine,
    id: ComponentId,
    ctx: &str,
) -> Result<SolidHandle, HarnessError> {
    let comp = engine.component(id)?;
    if let Some(detail) = &comp.shape_error {
        return Err(HarnessError::ShapeError {
            name: format!("{ctx}/{}", comp.name),
            detail: detail.clone(),
        });
    }
    comp.geometry.ok_or_else(|| HarnessError::NoSolid {
        name: format!("{ctx}/{}", comp.name),
    })
}
