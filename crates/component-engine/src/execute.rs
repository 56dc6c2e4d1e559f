//! Geometry recompute: snapshot a component's parameters, run its shape
//! handler, commit the solid or record the diagnostic.

use geometry_kernel::GeometryKernel;
use shape_handlers::{
    handler_for, NoseParams, RailButtonParams, ShapeParams, ShoulderParams, TransitionParams,
    TubeParams,
};
use tracing::{debug, warn};

use crate::tree::ComponentTree;
use crate::types::{ComponentData, ComponentId, EngineError, ShoulderData};

impl ComponentTree {
    /// Rebuild one component's solid. Validation and geometry failures
    /// are recorded on the component and the previous solid is kept;
    /// only structural problems become errors.
    pub fn execute(
        &mut self,
        id: ComponentId,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        let Some(params) = self.snapshot(id)? else {
            // Rockets and stages carry no geometry of their own.
            return Ok(());
        };

        let handler = handler_for(params);
        match handler.draw(kernel) {
            Ok(solid) => {
                let comp = self.get_mut(id)?;
                comp.geometry = Some(solid);
                comp.shape_error = None;
                debug!(name = %comp.name, "geometry committed");
            }
            Err(err) => {
                let comp = self.get_mut(id)?;
                comp.shape_error = Some(err.to_string());
                warn!(name = %comp.name, error = %err, "shape recompute failed");
            }
        }
        Ok(())
    }

    /// Parameter snapshot with all automatic diameters resolved. `None`
    /// for components that have no shape.
    fn snapshot(&mut self, id: ComponentId) -> Result<Option<ShapeParams>, EngineError> {
        match self.get(id)?.data {
            ComponentData::Rocket | ComponentData::Stage => return Ok(None),
            _ => {}
        }

        // Resolve and cache before borrowing the payload.
        let aft = self.aft_diameter(id).unwrap_or(0.0);
        let fore = self.fore_diameter(id).unwrap_or(0.0);
        let fore_shoulder_d = self.fore_shoulder_diameter(id)?;
        let aft_shoulder_d = self.aft_shoulder_diameter(id)?;

        let comp = self.get(id)?;
        let params = match &comp.data {
            ComponentData::NoseCone(d) => ShapeParams::Nose(NoseParams {
                family: d.family,
                style: d.style,
                length: d.length,
                radius: aft / 2.0,
                thickness: d.thickness,
                coefficient: d.coefficient,
                ogive_diameter: d.ogive_diameter,
                blunted_diameter: d.blunted_diameter,
                resolution: d.resolution,
                shoulder: shoulder_params(&d.shoulder, aft_shoulder_d),
                cap: d.cap,
                cap_bar_width: d.cap_bar_width,
            }),
            ComponentData::Transition(d) => ShapeParams::Transition(TransitionParams {
                family: d.family,
                style: d.style,
                length: d.length,
                fore_radius: fore / 2.0,
                aft_radius: aft / 2.0,
                thickness: d.thickness,
                core_radius: d.core_diameter / 2.0,
                coefficient: d.coefficient,
                clipped: d.clipped,
                resolution: d.resolution,
                fore_shoulder: shoulder_params(&d.fore_shoulder, fore_shoulder_d),
                aft_shoulder: shoulder_params(&d.aft_shoulder, aft_shoulder_d),
                fore_cap: d.fore_cap,
                aft_cap: d.aft_cap,
                fore_cap_bar_width: d.fore_cap_bar_width,
                aft_cap_bar_width: d.aft_cap_bar_width,
            }),
            ComponentData::BodyTube(d) => ShapeParams::BodyTube(TubeParams {
                length: d.length,
                outer_radius: aft / 2.0,
                thickness: d.thickness,
            }),
            ComponentData::RailButton(d) => ShapeParams::RailButton(RailButtonParams {
                kind: d.kind,
                outer_diameter: d.outer_diameter,
                inner_diameter: d.inner_diameter,
                top_thickness: d.top_thickness,
                bottom_thickness: d.bottom_thickness,
                thickness: d.thickness,
                length: d.length,
            }),
            ComponentData::Rocket | ComponentData::Stage => return Ok(None),
        };
        Ok(Some(params))
    }
}

fn shoulder_params(shoulder: &Option<ShoulderData>, resolved: Option<f64>) -> Option<ShoulderParams> {
    shoulder.as_ref().map(|s| ShoulderParams {
        length: s.length,
        radius: resolved.unwrap_or_else(|| s.diameter.current()) / 2.0,
        thickness: s.thickness,
    })
}
