//! Change-event propagation and the root recompute pass.

use geometry_kernel::GeometryKernel;
use rocket_types::ChangeEvent;
use tracing::debug;

use crate::tree::ComponentTree;
use crate::types::{ComponentId, EngineError};

impl ComponentTree {
    /// Bubble a change event to the root and run the recompute pass.
    ///
    /// A parentless component that is not the root swallows the event;
    /// it is mid-detachment and will be repositioned when reattached.
    /// The pass completes before this returns.
    pub fn fire_component_change(
        &mut self,
        id: ComponentId,
        event: ChangeEvent,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        if event == ChangeEvent::NONE {
            return Ok(());
        }
        let comp = self.get(id)?;
        if id != self.root && comp.parent.is_none() {
            debug!(name = %comp.name, "change event swallowed by detached component");
            return Ok(());
        }
        self.root_component_change(event, kernel)
    }

    fn root_component_change(
        &mut self,
        event: ChangeEvent,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        debug!(?event, "root recompute pass");
        self.mark_diameters_dirty();
        self.update_children(self.root)?;
        // Failures inside execute are recorded per component; the pass
        // visits every sibling regardless.
        for id in self.flatten() {
            self.execute(id, kernel)?;
        }
        Ok(())
    }
}
