//! Placement computation: turning axial methods and offsets into
//! parent-relative positions.

use rocket_types::{AxialMethod, ComponentKind};

use crate::tree::ComponentTree;
use crate::types::{ComponentId, EngineError, EPSILON};

impl ComponentTree {
    /// Axial extent of a component for positioning purposes. Containers
    /// span their stacked children; leaf components use their own
    /// characteristic length.
    pub fn extent(&self, id: ComponentId) -> f64 {
        let Some(comp) = self.arena.get(id) else {
            return 0.0;
        };
        match comp.kind() {
            ComponentKind::Rocket | ComponentKind::Stage => self
                .axial_children(id)
                .iter()
                .map(|&c| self.extent(c))
                .sum(),
            _ => comp.length(),
        }
    }

    /// End (position + length) of the nearest preceding sibling that is
    /// itself stacked `AfterPrevious`, or the parent's fore end. Siblings
    /// positioned by other methods do not participate in the stack.
    pub(crate) fn previous_after_end(&self, parent: ComponentId, id: ComponentId) -> f64 {
        let siblings = self.axial_children(parent);
        let Some(index) = siblings.iter().position(|&c| c == id) else {
            return 0.0;
        };
        for &sibling in siblings[..index].iter().rev() {
            if let Some(comp) = self.arena.get(sibling) {
                if comp.axial_method == AxialMethod::AfterPrevious {
                    return comp.position + comp.length();
                }
            }
        }
        0.0
    }

    fn resolve_position(&self, id: ComponentId) -> Result<f64, EngineError> {
        let comp = self.get(id)?;
        let Some(parent) = comp.parent else {
            // Root, or a detached subtree being repositioned later.
            return Ok(0.0);
        };
        let length = comp.length();
        let position = match comp.axial_method {
            AxialMethod::Absolute => comp.axial_offset - self.absolute_position(parent),
            AxialMethod::AfterPrevious => {
                self.previous_after_end(parent, id) + comp.axial_offset
            }
            method => method.as_position(comp.axial_offset, length, self.extent(parent)),
        };
        if !position.is_finite() {
            return Err(EngineError::NonFiniteOffset);
        }
        Ok(if position.abs() < EPSILON { 0.0 } else { position })
    }

    /// The stored offset under `method` that reproduces the current
    /// physical placement.
    pub(crate) fn offset_for_method(
        &self,
        id: ComponentId,
        method: AxialMethod,
    ) -> Result<f64, EngineError> {
        let comp = self.get(id)?;
        let Some(parent) = comp.parent else {
            return Ok(comp.axial_offset);
        };
        let position = comp.position;
        let length = comp.length();
        Ok(match method {
            AxialMethod::Absolute => self.absolute_position(parent) + position,
            AxialMethod::AfterPrevious => position - self.previous_after_end(parent, id),
            m => m.as_offset(position, length, self.extent(parent)),
        })
    }

    /// Recompute this component's placement and rotation. No recursion.
    pub fn update(&mut self, id: ComponentId) -> Result<(), EngineError> {
        let position = self.resolve_position(id)?;
        let parent_rotation = self
            .get(id)?
            .parent
            .and_then(|p| self.arena.get(p))
            .map_or(0.0, |p| p.rotation);
        let comp = self.get_mut(id)?;
        comp.position = position;
        comp.rotation = parent_rotation + comp.angle_offset;
        Ok(())
    }

    /// Recompute placements for `id` and its whole subtree, top-down in
    /// axial order so `AfterPrevious` chains see fresh sibling positions.
    pub fn update_children(&mut self, id: ComponentId) -> Result<(), EngineError> {
        self.update(id)?;
        for child in self.axial_children(id) {
            self.update_children(child)?;
        }
        Ok(())
    }
}
