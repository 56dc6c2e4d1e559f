//! Component tree engine: position/update protocol, automatic diameter
//! negotiation, and synchronous geometry recompute.
//!
//! Mutators take the geometry kernel so the full update/recompute pass
//! finishes before they return; callers observe fresh placements and
//! solids immediately after every call.

pub mod events;
pub mod execute;
pub mod position;
pub mod symmetric;
pub mod tree;
pub mod types;

use std::collections::HashSet;

use geometry_kernel::GeometryKernel;
use rocket_types::{AxialMethod, CapStyle, ChangeEvent, ShapeFamily, ShapeStyle};

use crate::tree::ComponentTree;
pub use crate::types::{
    Component, ComponentData, ComponentId, Diameter, EngineError, NoseData, RailButtonData,
    ShoulderData, TransitionData, TubeData, DEFAULT_RADIUS, EPSILON,
};

/// The rocket design engine.
///
/// Owns the component tree and coordinates structural mutation,
/// placement updates and geometry recomputes.
pub struct Engine {
    /// The component tree.
    pub tree: ComponentTree,
}

impl Engine {
    pub fn new(name: impl Into<String>) -> Self {
        Engine {
            tree: ComponentTree::new(name),
        }
    }

    pub fn root(&self) -> ComponentId {
        self.tree.root
    }

    pub fn component(&self, id: ComponentId) -> Result<&Component, EngineError> {
        self.tree.get(id)
    }

    // ── Structural mutation ────────────────────────────────────────────

    /// Insert a component into the arena and attach it as the last child
    /// of `parent`, then run the recompute pass.
    pub fn add_child(
        &mut self,
        parent: ComponentId,
        component: Component,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<ComponentId, EngineError> {
        let index = self.tree.get(parent)?.children.len();
        self.add_child_at(parent, component, index, kernel)
    }

    pub fn add_child_at(
        &mut self,
        parent: ComponentId,
        component: Component,
        index: usize,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<ComponentId, EngineError> {
        let id = self.tree.arena.insert(component);
        if let Err(err) = self.tree.add_child_at(parent, id, index) {
            self.tree.arena.remove(id);
            return Err(err);
        }
        let event = self.tree.add_remove_event(id);
        self.tree.fire_component_change(parent, event, kernel)?;
        Ok(id)
    }

    /// Detach a component (and its subtree) from its parent. The subtree
    /// stays in the arena and can be reattached.
    pub fn remove_child(
        &mut self,
        id: ComponentId,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        let event = self.tree.add_remove_event(id);
        let parent = self.tree.remove_child(id)?;
        self.tree.fire_component_change(parent, event, kernel)
    }

    /// Swap a component with its previous sibling. Returns false at the
    /// start of the list.
    pub fn move_child_up(
        &mut self,
        id: ComponentId,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<bool, EngineError> {
        if self.tree.move_child_up(id)? {
            let event = self.tree.add_remove_event(id);
            self.tree.fire_component_change(id, event, kernel)?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn move_child_down(
        &mut self,
        id: ComponentId,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<bool, EngineError> {
        if self.tree.move_child_down(id)? {
            let event = self.tree.add_remove_event(id);
            self.tree.fire_component_change(id, event, kernel)?;
            return Ok(true);
        }
        Ok(false)
    }

    // ── Positioning ────────────────────────────────────────────────────

    /// Store a new offset under the current axial method and recompute.
    pub fn set_axial_offset(
        &mut self,
        id: ComponentId,
        offset: f64,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        if !offset.is_finite() {
            return Err(EngineError::NonFiniteOffset);
        }
        self.tree.get_mut(id)?.axial_offset = offset;
        self.tree
            .fire_component_change(id, ChangeEvent::BOTH, kernel)
    }

    /// Switch the axial method, converting the offset so the physical
    /// placement does not move. Fires no event.
    pub fn set_axial_method(
        &mut self,
        id: ComponentId,
        method: AxialMethod,
    ) -> Result<(), EngineError> {
        let mut visited = HashSet::new();
        self.set_axial_method_inner(id, method, &mut visited)
    }

    fn set_axial_method_inner(
        &mut self,
        id: ComponentId,
        method: AxialMethod,
        visited: &mut HashSet<ComponentId>,
    ) -> Result<(), EngineError> {
        if !visited.insert(id) {
            return Ok(());
        }
        for listener in self.tree.get(id)?.config_listeners.clone() {
            self.set_axial_method_inner(listener, method, visited)?;
        }
        let offset = self.tree.offset_for_method(id, method)?;
        let comp = self.tree.get_mut(id)?;
        comp.axial_method = method;
        comp.axial_offset = offset;
        self.tree.update(id)
    }

    // ── Symmetric diameters ────────────────────────────────────────────

    pub fn fore_diameter(&mut self, id: ComponentId) -> Result<f64, EngineError> {
        self.tree.fore_diameter(id)
    }

    pub fn aft_diameter(&mut self, id: ComponentId) -> Result<f64, EngineError> {
        self.tree.aft_diameter(id)
    }

    pub fn set_fore_radius(
        &mut self,
        id: ComponentId,
        radius: f64,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        let mut visited = HashSet::new();
        let event = self.set_radius_inner(id, radius, End::Fore, &mut visited)?;
        self.tree.fire_component_change(id, event, kernel)
    }

    pub fn set_aft_radius(
        &mut self,
        id: ComponentId,
        radius: f64,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        let mut visited = HashSet::new();
        let event = self.set_radius_inner(id, radius, End::Aft, &mut visited)?;
        self.tree.fire_component_change(id, event, kernel)
    }

    pub fn set_fore_diameter_automatic(
        &mut self,
        id: ComponentId,
        automatic: bool,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        let mut visited = HashSet::new();
        let event = self.set_automatic_inner(id, automatic, End::Fore, &mut visited)?;
        self.tree.fire_component_change(id, event, kernel)
    }

    pub fn set_aft_diameter_automatic(
        &mut self,
        id: ComponentId,
        automatic: bool,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        let mut visited = HashSet::new();
        let event = self.set_automatic_inner(id, automatic, End::Aft, &mut visited)?;
        self.tree.fire_component_change(id, event, kernel)
    }

    /// Propagate to listeners first, then apply locally. Returns NONE
    /// for a true no-op so no recompute pass runs.
    fn set_radius_inner(
        &mut self,
        id: ComponentId,
        radius: f64,
        end: End,
        visited: &mut HashSet<ComponentId>,
    ) -> Result<ChangeEvent, EngineError> {
        if !visited.insert(id) {
            return Ok(ChangeEvent::NONE);
        }
        let mut event = ChangeEvent::NONE;
        for listener in self.tree.get(id)?.config_listeners.clone() {
            event |= self.set_radius_inner(listener, radius, end, visited)?;
        }

        let new = 2.0 * radius.max(0.0);
        let comp = self.tree.get_mut(id)?;
        match (&mut comp.data, end) {
            (ComponentData::Transition(d), End::Fore) => {
                if d.fore_diameter == Diameter::Manual(new) {
                    return Ok(event);
                }
                d.fore_diameter = Diameter::Manual(new);
                clamp_wall(&mut d.thickness, new / 2.0, d.aft_diameter.current() / 2.0);
            }
            (ComponentData::Transition(d), End::Aft) => {
                if d.aft_diameter == Diameter::Manual(new) {
                    return Ok(event);
                }
                d.aft_diameter = Diameter::Manual(new);
                clamp_wall(&mut d.thickness, d.fore_diameter.current() / 2.0, new / 2.0);
            }
            (ComponentData::NoseCone(d), End::Aft) => {
                if d.diameter == Diameter::Manual(new) {
                    return Ok(event);
                }
                d.diameter = Diameter::Manual(new);
                if d.thickness > new / 2.0 {
                    d.thickness = new / 2.0;
                }
            }
            (ComponentData::BodyTube(d), _) => {
                if d.outer_diameter == Diameter::Manual(new) {
                    return Ok(event);
                }
                d.outer_diameter = Diameter::Manual(new);
                if d.thickness > new / 2.0 {
                    d.thickness = new / 2.0;
                }
            }
            // Listeners of other kinds have no matching end; skip them.
            _ => return Ok(event),
        }
        Ok(event | ChangeEvent::BOTH)
    }

    fn set_automatic_inner(
        &mut self,
        id: ComponentId,
        automatic: bool,
        end: End,
        visited: &mut HashSet<ComponentId>,
    ) -> Result<ChangeEvent, EngineError> {
        if !visited.insert(id) {
            return Ok(ChangeEvent::NONE);
        }
        let mut event = ChangeEvent::NONE;
        for listener in self.tree.get(id)?.config_listeners.clone() {
            event |= self.set_automatic_inner(listener, automatic, end, visited)?;
        }

        let comp = self.tree.get_mut(id)?;
        let field = match (&mut comp.data, end) {
            (ComponentData::Transition(d), End::Fore) => &mut d.fore_diameter,
            (ComponentData::Transition(d), End::Aft) => &mut d.aft_diameter,
            (ComponentData::NoseCone(d), End::Aft) => &mut d.diameter,
            (ComponentData::BodyTube(d), _) => &mut d.outer_diameter,
            _ => return Ok(event),
        };
        if field.is_automatic() == automatic {
            return Ok(event);
        }
        *field = if automatic {
            Diameter::Automatic {
                cached: field.current(),
                dirty: true,
            }
        } else {
            Diameter::Manual(field.current())
        };
        Ok(event | ChangeEvent::BOTH)
    }

    // ── Other parameters ───────────────────────────────────────────────

    /// Set a component's characteristic length and recompute; stacked
    /// siblings shift accordingly.
    pub fn set_length(
        &mut self,
        id: ComponentId,
        length: f64,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        let comp = self.tree.get_mut(id)?;
        let changed = match &mut comp.data {
            ComponentData::NoseCone(d) => set_if_changed(&mut d.length, length),
            ComponentData::Transition(d) => set_if_changed(&mut d.length, length),
            ComponentData::BodyTube(d) => set_if_changed(&mut d.length, length),
            ComponentData::RailButton(d) => set_if_changed(&mut d.length, length),
            _ => false,
        };
        if changed {
            return self
                .tree
                .fire_component_change(id, ChangeEvent::BOTH, kernel);
        }
        Ok(())
    }

    /// Store a new rotation offset about the long axis and recompute.
    pub fn set_angle_offset(
        &mut self,
        id: ComponentId,
        degrees: f64,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        if !degrees.is_finite() {
            return Err(EngineError::NonFiniteOffset);
        }
        let comp = self.tree.get_mut(id)?;
        if set_if_changed(&mut comp.angle_offset, degrees) {
            return self
                .tree
                .fire_component_change(id, ChangeEvent::BOTH, kernel);
        }
        Ok(())
    }

    /// Set the wall thickness of a wall-bearing component.
    pub fn set_thickness(
        &mut self,
        id: ComponentId,
        thickness: f64,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        self.set_with_listeners(id, kernel, &|comp| match &mut comp.data {
            ComponentData::NoseCone(d) => set_if_changed(&mut d.thickness, thickness),
            ComponentData::Transition(d) => set_if_changed(&mut d.thickness, thickness),
            ComponentData::BodyTube(d) => set_if_changed(&mut d.thickness, thickness),
            _ => false,
        })
    }

    pub fn set_style(
        &mut self,
        id: ComponentId,
        style: ShapeStyle,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        self.set_with_listeners(id, kernel, &|comp| match &mut comp.data {
            ComponentData::NoseCone(d) if d.style != style => {
                d.style = style;
                true
            }
            ComponentData::Transition(d) if d.style != style => {
                d.style = style;
                true
            }
            _ => false,
        })
    }

    pub fn set_family(
        &mut self,
        id: ComponentId,
        family: ShapeFamily,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        self.set_with_listeners(id, kernel, &|comp| match &mut comp.data {
            ComponentData::NoseCone(d) if d.family != family => {
                d.family = family;
                true
            }
            ComponentData::Transition(d) if d.family != family => {
                d.family = family;
                true
            }
            _ => false,
        })
    }

    /// Set the family shape coefficient. Out-of-range values are stored
    /// as-is; the shape handler rejects them on the recompute pass.
    pub fn set_coefficient(
        &mut self,
        id: ComponentId,
        coefficient: f64,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        self.set_with_listeners(id, kernel, &|comp| match &mut comp.data {
            ComponentData::NoseCone(d) => set_if_changed(&mut d.coefficient, coefficient),
            ComponentData::Transition(d) => set_if_changed(&mut d.coefficient, coefficient),
            _ => false,
        })
    }

    pub fn set_clipped(
        &mut self,
        id: ComponentId,
        clipped: bool,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        self.set_with_listeners(id, kernel, &|comp| match &mut comp.data {
            ComponentData::Transition(d) if d.clipped != clipped => {
                d.clipped = clipped;
                true
            }
            _ => false,
        })
    }

    pub fn set_resolution(
        &mut self,
        id: ComponentId,
        resolution: usize,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        self.set_with_listeners(id, kernel, &|comp| match &mut comp.data {
            ComponentData::NoseCone(d) if d.resolution != resolution => {
                d.resolution = resolution;
                true
            }
            ComponentData::Transition(d) if d.resolution != resolution => {
                d.resolution = resolution;
                true
            }
            _ => false,
        })
    }

    /// Replace the fore shoulder; `None` removes it.
    pub fn set_fore_shoulder(
        &mut self,
        id: ComponentId,
        shoulder: Option<ShoulderData>,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        self.set_with_listeners(id, kernel, &|comp| match &mut comp.data {
            ComponentData::Transition(d) if d.fore_shoulder != shoulder => {
                d.fore_shoulder = shoulder;
                true
            }
            _ => false,
        })
    }

    /// Replace the aft shoulder; `None` removes it. Nose cones carry
    /// their single shoulder at the aft end.
    pub fn set_aft_shoulder(
        &mut self,
        id: ComponentId,
        shoulder: Option<ShoulderData>,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        self.set_with_listeners(id, kernel, &|comp| match &mut comp.data {
            ComponentData::NoseCone(d) if d.shoulder != shoulder => {
                d.shoulder = shoulder;
                true
            }
            ComponentData::Transition(d) if d.aft_shoulder != shoulder => {
                d.aft_shoulder = shoulder;
                true
            }
            _ => false,
        })
    }

    pub fn set_fore_cap(
        &mut self,
        id: ComponentId,
        cap: CapStyle,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        self.set_with_listeners(id, kernel, &|comp| match &mut comp.data {
            ComponentData::Transition(d) if d.fore_cap != cap => {
                d.fore_cap = cap;
                true
            }
            _ => false,
        })
    }

    /// Cap pattern for the aft opening; the nose cone's single cap sits
    /// at its aft end.
    pub fn set_aft_cap(
        &mut self,
        id: ComponentId,
        cap: CapStyle,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        self.set_with_listeners(id, kernel, &|comp| match &mut comp.data {
            ComponentData::NoseCone(d) if d.cap != cap => {
                d.cap = cap;
                true
            }
            ComponentData::Transition(d) if d.aft_cap != cap => {
                d.aft_cap = cap;
                true
            }
            _ => false,
        })
    }

    pub fn set_fore_cap_bar_width(
        &mut self,
        id: ComponentId,
        width: f64,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        self.set_with_listeners(id, kernel, &|comp| match &mut comp.data {
            ComponentData::Transition(d) => set_if_changed(&mut d.fore_cap_bar_width, width),
            _ => false,
        })
    }

    pub fn set_aft_cap_bar_width(
        &mut self,
        id: ComponentId,
        width: f64,
        kernel: &mut dyn GeometryKernel,
    ) -> Result<(), EngineError> {
        self.set_with_listeners(id, kernel, &|comp| match &mut comp.data {
            ComponentData::NoseCone(d) => set_if_changed(&mut d.cap_bar_width, width),
            ComponentData::Transition(d) => set_if_changed(&mut d.aft_cap_bar_width, width),
            _ => false,
        })
    }

    /// Mirror a payload mutation across config listeners, then apply it
    /// locally, and run one recompute pass when anything changed.
    fn set_with_listeners(
        &mut self,
        id: ComponentId,
        kernel: &mut dyn GeometryKernel,
        apply: &dyn Fn(&mut Component) -> bool,
    ) -> Result<(), EngineError> {
        let mut visited = HashSet::new();
        let event = self.apply_with_listeners(id, &mut visited, apply)?;
        self.tree.fire_component_change(id, event, kernel)
    }

    fn apply_with_listeners(
        &mut self,
        id: ComponentId,
        visited: &mut HashSet<ComponentId>,
        apply: &dyn Fn(&mut Component) -> bool,
    ) -> Result<ChangeEvent, EngineError> {
        if !visited.insert(id) {
            return Ok(ChangeEvent::NONE);
        }
        let mut event = ChangeEvent::NONE;
        for listener in self.tree.get(id)?.config_listeners.clone() {
            event |= self.apply_with_listeners(listener, visited, apply)?;
        }
        if apply(self.tree.get_mut(id)?) {
            event |= ChangeEvent::BOTH;
        }
        Ok(event)
    }

    // ── Config listeners ───────────────────────────────────────────────

    /// Register `listener` to receive mirrored configuration calls, in
    /// registration order. Duplicate registrations are ignored.
    pub fn register_config_listener(
        &mut self,
        id: ComponentId,
        listener: ComponentId,
    ) -> Result<(), EngineError> {
        self.tree.get(listener)?;
        let listeners = &mut self.tree.get_mut(id)?.config_listeners;
        if !listeners.contains(&listener) {
            listeners.push(listener);
        }
        Ok(())
    }

    pub fn unregister_config_listener(
        &mut self,
        id: ComponentId,
        listener: ComponentId,
    ) -> Result<(), EngineError> {
        self.tree
            .get_mut(id)?
            .config_listeners
            .retain(|&l| l != listener);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Fore,
    Aft,
}

fn set_if_changed(slot: &mut f64, value: f64) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Transition wall clamp: when the thickness exceeds both end radii it
/// is pulled down to the smaller one; otherwise it is left alone.
fn clamp_wall(thickness: &mut f64, fore_radius: f64, aft_radius: f64) {
    if *thickness > fore_radius && *thickness > aft_radius {
        *thickness = fore_radius.min(aft_radius);
    }
}
