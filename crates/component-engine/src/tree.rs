//! Component tree storage and structural mutation.
//!
//! The arena owns every component; parent/child links are arena keys.
//! Structural invariants are re-checked after every mutation and a
//! violation is fatal, never silently repaired.

use rocket_types::{ChangeEvent, ComponentKind};
use slotmap::SlotMap;
use tracing::debug;

use crate::types::{Component, ComponentId, EngineError};

#[derive(Debug, Clone)]
pub struct ComponentTree {
    pub arena: SlotMap<ComponentId, Component>,
    pub root: ComponentId,
    /// Tracked stages, in registration order.
    pub stages: Vec<ComponentId>,
}

impl ComponentTree {
    /// New tree with a `Rocket` root.
    pub fn new(root_name: impl Into<String>) -> Self {
        let mut arena = SlotMap::with_key();
        let root = arena.insert(Component::rocket(root_name));
        ComponentTree {
            arena,
            root,
            stages: Vec::new(),
        }
    }

    pub fn get(&self, id: ComponentId) -> Result<&Component, EngineError> {
        self.arena.get(id).ok_or(EngineError::ComponentNotFound)
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Result<&mut Component, EngineError> {
        self.arena.get_mut(id).ok_or(EngineError::ComponentNotFound)
    }

    /// Children in axial (fore to aft) order. A stage stores its
    /// children aft-to-fore, so they come back reversed.
    pub fn axial_children(&self, id: ComponentId) -> Vec<ComponentId> {
        let Some(comp) = self.arena.get(id) else {
            return Vec::new();
        };
        let mut children = comp.children.clone();
        if comp.kind() == ComponentKind::Stage {
            children.reverse();
        }
        children
    }

    /// Depth-first flattening in axial order, root excluded.
    pub fn flatten(&self) -> Vec<ComponentId> {
        let mut out = Vec::new();
        self.flatten_into(self.root, &mut out);
        out
    }

    fn flatten_into(&self, id: ComponentId, out: &mut Vec<ComponentId>) {
        for child in self.axial_children(id) {
            out.push(child);
            self.flatten_into(child, out);
        }
    }

    pub fn is_ancestor(&self, candidate: ComponentId, of: ComponentId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.arena.get(id).and_then(|c| c.parent);
        }
        false
    }

    /// Attach an already-inserted, parentless component at the end of
    /// `parent`'s child list.
    pub fn add_child(
        &mut self,
        parent: ComponentId,
        child: ComponentId,
    ) -> Result<(), EngineError> {
        let index = self.get(parent)?.children.len();
        self.add_child_at(parent, child, index)
    }

    pub fn add_child_at(
        &mut self,
        parent: ComponentId,
        child: ComponentId,
        index: usize,
    ) -> Result<(), EngineError> {
        let parent_kind = self.get(parent)?.kind();
        let child_comp = self.get(child)?;
        let child_kind = child_comp.kind();

        if child_comp.parent.is_some() {
            return Err(EngineError::AlreadyAttached);
        }
        if self.is_ancestor(child, parent) {
            return Err(EngineError::CycleDetected);
        }
        if !parent_kind.accepts_child(child_kind) {
            return Err(EngineError::InvalidChild {
                parent: parent_kind,
                child: child_kind,
            });
        }

        let siblings = &mut self.get_mut(parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.get_mut(child)?.parent = Some(parent);

        if child_kind == ComponentKind::Stage {
            self.track_stage(child);
        }

        self.check_structure(parent)?;
        self.check_structure(child)?;
        debug!(?parent_kind, ?child_kind, index, "child attached");
        Ok(())
    }

    /// Detach a child from its parent. The component and its subtree
    /// stay in the arena, parentless.
    pub fn remove_child(&mut self, child: ComponentId) -> Result<ComponentId, EngineError> {
        let parent = self
            .get(child)?
            .parent
            .ok_or(EngineError::ComponentNotFound)?;

        let siblings = &mut self.get_mut(parent)?.children;
        siblings.retain(|&c| c != child);
        self.get_mut(child)?.parent = None;

        self.forget_stages(child);
        self.check_structure(parent)?;
        self.check_structure(child)?;
        debug!("child detached");
        Ok(parent)
    }

    /// Swap a child with its previous sibling.
    pub fn move_child_up(&mut self, child: ComponentId) -> Result<bool, EngineError> {
        self.move_child(child, -1)
    }

    /// Swap a child with its next sibling.
    pub fn move_child_down(&mut self, child: ComponentId) -> Result<bool, EngineError> {
        self.move_child(child, 1)
    }

    fn move_child(&mut self, child: ComponentId, delta: isize) -> Result<bool, EngineError> {
        let parent = self
            .get(child)?
            .parent
            .ok_or(EngineError::ComponentNotFound)?;
        let siblings = &mut self.get_mut(parent)?.children;
        let Some(index) = siblings.iter().position(|&c| c == child) else {
            return Err(EngineError::InconsistentStructure {
                detail: "child not in parent's child list".to_string(),
            });
        };
        let target = index as isize + delta;
        if target < 0 || target as usize >= siblings.len() {
            return Ok(false);
        }
        siblings.swap(index, target as usize);
        self.check_structure(parent)?;
        Ok(true)
    }

    /// Verify the parent/child links around `id`. Both directions must
    /// agree; a mismatch means the tree was corrupted by an earlier bug
    /// and the operation must abort.
    pub fn check_structure(&self, id: ComponentId) -> Result<(), EngineError> {
        let comp = self.get(id)?;
        if let Some(parent) = comp.parent {
            let parent_comp = self.get(parent)?;
            if !parent_comp.children.contains(&id) {
                return Err(EngineError::InconsistentStructure {
                    detail: format!(
                        "parent {:?} does not list {:?} as a child",
                        parent_comp.name, comp.name
                    ),
                });
            }
        }
        for &child in &comp.children {
            let child_comp = self.get(child)?;
            if child_comp.parent != Some(id) {
                return Err(EngineError::InconsistentStructure {
                    detail: format!(
                        "child {:?} does not record {:?} as its parent",
                        child_comp.name, comp.name
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn track_stage(&mut self, stage: ComponentId) {
        if !self.stages.contains(&stage) {
            self.stages.push(stage);
        }
    }

    /// Forget `id` and every stage below it from the registry.
    pub fn forget_stages(&mut self, id: ComponentId) {
        let mut subtree = vec![id];
        let mut i = 0;
        while i < subtree.len() {
            let current = subtree[i];
            if let Some(comp) = self.arena.get(current) {
                subtree.extend(comp.children.iter().copied());
            }
            i += 1;
        }
        self.stages.retain(|s| !subtree.contains(s));
    }

    /// Change event describing the addition or removal of `id`'s
    /// subtree: always a tree change, plus aero/mass contributions from
    /// the affected components.
    pub fn add_remove_event(&self, id: ComponentId) -> ChangeEvent {
        let mut event = ChangeEvent::TREE;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(comp) = self.arena.get(current) {
                if comp.kind().is_aerodynamic() {
                    event |= ChangeEvent::AERODYNAMIC;
                }
                if comp.kind().is_massive() {
                    event |= ChangeEvent::MASS;
                }
                stack.extend(comp.children.iter().copied());
            }
        }
        event
    }

    /// Absolute axial position: the sum of parent-relative placements up
    /// to the root.
    pub fn absolute_position(&self, id: ComponentId) -> f64 {
        let mut x = 0.0;
        let mut current = Some(id);
        while let Some(c) = current {
            if let Some(comp) = self.arena.get(c) {
                x += comp.position;
                current = comp.parent;
            } else {
                break;
            }
        }
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ComponentData, TubeData};
    use crate::Diameter;

    fn tube() -> Component {
        Component::body_tube(
            "tube",
            TubeData {
                length: 100.0,
                outer_diameter: Diameter::Manual(25.0),
                thickness: 1.0,
            },
        )
    }

    #[test]
    fn stage_children_come_back_reversed() {
        let mut tree = ComponentTree::new("r");
        let stage = tree.arena.insert(Component::stage("s"));
        tree.add_child(tree.root, stage).unwrap();
        let a = tree.arena.insert(tube());
        let b = tree.arena.insert(tube());
        tree.add_child(stage, a).unwrap();
        tree.add_child(stage, b).unwrap();
        assert_eq!(tree.axial_children(stage), vec![b, a]);
        assert_eq!(tree.flatten(), vec![stage, b, a]);
    }

    #[test]
    fn capability_table_enforced() {
        let mut tree = ComponentTree::new("r");
        let t = tree.arena.insert(tube());
        let err = tree.add_child(tree.root, t).unwrap_err();
        assert!(matches!(err, EngineError::InvalidChild { .. }));
    }

    #[test]
    fn double_attachment_rejected() {
        let mut tree = ComponentTree::new("r");
        let s1 = tree.arena.insert(Component::stage("s1"));
        let s2 = tree.arena.insert(Component::stage("s2"));
        tree.add_child(tree.root, s1).unwrap();
        tree.add_child(tree.root, s2).unwrap();
        let t = tree.arena.insert(tube());
        tree.add_child(s1, t).unwrap();
        let err = tree.add_child(s2, t).unwrap_err();
        assert!(matches!(err, EngineError::AlreadyAttached));
    }

    #[test]
    fn stage_registry_tracks_and_forgets() {
        let mut tree = ComponentTree::new("r");
        let stage = tree.arena.insert(Component::stage("s"));
        tree.add_child(tree.root, stage).unwrap();
        assert_eq!(tree.stages, vec![stage]);
        tree.remove_child(stage).unwrap();
        assert!(tree.stages.is_empty());
    }

    #[test]
    fn corrupted_links_are_fatal() {
        let mut tree = ComponentTree::new("r");
        let stage = tree.arena.insert(Component::stage("s"));
        tree.add_child(tree.root, stage).unwrap();
        // Corrupt the back-link directly.
        tree.arena[stage].parent = None;
        let err = tree.check_structure(tree.root).unwrap_err();
        assert!(matches!(err, EngineError::InconsistentStructure { .. }));
        assert!(matches!(tree.arena[stage].data, ComponentData::Stage));
    }

    #[test]
    fn reorder_within_siblings() {
        let mut tree = ComponentTree::new("r");
        let stage = tree.arena.insert(Component::stage("s"));
        tree.add_child(tree.root, stage).unwrap();
        let a = tree.arena.insert(tube());
        let b = tree.arena.insert(tube());
        tree.add_child(stage, a).unwrap();
        tree.add_child(stage, b).unwrap();
        assert!(tree.move_child_up(b).unwrap());
        assert_eq!(tree.arena[stage].children, vec![b, a]);
        assert!(!tree.move_child_up(b).unwrap());
    }
}
