//! Automatic diameter negotiation between adjacent symmetric components.
//!
//! An automatic diameter asks its one-hop neighbor for that neighbor's
//! matching end diameter. A neighbor whose own end is automatic has no
//! opinion; the chain never recurses further, falling back to the
//! default instead. Resolved values are cached until the next change
//! event re-dirties them.

use rocket_types::ComponentKind;
use tracing::debug;

use crate::tree::ComponentTree;
use crate::types::{ComponentData, ComponentId, Diameter, EngineError, DEFAULT_RADIUS};

/// Fallback when no neighbor expresses an opinion.
fn default_diameter() -> f64 {
    2.0 * DEFAULT_RADIUS
}

fn opinion(field: &Diameter) -> Option<f64> {
    match *field {
        Diameter::Manual(v) => Some(v),
        Diameter::Automatic { .. } => None,
    }
}

/// Inner mating diameter for a shoulder telescoping into a component
/// with the given outer diameter and wall.
fn inner_of(outer: f64, thickness: f64, has_wall: bool) -> f64 {
    if has_wall {
        (outer - 2.0 * thickness).max(0.0)
    } else {
        outer
    }
}

impl ComponentTree {
    // ── Neighbor discovery ─────────────────────────────────────────────

    /// Nearest symmetric component before `id` in the flattened axial
    /// order of the whole rocket.
    pub fn previous_symmetric(&self, id: ComponentId) -> Option<ComponentId> {
        let order = self.symmetric_order();
        let index = order.iter().position(|&c| c == id)?;
        order[..index].last().copied()
    }

    /// Nearest symmetric component after `id`.
    pub fn next_symmetric(&self, id: ComponentId) -> Option<ComponentId> {
        let order = self.symmetric_order();
        let index = order.iter().position(|&c| c == id)?;
        order.get(index + 1).copied()
    }

    fn symmetric_order(&self) -> Vec<ComponentId> {
        self.flatten()
            .into_iter()
            .filter(|&c| {
                self.arena
                    .get(c)
                    .map_or(false, |comp| comp.kind().is_symmetric())
            })
            .collect()
    }

    // ── End-diameter opinions (never recurse) ──────────────────────────

    /// Diameter this component presents at its aft end, `None` when that
    /// end is itself automatic.
    pub fn rear_diameter_opinion(&self, id: ComponentId) -> Option<f64> {
        match &self.arena.get(id)?.data {
            ComponentData::NoseCone(d) => opinion(&d.diameter),
            ComponentData::Transition(d) => opinion(&d.aft_diameter),
            ComponentData::BodyTube(d) => opinion(&d.outer_diameter),
            _ => None,
        }
    }

    /// Diameter this component presents at its fore end.
    pub fn front_diameter_opinion(&self, id: ComponentId) -> Option<f64> {
        match &self.arena.get(id)?.data {
            // A nose cone's fore end is its tip.
            ComponentData::NoseCone(_) => None,
            ComponentData::Transition(d) => opinion(&d.fore_diameter),
            ComponentData::BodyTube(d) => opinion(&d.outer_diameter),
            _ => None,
        }
    }

    /// Inner diameter at the aft end, for shoulders telescoping in from
    /// behind.
    pub fn rear_inner_diameter_opinion(&self, id: ComponentId) -> Option<f64> {
        match &self.arena.get(id)?.data {
            ComponentData::NoseCone(d) => {
                opinion(&d.diameter).map(|v| inner_of(v, d.thickness, d.style.has_wall()))
            }
            ComponentData::Transition(d) => {
                opinion(&d.aft_diameter).map(|v| inner_of(v, d.thickness, d.style.has_wall()))
            }
            ComponentData::BodyTube(d) => {
                opinion(&d.outer_diameter).map(|v| inner_of(v, d.thickness, true))
            }
            _ => None,
        }
    }

    /// Inner diameter at the fore end, for shoulders telescoping in from
    /// the front.
    pub fn front_inner_diameter_opinion(&self, id: ComponentId) -> Option<f64> {
        match &self.arena.get(id)?.data {
            ComponentData::NoseCone(_) => None,
            ComponentData::Transition(d) => {
                opinion(&d.fore_diameter).map(|v| inner_of(v, d.thickness, d.style.has_wall()))
            }
            ComponentData::BodyTube(d) => {
                opinion(&d.outer_diameter).map(|v| inner_of(v, d.thickness, true))
            }
            _ => None,
        }
    }

    // ── Resolution ─────────────────────────────────────────────────────

    /// Resolved fore diameter. A nose cone's fore end is always 0.
    pub fn fore_diameter(&mut self, id: ComponentId) -> Result<f64, EngineError> {
        match self.get(id)?.kind() {
            ComponentKind::NoseCone => Ok(0.0),
            ComponentKind::Transition => {
                let resolved = self.neighbor_value(id, End::Fore);
                let ComponentData::Transition(d) = &mut self.get_mut(id)?.data else {
                    return Err(EngineError::NotSymmetric);
                };
                Ok(cache(&mut d.fore_diameter, resolved))
            }
            ComponentKind::BodyTube => self.tube_diameter(id),
            _ => Err(EngineError::NotSymmetric),
        }
    }

    /// Resolved aft diameter.
    pub fn aft_diameter(&mut self, id: ComponentId) -> Result<f64, EngineError> {
        match self.get(id)?.kind() {
            ComponentKind::NoseCone => {
                let resolved = self.neighbor_value(id, End::Aft);
                let ComponentData::NoseCone(d) = &mut self.get_mut(id)?.data else {
                    return Err(EngineError::NotSymmetric);
                };
                Ok(cache(&mut d.diameter, resolved))
            }
            ComponentKind::Transition => {
                let resolved = self.neighbor_value(id, End::Aft);
                let ComponentData::Transition(d) = &mut self.get_mut(id)?.data else {
                    return Err(EngineError::NotSymmetric);
                };
                Ok(cache(&mut d.aft_diameter, resolved))
            }
            ComponentKind::BodyTube => self.tube_diameter(id),
            _ => Err(EngineError::NotSymmetric),
        }
    }

    /// A body tube is cylindrical: one diameter for both ends. The
    /// automatic value prefers the fore neighbor, then the aft one.
    fn tube_diameter(&mut self, id: ComponentId) -> Result<f64, EngineError> {
        let resolved = self
            .previous_symmetric(id)
            .and_then(|n| self.rear_diameter_opinion(n))
            .or_else(|| {
                self.next_symmetric(id)
                    .and_then(|n| self.front_diameter_opinion(n))
            });
        let ComponentData::BodyTube(d) = &mut self.get_mut(id)?.data else {
            return Err(EngineError::NotSymmetric);
        };
        Ok(cache(&mut d.outer_diameter, resolved))
    }

    fn neighbor_value(&self, id: ComponentId, end: End) -> Option<f64> {
        match end {
            End::Fore => self
                .previous_symmetric(id)
                .and_then(|n| self.rear_diameter_opinion(n)),
            End::Aft => self
                .next_symmetric(id)
                .and_then(|n| self.front_diameter_opinion(n)),
        }
    }

    /// Resolved fore shoulder diameter, `None` when the component has no
    /// fore shoulder.
    pub fn fore_shoulder_diameter(&mut self, id: ComponentId) -> Result<Option<f64>, EngineError> {
        let resolved = self
            .previous_symmetric(id)
            .and_then(|n| self.rear_inner_diameter_opinion(n));
        let comp = self.get_mut(id)?;
        let shoulder = match &mut comp.data {
            ComponentData::Transition(d) => d.fore_shoulder.as_mut(),
            _ => None,
        };
        Ok(shoulder.map(|s| cache(&mut s.diameter, resolved)))
    }

    /// Resolved aft shoulder diameter.
    pub fn aft_shoulder_diameter(&mut self, id: ComponentId) -> Result<Option<f64>, EngineError> {
        let resolved = self
            .next_symmetric(id)
            .and_then(|n| self.front_inner_diameter_opinion(n));
        let comp = self.get_mut(id)?;
        let shoulder = match &mut comp.data {
            ComponentData::NoseCone(d) => d.shoulder.as_mut(),
            ComponentData::Transition(d) => d.aft_shoulder.as_mut(),
            _ => None,
        };
        Ok(shoulder.map(|s| cache(&mut s.diameter, resolved)))
    }

    /// Dirty every automatic diameter in the tree. Run at the root on
    /// each change event, before the recompute pass resolves them again.
    pub fn mark_diameters_dirty(&mut self) {
        for comp in self.arena.values_mut() {
            match &mut comp.data {
                ComponentData::NoseCone(d) => {
                    d.diameter.mark_dirty();
                    if let Some(s) = &mut d.shoulder {
                        s.diameter.mark_dirty();
                    }
                }
                ComponentData::Transition(d) => {
                    d.fore_diameter.mark_dirty();
                    d.aft_diameter.mark_dirty();
                    for s in [d.fore_shoulder.as_mut(), d.aft_shoulder.as_mut()]
                        .into_iter()
                        .flatten()
                    {
                        s.diameter.mark_dirty();
                    }
                }
                ComponentData::BodyTube(d) => d.outer_diameter.mark_dirty(),
                _ => {}
            }
        }
        debug!("automatic diameters marked dirty");
    }
}

enum End {
    Fore,
    Aft,
}

/// Return a manual or clean cached value as-is; re-resolve a dirty
/// automatic value from the neighbor opinion or the default.
fn cache(field: &mut Diameter, resolved: Option<f64>) -> f64 {
    match field {
        Diameter::Manual(v) => *v,
        Diameter::Automatic { cached, dirty } => {
            if *dirty {
                *cached = resolved.unwrap_or_else(default_diameter);
                *dirty = false;
            }
            *cached
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Component, NoseData, TransitionData, TubeData};
    use rocket_types::{CapStyle, ShapeFamily, ShapeStyle};

    fn tube(diameter: Diameter) -> Component {
        Component::body_tube(
            "tube",
            TubeData {
                length: 100.0,
                outer_diameter: diameter,
                thickness: 1.0,
            },
        )
    }

    fn transition(fore: Diameter, aft: Diameter) -> Component {
        Component::transition(
            "trans",
            TransitionData {
                family: ShapeFamily::Cone,
                style: ShapeStyle::Solid,
                length: 60.0,
                fore_diameter: fore,
                aft_diameter: aft,
                thickness: 2.0,
                core_diameter: 0.0,
                coefficient: 0.0,
                clipped: true,
                resolution: 40,
                fore_shoulder: None,
                aft_shoulder: None,
                fore_cap: CapStyle::Solid,
                aft_cap: CapStyle::Solid,
                fore_cap_bar_width: 0.0,
                aft_cap_bar_width: 0.0,
            },
        )
    }

    fn nose(diameter: Diameter) -> Component {
        Component::nose_cone(
            "nose",
            NoseData {
                family: ShapeFamily::Ogive,
                style: ShapeStyle::Solid,
                length: 100.0,
                diameter,
                thickness: 2.0,
                coefficient: 0.0,
                ogive_diameter: 0.0,
                blunted_diameter: 0.0,
                resolution: 40,
                shoulder: None,
                cap: CapStyle::Solid,
                cap_bar_width: 0.0,
            },
        )
    }

    /// Stage with nose, transition, tube stacked fore to aft.
    fn rig(
        nose_d: Diameter,
        fore: Diameter,
        aft: Diameter,
        tube_d: Diameter,
    ) -> (ComponentTree, ComponentId, ComponentId, ComponentId) {
        let mut tree = ComponentTree::new("r");
        let stage = tree.arena.insert(Component::stage("s"));
        tree.add_child(tree.root, stage).unwrap();
        let t = tree.arena.insert(tube(tube_d));
        let tr = tree.arena.insert(transition(fore, aft));
        let n = tree.arena.insert(nose(nose_d));
        // Aft first; stages store children in reverse axial order.
        tree.add_child(stage, t).unwrap();
        tree.add_child(stage, tr).unwrap();
        tree.add_child(stage, n).unwrap();
        (tree, n, tr, t)
    }

    #[test]
    fn automatic_fore_matches_the_previous_rear() {
        let (mut tree, _, tr, _) = rig(
            Diameter::Manual(40.0),
            Diameter::automatic(),
            Diameter::Manual(50.0),
            Diameter::Manual(50.0),
        );
        assert_eq!(tree.fore_diameter(tr).unwrap(), 40.0);
    }

    #[test]
    fn automatic_neighbor_has_no_opinion() {
        // The nose's own diameter is automatic: the transition falls
        // back to the default instead of recursing.
        let (mut tree, _, tr, _) = rig(
            Diameter::automatic(),
            Diameter::automatic(),
            Diameter::Manual(50.0),
            Diameter::Manual(50.0),
        );
        assert_eq!(tree.fore_diameter(tr).unwrap(), 2.0 * DEFAULT_RADIUS);
    }

    #[test]
    fn cache_survives_until_dirtied() {
        let (mut tree, n, tr, _) = rig(
            Diameter::Manual(40.0),
            Diameter::automatic(),
            Diameter::Manual(50.0),
            Diameter::Manual(50.0),
        );
        assert_eq!(tree.fore_diameter(tr).unwrap(), 40.0);

        // Change the neighbor without dirtying: the stale cache holds.
        if let ComponentData::NoseCone(d) = &mut tree.arena[n].data {
            d.diameter = Diameter::Manual(20.0);
        }
        assert_eq!(tree.fore_diameter(tr).unwrap(), 40.0);

        tree.mark_diameters_dirty();
        assert_eq!(tree.fore_diameter(tr).unwrap(), 20.0);
    }

    #[test]
    fn nose_aft_matches_the_next_front() {
        let (mut tree, n, _, _) = rig(
            Diameter::automatic(),
            Diameter::Manual(30.0),
            Diameter::Manual(50.0),
            Diameter::Manual(50.0),
        );
        assert_eq!(tree.aft_diameter(n).unwrap(), 30.0);
        assert_eq!(tree.fore_diameter(n).unwrap(), 0.0);
    }

    #[test]
    fn tube_prefers_the_fore_neighbor() {
        let (mut tree, _, _, t) = rig(
            Diameter::Manual(40.0),
            Diameter::Manual(30.0),
            Diameter::Manual(44.0),
            Diameter::automatic(),
        );
        assert_eq!(tree.aft_diameter(t).unwrap(), 44.0);
    }

    #[test]
    fn shoulder_matches_the_neighbor_inner_diameter() {
        let (mut tree, n, _, _) = rig(
            Diameter::Manual(40.0),
            Diameter::Manual(40.0),
            Diameter::Manual(50.0),
            Diameter::Manual(50.0),
        );
        if let ComponentData::NoseCone(d) = &mut tree.arena[n].data {
            d.shoulder = Some(crate::types::ShoulderData {
                length: 20.0,
                diameter: Diameter::automatic(),
                thickness: 2.0,
            });
        }
        // Next symmetric is the transition, solid style: inner == outer.
        assert_eq!(tree.aft_shoulder_diameter(n).unwrap(), Some(40.0));
    }
}
