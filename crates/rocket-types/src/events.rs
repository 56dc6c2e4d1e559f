use serde::{Deserialize, Serialize};

/// Combinable categories of a component change event.
///
/// Events bubble unconditionally to the tree root, which drives the
/// position update and geometry recompute pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent(u32);

impl ChangeEvent {
    pub const NONE: ChangeEvent = ChangeEvent(0);
    /// Components were added, removed or reordered.
    pub const TREE: ChangeEvent = ChangeEvent(1);
    /// A property affecting aerodynamics changed.
    pub const AERODYNAMIC: ChangeEvent = ChangeEvent(2);
    /// A property affecting mass changed.
    pub const MASS: ChangeEvent = ChangeEvent(4);
    /// Both aerodynamic and mass properties changed.
    pub const BOTH: ChangeEvent = ChangeEvent(2 | 4);

    pub fn contains(self, other: ChangeEvent) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_tree_change(self) -> bool {
        self.contains(ChangeEvent::TREE)
    }

    pub fn is_aerodynamic_change(self) -> bool {
        self.contains(ChangeEvent::AERODYNAMIC)
    }

    pub fn is_mass_change(self) -> bool {
        self.contains(ChangeEvent::MASS)
    }
}

impl std::ops::BitOr for ChangeEvent {
    type Output = ChangeEvent;

    fn bitor(self, rhs: ChangeEvent) -> ChangeEvent {
        ChangeEvent(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ChangeEvent {
    fn bitor_assign(&mut self, rhs: ChangeEvent) {
        self.0 |= rhs.0;
    }
}
