use serde::{Deserialize, Serialize};

/// Kind tag of a component in the rocket tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComponentKind {
    Rocket,
    Stage,
    NoseCone,
    Transition,
    BodyTube,
    RailButton,
}

impl ComponentKind {
    /// Whether a component of this kind accepts `child` as a direct child.
    pub fn accepts_child(self, child: ComponentKind) -> bool {
        match self {
            ComponentKind::Rocket => matches!(child, ComponentKind::Stage),
            ComponentKind::Stage => matches!(
                child,
                ComponentKind::NoseCone | ComponentKind::Transition | ComponentKind::BodyTube
            ),
            ComponentKind::NoseCone | ComponentKind::Transition | ComponentKind::BodyTube => {
                matches!(child, ComponentKind::RailButton)
            }
            ComponentKind::RailButton => false,
        }
    }

    /// Symmetric components participate in auto-diameter negotiation.
    pub fn is_symmetric(self) -> bool {
        matches!(
            self,
            ComponentKind::NoseCone | ComponentKind::Transition | ComponentKind::BodyTube
        )
    }

    pub fn is_aerodynamic(self) -> bool {
        matches!(
            self,
            ComponentKind::NoseCone
                | ComponentKind::Transition
                | ComponentKind::BodyTube
                | ComponentKind::RailButton
        )
    }

    pub fn is_massive(self) -> bool {
        !matches!(self, ComponentKind::Rocket | ComponentKind::Stage)
    }
}
