use geometry_kernel::SolidHandle;
use rocket_types::{
    AxialMethod, CapStyle, ComponentKind, RailButtonKind, ShapeFamily, ShapeStyle,
};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use uuid::Uuid;

new_key_type! {
    /// Arena key for a component in the tree.
    pub struct ComponentId;
}

/// Radius snapped to zero below this, matching the position snap.
pub const EPSILON: f64 = 1e-6;

/// Fallback radius when an automatic diameter has no neighbor to match.
pub const DEFAULT_RADIUS: f64 = 12.5;

/// A diameter field that is either user-set or matched to the adjacent
/// component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum Diameter {
    Manual(f64),
    /// Matched to the neighbor; `cached` holds the last resolved value,
    /// re-resolved when `dirty`.
    Automatic { cached: f64, dirty: bool },
}

impl Diameter {
    pub fn automatic() -> Self {
        Diameter::Automatic {
            cached: 2.0 * DEFAULT_RADIUS,
            dirty: true,
        }
    }

    pub fn is_automatic(&self) -> bool {
        matches!(self, Diameter::Automatic { .. })
    }

    /// Manual value, or the cached automatic value as-is.
    pub fn current(&self) -> f64 {
        match *self {
            Diameter::Manual(v) => v,
            Diameter::Automatic { cached, .. } => cached,
        }
    }

    /// Mark an automatic value for re-resolution. No effect on manual
    /// values.
    pub fn mark_dirty(&mut self) {
        if let Diameter::Automatic { dirty, .. } = self {
            *dirty = true;
        }
    }
}

/// Shoulder on one end of a symmetric component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShoulderData {
    pub length: f64,
    pub diameter: Diameter,
    pub thickness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoseData {
    pub family: ShapeFamily,
    pub style: ShapeStyle,
    pub length: f64,
    /// Base (aft) diameter.
    pub diameter: Diameter,
    pub thickness: f64,
    pub coefficient: f64,
    pub ogive_diameter: f64,
    pub blunted_diameter: f64,
    pub resolution: usize,
    pub shoulder: Option<ShoulderData>,
    pub cap: CapStyle,
    /// Slab width of the bar and cross cap patterns.
    pub cap_bar_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionData {
    pub family: ShapeFamily,
    pub style: ShapeStyle,
    pub length: f64,
    pub fore_diameter: Diameter,
    pub aft_diameter: Diameter,
    pub thickness: f64,
    pub core_diameter: f64,
    pub coefficient: f64,
    pub clipped: bool,
    pub resolution: usize,
    pub fore_shoulder: Option<ShoulderData>,
    pub aft_shoulder: Option<ShoulderData>,
    pub fore_cap: CapStyle,
    pub aft_cap: CapStyle,
    pub fore_cap_bar_width: f64,
    pub aft_cap_bar_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TubeData {
    pub length: f64,
    pub outer_diameter: Diameter,
    pub thickness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailButtonData {
    pub kind: RailButtonKind,
    pub outer_diameter: f64,
    pub inner_diameter: f64,
    pub top_thickness: f64,
    pub bottom_thickness: f64,
    pub thickness: f64,
    pub length: f64,
}

/// Kind-specific payload of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComponentData {
    Rocket,
    Stage,
    NoseCone(NoseData),
    Transition(TransitionData),
    BodyTube(TubeData),
    RailButton(RailButtonData),
}

impl ComponentData {
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentData::Rocket => ComponentKind::Rocket,
            ComponentData::Stage => ComponentKind::Stage,
            ComponentData::NoseCone(_) => ComponentKind::NoseCone,
            ComponentData::Transition(_) => ComponentKind::Transition,
            ComponentData::BodyTube(_) => ComponentKind::BodyTube,
            ComponentData::RailButton(_) => ComponentKind::RailButton,
        }
    }
}

/// A node in the rocket component tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    /// Stable identity, preserved across arena rebuilds and saves.
    pub uuid: Uuid,
    /// User-visible name.
    pub name: String,
    pub parent: Option<ComponentId>,
    /// Insertion order. Axial order for most parents; a stage stores its
    /// children aft-to-fore, see `ComponentTree::axial_children`.
    pub children: Vec<ComponentId>,
    pub axial_method: AxialMethod,
    pub axial_offset: f64,
    /// Rotation offset about the long axis, degrees.
    pub angle_offset: f64,
    /// Computed parent-relative axial position.
    pub position: f64,
    /// Computed rotation about the long axis, degrees.
    pub rotation: f64,
    pub data: ComponentData,
    /// Last successfully built solid. Retained when a later recompute
    /// fails validation or geometry.
    #[serde(skip)]
    pub geometry: Option<SolidHandle>,
    /// Diagnostic from the most recent failed recompute.
    pub shape_error: Option<String>,
    /// Components receiving mirrored configuration calls, in
    /// registration order.
    pub config_listeners: Vec<ComponentId>,
}

impl Component {
    fn new(name: impl Into<String>, data: ComponentData) -> Self {
        Component {
            uuid: Uuid::new_v4(),
            name: name.into(),
            parent: None,
            children: Vec::new(),
            axial_method: AxialMethod::AfterPrevious,
            axial_offset: 0.0,
            angle_offset: 0.0,
            position: 0.0,
            rotation: 0.0,
            data,
            geometry: None,
            shape_error: None,
            config_listeners: Vec::new(),
        }
    }

    pub fn rocket(name: impl Into<String>) -> Self {
        Component::new(name, ComponentData::Rocket)
    }

    pub fn stage(name: impl Into<String>) -> Self {
        Component::new(name, ComponentData::Stage)
    }

    pub fn nose_cone(name: impl Into<String>, data: NoseData) -> Self {
        Component::new(name, ComponentData::NoseCone(data))
    }

    pub fn transition(name: impl Into<String>, data: TransitionData) -> Self {
        Component::new(name, ComponentData::Transition(data))
    }

    pub fn body_tube(name: impl Into<String>, data: TubeData) -> Self {
        Component::new(name, ComponentData::BodyTube(data))
    }

    pub fn rail_button(name: impl Into<String>, data: RailButtonData) -> Self {
        Component::new(name, ComponentData::RailButton(data))
    }

    pub fn kind(&self) -> ComponentKind {
        self.data.kind()
    }

    /// Characteristic length along the rocket axis, used for positioning.
    /// Shoulders do not count; they telescope into the neighbor.
    pub fn length(&self) -> f64 {
        match &self.data {
            ComponentData::Rocket | ComponentData::Stage => 0.0,
            ComponentData::NoseCone(d) => d.length,
            ComponentData::Transition(d) => d.length,
            ComponentData::BodyTube(d) => d.length,
            ComponentData::RailButton(d) => match d.kind {
                RailButtonKind::Round => d.outer_diameter,
                RailButtonKind::Airfoil => d.length,
            },
        }
    }
}

/// Engine errors. Validation and geometry failures are recorded per
/// component instead; only structural problems surface here.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("component not found")]
    ComponentNotFound,

    #[error("inconsistent component structure: {detail}")]
    InconsistentStructure { detail: String },

    #[error("{parent:?} does not accept {child:?} children")]
    InvalidChild {
        parent: ComponentKind,
        child: ComponentKind,
    },

    #[error("component is already attached to a parent")]
    AlreadyAttached,

    #[error("adding the component would create a cycle")]
    CycleDetected,

    #[error("axial offset is not a finite number")]
    NonFiniteOffset,

    #[error("component has no symmetric diameter")]
    NotSymmetric,
}
