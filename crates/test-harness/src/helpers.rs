//! Helper functions: error type, component constructors, stock rockets.

use component_engine::{
    Component, ComponentId, Diameter, Engine, EngineError, NoseData, RailButtonData, ShoulderData,
    TransitionData, TubeData,
};
use geometry_kernel::MockKernel;
use rocket_types::{CapStyle, RailButtonKind, ShapeFamily, ShapeStyle};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("component not found: {name}")]
    ComponentNotFound { name: String },

    #[error("no solid for component: {name}")]
    NoSolid { name: String },

    #[error("shape error on component {name}: {detail}")]
    ShapeError { name: String, detail: String },

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("duplicate name: {name}")]
    DuplicateName { name: String },

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("kernel error: {0}")]
    Kernel(#[from] geometry_kernel::KernelError),
}

// ── Component Constructors ──────────────────────────────────────────────────

/// An engine with one stage attached, plus the kernel to drive it.
pub fn rocket_with_stage() -> Result<(Engine, MockKernel, ComponentId), HarnessError> {
    let mut kernel = MockKernel::new();
    let mut engine = Engine::new("harness rocket");
    let root = engine.root();
    let stage = engine.add_child(root, Component::stage("stage"), &mut kernel)?;
    Ok((engine, kernel, stage))
}

/// Solid nose cone with everything else at stock values.
pub fn nose(family: ShapeFamily, length: f64, diameter: f64) -> Component {
    let radius = diameter / 2.0;
    // Ogive circle comfortably past the tangent radius for any aspect.
    let ogive_diameter = 3.0 * (radius * radius + length * length) / radius;
    Component::nose_cone(
        "nose",
        NoseData {
            family,
            style: ShapeStyle::Solid,
            length,
            diameter: Diameter::Manual(diameter),
            thickness: 0.0,
            coefficient: default_coefficient(family),
            ogive_diameter,
            blunted_diameter: diameter / 5.0,
            resolution: 32,
            shoulder: None,
            cap: CapStyle::Solid,
            cap_bar_width: 0.0,
        },
    )
}

/// Conical transition; pass `Diameter::automatic()` for matched ends.
pub fn transition(style: ShapeStyle, length: f64, fore: Diameter, aft: Diameter) -> Component {
    Component::transition(
        "transition",
        TransitionData {
            family: ShapeFamily::Cone,
            style,
            length,
            fore_diameter: fore,
            aft_diameter: aft,
            thickness: 2.0,
            core_diameter: 0.0,
            coefficient: 0.0,
            clipped: true,
            resolution: 32,
            fore_shoulder: None,
            aft_shoulder: None,
            fore_cap: CapStyle::Solid,
            aft_cap: CapStyle::Solid,
            fore_cap_bar_width: 0.0,
            aft_cap_bar_width: 0.0,
        },
    )
}

pub fn tube(length: f64, diameter: f64, thickness: f64) -> Component {
    Component::body_tube(
        "tube",
        TubeData {
            length,
            outer_diameter: Diameter::Manual(diameter),
            thickness,
        },
    )
}

pub fn rail_button(kind: RailButtonKind) -> Component {
    Component::rail_button(
        "button",
        RailButtonData {
            kind,
            outer_diameter: 9.0,
            inner_diameter: 6.0,
            top_thickness: 2.0,
            bottom_thickness: 2.0,
            thickness: 7.0,
            length: 20.0,
        },
    )
}

pub fn shoulder(length: f64, diameter: f64, thickness: f64) -> ShoulderData {
    ShoulderData {
        length,
        diameter: Diameter::Manual(diameter),
        thickness,
    }
}

/// Coefficient a family accepts, for families that use one.
pub fn default_coefficient(family: ShapeFamily) -> f64 {
    match family {
        ShapeFamily::PowerSeries => 0.5,
        ShapeFamily::ParabolicSeries => 1.0,
        ShapeFamily::HaackSeries => 1.0 / 3.0,
        _ => 0.0,
    }
}
