use geometry_kernel::KernelError;
use rocket_types::{CapStyle, RailButtonKind, ShapeFamily, ShapeStyle};
use serde::{Deserialize, Serialize};

/// Errors from shape validation and generation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ShapeError {
    /// Bad parameter combination, detected before any kernel call.
    #[error("invalid shape: {reason}")]
    Validation { reason: String },

    /// The geometry kernel rejected the profile (degenerate wire,
    /// self-intersection, zero-area face, failed revolve).
    #[error("shape generation failed: {0}")]
    Geometry(#[from] KernelError),
}

impl ShapeError {
    pub fn validation(reason: impl Into<String>) -> Self {
        ShapeError::Validation {
            reason: reason.into(),
        }
    }
}

/// Shoulder at one end of a symmetric component: a reduced-diameter
/// cylindrical extension for telescoping fits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShoulderParams {
    pub length: f64,
    pub radius: f64,
    pub thickness: f64,
}

/// Snapshot of a nose cone's numeric parameters.
///
/// Handlers copy the owning component's fields at construction time; the
/// live component may be mutated again before the solid finishes building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoseParams {
    pub family: ShapeFamily,
    pub style: ShapeStyle,
    pub length: f64,
    /// Base (aft) radius.
    pub radius: f64,
    pub thickness: f64,
    /// Family shape coefficient (meaning depends on the family).
    pub coefficient: f64,
    /// Ogive circle diameter for the secant ogive family.
    pub ogive_diameter: f64,
    /// Spherical tip cap diameter for the blunted ogive family.
    pub blunted_diameter: f64,
    pub resolution: usize,
    pub shoulder: Option<ShoulderParams>,
    pub cap: CapStyle,
    /// Slab width of the bar and cross cap patterns.
    pub cap_bar_width: f64,
}

/// Snapshot of a transition's numeric parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionParams {
    pub family: ShapeFamily,
    pub style: ShapeStyle,
    pub length: f64,
    pub fore_radius: f64,
    pub aft_radius: f64,
    pub thickness: f64,
    /// Core bore radius for `ShapeStyle::SolidCore`.
    pub core_radius: f64,
    pub coefficient: f64,
    /// Clipped: profile computed directly over the physical length.
    /// Unclipped: meridian continued to a virtual full-size apex.
    pub clipped: bool,
    pub resolution: usize,
    pub fore_shoulder: Option<ShoulderParams>,
    pub aft_shoulder: Option<ShoulderParams>,
    pub fore_cap: CapStyle,
    pub aft_cap: CapStyle,
    pub fore_cap_bar_width: f64,
    pub aft_cap_bar_width: f64,
}

/// Snapshot of a body tube's numeric parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TubeParams {
    pub length: f64,
    pub outer_radius: f64,
    pub thickness: f64,
}

/// Snapshot of a rail button's numeric parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RailButtonParams {
    pub kind: RailButtonKind,
    pub outer_diameter: f64,
    pub inner_diameter: f64,
    pub top_thickness: f64,
    pub bottom_thickness: f64,
    /// Total button height above the airframe surface.
    pub thickness: f64,
    /// Overall length for airfoil buttons.
    pub length: f64,
}

/// Validate the family coefficient, shared by nose and transition
/// handlers. Out-of-range coefficients are rejected, never clamped.
pub(crate) fn check_coefficient(family: ShapeFamily, coefficient: f64) -> Result<(), ShapeError> {
    match family {
        ShapeFamily::PowerSeries => {
            if coefficient <= 0.0 || coefficient > 1.0 {
                return Err(ShapeError::validation(format!(
                    "power series coefficient must be in (0, 1], got {coefficient}"
                )));
            }
        }
        ShapeFamily::ParabolicSeries => {
            if !(0.0..=1.0).contains(&coefficient) {
                return Err(ShapeError::validation(format!(
                    "parabolic series coefficient must be in [0, 1], got {coefficient}"
                )));
            }
        }
        ShapeFamily::HaackSeries => {
            if coefficient < 0.0 {
                return Err(ShapeError::validation(format!(
                    "Haack series coefficient must be >= 0, got {coefficient}"
                )));
            }
        }
        // VonKarman and Parabola carry fixed coefficients; the remaining
        // families ignore the coefficient entirely.
        _ => {}
    }
    Ok(())
}

/// Bar and cross caps span the opening they close; the slab must be
/// narrower than the opening or nothing of the cap pattern remains.
pub(crate) fn check_cap(
    end: &str,
    cap: CapStyle,
    bar_width: f64,
    opening_radius: f64,
) -> Result<(), ShapeError> {
    if cap == CapStyle::Solid {
        return Ok(());
    }
    if bar_width <= 0.0 {
        return Err(ShapeError::validation(format!(
            "{end} cap bar width must be > 0 for {cap:?} caps"
        )));
    }
    if bar_width >= 2.0 * opening_radius {
        return Err(ShapeError::validation(format!(
            "{end} cap bar width must be smaller than the opening it spans"
        )));
    }
    Ok(())
}

/// Shoulder feasibility at one end: length and radius positive, radius
/// within the body radius at the attach end, and for wall-bearing styles
/// a positive thickness smaller than the shoulder radius.
pub(crate) fn check_shoulder(
    end: &str,
    shoulder: &ShoulderParams,
    body_radius: f64,
    style: ShapeStyle,
) -> Result<(), ShapeError> {
    if shoulder.length <= 0.0 {
        return Err(ShapeError::validation(format!(
            "{end} shoulder length must be > 0"
        )));
    }
    if shoulder.radius <= 0.0 {
        return Err(ShapeError::validation(format!(
            "{end} shoulder radius must be > 0"
        )));
    }
    if shoulder.radius > body_radius {
        return Err(ShapeError::validation(format!(
            "{end} shoulder radius can not exceed the body radius at that end"
        )));
    }
    if style.has_wall() {
        if shoulder.thickness <= 0.0 {
            return Err(ShapeError::validation(format!(
                "{end} shoulder thickness must be > 0 for {style:?} shapes"
            )));
        }
        if shoulder.thickness >= shoulder.radius {
            return Err(ShapeError::validation(format!(
                "{end} shoulder thickness must be less than the shoulder radius"
            )));
        }
    }
    Ok(())
}
