use serde::{Deserialize, Serialize};

/// Meridian curve family for noses and transitions.
///
/// `VonKarman` is the Haack series with coefficient fixed to 0, and
/// `Parabola` is the power series with coefficient fixed to 0.5; the
/// handler factory applies those overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeFamily {
    Cone,
    Elliptical,
    Ogive,
    SecantOgive,
    BluntedOgive,
    VonKarman,
    Parabola,
    ParabolicSeries,
    PowerSeries,
    HaackSeries,
}

/// Wall construction style of a symmetric component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeStyle {
    /// Filled solid of revolution.
    Solid,
    /// Solid with a cylindrical core bore.
    SolidCore,
    /// Open shell of constant wall thickness.
    Hollow,
    /// Shell with the open end(s) closed by an inward cap.
    Capped,
}

impl ShapeStyle {
    /// Styles that carry a wall and therefore a thickness constraint.
    pub fn has_wall(self) -> bool {
        matches!(self, ShapeStyle::Hollow | ShapeStyle::Capped)
    }
}

/// Pattern of the inward cap for `ShapeStyle::Capped` ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CapStyle {
    Solid,
    Bar,
    Cross,
}

/// Rail button shape variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RailButtonKind {
    /// Cylindrical spool.
    Round,
    /// Teardrop cross-section for reduced drag.
    Airfoil,
}
