use serde::{Deserialize, Serialize};

/// How a component's axial offset is interpreted.
///
/// `as_position`/`as_offset` convert between the stored offset and the
/// parent-relative axial position for the parent-referencing methods.
/// `Absolute` and `AfterPrevious` need tree context (the root frame or the
/// preceding sibling) and are resolved by the component engine; for those
/// the helpers are identity mappings on the engine-supplied reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AxialMethod {
    /// Offset measured from the tree root's origin.
    Absolute,
    /// Offset measured from the end of the preceding sibling.
    AfterPrevious,
    /// Offset measured from the parent's fore end.
    TopOfParent,
    /// Offset measured from the parent's midpoint.
    Centered,
    /// Offset measured from the parent's aft end.
    BottomOfParent,
}

impl AxialMethod {
    /// Parent-relative position for a stored offset.
    pub fn as_position(self, offset: f64, length: f64, parent_length: f64) -> f64 {
        match self {
            AxialMethod::Absolute | AxialMethod::AfterPrevious => offset,
            AxialMethod::TopOfParent => offset,
            AxialMethod::Centered => offset + (parent_length - length) / 2.0,
            AxialMethod::BottomOfParent => offset + (parent_length - length),
        }
    }

    /// Stored offset that reproduces a parent-relative position.
    pub fn as_offset(self, position: f64, length: f64, parent_length: f64) -> f64 {
        match self {
            AxialMethod::Absolute | AxialMethod::AfterPrevious => position,
            AxialMethod::TopOfParent => position,
            AxialMethod::Centered => position - (parent_length - length) / 2.0,
            AxialMethod::BottomOfParent => position - (parent_length - length),
        }
    }
}
