//! Profile generation and solid construction for airframe components.
//!
//! Each handler snapshots a component's numeric parameters, validates
//! them, assembles a closed outline in the x/r half-plane, and asks the
//! geometry kernel to revolve it into a solid. Handlers never borrow the
//! live component; the engine copies fields in before each recompute.

pub mod body_tube;
mod caps;
pub mod nose;
pub mod outline;
pub mod params;
pub mod profiles;
pub mod rail_button;
pub mod transition;

pub use body_tube::BodyTubeShapeHandler;
pub use nose::NoseShapeHandler;
pub use params::{
    NoseParams, RailButtonParams, ShapeError, ShoulderParams, TransitionParams, TubeParams,
};
pub use rocket_types::RailButtonKind;
pub use rail_button::RailButtonShapeHandler;
pub use transition::TransitionShapeHandler;

use geometry_kernel::{GeometryKernel, SolidHandle};

/// Parameter snapshot for any drawable component.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeParams {
    Nose(NoseParams),
    Transition(TransitionParams),
    BodyTube(TubeParams),
    RailButton(RailButtonParams),
}

/// A constructed handler, ready to validate and draw. Closed dispatch:
/// the set of drawable components is fixed at compile time.
pub enum ShapeHandler {
    Nose(NoseShapeHandler),
    Transition(TransitionShapeHandler),
    BodyTube(BodyTubeShapeHandler),
    RailButton(RailButtonShapeHandler),
}

/// Map a parameter snapshot to its handler.
pub fn handler_for(params: ShapeParams) -> ShapeHandler {
    match params {
        ShapeParams::Nose(p) => ShapeHandler::Nose(NoseShapeHandler::new(p)),
        ShapeParams::Transition(p) => ShapeHandler::Transition(TransitionShapeHandler::new(p)),
        ShapeParams::BodyTube(p) => ShapeHandler::BodyTube(BodyTubeShapeHandler::new(p)),
        ShapeParams::RailButton(p) => ShapeHandler::RailButton(RailButtonShapeHandler::new(p)),
    }
}

impl ShapeHandler {
    pub fn is_valid_shape(&self) -> Result<(), ShapeError> {
        match self {
            ShapeHandler::Nose(h) => h.is_valid_shape(),
            ShapeHandler::Transition(h) => h.is_valid_shape(),
            ShapeHandler::BodyTube(h) => h.is_valid_shape(),
            ShapeHandler::RailButton(h) => h.is_valid_shape(),
        }
    }

    pub fn draw(&self, kernel: &mut dyn GeometryKernel) -> Result<SolidHandle, ShapeError> {
        match self {
            ShapeHandler::Nose(h) => h.draw(kernel),
            ShapeHandler::Transition(h) => h.draw(kernel),
            ShapeHandler::BodyTube(h) => h.draw(kernel),
            ShapeHandler::RailButton(h) => h.draw(kernel),
        }
    }
}
