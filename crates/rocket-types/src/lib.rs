pub mod component;
pub mod events;
pub mod geom;
pub mod position;
pub mod shape;

pub use component::*;
pub use events::*;
pub use geom::*;
pub use position::*;
pub use shape::*;
