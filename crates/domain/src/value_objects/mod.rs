//! Value Objects - Immutable, identity-less domain primitives

mod address;
mod bounding_box;
mod coordinate;

pub use address::{Address, EmptyAddress};
pub use bounding_box::{BoundingBox, InvalidBoundingBox};
pub use coordinate::{Coordinate, InvalidCoordinate};
