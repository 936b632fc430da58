//! Value Objects - Immutable, identity-less domain primitives

mod coordinate_sequence;
mod geo_location;
mod polyline;

pub use coordinate_sequence::CoordinateSequence;
pub use geo_location::{GeoLocation, InvalidCoordinates};
pub use polyline::Polyline;
