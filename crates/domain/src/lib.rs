//! Domain layer for TripDash
//!
//! Contains the trip-planning vocabulary: locations, places, routes,
//! fuel stations and the encoded polyline format shared by the routing
//! and map-data services. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
