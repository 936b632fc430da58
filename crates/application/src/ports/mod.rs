//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod fuel_station_port;
mod geocoding_port;
mod routing_port;

#[cfg(test)]
pub use fuel_station_port::MockFuelStationPort;
pub use fuel_station_port::{FuelStationError, FuelStationPort};
#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::GeocodingPort;
#[cfg(test)]
pub use routing_port::MockRoutingPort;
pub use routing_port::RoutingPort;
