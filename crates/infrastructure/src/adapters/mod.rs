//! Infrastructure adapters
//!
//! Adapters connect application ports to the OpenStreetMap clients.

mod fuel_station_adapter;
mod geocoding_adapter;
mod routing_adapter;

pub use fuel_station_adapter::FuelStationAdapter;
pub use geocoding_adapter::GeocodingAdapter;
pub use routing_adapter::RoutingAdapter;
