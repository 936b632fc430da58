//! Domain entities

mod fuel_station;
mod place;
mod route;

pub use fuel_station::{FUEL_STATION_FALLBACK_LABEL, FuelStation};
pub use place::Place;
pub use route::{Maneuver, ManeuverKind, Route, RouteLeg, RouteStep, sort_routes_by_duration};
