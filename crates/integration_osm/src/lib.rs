//! OpenStreetMap service integration for TripDash
//!
//! Talks to the three public services a trip needs:
//!
//! - [Nominatim](https://nominatim.openstreetmap.org) turns a place name into
//!   coordinates ([`NominatimGeocodingClient`]).
//! - [OSRM](https://project-osrm.org) computes driving routes, optionally with
//!   alternatives ([`OsrmRoutingClient`]).
//! - [Overpass](https://overpass-api.de) finds fuel stations around a route
//!   ([`OverpassClient`]).
//!
//! # Architecture
//!
//! Each service has a client trait ([`GeocodingClient`], [`RoutingClient`],
//! [`FuelStationClient`]) and a reqwest-backed implementation configured by a
//! serde-deserializable config struct. Raw wire formats stay private to this
//! crate; callers receive domain types.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_osm::{OsrmConfig, OsrmRoutingClient, RoutingClient};
//!
//! let client = OsrmRoutingClient::new(&OsrmConfig::default())?;
//! let routes = client.fetch_routes(&coordinates, true).await?;
//! ```

mod config;
mod error;
mod geocoding;
mod overpass;
mod routing;

pub use config::{NominatimConfig, OsrmConfig, OverpassConfig};
pub use error::{GeocodingError, OverpassError, RoutingError};
pub use geocoding::{GeocodingClient, NominatimGeocodingClient};
pub use overpass::{FuelStationClient, OverpassClient, build_fuel_query, sample_path};
pub use routing::{OsrmRoutingClient, RoutingClient, format_coordinate_path};

/// User-Agent sent to every service unless configured otherwise
pub const DEFAULT_USER_AGENT: &str = concat!("TripDash/", env!("CARGO_PKG_VERSION"));
