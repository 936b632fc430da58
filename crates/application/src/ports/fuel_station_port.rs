//! Fuel station lookup port
//!
//! Failures here never abort the dashboard, so the port keeps its own error
//! type that callers turn into notices.

use async_trait::async_trait;
use domain::{FuelStation, Polyline};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Errors from a fuel station lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FuelStationError {
    /// The route has no points to search around
    #[error("Route geometry is empty")]
    EmptyRoute,

    /// The map-data server is overloaded; retrying later may work
    #[error("Map server busy")]
    ServerBusy,

    /// Non-success HTTP status other than busy
    #[error("HTTP {status} {reason}")]
    Http {
        status: u16,
        reason: String,
        body: String,
    },

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Anything else (unparsable response, bad geometry)
    #[error("{0}")]
    Other(String),
}

/// Port for fuel station search along a route
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FuelStationPort: Send + Sync {
    /// Fuel stations within `radius_m` meters of the route geometry
    async fn fuel_stations_near(
        &self,
        geometry: &Polyline,
        radius_m: u32,
    ) -> Result<Vec<FuelStation>, FuelStationError>;
}
