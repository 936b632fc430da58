//! Fuel station point of interest

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoLocation;

/// Label used when a station carries no name tag
pub const FUEL_STATION_FALLBACK_LABEL: &str = "Fuel Station";

/// A fuel station found near a route
///
/// Only meaningful for the route it was queried against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelStation {
    /// Position, if the map-data service supplied one
    pub location: Option<GeoLocation>,
    /// Value of the `name` tag
    pub name: Option<String>,
}

impl FuelStation {
    /// Name for display, falling back to a generic label
    #[must_use]
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(FUEL_STATION_FALLBACK_LABEL)
    }
}
