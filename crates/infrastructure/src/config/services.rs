//! External service configuration.

use integration_osm::{NominatimConfig, OsrmConfig, OverpassConfig};
use serde::{Deserialize, Serialize};

/// Endpoints and limits for the OpenStreetMap services
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default)]
    pub nominatim: NominatimConfig,

    #[serde(default)]
    pub osrm: OsrmConfig,

    #[serde(default)]
    pub overpass: OverpassConfig,
}
