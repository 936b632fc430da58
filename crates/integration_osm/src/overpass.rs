//! Overpass fuel station client
//!
//! Finds `amenity=fuel` nodes, ways and relations within a radius of a
//! route using the [Overpass API](https://overpass-api.de).

use std::time::Duration;

use async_trait::async_trait;
use domain::{FuelStation, GeoLocation, Polyline};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::OverpassConfig;
use crate::error::OverpassError;

/// Trait for fuel station lookup clients
#[async_trait]
pub trait FuelStationClient: Send + Sync {
    /// Fuel stations within `radius_m` meters of the route geometry
    async fn fuel_stations_along(
        &self,
        geometry: &Polyline,
        radius_m: u32,
    ) -> Result<Vec<FuelStation>, OverpassError>;
}

/// Thin out a path by a fixed integer stride
///
/// Paths at or below `cap` points are returned unchanged. Longer paths keep
/// every `len / cap`-th point starting with the first. The stride is
/// truncated, so the result can exceed `cap` and the last point may be
/// skipped (120 points with a cap of 50 keep 60).
#[must_use]
pub fn sample_path(points: &[GeoLocation], cap: usize) -> Vec<GeoLocation> {
    if cap == 0 || points.len() <= cap {
        return points.to_vec();
    }
    let step = points.len() / cap;
    points.iter().step_by(step).copied().collect()
}

/// Build an Overpass QL query for fuel stations around the given points
#[must_use]
pub fn build_fuel_query(points: &[GeoLocation], radius_m: u32, timeout_secs: u64) -> String {
    let around = points
        .iter()
        .map(|p| format!("{}, {}", p.latitude(), p.longitude()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut query = format!("[out:json][timeout:{timeout_secs}];\n(\n");
    for kind in ["node", "way", "relation"] {
        query.push_str(&format!(
            "  {kind}[\"amenity\"=\"fuel\"](around:{radius_m}, {around});\n"
        ));
    }
    query.push_str(");\nout center;\n");
    query
}

/// Overpass interpreter client
#[derive(Debug)]
pub struct OverpassClient {
    client: Client,
    config: OverpassConfig,
}

impl OverpassClient {
    /// Create a new Overpass client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &OverpassConfig) -> Result<Self, OverpassError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| OverpassError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn parse_elements(body: &str) -> Result<Vec<FuelStation>, OverpassError> {
        let raw: RawOverpassResponse =
            serde_json::from_str(body).map_err(|e| OverpassError::ParseError(e.to_string()))?;

        Ok(raw.elements.into_iter().map(RawElement::into_station).collect())
    }
}

#[async_trait]
impl FuelStationClient for OverpassClient {
    #[instrument(skip(self, geometry))]
    async fn fuel_stations_along(
        &self,
        geometry: &Polyline,
        radius_m: u32,
    ) -> Result<Vec<FuelStation>, OverpassError> {
        let points = geometry
            .decode()
            .map_err(|e| OverpassError::InvalidGeometry(e.to_string()))?;
        if points.is_empty() {
            return Err(OverpassError::EmptyGeometry);
        }

        let sampled = sample_path(&points, self.config.max_query_points);
        debug!(
            decoded = points.len(),
            sampled = sampled.len(),
            "Querying fuel stations"
        );

        let query = build_fuel_query(&sampled, radius_m, self.config.query_timeout_secs);

        let response = self
            .client
            .post(&self.config.interpreter_url)
            .form(&[("data", query)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OverpassError::Timeout {
                        timeout_secs: self.config.request_timeout_secs,
                    }
                } else {
                    OverpassError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::GATEWAY_TIMEOUT {
            return Err(OverpassError::ServerBusy);
        }

        let body = response
            .text()
            .await
            .map_err(|e| OverpassError::ParseError(e.to_string()))?;

        if !status.is_success() {
            return Err(OverpassError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                body,
            });
        }

        let stations = Self::parse_elements(&body)?;
        debug!(count = stations.len(), "Fuel stations found");
        Ok(stations)
    }
}

// ============================================================================
// Raw Overpass wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawOverpassResponse {
    #[serde(default)]
    elements: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<RawCenter>,
    tags: Option<RawTags>,
}

#[derive(Debug, Deserialize)]
struct RawCenter {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct RawTags {
    name: Option<String>,
}

impl RawElement {
    /// Nodes carry `lat`/`lon`; ways and relations only `center` with `out center`
    fn into_station(self) -> FuelStation {
        let location = match (self.lat, self.lon, self.center) {
            (Some(lat), Some(lon), _) => GeoLocation::new(lat, lon).ok(),
            (_, _, Some(center)) => GeoLocation::new(center.lat, center.lon).ok(),
            _ => None,
        };

        FuelStation {
            location,
            name: self.tags.and_then(|t| t.name),
        }
    }
}
