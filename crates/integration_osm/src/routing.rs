//! OSRM routing client
//!
//! Requests driving routes with full geometry and turn-by-turn steps from the
//! [OSRM](https://project-osrm.org) HTTP route service.

use std::time::Duration;

use async_trait::async_trait;
use domain::{
    CoordinateSequence, Maneuver, ManeuverKind, Polyline, Route, RouteLeg, RouteStep,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::OsrmConfig;
use crate::error::RoutingError;

/// Trait for routing service clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Fetch candidate routes through the coordinates in order
    ///
    /// Routes are returned in service order; callers sort them.
    async fn fetch_routes(
        &self,
        coordinates: &CoordinateSequence,
        alternatives: bool,
    ) -> Result<Vec<Route>, RoutingError>;
}

/// Serialize coordinates into OSRM path syntax: `lon,lat;lon,lat;...`
#[must_use]
pub fn format_coordinate_path(coordinates: &CoordinateSequence) -> String {
    coordinates
        .points()
        .iter()
        .map(|p| format!("{},{}", p.longitude(), p.latitude()))
        .collect::<Vec<_>>()
        .join(";")
}

/// OSRM route service client
#[derive(Debug)]
pub struct OsrmRoutingClient {
    client: Client,
    config: OsrmConfig,
}

impl OsrmRoutingClient {
    /// Create a new OSRM client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &OsrmConfig) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Parse the raw OSRM JSON body into routes
    fn parse_routes_response(body: &str) -> Result<Vec<Route>, RoutingError> {
        let raw: RawRouteResponse =
            serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;

        if let Some(code) = raw.code.as_deref().filter(|c| *c != "Ok") {
            debug!(%code, message = ?raw.message, "OSRM returned non-Ok code");
        }

        Ok(raw
            .routes
            .unwrap_or_default()
            .into_iter()
            .map(Self::convert_route)
            .collect())
    }

    fn convert_route(raw: RawRoute) -> Route {
        Route {
            geometry: Polyline::new(raw.geometry),
            distance_m: raw.distance,
            duration_s: raw.duration,
            legs: raw
                .legs
                .into_iter()
                .map(|leg| RouteLeg {
                    steps: leg.steps.into_iter().map(Self::convert_step).collect(),
                })
                .collect(),
        }
    }

    fn convert_step(raw: RawStep) -> RouteStep {
        let mut maneuver = Maneuver::new(ManeuverKind::parse(&raw.maneuver.kind));
        maneuver.modifier = raw.maneuver.modifier.filter(|m| !m.is_empty());
        maneuver.instruction = raw.maneuver.instruction.filter(|i| !i.is_empty());

        RouteStep {
            distance_m: raw.distance,
            duration_s: raw.duration,
            road_name: raw.name.filter(|n| !n.is_empty()),
            maneuver,
        }
    }
}

#[async_trait]
impl RoutingClient for OsrmRoutingClient {
    #[instrument(skip(self, coordinates), fields(points = coordinates.len()))]
    async fn fetch_routes(
        &self,
        coordinates: &CoordinateSequence,
        alternatives: bool,
    ) -> Result<Vec<Route>, RoutingError> {
        let url = format!(
            "{}/route/v1/{}/{}",
            self.config.base_url,
            self.config.profile,
            format_coordinate_path(coordinates)
        );

        let params = [
            ("overview", "full"),
            ("steps", "true"),
            ("alternatives", if alternatives { "true" } else { "false" }),
        ];

        debug!(?url, alternatives, "Fetching routes");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RoutingError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    RoutingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::ParseError(e.to_string()))?;

        let routes = Self::parse_routes_response(&body)?;

        if routes.is_empty() {
            warn!("No routes in response");
            return Err(RoutingError::NoRoutesFound);
        }

        debug!(count = routes.len(), "Routes found");
        Ok(routes)
    }
}

// ============================================================================
// Raw OSRM wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawRouteResponse {
    code: Option<String>,
    message: Option<String>,
    routes: Option<Vec<RawRoute>>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    #[serde(default)]
    geometry: String,
    #[serde(default)]
    distance: f64,
    duration: Option<f64>,
    #[serde(default)]
    legs: Vec<RawLeg>,
}

#[derive(Debug, Deserialize)]
struct RawLeg {
    #[serde(default)]
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
    name: Option<String>,
    #[serde(default)]
    maneuver: RawManeuver,
}

#[derive(Debug, Deserialize)]
struct RawManeuver {
    #[serde(rename = "type", default = "unknown_maneuver")]
    kind: String,
    modifier: Option<String>,
    instruction: Option<String>,
}

fn unknown_maneuver() -> String {
    "unknown".to_string()
}

impl Default for RawManeuver {
    fn default() -> Self {
        Self {
            kind: unknown_maneuver(),
            modifier: None,
            instruction: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::GeoLocation;

    fn coords(points: &[(f64, f64)]) -> CoordinateSequence {
        CoordinateSequence::new(
            points
                .iter()
                .map(|&(lat, lon)| GeoLocation::new(lat, lon).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_coordinate_path_is_lon_lat_in_order() {
        let seq = coords(&[(35.6812, 139.7671), (35.6595, 139.7005)]);
        assert_eq!(
            format_coordinate_path(&seq),
            "139.7671,35.6812;139.7005,35.6595"
        );
    }

    #[test]
    fn test_parse_routes_response() {
        let json = r#"{
            "code": "Ok",
            "routes": [{
                "geometry": "_p~iF~ps|U_ulLnnqC",
                "distance": 5234.5,
                "duration": 812.3,
                "legs": [{
                    "steps": [
                        {
                            "distance": 120.0,
                            "duration": 30.0,
                            "name": "Marunouchi Naka-dori",
                            "maneuver": { "type": "depart", "modifier": "left" }
                        },
                        {
                            "distance": 0.0,
                            "duration": 0.0,
                            "name": "",
                            "maneuver": { "type": "arrive", "instruction": "" }
                        }
                    ]
                }]
            }]
        }"#;

        let routes = OsrmRoutingClient::parse_routes_response(json).unwrap();
        assert_eq!(routes.len(), 1);
        let route = &routes[0];
        assert_eq!(route.geometry.as_str(), "_p~iF~ps|U_ulLnnqC");
        assert_eq!(route.duration_s, Some(812.3));
        assert_eq!(route.legs[0].steps.len(), 2);

        let depart = &route.legs[0].steps[0];
        assert_eq!(depart.maneuver.kind, ManeuverKind::Depart);
        assert_eq!(depart.maneuver.modifier.as_deref(), Some("left"));
        assert_eq!(depart.road_name.as_deref(), Some("Marunouchi Naka-dori"));

        let arrive = &route.legs[0].steps[1];
        assert_eq!(arrive.road_name, None);
        assert_eq!(arrive.maneuver.instruction, None);
    }

    #[test]
    fn test_parse_missing_routes() {
        let json = r#"{"code": "NoRoute", "message": "Impossible route"}"#;
        let routes = OsrmRoutingClient::parse_routes_response(json).unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn test_parse_missing_duration() {
        let json = r#"{"routes": [{"geometry": "", "distance": 10.0, "legs": []}]}"#;
        let routes = OsrmRoutingClient::parse_routes_response(json).unwrap();
        assert_eq!(routes[0].duration_s, None);
    }

    #[test]
    fn test_parse_step_without_maneuver() {
        let json = r#"{"routes": [{"geometry": "", "legs": [{"steps": [{"name": "X"}]}]}]}"#;
        let routes = OsrmRoutingClient::parse_routes_response(json).unwrap();
        let step = &routes[0].legs[0].steps[0];
        assert_eq!(step.maneuver.kind, ManeuverKind::Other("unknown".to_string()));
        assert!(step.distance_m.abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = OsrmRoutingClient::parse_routes_response("not json").unwrap_err();
        assert!(matches!(err, RoutingError::ParseError(_)));
    }
}
