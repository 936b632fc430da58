//! Route entities returned by the routing service

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Polyline;

/// Kind of driving maneuver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ManeuverKind {
    /// Leaving the start of a leg
    Depart,
    /// Reaching the end of a leg
    Arrive,
    /// Road changes name, no turn
    NewName,
    /// Anything else (turn, merge, roundabout, ...), kept verbatim
    Other(String),
}

impl ManeuverKind {
    /// Parse the wire name, e.g. `"new name"`
    ///
    /// Matching ignores case and treats underscores as spaces.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.replace('_', " ").to_lowercase().as_str() {
            "depart" => Self::Depart,
            "arrive" => Self::Arrive,
            "new name" => Self::NewName,
            _ => Self::Other(raw.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Depart => "depart",
            Self::Arrive => "arrive",
            Self::NewName => "new name",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ManeuverKind {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<ManeuverKind> for String {
    fn from(kind: ManeuverKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ManeuverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maneuver metadata for one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maneuver {
    pub kind: ManeuverKind,
    /// Direction qualifier such as `"left"` or `"slight right"`
    pub modifier: Option<String>,
    /// Free-text instruction supplied by the service
    pub instruction: Option<String>,
}

impl Maneuver {
    #[must_use]
    pub const fn new(kind: ManeuverKind) -> Self {
        Self {
            kind,
            modifier: None,
            instruction: None,
        }
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = Some(modifier.into());
        self
    }

    #[must_use]
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }
}

/// A single maneuver within a leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    pub distance_m: f64,
    pub duration_s: f64,
    pub road_name: Option<String>,
    pub maneuver: Maneuver,
}

/// The portion of a route between two consecutive coordinates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub steps: Vec<RouteStep>,
}

/// One candidate path between the requested coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub geometry: Polyline,
    /// Total distance in meters
    pub distance_m: f64,
    /// Total duration in seconds, absent if the service omitted it
    pub duration_s: Option<f64>,
    pub legs: Vec<RouteLeg>,
}

impl Route {
    /// Distance in kilometers
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    /// Duration used for ordering; a missing duration sorts last
    #[must_use]
    pub fn sort_key(&self) -> f64 {
        self.duration_s.unwrap_or(f64::INFINITY)
    }
}

/// Stable ascending sort by duration
///
/// Routes with equal durations keep the order the service returned them in.
pub fn sort_routes_by_duration(routes: &mut [Route]) {
    routes.sort_by(|a, b| a.sort_key().total_cmp(&b.sort_key()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(tag: &str, duration: Option<f64>) -> Route {
        Route {
            geometry: Polyline::new(tag),
            distance_m: 1000.0,
            duration_s: duration,
            legs: Vec::new(),
        }
    }

    fn tags(routes: &[Route]) -> Vec<&str> {
        routes.iter().map(|r| r.geometry.as_str()).collect()
    }

    #[test]
    fn sorts_ascending_and_keeps_ties_in_order() {
        let mut routes = vec![
            route("a", Some(300.0)),
            route("b", Some(100.0)),
            route("c", Some(100.0)),
            route("d", Some(50.0)),
        ];
        sort_routes_by_duration(&mut routes);
        assert_eq!(tags(&routes), vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn missing_duration_sorts_last() {
        let mut routes = vec![route("x", None), route("y", Some(10.0))];
        sort_routes_by_duration(&mut routes);
        assert_eq!(tags(&routes), vec!["y", "x"]);
    }

    #[test]
    fn maneuver_kind_parses_wire_names() {
        assert_eq!(ManeuverKind::parse("depart"), ManeuverKind::Depart);
        assert_eq!(ManeuverKind::parse("arrive"), ManeuverKind::Arrive);
        assert_eq!(ManeuverKind::parse("new name"), ManeuverKind::NewName);
        assert_eq!(ManeuverKind::parse("new_name"), ManeuverKind::NewName);
        assert_eq!(ManeuverKind::parse("Depart"), ManeuverKind::Depart);
        assert_eq!(
            ManeuverKind::parse("end of road"),
            ManeuverKind::Other("end of road".to_string())
        );
    }

    #[test]
    fn maneuver_kind_serializes_as_wire_name() {
        let json = serde_json::to_string(&ManeuverKind::NewName).unwrap();
        assert_eq!(json, "\"new name\"");
        let back: ManeuverKind = serde_json::from_str("\"turn\"").unwrap();
        assert_eq!(back, ManeuverKind::Other("turn".to_string()));
    }

    #[test]
    fn distance_in_km() {
        assert!((route("a", None).distance_km() - 1.0).abs() < f64::EPSILON);
    }
}
