//! Map model for the dashboard
//!
//! Builds a renderer-agnostic description of the map: markers, route lines
//! and the viewport. The HTML layer hands it to Leaflet as JSON.

use domain::{FuelStation, GeoLocation, Place, Route};
use serde::Serialize;
use tracing::warn;

use super::itinerary::format_duration;
use crate::error::ApplicationError;

/// Line color for routes that are not selected
pub const ALTERNATIVE_ROUTE_COLOR: &str = "#888888";
/// Line weight for routes that are not selected
pub const ALTERNATIVE_ROUTE_WEIGHT: u32 = 5;
const ALTERNATIVE_ROUTE_OPACITY: f64 = 0.7;
const SELECTED_ROUTE_OPACITY: f64 = 0.9;

/// Configurable map styling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapStyle {
    /// Initial zoom level
    pub zoom_start: u8,
    /// Selected route line color
    pub route_color: String,
    /// Selected route line weight
    pub route_weight: u32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            zoom_start: 10,
            route_color: "blue".to_string(),
            route_weight: 6,
        }
    }
}

/// What a marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Start,
    End,
    Waypoint,
    FuelStation,
}

impl MarkerKind {
    /// Marker color
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Start => "green",
            Self::End => "red",
            Self::Waypoint => "blue",
            Self::FuelStation => "orange",
        }
    }

    /// Font Awesome icon name
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Start => "car",
            Self::End => "flag-checkered",
            Self::Waypoint => "map-marker",
            Self::FuelStation => "gas-pump",
        }
    }
}

/// A labeled point on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub kind: MarkerKind,
    pub position: GeoLocation,
    pub label: String,
    pub color: &'static str,
    pub icon: &'static str,
}

impl MapMarker {
    fn new(kind: MarkerKind, position: GeoLocation, label: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            label: label.into(),
            color: kind.color(),
            icon: kind.icon(),
        }
    }
}

/// A drawn route geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLine {
    /// Index into the route set
    pub route_index: usize,
    pub points: Vec<GeoLocation>,
    pub color: String,
    pub weight: u32,
    pub opacity: f64,
    pub label: String,
    pub selected: bool,
}

/// South-west and north-east corners of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapBounds {
    pub south_west: GeoLocation,
    pub north_east: GeoLocation,
}

impl MapBounds {
    /// Smallest box containing all points, `None` if there are none
    #[must_use]
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a GeoLocation>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self {
                    south_west: *p,
                    north_east: *p,
                },
                Some(b) => Self {
                    south_west: GeoLocation::new_unchecked(
                        b.south_west.latitude().min(p.latitude()),
                        b.south_west.longitude().min(p.longitude()),
                    ),
                    north_east: GeoLocation::new_unchecked(
                        b.north_east.latitude().max(p.latitude()),
                        b.north_east.longitude().max(p.longitude()),
                    ),
                },
            })
        })
    }
}

/// Everything needed to draw the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: GeoLocation,
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
    pub lines: Vec<RouteLine>,
    /// Viewport to fit; absent when no route geometry was drawn
    pub bounds: Option<MapBounds>,
}

/// Build the map for a trip
///
/// `places` are start, waypoints and end in order. Every route is drawn; the
/// one at `selected` is emphasized. Bounds cover route points only, never
/// markers. Routes whose geometry cannot be decoded are skipped.
///
/// # Errors
///
/// Returns a validation error when fewer than two places are given.
pub fn build_map_view(
    routes: &[Route],
    places: &[Place],
    selected: usize,
    fuel_stations: &[FuelStation],
    style: &MapStyle,
) -> Result<MapView, ApplicationError> {
    if places.len() < 2 {
        return Err(ApplicationError::validation(
            "A map needs a start and an end place",
        ));
    }
    let start = &places[0];
    let end = &places[places.len() - 1];

    let mut markers = vec![
        MapMarker::new(MarkerKind::Start, start.location, &start.name),
        MapMarker::new(MarkerKind::End, end.location, &end.name),
    ];
    markers.extend(
        places[1..places.len() - 1]
            .iter()
            .map(|p| MapMarker::new(MarkerKind::Waypoint, p.location, &p.name)),
    );

    let mut lines = Vec::with_capacity(routes.len());
    for (route_index, route) in routes.iter().enumerate() {
        let points = match route.geometry.decode() {
            Ok(points) => points,
            Err(e) => {
                warn!(route_index, error = %e, "Skipping route with undecodable geometry");
                continue;
            },
        };
        let duration = format_duration(route.duration_s);
        let line = if route_index == selected {
            RouteLine {
                route_index,
                points,
                color: style.route_color.clone(),
                weight: style.route_weight,
                opacity: SELECTED_ROUTE_OPACITY,
                label: format!("Selected Route: {duration}"),
                selected: true,
            }
        } else {
            RouteLine {
                route_index,
                points,
                color: ALTERNATIVE_ROUTE_COLOR.to_string(),
                weight: ALTERNATIVE_ROUTE_WEIGHT,
                opacity: ALTERNATIVE_ROUTE_OPACITY,
                label: format!("Alternative: {duration}"),
                selected: false,
            }
        };
        lines.push(line);
    }

    markers.extend(fuel_stations.iter().filter_map(|station| {
        station
            .location
            .map(|loc| MapMarker::new(MarkerKind::FuelStation, loc, station.label()))
    }));

    let bounds = MapBounds::enclosing(lines.iter().flat_map(|l| l.points.iter()));

    Ok(MapView {
        center: start.location.midpoint(&end.location),
        zoom: style.zoom_start,
        markers,
        lines,
        bounds,
    })
}

#[cfg(test)]
mod tests {
    use domain::Polyline;

    use super::*;

    fn loc(lat: f64, lon: f64) -> GeoLocation {
        GeoLocation::new(lat, lon).unwrap()
    }

    fn places() -> Vec<Place> {
        vec![
            Place::new("Tokyo Station", loc(35.6812, 139.7671)),
            Place::new("Roppongi Hills", loc(35.6604, 139.7292)),
            Place::new("Shibuya Crossing", loc(35.6595, 139.7005)),
        ]
    }

    fn route(points: &[GeoLocation], duration: f64) -> Route {
        Route {
            geometry: Polyline::encode(points).unwrap(),
            distance_m: 1000.0,
            duration_s: Some(duration),
            legs: Vec::new(),
        }
    }

    #[test]
    fn markers_in_order_with_styles() {
        let view = build_map_view(&[], &places(), 0, &[], &MapStyle::default()).unwrap();
        let kinds: Vec<MarkerKind> = view.markers.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![MarkerKind::Start, MarkerKind::End, MarkerKind::Waypoint]
        );
        assert_eq!(view.markers[0].label, "Tokyo Station");
        assert_eq!(view.markers[0].color, "green");
        assert_eq!(view.markers[0].icon, "car");
        assert_eq!(view.markers[1].label, "Shibuya Crossing");
        assert_eq!(view.markers[1].icon, "flag-checkered");
        assert_eq!(view.markers[2].label, "Roppongi Hills");
    }

    #[test]
    fn center_is_midpoint_of_start_and_end() {
        let view = build_map_view(&[], &places(), 0, &[], &MapStyle::default()).unwrap();
        assert!((view.center.latitude() - 35.67035).abs() < 1e-9);
        assert_eq!(view.zoom, 10);
    }

    #[test]
    fn no_routes_means_no_bounds() {
        let view = build_map_view(&[], &places(), 0, &[], &MapStyle::default()).unwrap();
        assert!(view.lines.is_empty());
        assert!(view.bounds.is_none());
    }

    #[test]
    fn selected_route_is_emphasized() {
        let style = MapStyle {
            zoom_start: 12,
            route_color: "purple".to_string(),
            route_weight: 8,
        };
        let routes = vec![
            route(&[loc(35.68, 139.76), loc(35.66, 139.70)], 900.0),
            route(&[loc(35.68, 139.76), loc(35.67, 139.72)], 1200.0),
        ];
        let view = build_map_view(&routes, &places(), 1, &[], &style).unwrap();

        assert!(!view.lines[0].selected);
        assert_eq!(view.lines[0].color, "#888888");
        assert_eq!(view.lines[0].weight, 5);
        assert_eq!(view.lines[0].label, "Alternative: 15m");

        assert!(view.lines[1].selected);
        assert_eq!(view.lines[1].color, "purple");
        assert_eq!(view.lines[1].weight, 8);
        assert_eq!(view.lines[1].label, "Selected Route: 20m");
    }

    #[test]
    fn bounds_cover_route_points_only() {
        let routes = vec![
            route(&[loc(35.0, 139.0), loc(35.5, 139.5)], 60.0),
            route(&[loc(34.5, 139.2), loc(35.2, 140.0)], 60.0),
        ];
        let view = build_map_view(&routes, &places(), 0, &[], &MapStyle::default()).unwrap();
        let bounds = view.bounds.unwrap();
        assert!((bounds.south_west.latitude() - 34.5).abs() < 1e-9);
        assert!((bounds.south_west.longitude() - 139.0).abs() < 1e-9);
        assert!((bounds.north_east.latitude() - 35.5).abs() < 1e-9);
        assert!((bounds.north_east.longitude() - 140.0).abs() < 1e-9);
    }

    #[test]
    fn fuel_stations_without_position_are_skipped() {
        let stations = vec![
            FuelStation {
                location: Some(loc(35.67, 139.72)),
                name: None,
            },
            FuelStation {
                location: None,
                name: Some("Ghost".to_string()),
            },
        ];
        let view = build_map_view(&[], &places(), 0, &stations, &MapStyle::default()).unwrap();
        let fuel: Vec<&MapMarker> = view
            .markers
            .iter()
            .filter(|m| m.kind == MarkerKind::FuelStation)
            .collect();
        assert_eq!(fuel.len(), 1);
        assert_eq!(fuel[0].label, "Fuel Station");
        assert_eq!(fuel[0].icon, "gas-pump");
    }

    #[test]
    fn undecodable_route_is_skipped() {
        let mut broken = route(&[loc(35.0, 139.0)], 60.0);
        broken.geometry = Polyline::new("_p~iF~ps|");
        let view = build_map_view(&[broken], &places(), 0, &[], &MapStyle::default()).unwrap();
        assert!(view.lines.is_empty());
        assert!(view.bounds.is_none());
    }

    #[test]
    fn single_place_is_rejected() {
        let one = vec![Place::new("Alone", loc(0.0, 0.0))];
        assert!(build_map_view(&[], &one, 0, &[], &MapStyle::default()).is_err());
    }
}
