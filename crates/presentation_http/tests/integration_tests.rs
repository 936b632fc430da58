//! Integration tests for the dashboard routes
#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use application::{
    ApplicationError, FuelStationError, FuelStationPort, GeocodingPort, MapStyle, RoutingPort,
    SessionDefaults, TripService,
};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use domain::{
    CoordinateSequence, FuelStation, GeoLocation, Maneuver, ManeuverKind, Polyline, Route,
    RouteLeg, RouteStep,
};
use infrastructure::TemplateEngine;
use presentation_http::{routes::create_router, state::AppState};
use serde_json::Value;

/// Geocoder that knows every place except "Atlantis"
struct FakeGeocoder;

#[async_trait]
impl GeocodingPort for FakeGeocoder {
    async fn geocode(&self, place: &str) -> Result<GeoLocation, ApplicationError> {
        if place == "Atlantis" {
            return Err(ApplicationError::GeocodingFailed {
                place: place.to_string(),
            });
        }
        Ok(GeoLocation::new_unchecked(35.68, 139.76))
    }
}

/// Router returning a slow and a fast route, in that order
struct FakeRouter;

fn route(duration_s: f64) -> Route {
    Route {
        geometry: Polyline::encode(&[
            GeoLocation::new_unchecked(35.6812, 139.7671),
            GeoLocation::new_unchecked(35.6595, 139.7005),
        ])
        .unwrap(),
        distance_m: 7800.0,
        duration_s: Some(duration_s),
        legs: vec![RouteLeg {
            steps: vec![
                RouteStep {
                    distance_m: 7800.0,
                    duration_s,
                    road_name: Some("Meiji-dori".to_string()),
                    maneuver: Maneuver::new(ManeuverKind::Depart),
                },
                RouteStep {
                    distance_m: 0.0,
                    duration_s: 0.0,
                    road_name: None,
                    maneuver: Maneuver::new(ManeuverKind::Arrive),
                },
            ],
        }],
    }
}

#[async_trait]
impl RoutingPort for FakeRouter {
    async fn fetch_routes(
        &self,
        _coordinates: &CoordinateSequence,
        alternatives: bool,
    ) -> Result<Vec<Route>, ApplicationError> {
        if alternatives {
            Ok(vec![route(1200.0), route(900.0)])
        } else {
            Ok(vec![route(900.0)])
        }
    }
}

/// Overpass stand-in that is always busy
struct BusyFuelStations;

#[async_trait]
impl FuelStationPort for BusyFuelStations {
    async fn fuel_stations_near(
        &self,
        _geometry: &Polyline,
        _radius_m: u32,
    ) -> Result<Vec<FuelStation>, FuelStationError> {
        Err(FuelStationError::ServerBusy)
    }
}

fn create_test_server() -> TestServer {
    let trip_service = TripService::new(
        Arc::new(FakeGeocoder),
        Arc::new(FakeRouter),
        Arc::new(BusyFuelStations),
        MapStyle::default(),
    );
    let templates = TemplateEngine::new().expect("Failed to load templates");
    let state = AppState::new(
        trip_service,
        &SessionDefaults::default(),
        templates,
        Vec::new(),
    );
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

fn assert_redirect_home(response: &TestResponse) {
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");
}

async fn dashboard(server: &TestServer) -> String {
    let response = server.get("/").await;
    response.assert_status_ok();
    response.text()
}

fn trip_form(start: &str, end: &str) -> Vec<(&'static str, String)> {
    vec![
        ("start_place", start.to_string()),
        ("end_place", end.to_string()),
        ("show_alternatives", "on".to_string()),
        ("fuel_radius_km", "5".to_string()),
        ("departure_date", "2026-03-14".to_string()),
        ("departure_time", "08:00".to_string()),
        ("fuel_efficiency_km_l", "15".to_string()),
        ("fuel_price_per_l", "175".to_string()),
    ]
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn test_dashboard_renders_defaults() {
    let server = create_test_server();

    let response = server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Car Navigation"));
    assert!(html.contains(r#"value="Tokyo Station""#));
    assert!(html.contains(r#"value="Shibuya Crossing""#));
    assert!(html.contains("Add Destination"));
    assert!(!html.contains("Trip Summary"));
}

#[tokio::test]
async fn test_switch_to_coordinates() {
    let server = create_test_server();

    let response = server
        .post("/trip/mode")
        .form(&[("mode", "coordinates")])
        .await;
    assert_redirect_home(&response);

    let html = dashboard(&server).await;
    assert!(html.contains(r#"name="start_lat""#));
    assert!(!html.contains(r#"name="start_place""#));
    assert!(!html.contains("Add Destination"));
}

// ============================================================================
// Waypoints
// ============================================================================

#[tokio::test]
async fn test_add_and_remove_waypoint() {
    let server = create_test_server();

    assert_redirect_home(&server.post("/trip/waypoints/editor/open").await);
    let html = dashboard(&server).await;
    assert!(html.contains("New Destination"));

    let response = server
        .post("/trip/waypoints")
        .form(&[("name", "Tokyo Tower")])
        .await;
    assert_redirect_home(&response);

    let html = dashboard(&server).await;
    assert!(html.contains("1. Tokyo Tower"));
    assert!(!html.contains("New Destination"));

    assert_redirect_home(&server.post("/trip/waypoints/0/remove").await);
    let html = dashboard(&server).await;
    assert!(!html.contains("Tokyo Tower"));
}

#[tokio::test]
async fn test_blank_waypoint_keeps_editor_open() {
    let server = create_test_server();

    server.post("/trip/waypoints/editor/open").await;
    server.post("/trip/waypoints").form(&[("name", "   ")]).await;

    let html = dashboard(&server).await;
    assert!(html.contains("Please enter a destination."));
    assert!(html.contains("New Destination"));
}

#[tokio::test]
async fn test_notice_is_shown_once() {
    let server = create_test_server();

    server.post("/trip/waypoints/3/remove").await;

    assert!(dashboard(&server).await.contains("Waypoint 4 does not exist"));
    assert!(!dashboard(&server).await.contains("Waypoint 4 does not exist"));
}

// ============================================================================
// Trip requests
// ============================================================================

#[tokio::test]
async fn test_get_route_shows_summary_and_selector() {
    let server = create_test_server();

    let response = server
        .post("/trip/route")
        .form(&trip_form("Tokyo Station", "Shibuya Crossing"))
        .await;
    assert_redirect_home(&response);

    let html = dashboard(&server).await;
    assert!(html.contains("Trip Summary"));
    assert!(html.contains("15m"));
    assert!(html.contains("7.80 km"));
    assert!(html.contains("Mar 14, 08:15"));
    assert!(html.contains("0.52 L"));
    assert!(html.contains(r#"<option value="0" selected>Route 1: 15m (7.8 km)</option>"#));
    assert!(html.contains("Route 2: 20m (7.8 km)"));
    assert!(html.contains("Meiji-dori"));
    assert!(html.contains(r#"id="map""#));
}

#[tokio::test]
async fn test_single_route_has_no_selector() {
    let server = create_test_server();
    let form: Vec<_> = trip_form("Tokyo Station", "Shibuya Crossing")
        .into_iter()
        .filter(|(k, _)| *k != "show_alternatives")
        .collect();

    server.post("/trip/route").form(&form).await;

    let html = dashboard(&server).await;
    assert!(html.contains("Trip Summary"));
    assert!(!html.contains("Select a route"));
}

#[tokio::test]
async fn test_unknown_place_cancels_route() {
    let server = create_test_server();

    server
        .post("/trip/route")
        .form(&trip_form("Tokyo Station", "Atlantis"))
        .await;

    let html = dashboard(&server).await;
    assert!(html.contains("Could not find &#x27;Atlantis&#x27;. Route calculation cancelled."));
    assert!(!html.contains("Trip Summary"));
}

#[tokio::test]
async fn test_blank_location_is_rejected() {
    let server = create_test_server();

    server.post("/trip/route").form(&trip_form("", "Kamakura")).await;

    let html = dashboard(&server).await;
    assert!(html.contains("Please provide at least a start and end location."));
}

#[tokio::test]
async fn test_select_route() {
    let server = create_test_server();
    server
        .post("/trip/route")
        .form(&trip_form("Tokyo Station", "Shibuya Crossing"))
        .await;

    let response = server.post("/trip/select").form(&[("index", "1")]).await;
    assert_redirect_home(&response);

    let html = dashboard(&server).await;
    assert!(html.contains(r#"<option value="1" selected>Route 2: 20m (7.8 km)</option>"#));
    assert!(html.contains("Mar 14, 08:20"));
}

#[tokio::test]
async fn test_select_route_without_plan() {
    let server = create_test_server();

    server.post("/trip/select").form(&[("index", "0")]).await;

    assert!(dashboard(&server).await.contains("No route has been calculated yet."));
}

#[tokio::test]
async fn test_fuel_overlay_failure_keeps_route() {
    let server = create_test_server();
    let mut form = trip_form("Tokyo Station", "Shibuya Crossing");
    form.push(("show_fuel_stations", "on".to_string()));

    server.post("/trip/route").form(&form).await;

    let html = dashboard(&server).await;
    assert!(html.contains("Trip Summary"));
    assert!(html.contains(r#"class="notice warning""#));
}

// ============================================================================
// Options
// ============================================================================

#[tokio::test]
async fn test_apply_options_without_routing() {
    let server = create_test_server();
    let mut form = trip_form("Yokohama Station", "Kamakura");
    form.retain(|(k, _)| *k != "fuel_radius_km");
    form.push(("fuel_radius_km", "12".to_string()));

    let response = server.post("/trip/options").form(&form).await;
    assert_redirect_home(&response);

    let html = dashboard(&server).await;
    assert!(html.contains(r#"value="Yokohama Station""#));
    assert!(html.contains(r#"value="12""#));
    assert!(!html.contains("Trip Summary"));
}

#[tokio::test]
async fn test_out_of_range_radius_is_rejected() {
    let server = create_test_server();
    let mut form = trip_form("Yokohama Station", "Kamakura");
    form.retain(|(k, _)| *k != "fuel_radius_km");
    form.push(("fuel_radius_km", "40".to_string()));

    let response = server.post("/trip/options").form(&form).await;
    assert_redirect_home(&response);

    let html = dashboard(&server).await;
    assert!(html.contains("Fuel search radius must be between 1 and 25 km"));
    // rejected forms change nothing
    assert!(html.contains(r#"value="Tokyo Station""#));
}

#[tokio::test]
async fn test_malformed_departure_is_rejected() {
    let server = create_test_server();
    let mut form = trip_form("Tokyo Station", "Shibuya Crossing");
    form.retain(|(k, _)| *k != "departure_time");
    form.push(("departure_time", "quarter past".to_string()));

    server.post("/trip/route").form(&form).await;

    let html = dashboard(&server).await;
    assert!(html.contains("Invalid departure time"));
    assert!(!html.contains("Trip Summary"));
}

// ============================================================================
// Health and fallback
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_unknown_path_returns_404() {
    let server = create_test_server();

    let response = server.get("/nowhere").await;

    response.assert_status_not_found();
    let json: Value = response.json();
    assert_eq!(json["code"], "not_found");
}
