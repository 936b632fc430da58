//! Trip service
//!
//! Wires the session actions to the geocoding, routing and fuel station
//! ports, and assembles the dashboard view for the current session.

use std::{fmt, sync::Arc};

use domain::{FuelStation, Place};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::{
    itinerary::{ItineraryRow, format_itinerary},
    map_view::{MapStyle, MapView, build_map_view},
    session::{Notice, TripPlan, TripSession, TripStop},
    trip_summary::{TripSummary, route_option_label, summarize_trip},
};
use crate::{
    error::ApplicationError,
    ports::{FuelStationError, FuelStationPort, GeocodingPort, RoutingPort},
};

/// Entry of the route selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteOption {
    pub index: usize,
    pub label: String,
    pub selected: bool,
}

/// Everything the dashboard shows for a session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    pub summary: Option<TripSummary>,
    /// Only populated when there is more than one route
    pub route_options: Vec<RouteOption>,
    pub map: Option<MapView>,
    pub itinerary: Vec<ItineraryRow>,
    /// Messages produced while building this view
    pub notices: Vec<Notice>,
}

/// Trip planning use cases
pub struct TripService {
    geocoder: Arc<dyn GeocodingPort>,
    router: Arc<dyn RoutingPort>,
    fuel_stations: Arc<dyn FuelStationPort>,
    map_style: MapStyle,
}

impl fmt::Debug for TripService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripService")
            .field("map_style", &self.map_style)
            .finish_non_exhaustive()
    }
}

impl TripService {
    /// Create a new trip service
    #[must_use]
    pub fn new(
        geocoder: Arc<dyn GeocodingPort>,
        router: Arc<dyn RoutingPort>,
        fuel_stations: Arc<dyn FuelStationPort>,
        map_style: MapStyle,
    ) -> Self {
        Self {
            geocoder,
            router,
            fuel_stations,
            map_style,
        }
    }

    #[must_use]
    pub const fn map_style(&self) -> &MapStyle {
        &self.map_style
    }

    /// Geocode the session's stops, fetch routes and store the new plan
    ///
    /// Geocoding runs one place at a time and stops at the first failure,
    /// leaving any previous plan in place. A routing failure clears the
    /// previous plan. On success the routes are stored fastest first with
    /// the first one selected. Returns the number of routes stored.
    ///
    /// # Errors
    ///
    /// `Validation` for incomplete input, `GeocodingFailed` naming the first
    /// place that could not be resolved, `NoRouteFound` when routing fails.
    #[instrument(skip(self, session), fields(mode = ?session.input_mode()))]
    pub async fn submit_trip(&self, session: &mut TripSession) -> Result<usize, ApplicationError> {
        let stops = session.trip_stops()?;

        let mut places = Vec::with_capacity(stops.len());
        for stop in stops {
            let place = match stop {
                TripStop::Resolved(place) => place,
                TripStop::Named(name) => match self.geocoder.geocode(&name).await {
                    Ok(location) => Place::new(name, location),
                    Err(e) => {
                        warn!(place = %name, error = %e, "Geocoding failed, trip cancelled");
                        return Err(ApplicationError::GeocodingFailed { place: name });
                    },
                },
            };
            debug!(place = %place.name, location = %place.location, "Resolved stop");
            places.push(place);
        }

        let coordinates = domain::CoordinateSequence::new(
            places.iter().map(|p| p.location).collect(),
        )?;

        let routes = match self
            .router
            .fetch_routes(&coordinates, session.options().show_alternatives)
            .await
        {
            Ok(routes) if !routes.is_empty() => routes,
            Ok(_) => {
                warn!("Routing returned no routes");
                session.clear_plan();
                return Err(ApplicationError::NoRouteFound);
            },
            Err(e) => {
                warn!(error = %e, "Routing failed");
                session.clear_plan();
                return Err(ApplicationError::NoRouteFound);
            },
        };

        let plan = TripPlan::new(places, routes)?;
        let count = plan.routes().len();
        session.replace_plan(plan);

        info!(routes = count, "Trip planned");
        Ok(count)
    }

    /// Build the dashboard for the session's current plan
    ///
    /// Looks up fuel stations for the selected route when the overlay is
    /// enabled; lookup failures become notices and never hide the rest.
    #[instrument(skip(self, session))]
    pub async fn dashboard(&self, session: &TripSession) -> Dashboard {
        let Some(plan) = session.plan() else {
            return Dashboard::default();
        };

        let options = session.options();
        let route = plan.selected_route();
        let mut notices = Vec::new();

        let stations = if options.show_fuel_stations {
            let (stations, notice) = self
                .fuel_overlay(route, options.fuel_radius_km, options.fuel_radius_m())
                .await;
            notices.push(notice);
            stations
        } else {
            Vec::new()
        };

        let map = match build_map_view(
            plan.routes(),
            plan.places(),
            plan.selected_index(),
            &stations,
            &self.map_style,
        ) {
            Ok(map) => Some(map),
            Err(e) => {
                warn!(error = %e, "Could not build map");
                notices.push(Notice::from_error(&e));
                None
            },
        };

        let route_options = if plan.routes().len() > 1 {
            plan.routes()
                .iter()
                .enumerate()
                .map(|(index, r)| RouteOption {
                    index,
                    label: route_option_label(index, r),
                    selected: index == plan.selected_index(),
                })
                .collect()
        } else {
            Vec::new()
        };

        Dashboard {
            summary: Some(summarize_trip(route, options.departure, &options.vehicle)),
            route_options,
            map,
            itinerary: format_itinerary(route),
            notices,
        }
    }

    async fn fuel_overlay(
        &self,
        route: &domain::Route,
        radius_km: u32,
        radius_m: u32,
    ) -> (Vec<FuelStation>, Notice) {
        match self
            .fuel_stations
            .fuel_stations_near(&route.geometry, radius_m)
            .await
        {
            Ok(stations) => {
                let notice = Notice::info(format!(
                    "Found {} fuel stations within {:.1}km of the route.",
                    stations.len(),
                    f64::from(radius_km)
                ));
                (stations, notice)
            },
            Err(e) => {
                warn!(error = %e, "Fuel station lookup failed");
                (Vec::new(), fuel_error_notice(&e))
            },
        }
    }
}

/// User-facing notice for a failed fuel station lookup
#[must_use]
pub fn fuel_error_notice(err: &FuelStationError) -> Notice {
    match err {
        FuelStationError::EmptyRoute => {
            Notice::warning("Route geometry is empty, cannot search for fuel stations.")
        },
        FuelStationError::ServerBusy => Notice::warning(
            "The map server is currently busy (Gateway Timeout). Please try again later.",
        ),
        FuelStationError::Http {
            status,
            reason,
            body,
        } => Notice::error(format!(
            "Could not fetch fuel stations: {reason} ({status})."
        ))
        .with_detail(body.clone()),
        FuelStationError::Network(msg) => Notice::warning(format!(
            "Could not fetch fuel stations due to a network issue: {msg}"
        )),
        FuelStationError::Other(msg) => {
            Notice::error(format!("Could not fetch fuel stations: {msg}"))
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use domain::{GeoLocation, Maneuver, ManeuverKind, Polyline, Route, RouteLeg, RouteStep};
    use mockall::predicate::{always, eq};

    use super::*;
    use crate::ports::{MockFuelStationPort, MockGeocodingPort, MockRoutingPort};
    use crate::services::session::{InputMode, NoticeLevel, SessionDefaults};

    fn departure() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn session() -> TripSession {
        TripSession::new(&SessionDefaults::default(), departure())
    }

    fn loc(lat: f64, lon: f64) -> GeoLocation {
        GeoLocation::new(lat, lon).unwrap()
    }

    fn route(duration: f64) -> Route {
        Route {
            geometry: Polyline::encode(&[loc(35.68, 139.76), loc(35.66, 139.70)]).unwrap(),
            distance_m: 7800.0,
            duration_s: Some(duration),
            legs: vec![RouteLeg {
                steps: vec![RouteStep {
                    distance_m: 7800.0,
                    duration_s: duration,
                    road_name: Some("Meiji-dori".to_string()),
                    maneuver: Maneuver::new(ManeuverKind::Depart),
                }],
            }],
        }
    }

    fn geocoder_ok() -> MockGeocodingPort {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_geocode()
            .returning(|_| Ok(GeoLocation::new_unchecked(35.68, 139.76)));
        geocoder
    }

    fn router_returning(durations: Vec<f64>) -> MockRoutingPort {
        let mut router = MockRoutingPort::new();
        router
            .expect_fetch_routes()
            .returning(move |_, _| Ok(durations.iter().map(|d| route(*d)).collect()));
        router
    }

    fn service(
        geocoder: MockGeocodingPort,
        router: MockRoutingPort,
        fuel: MockFuelStationPort,
    ) -> TripService {
        TripService::new(
            Arc::new(geocoder),
            Arc::new(router),
            Arc::new(fuel),
            MapStyle::default(),
        )
    }

    #[tokio::test]
    async fn submit_stores_sorted_routes_and_selects_first() {
        let svc = service(
            geocoder_ok(),
            router_returning(vec![300.0, 100.0, 100.0, 50.0]),
            MockFuelStationPort::new(),
        );
        let mut s = session();

        let count = svc.submit_trip(&mut s).await.unwrap();

        assert_eq!(count, 4);
        let plan = s.plan().unwrap();
        let durations: Vec<Option<f64>> = plan.routes().iter().map(|r| r.duration_s).collect();
        assert_eq!(
            durations,
            vec![Some(50.0), Some(100.0), Some(100.0), Some(300.0)]
        );
        assert_eq!(plan.selected_index(), 0);
        assert_eq!(plan.places()[0].name, "Tokyo Station");
    }

    #[tokio::test]
    async fn new_submission_resets_selection() {
        let svc = service(
            geocoder_ok(),
            router_returning(vec![100.0, 200.0]),
            MockFuelStationPort::new(),
        );
        let mut s = session();
        svc.submit_trip(&mut s).await.unwrap();
        s.select_route(1).unwrap();

        svc.submit_trip(&mut s).await.unwrap();
        assert_eq!(s.plan().unwrap().selected_index(), 0);
    }

    #[tokio::test]
    async fn alternatives_flag_is_forwarded() {
        let mut router = MockRoutingPort::new();
        router
            .expect_fetch_routes()
            .with(always(), eq(false))
            .times(1)
            .returning(|_, _| Ok(vec![route(60.0)]));
        let svc = service(geocoder_ok(), router, MockFuelStationPort::new());
        let mut s = session();
        s.set_show_alternatives(false);

        svc.submit_trip(&mut s).await.unwrap();
    }

    #[tokio::test]
    async fn geocoding_failure_stops_before_routing_and_keeps_plan() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_geocode()
            .with(eq("Tokyo Station"))
            .times(2)
            .returning(|_| Ok(GeoLocation::new_unchecked(35.68, 139.76)));
        geocoder
            .expect_geocode()
            .with(eq("Atlantis"))
            .times(1)
            .returning(|_| Err(ApplicationError::ExternalService("not found".to_string())));
        geocoder.expect_geocode().with(eq("Shibuya Crossing")).times(1).returning(|_| {
            Ok(GeoLocation::new_unchecked(35.66, 139.70))
        });

        let mut router = MockRoutingPort::new();
        router
            .expect_fetch_routes()
            .times(1)
            .returning(|_, _| Ok(vec![route(60.0)]));

        let svc = service(geocoder, router, MockFuelStationPort::new());
        let mut s = session();
        svc.submit_trip(&mut s).await.unwrap();
        let before = s.plan().cloned();

        s.open_waypoint_editor().unwrap();
        s.confirm_waypoint("Atlantis").unwrap();
        let err = svc.submit_trip(&mut s).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Could not find 'Atlantis'. Route calculation cancelled."
        );
        assert_eq!(s.plan().cloned(), before);
    }

    #[tokio::test]
    async fn routing_failure_clears_plan() {
        let mut router = MockRoutingPort::new();
        let mut calls = 0;
        router.expect_fetch_routes().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Ok(vec![route(60.0)])
            } else {
                Err(ApplicationError::ExternalService("HTTP 500".to_string()))
            }
        });
        let svc = service(geocoder_ok(), router, MockFuelStationPort::new());
        let mut s = session();
        svc.submit_trip(&mut s).await.unwrap();

        let err = svc.submit_trip(&mut s).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NoRouteFound));
        assert!(s.plan().is_none());
    }

    #[tokio::test]
    async fn blank_location_makes_no_calls() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder.expect_geocode().never();
        let mut router = MockRoutingPort::new();
        router.expect_fetch_routes().never();
        let svc = service(geocoder, router, MockFuelStationPort::new());

        let mut s = session();
        s.set_places("", "Shibuya Crossing");
        let err = svc.submit_trip(&mut s).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Please provide at least a start and end location."
        );
    }

    #[tokio::test]
    async fn coordinate_mode_skips_geocoding() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder.expect_geocode().never();
        let svc = service(
            geocoder,
            router_returning(vec![60.0]),
            MockFuelStationPort::new(),
        );
        let mut s = session();
        s.set_input_mode(InputMode::Coordinates);

        svc.submit_trip(&mut s).await.unwrap();
        let names: Vec<&str> = s
            .plan()
            .unwrap()
            .places()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Start", "End"]);
    }

    #[tokio::test]
    async fn dashboard_without_plan_is_empty() {
        let svc = service(
            MockGeocodingPort::new(),
            MockRoutingPort::new(),
            MockFuelStationPort::new(),
        );
        let dashboard = svc.dashboard(&session()).await;
        assert_eq!(dashboard, Dashboard::default());
    }

    #[tokio::test]
    async fn dashboard_for_plan() {
        let mut fuel = MockFuelStationPort::new();
        fuel.expect_fuel_stations_near().never();
        let svc = service(geocoder_ok(), router_returning(vec![1865.0, 900.0]), fuel);
        let mut s = session();
        svc.submit_trip(&mut s).await.unwrap();

        let dashboard = svc.dashboard(&s).await;

        let summary = dashboard.summary.unwrap();
        assert_eq!(summary.duration, "15m");
        assert_eq!(summary.distance, "7.80 km");
        assert_eq!(summary.eta, "Mar 14, 09:15");
        assert_eq!(dashboard.route_options.len(), 2);
        assert_eq!(dashboard.route_options[0].label, "Route 1: 15m (7.8 km)");
        assert!(dashboard.route_options[0].selected);
        assert_eq!(dashboard.itinerary.len(), 1);
        assert_eq!(dashboard.itinerary[0].instruction, "Depart on Meiji-dori");
        assert_eq!(dashboard.map.unwrap().lines.len(), 2);
        assert!(dashboard.notices.is_empty());
    }

    #[tokio::test]
    async fn single_route_has_no_selector() {
        let svc = service(
            geocoder_ok(),
            router_returning(vec![60.0]),
            MockFuelStationPort::new(),
        );
        let mut s = session();
        svc.submit_trip(&mut s).await.unwrap();
        assert!(svc.dashboard(&s).await.route_options.is_empty());
    }

    #[tokio::test]
    async fn dashboard_fuel_overlay_success() {
        let mut fuel = MockFuelStationPort::new();
        fuel.expect_fuel_stations_near()
            .with(always(), eq(5000))
            .times(1)
            .returning(|_, _| {
                Ok(vec![FuelStation {
                    location: Some(GeoLocation::new_unchecked(35.67, 139.72)),
                    name: Some("ENEOS".to_string()),
                }])
            });
        let svc = service(geocoder_ok(), router_returning(vec![60.0]), fuel);
        let mut s = session();
        s.set_show_fuel_stations(true);
        svc.submit_trip(&mut s).await.unwrap();

        let dashboard = svc.dashboard(&s).await;
        assert_eq!(
            dashboard.notices,
            vec![Notice::info(
                "Found 1 fuel stations within 5.0km of the route."
            )]
        );
        let map = dashboard.map.unwrap();
        assert!(map.markers.iter().any(|m| m.label == "ENEOS"));
    }

    #[tokio::test]
    async fn dashboard_fuel_failure_keeps_rest() {
        let mut fuel = MockFuelStationPort::new();
        fuel.expect_fuel_stations_near()
            .returning(|_, _| Err(FuelStationError::ServerBusy));
        let svc = service(geocoder_ok(), router_returning(vec![60.0]), fuel);
        let mut s = session();
        s.set_show_fuel_stations(true);
        svc.submit_trip(&mut s).await.unwrap();

        let dashboard = svc.dashboard(&s).await;
        assert_eq!(dashboard.notices.len(), 1);
        assert_eq!(dashboard.notices[0].level, NoticeLevel::Warning);
        assert!(dashboard.summary.is_some());
        assert!(dashboard.map.is_some());
        assert_eq!(dashboard.itinerary.len(), 1);
    }

    #[test]
    fn fuel_error_notices() {
        let notice = fuel_error_notice(&FuelStationError::Http {
            status: 429,
            reason: "Too Many Requests".to_string(),
            body: "slow down".to_string(),
        });
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(
            notice.message,
            "Could not fetch fuel stations: Too Many Requests (429)."
        );
        assert_eq!(notice.detail.as_deref(), Some("slow down"));

        let notice = fuel_error_notice(&FuelStationError::Network("connection reset".to_string()));
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(
            notice.message,
            "Could not fetch fuel stations due to a network issue: connection reset"
        );

        let notice = fuel_error_notice(&FuelStationError::EmptyRoute);
        assert_eq!(
            notice.message,
            "Route geometry is empty, cannot search for fuel stations."
        );
    }
}
