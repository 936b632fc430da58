//! Trip session state
//!
//! The per-user context the dashboard keeps between interactions. All
//! mutation goes through methods that keep the invariants: the waypoint
//! editor only opens in place-name mode, options stay in range, and the
//! selected route index is always valid for the stored route set.

use chrono::NaiveDateTime;
use domain::{
    CoordinateSequence, DomainError, GeoLocation, Place, Route, sort_routes_by_duration,
};
use serde::{Deserialize, Serialize};

use super::trip_summary::VehicleProfile;
use crate::error::ApplicationError;

/// Smallest fuel search radius in kilometers
pub const MIN_FUEL_RADIUS_KM: u32 = 1;
/// Largest fuel search radius in kilometers
pub const MAX_FUEL_RADIUS_KM: u32 = 25;
/// Lowest accepted fuel efficiency in km/L
pub const MIN_FUEL_EFFICIENCY_KM_L: f64 = 1.0;

pub const MSG_MISSING_LOCATION: &str = "Please provide at least a start and end location.";
pub const MSG_EMPTY_WAYPOINT: &str = "Please enter a destination.";

/// How the trip endpoints are entered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Free-text names, geocoded on submit; waypoints allowed
    #[default]
    PlaceName,
    /// Raw latitude/longitude for start and end only
    Coordinates,
}

/// State of the "add destination" control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointEditor {
    #[default]
    Idle,
    AddingDestination,
}

/// Start and end entered as raw coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateInput {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
}

/// Initial values for a new session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDefaults {
    pub start_place: String,
    pub end_place: String,
    pub coordinates: CoordinateInput,
    pub vehicle: VehicleProfile,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            start_place: "Tokyo Station".to_string(),
            end_place: "Shibuya Crossing".to_string(),
            coordinates: CoordinateInput {
                start_lat: 35.6812,
                start_lon: 139.7671,
                end_lat: 35.6595,
                end_lon: 139.7005,
            },
            vehicle: VehicleProfile::default(),
        }
    }
}

/// Display and estimation options
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripOptions {
    pub show_alternatives: bool,
    pub show_fuel_stations: bool,
    pub fuel_radius_km: u32,
    pub departure: NaiveDateTime,
    pub vehicle: VehicleProfile,
}

impl TripOptions {
    /// Default options departing at `departure`
    #[must_use]
    pub const fn new(departure: NaiveDateTime, vehicle: VehicleProfile) -> Self {
        Self {
            show_alternatives: true,
            show_fuel_stations: false,
            fuel_radius_km: 5,
            departure,
            vehicle,
        }
    }

    /// Fuel search radius in meters
    #[must_use]
    pub const fn fuel_radius_m(&self) -> u32 {
        self.fuel_radius_km * 1000
    }

    /// Check ranges
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first out-of-range field.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if !(MIN_FUEL_RADIUS_KM..=MAX_FUEL_RADIUS_KM).contains(&self.fuel_radius_km) {
            return Err(ApplicationError::validation(format!(
                "Fuel search radius must be between {MIN_FUEL_RADIUS_KM} and {MAX_FUEL_RADIUS_KM} km"
            )));
        }
        let efficiency = self.vehicle.fuel_efficiency_km_l;
        if !efficiency.is_finite() || efficiency < MIN_FUEL_EFFICIENCY_KM_L {
            return Err(ApplicationError::validation(format!(
                "Fuel efficiency must be at least {MIN_FUEL_EFFICIENCY_KM_L} km/L"
            )));
        }
        let price = self.vehicle.fuel_price_per_l;
        if !price.is_finite() || price < 0.0 {
            return Err(ApplicationError::validation(
                "Fuel price must not be negative",
            ));
        }
        Ok(())
    }
}

/// Severity of a user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message shown next to the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Extra text shown verbatim, e.g. a server response body
    pub detail: Option<String>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Input problems are warnings, everything else is an error
    pub fn from_error(err: &ApplicationError) -> Self {
        if err.is_input_error() {
            Self::warning(err.to_string())
        } else {
            Self::error(err.to_string())
        }
    }
}

/// The result of a successful trip request
#[derive(Debug, Clone, PartialEq)]
pub struct TripPlan {
    places: Vec<Place>,
    routes: Vec<Route>,
    selected: usize,
}

impl TripPlan {
    /// Build a plan, sorting routes by duration and selecting the fastest
    ///
    /// # Errors
    ///
    /// Fails on fewer than two places or an empty route set.
    pub fn new(places: Vec<Place>, mut routes: Vec<Route>) -> Result<Self, ApplicationError> {
        if routes.is_empty() {
            return Err(ApplicationError::NoRouteFound);
        }
        if places.len() < CoordinateSequence::MIN_LEN {
            return Err(DomainError::TooFewCoordinates {
                count: places.len(),
            }
            .into());
        }
        sort_routes_by_duration(&mut routes);
        Ok(Self {
            places,
            routes,
            selected: 0,
        })
    }

    #[must_use]
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// Routes, fastest first
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[must_use]
    pub const fn selected_index(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected_route(&self) -> &Route {
        &self.routes[self.selected]
    }

    /// Change the selected route
    ///
    /// # Errors
    ///
    /// Returns a validation error if `index` is out of range.
    pub fn select(&mut self, index: usize) -> Result<(), ApplicationError> {
        if index >= self.routes.len() {
            return Err(ApplicationError::validation(format!(
                "Route {} does not exist",
                index + 1
            )));
        }
        self.selected = index;
        Ok(())
    }
}

/// One entry of a trip request before geocoding
#[derive(Debug, Clone, PartialEq)]
pub enum TripStop {
    /// Needs geocoding
    Named(String),
    /// Already has a position
    Resolved(Place),
}

/// Per-user trip planning state
#[derive(Debug, Clone)]
pub struct TripSession {
    input_mode: InputMode,
    start_place: String,
    end_place: String,
    coordinates: CoordinateInput,
    waypoints: Vec<String>,
    editor: WaypointEditor,
    options: TripOptions,
    plan: Option<TripPlan>,
    notices: Vec<Notice>,
}

impl TripSession {
    /// Fresh session from defaults, departing at `departure`
    #[must_use]
    pub fn new(defaults: &SessionDefaults, departure: NaiveDateTime) -> Self {
        Self {
            input_mode: InputMode::default(),
            start_place: defaults.start_place.clone(),
            end_place: defaults.end_place.clone(),
            coordinates: defaults.coordinates,
            waypoints: Vec::new(),
            editor: WaypointEditor::Idle,
            options: TripOptions::new(departure, defaults.vehicle),
            plan: None,
            notices: Vec::new(),
        }
    }

    #[must_use]
    pub const fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Switch input mode; coordinate mode drops all waypoints
    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
        if mode == InputMode::Coordinates {
            self.waypoints.clear();
            self.editor = WaypointEditor::Idle;
        }
    }

    #[must_use]
    pub fn start_place(&self) -> &str {
        &self.start_place
    }

    #[must_use]
    pub fn end_place(&self) -> &str {
        &self.end_place
    }

    pub fn set_places(&mut self, start: impl Into<String>, end: impl Into<String>) {
        self.start_place = start.into();
        self.end_place = end.into();
    }

    #[must_use]
    pub const fn coordinates(&self) -> CoordinateInput {
        self.coordinates
    }

    pub const fn set_coordinates(&mut self, coordinates: CoordinateInput) {
        self.coordinates = coordinates;
    }

    /// Intermediate place names in entry order
    #[must_use]
    pub fn waypoints(&self) -> &[String] {
        &self.waypoints
    }

    #[must_use]
    pub const fn editor(&self) -> WaypointEditor {
        self.editor
    }

    /// Idle -> AddingDestination
    ///
    /// # Errors
    ///
    /// Waypoints are only supported in place-name mode.
    pub fn open_waypoint_editor(&mut self) -> Result<(), ApplicationError> {
        if self.input_mode != InputMode::PlaceName {
            return Err(ApplicationError::validation(
                "Waypoints are only available for place name input.",
            ));
        }
        self.editor = WaypointEditor::AddingDestination;
        Ok(())
    }

    /// AddingDestination -> Idle without changes
    pub fn cancel_waypoint_editor(&mut self) {
        self.editor = WaypointEditor::Idle;
    }

    /// Append a waypoint and close the editor
    ///
    /// # Errors
    ///
    /// A blank name keeps the editor open and returns a validation error.
    pub fn confirm_waypoint(&mut self, name: &str) -> Result<(), ApplicationError> {
        if self.editor != WaypointEditor::AddingDestination {
            return Err(ApplicationError::validation(
                "Open the destination editor first.",
            ));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(ApplicationError::validation(MSG_EMPTY_WAYPOINT));
        }
        self.waypoints.push(name.to_string());
        self.editor = WaypointEditor::Idle;
        Ok(())
    }

    /// Remove the waypoint at `index` (0-based)
    ///
    /// # Errors
    ///
    /// Returns a validation error if `index` is out of range.
    pub fn remove_waypoint(&mut self, index: usize) -> Result<String, ApplicationError> {
        if index >= self.waypoints.len() {
            return Err(ApplicationError::validation(format!(
                "Waypoint {} does not exist",
                index + 1
            )));
        }
        Ok(self.waypoints.remove(index))
    }

    #[must_use]
    pub const fn options(&self) -> &TripOptions {
        &self.options
    }

    /// Replace all options at once
    ///
    /// # Errors
    ///
    /// Out-of-range values are rejected and nothing changes.
    pub fn set_options(&mut self, options: TripOptions) -> Result<(), ApplicationError> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    pub const fn set_show_alternatives(&mut self, show: bool) {
        self.options.show_alternatives = show;
    }

    pub const fn set_show_fuel_stations(&mut self, show: bool) {
        self.options.show_fuel_stations = show;
    }

    /// # Errors
    ///
    /// Rejects radii outside 1..=25 km.
    pub fn set_fuel_radius_km(&mut self, radius_km: u32) -> Result<(), ApplicationError> {
        self.set_options(TripOptions {
            fuel_radius_km: radius_km,
            ..self.options
        })
    }

    pub const fn set_departure(&mut self, departure: NaiveDateTime) {
        self.options.departure = departure;
    }

    /// # Errors
    ///
    /// Rejects efficiency below 1 km/L and negative prices.
    pub fn set_vehicle(&mut self, vehicle: VehicleProfile) -> Result<(), ApplicationError> {
        self.set_options(TripOptions {
            vehicle,
            ..self.options
        })
    }

    #[must_use]
    pub const fn plan(&self) -> Option<&TripPlan> {
        self.plan.as_ref()
    }

    /// Switch the selected route of the current plan
    ///
    /// # Errors
    ///
    /// Fails when there is no plan or `index` is out of range.
    pub fn select_route(&mut self, index: usize) -> Result<(), ApplicationError> {
        self.plan
            .as_mut()
            .ok_or_else(|| ApplicationError::validation("No route has been calculated yet."))?
            .select(index)
    }

    pub(crate) fn replace_plan(&mut self, plan: TripPlan) {
        self.plan = Some(plan);
    }

    pub(crate) fn clear_plan(&mut self) {
        self.plan = None;
    }

    /// The stops to resolve for a trip request, in order
    ///
    /// # Errors
    ///
    /// Returns a validation error when a required location is blank or a
    /// coordinate is out of range. No external call should be made then.
    pub fn trip_stops(&self) -> Result<Vec<TripStop>, ApplicationError> {
        match self.input_mode {
            InputMode::PlaceName => {
                let start = self.start_place.trim();
                let end = self.end_place.trim();
                if start.is_empty() || end.is_empty() {
                    return Err(ApplicationError::validation(MSG_MISSING_LOCATION));
                }
                let mut stops = Vec::with_capacity(self.waypoints.len() + 2);
                stops.push(TripStop::Named(start.to_string()));
                stops.extend(self.waypoints.iter().cloned().map(TripStop::Named));
                stops.push(TripStop::Named(end.to_string()));
                Ok(stops)
            },
            InputMode::Coordinates => {
                let c = self.coordinates;
                let start = GeoLocation::new(c.start_lat, c.start_lon)
                    .map_err(|e| ApplicationError::validation(format!("Start: {e}")))?;
                let end = GeoLocation::new(c.end_lat, c.end_lon)
                    .map_err(|e| ApplicationError::validation(format!("End: {e}")))?;
                Ok(vec![
                    TripStop::Resolved(Place::new("Start", start)),
                    TripStop::Resolved(Place::new("End", end)),
                ])
            },
        }
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Pending notices, oldest first; the queue is left empty
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
