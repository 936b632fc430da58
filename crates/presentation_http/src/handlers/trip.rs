//! Sidebar action handlers
//!
//! Each action updates the session and redirects back to the dashboard.
//! Failures are queued as notices for the next page render.

use application::{
    ApplicationError, CoordinateInput, InputMode, Notice, TripOptions, TripSession,
    VehicleProfile,
};
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use infrastructure::templates::{DATE_INPUT_FORMAT, TIME_INPUT_FORMAT};
use serde::Deserialize;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::{middleware::ValidatedForm, state::AppState};

/// Input mode switch
#[derive(Debug, Deserialize, Validate)]
pub struct ModeForm {
    pub mode: InputMode,
}

/// A destination entered in the waypoint editor
#[derive(Debug, Deserialize, Validate)]
pub struct WaypointForm {
    #[serde(default)]
    #[validate(length(max = 200, message = "Destination name is too long"))]
    pub name: String,
}

/// Route selector
#[derive(Debug, Deserialize, Validate)]
pub struct SelectForm {
    pub index: usize,
}

/// All sidebar fields
///
/// Absent fields leave the session unchanged, except the checkboxes, which
/// browsers only send when ticked.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TripForm {
    #[validate(length(max = 200, message = "Start location is too long"))]
    pub start_place: Option<String>,
    #[validate(length(max = 200, message = "End location is too long"))]
    pub end_place: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub start_lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub start_lon: Option<f64>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub end_lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub end_lon: Option<f64>,

    pub show_alternatives: Option<String>,
    pub show_fuel_stations: Option<String>,
    #[validate(range(min = 1, max = 25, message = "Fuel search radius must be between 1 and 25 km"))]
    pub fuel_radius_km: Option<u32>,

    pub departure_date: Option<String>,
    pub departure_time: Option<String>,
    #[validate(range(min = 1.0, message = "Fuel efficiency must be at least 1.0 km/L"))]
    pub fuel_efficiency_km_l: Option<f64>,
    #[validate(range(min = 0.0, message = "Fuel price must not be negative"))]
    pub fuel_price_per_l: Option<f64>,
}

impl TripForm {
    /// Copy the submitted fields into the session
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unparsable departure or options the
    /// session rejects. Locations are applied even then.
    pub fn apply(self, session: &mut TripSession) -> Result<(), ApplicationError> {
        if let (Some(start), Some(end)) = (self.start_place, self.end_place) {
            session.set_places(start, end);
        }

        if let (Some(start_lat), Some(start_lon), Some(end_lat), Some(end_lon)) =
            (self.start_lat, self.start_lon, self.end_lat, self.end_lon)
        {
            session.set_coordinates(CoordinateInput {
                start_lat,
                start_lon,
                end_lat,
                end_lon,
            });
        }

        let current = *session.options();
        let departure = match (self.departure_date, self.departure_time) {
            (Some(date), Some(time)) => parse_departure(&date, &time)?,
            _ => current.departure,
        };

        session.set_options(TripOptions {
            show_alternatives: self.show_alternatives.is_some(),
            show_fuel_stations: self.show_fuel_stations.is_some(),
            fuel_radius_km: self.fuel_radius_km.unwrap_or(current.fuel_radius_km),
            departure,
            vehicle: VehicleProfile {
                fuel_efficiency_km_l: self
                    .fuel_efficiency_km_l
                    .unwrap_or(current.vehicle.fuel_efficiency_km_l),
                fuel_price_per_l: self
                    .fuel_price_per_l
                    .unwrap_or(current.vehicle.fuel_price_per_l),
            },
        })
    }
}

fn parse_departure(date: &str, time: &str) -> Result<NaiveDateTime, ApplicationError> {
    let date = NaiveDate::parse_from_str(date.trim(), DATE_INPUT_FORMAT)
        .map_err(|_| ApplicationError::validation(format!("Invalid departure date '{date}'")))?;
    let time = NaiveTime::parse_from_str(time.trim(), TIME_INPUT_FORMAT)
        .map_err(|_| ApplicationError::validation(format!("Invalid departure time '{time}'")))?;
    Ok(date.and_time(time))
}

/// Queue a notice for a failed action
fn report(session: &mut TripSession, err: &ApplicationError) {
    warn!(error = %err, "Action failed");
    session.push_notice(Notice::from_error(err));
}

fn back() -> Redirect {
    Redirect::to("/")
}

/// POST /trip/mode
#[instrument(skip(state))]
pub async fn set_mode(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<ModeForm>,
) -> Redirect {
    state.session.lock().await.set_input_mode(form.mode);
    back()
}

/// POST /trip/waypoints/editor/open
#[instrument(skip(state))]
pub async fn open_waypoint_editor(State(state): State<AppState>) -> Redirect {
    let mut session = state.session.lock().await;
    if let Err(e) = session.open_waypoint_editor() {
        report(&mut session, &e);
    }
    back()
}

/// POST /trip/waypoints/editor/cancel
#[instrument(skip(state))]
pub async fn cancel_waypoint_editor(State(state): State<AppState>) -> Redirect {
    state.session.lock().await.cancel_waypoint_editor();
    back()
}

/// POST /trip/waypoints
#[instrument(skip(state))]
pub async fn add_waypoint(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<WaypointForm>,
) -> Redirect {
    let mut session = state.session.lock().await;
    if let Err(e) = session.confirm_waypoint(&form.name) {
        report(&mut session, &e);
    }
    back()
}

/// POST /trip/waypoints/{index}/remove
#[instrument(skip(state))]
pub async fn remove_waypoint(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Redirect {
    let mut session = state.session.lock().await;
    match session.remove_waypoint(index) {
        Ok(name) => info!(%name, "Removed waypoint"),
        Err(e) => report(&mut session, &e),
    }
    back()
}

/// POST /trip/options
#[instrument(skip(state, form))]
pub async fn apply_options(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<TripForm>,
) -> Redirect {
    let mut session = state.session.lock().await;
    if let Err(e) = form.apply(&mut session) {
        report(&mut session, &e);
    }
    back()
}

/// POST /trip/route
#[instrument(skip(state, form))]
pub async fn plan_route(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<TripForm>,
) -> Redirect {
    let mut session = state.session.lock().await;
    if let Err(e) = form.apply(&mut session) {
        report(&mut session, &e);
        return back();
    }

    if let Err(e) = state.trip_service.submit_trip(&mut session).await {
        report(&mut session, &e);
    }
    back()
}

/// POST /trip/select
#[instrument(skip(state))]
pub async fn select_route(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<SelectForm>,
) -> Redirect {
    let mut session = state.session.lock().await;
    if let Err(e) = session.select_route(form.index) {
        report(&mut session, &e);
    }
    back()
}
