//! Trip summary metrics
//!
//! Duration, distance, ETA and fuel estimates for the selected route.

use chrono::{NaiveDateTime, TimeDelta};
use domain::Route;
use serde::{Deserialize, Serialize};

use super::itinerary::format_duration;

/// ETA display format, e.g. `"Mar 14, 09:05"`
pub const ETA_FORMAT: &str = "%b %d, %H:%M";

/// Vehicle fuel characteristics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    /// Kilometers per liter
    pub fuel_efficiency_km_l: f64,
    /// Price per liter in yen
    pub fuel_price_per_l: f64,
}

impl Default for VehicleProfile {
    fn default() -> Self {
        Self {
            fuel_efficiency_km_l: 15.0,
            fuel_price_per_l: 175.0,
        }
    }
}

impl VehicleProfile {
    /// Liters needed for a distance; zero when efficiency is not positive
    #[must_use]
    pub fn fuel_needed_l(&self, distance_km: f64) -> f64 {
        if self.fuel_efficiency_km_l > 0.0 {
            distance_km / self.fuel_efficiency_km_l
        } else {
            0.0
        }
    }
}

/// Formatted summary of the selected route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    pub duration: String,
    pub distance: String,
    pub eta: String,
    pub fuel_needed: String,
    pub estimated_cost: String,
    pub fuel_needed_l: f64,
    pub estimated_cost_yen: f64,
}

/// Summarize a route for a departure time and vehicle
#[must_use]
pub fn summarize_trip(
    route: &Route,
    departure: NaiveDateTime,
    vehicle: &VehicleProfile,
) -> TripSummary {
    let distance_km = route.distance_km();
    let fuel_needed_l = vehicle.fuel_needed_l(distance_km);
    let estimated_cost_yen = fuel_needed_l * vehicle.fuel_price_per_l;

    TripSummary {
        duration: format_duration(route.duration_s),
        distance: format!("{distance_km:.2} km"),
        eta: estimate_arrival(departure, route.duration_s)
            .format(ETA_FORMAT)
            .to_string(),
        fuel_needed: format!("{fuel_needed_l:.2} L"),
        estimated_cost: format_yen(estimated_cost_yen),
        fuel_needed_l,
        estimated_cost_yen,
    }
}

/// Departure plus route duration; a missing or unrepresentable duration adds nothing
#[must_use]
pub fn estimate_arrival(departure: NaiveDateTime, duration_s: Option<f64>) -> NaiveDateTime {
    #[allow(clippy::cast_possible_truncation)]
    let millis = duration_s
        .filter(|d| d.is_finite() && *d > 0.0)
        .map_or(0, |d| (d * 1000.0).round() as i64);

    TimeDelta::try_milliseconds(millis)
        .and_then(|delta| departure.checked_add_signed(delta))
        .unwrap_or(departure)
}

/// Whole yen with thousands separators, e.g. `"¥12,345"`
#[must_use]
pub fn format_yen(amount: f64) -> String {
    let rounded = format!("{amount:.0}");
    let (sign, digits) = rounded
        .strip_prefix('-')
        .filter(|d| d.bytes().any(|b| b != b'0'))
        .map_or(("", rounded.trim_start_matches('-')), |d| ("-", d));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}¥{grouped}")
}

/// Route selector label, e.g. `"Route 2: 21m 5s (7.8 km)"`
#[must_use]
pub fn route_option_label(index: usize, route: &Route) -> String {
    format!(
        "Route {}: {} ({:.1} km)",
        index + 1,
        format_duration(route.duration_s),
        route.distance_km()
    )
}
