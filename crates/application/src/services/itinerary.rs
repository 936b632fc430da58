//! Itinerary formatting
//!
//! Turns a route's legs and steps into numbered, human-readable rows.

use domain::{ManeuverKind, Route, RouteStep};
use serde::Serialize;

/// Instruction used when the final arrive step carries no text
pub const FINAL_ARRIVAL_TEXT: &str = "You have arrived at your final destination.";

/// One row of the step-by-step table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItineraryRow {
    /// 1-based, running across all legs
    pub step: usize,
    pub instruction: String,
    /// Kilometers with two decimals
    pub distance_km: String,
    pub time: String,
}

/// Format a duration in seconds as `"1h 2m 5s"`
///
/// Units that are zero are left out, except that seconds are shown when
/// nothing larger is. Fractions of a second are dropped. Absent, zero,
/// negative and non-finite durations all render as `"0s"`.
#[must_use]
pub fn format_duration(seconds: Option<f64>) -> String {
    let Some(total) = seconds.filter(|s| s.is_finite() && *s >= 1.0) else {
        return "0s".to_string();
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = total.trunc() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{secs}s"));
    }
    parts.join(" ")
}

/// Capitalize the first letter of every word, lowercase the rest
///
/// A word starts at any letter not preceded by another letter, so
/// `"slight_right"` becomes `"Slight_Right"`.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

fn display_word(raw: &str) -> String {
    title_case(&raw.replace('_', " "))
}

/// Instruction text for one step
///
/// `leg_index` is 0-based; `leg_count` is the number of legs in the route.
#[must_use]
pub fn describe_step(step: &RouteStep, leg_index: usize, leg_count: usize) -> String {
    let road = step.road_name.as_deref().filter(|r| !r.is_empty());
    let maneuver = &step.maneuver;

    match &maneuver.kind {
        ManeuverKind::Depart => {
            road.map_or_else(|| "Depart".to_string(), |r| format!("Depart on {r}"))
        },
        ManeuverKind::NewName => {
            road.map_or_else(|| "Continue".to_string(), |r| format!("Continue onto {r}"))
        },
        ManeuverKind::Arrive if leg_index + 1 < leg_count => {
            format!("You have arrived at Waypoint {}.", leg_index + 1)
        },
        ManeuverKind::Arrive => maneuver
            .instruction
            .clone()
            .unwrap_or_else(|| FINAL_ARRIVAL_TEXT.to_string()),
        ManeuverKind::Other(kind) => {
            let mut parts = vec![display_word(kind)];
            if let Some(modifier) = &maneuver.modifier {
                parts.push(display_word(modifier));
            }
            if let Some(road) = road {
                parts.push(format!("onto {road}"));
            }
            parts.retain(|p| !p.is_empty());
            parts.join(" ")
        },
    }
}

/// Build the step table for a route
#[must_use]
pub fn format_itinerary(route: &Route) -> Vec<ItineraryRow> {
    let leg_count = route.legs.len();
    route
        .legs
        .iter()
        .enumerate()
        .flat_map(|(leg_index, leg)| {
            leg.steps
                .iter()
                .map(move |step| (describe_step(step, leg_index, leg_count), step))
        })
        .enumerate()
        .map(|(i, (instruction, step))| ItineraryRow {
            step: i + 1,
            instruction,
            distance_km: format!("{:.2}", step.distance_m / 1000.0),
            time: format_duration(Some(step.duration_s)),
        })
        .collect()
}
