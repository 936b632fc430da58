//! Dashboard options: map styling and the initial sidebar values.

use application::{
    CoordinateInput, MapStyle, SessionDefaults, VehicleProfile,
    services::session::MIN_FUEL_EFFICIENCY_KM_L,
};

use super::Resolver;

const MIN_ZOOM: u8 = 1;
const MAX_ZOOM: u8 = 19;
const MIN_ROUTE_WEIGHT: u32 = 1;
const MAX_ROUTE_WEIGHT: u32 = 20;

/// Resolved dashboard options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardConfig {
    pub map_style: MapStyle,
    pub defaults: SessionDefaults,
}

impl DashboardConfig {
    pub(super) fn resolve(r: &mut Resolver<'_>) -> Self {
        let style = MapStyle::default();
        let defaults = SessionDefaults::default();
        let coords = defaults.coordinates;
        let vehicle = defaults.vehicle;

        let map_style = MapStyle {
            zoom_start: r.value("map.zoom_start", style.zoom_start, |z| {
                in_range(*z, MIN_ZOOM, MAX_ZOOM)
            }),
            route_color: r.value("route.color", style.route_color, |c: &String| {
                if c.trim().is_empty() {
                    Err("must not be empty".to_string())
                } else {
                    Ok(())
                }
            }),
            route_weight: r.value("route.weight", style.route_weight, |w| {
                in_range(*w, MIN_ROUTE_WEIGHT, MAX_ROUTE_WEIGHT)
            }),
        };

        let defaults = SessionDefaults {
            start_place: r.value("defaults.start_place", defaults.start_place, |_| Ok(())),
            end_place: r.value("defaults.end_place", defaults.end_place, |_| Ok(())),
            coordinates: CoordinateInput {
                start_lat: r.value("defaults.start_lat", coords.start_lat, latitude),
                start_lon: r.value("defaults.start_lon", coords.start_lon, longitude),
                end_lat: r.value("defaults.end_lat", coords.end_lat, latitude),
                end_lon: r.value("defaults.end_lon", coords.end_lon, longitude),
            },
            vehicle: VehicleProfile {
                fuel_efficiency_km_l: r.value(
                    "vehicle.fuel_efficiency_km_l",
                    vehicle.fuel_efficiency_km_l,
                    |e: &f64| {
                        if e.is_finite() && *e >= MIN_FUEL_EFFICIENCY_KM_L {
                            Ok(())
                        } else {
                            Err(format!("must be at least {MIN_FUEL_EFFICIENCY_KM_L}"))
                        }
                    },
                ),
                fuel_price_per_l: r.value(
                    "vehicle.fuel_price_yen_l",
                    vehicle.fuel_price_per_l,
                    |p: &f64| {
                        if p.is_finite() && *p >= 0.0 {
                            Ok(())
                        } else {
                            Err("must not be negative".to_string())
                        }
                    },
                ),
            },
        };

        Self {
            map_style,
            defaults,
        }
    }
}

fn in_range<T: PartialOrd + std::fmt::Display>(value: T, min: T, max: T) -> Result<(), String> {
    if value < min || value > max {
        Err(format!("must be between {min} and {max}"))
    } else {
        Ok(())
    }
}

fn latitude(value: &f64) -> Result<(), String> {
    if (-90.0..=90.0).contains(value) {
        Ok(())
    } else {
        Err("latitude must be between -90 and 90".to_string())
    }
}

fn longitude(value: &f64) -> Result<(), String> {
    if (-180.0..=180.0).contains(value) {
        Ok(())
    } else {
        Err("longitude must be between -180 and 180".to_string())
    }
}
