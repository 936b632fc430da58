//! Geographic location value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the map in WGS84 degrees
///
/// Services disagree on axis order: Nominatim and the map use
/// latitude-first, OSRM and encoded polylines longitude-first. This type
/// always stores both axes by name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    latitude: f64,
    longitude: f64,
}

/// A latitude/longitude pair outside the valid range (or NaN)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) is out of range: latitude must be -90 to 90, longitude must be -180 to 180",
            self.latitude, self.longitude
        )
    }
}

impl std::error::Error for InvalidCoordinates {}

impl GeoLocation {
    /// Validated constructor
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        let in_range =
            (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        if !in_range {
            return Err(InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self::new_unchecked(latitude, longitude))
    }

    /// Skip range checks; for values produced by this crate's own codecs
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Arithmetic midpoint of two locations, used as the initial map center
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self::new_unchecked(
            (self.latitude + other.latitude) / 2.0,
            (self.longitude + other.longitude) / 2.0,
        )
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}
