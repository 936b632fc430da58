//! Encoded polyline value object
//!
//! Routes come back from the routing service as Google encoded polylines
//! with five decimal digits of precision. The string is kept as-is and
//! decoded only where points are needed (map drawing, POI lookup).

use geo_types::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::GeoLocation;
use crate::errors::DomainError;

/// Decimal digits kept by the routing service
const PRECISION: u32 = 5;

/// An encoded polyline string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline(String);

impl Polyline {
    #[must_use]
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encode an ordered list of locations
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPolyline` if a point cannot be encoded.
    pub fn encode(points: &[GeoLocation]) -> Result<Self, DomainError> {
        let coords = points.iter().map(|p| Coord {
            x: p.longitude(),
            y: p.latitude(),
        });
        ::polyline::encode_coordinates(coords, PRECISION)
            .map(Self)
            .map_err(|e| DomainError::InvalidPolyline(e.to_string()))
    }

    /// Decode into ordered locations
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPolyline` on characters outside the
    /// encoding alphabet, a latitude without its longitude, or points that
    /// are not valid coordinates.
    pub fn decode(&self) -> Result<Vec<GeoLocation>, DomainError> {
        let line = ::polyline::decode_polyline(&self.0, PRECISION)
            .map_err(|e| DomainError::InvalidPolyline(e.to_string()))?;

        // geo-types keeps (x, y), so longitude comes first
        line.into_iter()
            .enumerate()
            .map(|(i, c)| {
                GeoLocation::new(c.y, c.x).map_err(|e| {
                    DomainError::InvalidPolyline(format!("point {i} out of range: {e}"))
                })
            })
            .collect()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Polyline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Polyline {
    fn from(encoded: String) -> Self {
        Self(encoded)
    }
}
