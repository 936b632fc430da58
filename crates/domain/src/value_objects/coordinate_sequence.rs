//! Ordered coordinate sequence for a route request

use serde::{Deserialize, Serialize};

use super::GeoLocation;
use crate::errors::DomainError;

/// Start, intermediate waypoints in entry order, and end
///
/// Always holds at least two locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GeoLocation>")]
pub struct CoordinateSequence(Vec<GeoLocation>);

impl CoordinateSequence {
    /// Minimum number of coordinates for a route
    pub const MIN_LEN: usize = 2;

    /// Create a sequence from ordered locations
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TooFewCoordinates` for fewer than two locations.
    pub fn new(points: Vec<GeoLocation>) -> Result<Self, DomainError> {
        if points.len() < Self::MIN_LEN {
            return Err(DomainError::TooFewCoordinates {
                count: points.len(),
            });
        }
        Ok(Self(points))
    }

    #[must_use]
    pub fn points(&self) -> &[GeoLocation] {
        &self.0
    }

    /// First location of the trip
    #[must_use]
    pub fn start(&self) -> GeoLocation {
        self.0[0]
    }

    /// Last location of the trip
    #[must_use]
    pub fn end(&self) -> GeoLocation {
        self.0[self.0.len() - 1]
    }

    /// Intermediate locations between start and end
    #[must_use]
    pub fn waypoints(&self) -> &[GeoLocation] {
        &self.0[1..self.0.len() - 1]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, kept for API symmetry with `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<GeoLocation>> for CoordinateSequence {
    type Error = DomainError;

    fn try_from(points: Vec<GeoLocation>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}
