//! Domain-level errors

use thiserror::Error;

use crate::value_objects::InvalidCoordinates;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Latitude or longitude outside the valid range
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// A coordinate sequence needs a start and an end
    #[error("A route needs at least 2 coordinates, got {count}")]
    TooFewCoordinates { count: usize },

    /// Encoded polyline could not be decoded
    #[error("Invalid polyline: {0}")]
    InvalidPolyline(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl From<InvalidCoordinates> for DomainError {
    fn from(err: InvalidCoordinates) -> Self {
        Self::InvalidCoordinates(err.to_string())
    }
}
