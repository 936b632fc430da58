//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
///
/// The Display text of the trip-request variants is shown to the user as-is.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// User input rejected before any external call
    #[error("{0}")]
    Validation(String),

    /// A place in the trip could not be resolved
    #[error("Could not find '{place}'. Route calculation cancelled.")]
    GeocodingFailed {
        /// The place name as entered
        place: String,
    },

    /// The routing service returned no usable route
    #[error("No routes found. Please check your locations.")]
    NoRouteFound,

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Shorthand for a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this error was caused by user input rather than a service
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Domain(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geocoding_failed_message() {
        let err = ApplicationError::GeocodingFailed {
            place: "Fukuoka Tower".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Could not find 'Fukuoka Tower'. Route calculation cancelled."
        );
    }

    #[test]
    fn no_route_message() {
        assert_eq!(
            ApplicationError::NoRouteFound.to_string(),
            "No routes found. Please check your locations."
        );
    }

    #[test]
    fn validation_is_input_error() {
        assert!(ApplicationError::validation("Please enter a destination.").is_input_error());
        assert!(!ApplicationError::NoRouteFound.is_input_error());
        assert!(!ApplicationError::ExternalService("down".to_string()).is_input_error());
    }

    #[test]
    fn domain_error_is_transparent() {
        let err: ApplicationError = DomainError::TooFewCoordinates { count: 1 }.into();
        assert_eq!(err.to_string(), "A route needs at least 2 coordinates, got 1");
    }
}
