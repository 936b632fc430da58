//! Client error types

use thiserror::Error;

/// Errors that can occur while resolving a place name
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Blank place name; no request was sent
    #[error("Place name is empty")]
    EmptyQuery,

    /// The search returned no candidates
    #[error("No match for '{0}'")]
    PlaceNotFound(String),

    /// Connection to the geocoding service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Geocoding service answered with a non-success status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response was not a candidate list or held bad coordinates
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

/// Errors that can occur while fetching routes
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Connection to the routing service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Routing service answered with a non-success status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from the routing service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Response contained no routes
    #[error("No routes found")]
    NoRoutesFound,

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

/// Errors that can occur while querying fuel stations
#[derive(Debug, Error)]
pub enum OverpassError {
    /// The route geometry decoded to no points
    #[error("Route geometry is empty")]
    EmptyGeometry,

    /// The route geometry could not be decoded
    #[error("Invalid route geometry: {0}")]
    InvalidGeometry(String),

    /// HTTP 504 from the interpreter; the server is overloaded
    #[error("Overpass server busy (gateway timeout)")]
    ServerBusy,

    /// Any other non-success status
    #[error("HTTP {status} {reason}")]
    HttpStatus {
        status: u16,
        reason: String,
        /// Response body, often an Overpass error page
        body: String,
    },

    /// Connection to the service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Failed to parse the response
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl OverpassError {
    /// Returns true if the failure happened on the network rather than in the service
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_) | Self::Timeout { .. })
    }
}
