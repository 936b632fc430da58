//! Geocoding port
//!
//! Resolves a free-text place name to a position.

use async_trait::async_trait;
use domain::GeoLocation;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for place name resolution
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve a place name to the best matching position
    ///
    /// Fails on transport errors, non-success responses and empty results.
    async fn geocode(&self, place: &str) -> Result<GeoLocation, ApplicationError>;
}
