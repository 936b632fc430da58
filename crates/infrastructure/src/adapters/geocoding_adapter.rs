//! Geocoding adapter - Implements GeocodingPort using Nominatim

use std::sync::Arc;

use application::{error::ApplicationError, ports::GeocodingPort};
use async_trait::async_trait;
use domain::GeoLocation;
use integration_osm::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient,
};
use tracing::{debug, instrument};

/// Adapter for place-name lookup
pub struct GeocodingAdapter {
    client: Arc<dyn GeocodingClient>,
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("client", &"GeocodingClient")
            .finish()
    }
}

impl GeocodingAdapter {
    /// Create an adapter backed by Nominatim
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &NominatimConfig) -> Result<Self, ApplicationError> {
        let client = NominatimGeocodingClient::new(config)
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create an adapter around any geocoding client
    #[must_use]
    pub fn with_client(client: Arc<dyn GeocodingClient>) -> Self {
        Self { client }
    }

    fn map_error(err: GeocodingError) -> ApplicationError {
        match err {
            GeocodingError::EmptyQuery => ApplicationError::Validation(err.to_string()),
            GeocodingError::PlaceNotFound(place) => ApplicationError::Validation(format!(
                "No match for '{place}'"
            )),
            GeocodingError::ConnectionFailed(_)
            | GeocodingError::RequestFailed(_)
            | GeocodingError::Timeout { .. } => ApplicationError::ExternalService(err.to_string()),
            GeocodingError::ParseError(e) => ApplicationError::Internal(e),
        }
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn geocode(&self, place: &str) -> Result<GeoLocation, ApplicationError> {
        let result = self.client.geocode(place).await.map_err(Self::map_error);

        match &result {
            Ok(location) => debug!(%location, "Geocoded place"),
            Err(e) => debug!(error = %e, "Failed to geocode place"),
        }

        result
    }
}
