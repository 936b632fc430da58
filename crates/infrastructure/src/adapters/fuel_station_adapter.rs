//! Fuel station adapter - Implements FuelStationPort using Overpass

use std::sync::Arc;

use application::{
    error::ApplicationError,
    ports::{FuelStationError, FuelStationPort},
};
use async_trait::async_trait;
use domain::{FuelStation, Polyline};
use integration_osm::{FuelStationClient, OverpassClient, OverpassConfig, OverpassError};
use tracing::{debug, instrument};

/// Adapter for fuel stations along a route
pub struct FuelStationAdapter {
    client: Arc<dyn FuelStationClient>,
}

impl std::fmt::Debug for FuelStationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuelStationAdapter")
            .field("client", &"FuelStationClient")
            .finish()
    }
}

impl FuelStationAdapter {
    /// Create an adapter backed by the Overpass API
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &OverpassConfig) -> Result<Self, ApplicationError> {
        let client =
            OverpassClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create an adapter around any fuel station client
    #[must_use]
    pub fn with_client(client: Arc<dyn FuelStationClient>) -> Self {
        Self { client }
    }

    fn map_error(err: OverpassError) -> FuelStationError {
        match err {
            OverpassError::EmptyGeometry => FuelStationError::EmptyRoute,
            OverpassError::ServerBusy => FuelStationError::ServerBusy,
            OverpassError::HttpStatus {
                status,
                reason,
                body,
            } => FuelStationError::Http {
                status,
                reason,
                body,
            },
            e @ (OverpassError::ConnectionFailed(_) | OverpassError::Timeout { .. }) => {
                FuelStationError::Network(e.to_string())
            },
            e @ (OverpassError::InvalidGeometry(_) | OverpassError::ParseError(_)) => {
                FuelStationError::Other(e.to_string())
            },
        }
    }
}

#[async_trait]
impl FuelStationPort for FuelStationAdapter {
    #[instrument(skip(self, geometry))]
    async fn fuel_stations_near(
        &self,
        geometry: &Polyline,
        radius_m: u32,
    ) -> Result<Vec<FuelStation>, FuelStationError> {
        let result = self
            .client
            .fuel_stations_along(geometry, radius_m)
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(stations) => debug!(count = stations.len(), "Retrieved fuel stations"),
            Err(e) => debug!(error = %e, "Failed to retrieve fuel stations"),
        }

        result
    }
}
