//! Routing adapter - Implements RoutingPort using OSRM

use std::sync::Arc;

use application::{error::ApplicationError, ports::RoutingPort};
use async_trait::async_trait;
use domain::{CoordinateSequence, Route};
use integration_osm::{OsrmConfig, OsrmRoutingClient, RoutingClient, RoutingError};
use tracing::{debug, instrument};

/// Adapter for driving routes
pub struct RoutingAdapter {
    client: Arc<dyn RoutingClient>,
}

impl std::fmt::Debug for RoutingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingAdapter")
            .field("client", &"RoutingClient")
            .finish()
    }
}

impl RoutingAdapter {
    /// Create an adapter backed by OSRM
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &OsrmConfig) -> Result<Self, ApplicationError> {
        let client =
            OsrmRoutingClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create an adapter around any routing client
    #[must_use]
    pub fn with_client(client: Arc<dyn RoutingClient>) -> Self {
        Self { client }
    }

    fn map_error(err: RoutingError) -> ApplicationError {
        match err {
            RoutingError::NoRoutesFound => ApplicationError::NoRouteFound,
            RoutingError::ConnectionFailed(e) | RoutingError::RequestFailed(e) => {
                ApplicationError::ExternalService(e)
            },
            e @ RoutingError::Timeout { .. } => ApplicationError::ExternalService(e.to_string()),
            RoutingError::ParseError(e) => ApplicationError::Internal(e),
        }
    }
}

#[async_trait]
impl RoutingPort for RoutingAdapter {
    #[instrument(skip(self, coordinates), fields(points = coordinates.len()))]
    async fn fetch_routes(
        &self,
        coordinates: &CoordinateSequence,
        alternatives: bool,
    ) -> Result<Vec<Route>, ApplicationError> {
        let result = self
            .client
            .fetch_routes(coordinates, alternatives)
            .await
            .map_err(Self::map_error);

        match &result {
            Ok(routes) => debug!(count = routes.len(), "Retrieved routes"),
            Err(e) => debug!(error = %e, "Failed to retrieve routes"),
        }

        result
    }
}
