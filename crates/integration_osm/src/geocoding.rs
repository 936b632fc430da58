//! Nominatim geocoding client
//!
//! Resolves a free-text place name with a single `/search` call and keeps
//! the first candidate. Searches are spaced by `min_request_interval_ms` to
//! stay within the public instance's one-request-per-second policy.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::GeoLocation;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::config::NominatimConfig;
use crate::error::GeocodingError;

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Resolve a place name to the coordinates of its best match
    async fn geocode(&self, place: &str) -> Result<GeoLocation, GeocodingError>;
}

/// One candidate in a Nominatim `format=json` answer
///
/// Coordinates arrive as decimal strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl SearchHit {
    fn location(&self) -> Result<GeoLocation, GeocodingError> {
        let coordinate = |raw: &str, axis: &str| {
            raw.trim().parse::<f64>().map_err(|_| {
                GeocodingError::ParseError(format!("{axis} '{raw}' is not a number"))
            })
        };
        let lat = coordinate(&self.lat, "latitude")?;
        let lon = coordinate(&self.lon, "longitude")?;
        GeoLocation::new(lat, lon).map_err(|e| GeocodingError::ParseError(e.to_string()))
    }
}

/// Nominatim `/search` client
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    config: NominatimConfig,
    last_search: Arc<Mutex<Option<Instant>>>,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            last_search: Arc::new(Mutex::new(None)),
        })
    }

    /// Sleep until the configured gap since the previous search has passed
    ///
    /// The lock is held across the sleep so concurrent callers queue up.
    async fn throttle(&self) {
        let gap = Duration::from_millis(self.config.min_request_interval_ms);
        let mut last = self.last_search.lock().await;
        let wait = last.map_or(Duration::ZERO, |t| gap.saturating_sub(t.elapsed()));
        if !wait.is_zero() {
            debug!(?wait, "Delaying search");
            tokio::time::sleep(wait).await;
        }
        *last = Some(Instant::now());
    }

    fn search_params(&self, place: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("q", place.to_string()),
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
        ];
        if !self.config.country_filter.is_empty() {
            params.push(("countrycodes", self.config.country_filter.clone()));
        }
        params
    }

    async fn search(&self, place: &str) -> Result<Vec<SearchHit>, GeocodingError> {
        let response = self
            .client
            .get(format!("{}/search", self.config.base_url))
            .query(&self.search_params(place))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn geocode(&self, place: &str) -> Result<GeoLocation, GeocodingError> {
        let place = place.trim();
        if place.is_empty() {
            return Err(GeocodingError::EmptyQuery);
        }

        self.throttle().await;
        let hits = self.search(place).await?;

        let location = hits
            .first()
            .ok_or_else(|| GeocodingError::PlaceNotFound(place.to_string()))?
            .location()?;

        debug!(%place, %location, "Place resolved");
        Ok(location)
    }
}
