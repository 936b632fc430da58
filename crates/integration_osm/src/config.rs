//! Service configuration
//!
//! One struct per service. Every field has a serde default so a partial
//! `[services.*]` table still deserializes.

use serde::{Deserialize, Serialize};

use crate::DEFAULT_USER_AGENT;

pub(crate) fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominatimConfig {
    #[serde(default = "default_nominatim_base_url")]
    pub base_url: String,

    /// Transport timeout in seconds
    #[serde(default = "default_nominatim_timeout_secs")]
    pub timeout_secs: u64,

    /// Gap enforced between two searches, in milliseconds; 0 disables it
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Comma-separated ISO country codes passed as `countrycodes`
    #[serde(default)]
    pub country_filter: String,

    /// Nominatim refuses requests without an identifying agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_nominatim_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_nominatim_timeout_secs() -> u64 {
    10
}

const fn default_min_request_interval_ms() -> u64 {
    1100
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_nominatim_base_url(),
            timeout_secs: default_nominatim_timeout_secs(),
            min_request_interval_ms: default_min_request_interval_ms(),
            country_filter: String::new(),
            user_agent: default_user_agent(),
        }
    }
}

impl NominatimConfig {
    /// Short timeout and no request spacing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            min_request_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }

        Ok(())
    }
}

/// Configuration for the OSRM routing service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsrmConfig {
    /// Base URL for the OSRM HTTP API
    #[serde(default = "default_osrm_base_url")]
    pub base_url: String,

    /// Routing profile path segment
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Request timeout in seconds
    #[serde(default = "default_osrm_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_osrm_base_url() -> String {
    "http://router.project-osrm.org".to_string()
}

fn default_profile() -> String {
    "driving".to_string()
}

const fn default_osrm_timeout_secs() -> u64 {
    30
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: default_osrm_base_url(),
            profile: default_profile(),
            timeout_secs: default_osrm_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl OsrmConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.profile.is_empty() || self.profile.contains('/') {
            return Err("profile must be a single path segment".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Configuration for the Overpass POI query service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverpassConfig {
    /// Interpreter endpoint
    #[serde(default = "default_overpass_url")]
    pub interpreter_url: String,

    /// Server-side processing limit written into the query, in seconds
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,

    /// Client-side transport timeout, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Route points above this count are thinned before querying
    #[serde(default = "default_max_query_points")]
    pub max_query_points: usize,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_overpass_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

const fn default_query_timeout_secs() -> u64 {
    60
}

const fn default_request_timeout_secs() -> u64 {
    65
}

const fn default_max_query_points() -> usize {
    50
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            interpreter_url: default_overpass_url(),
            query_timeout_secs: default_query_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_query_points: default_max_query_points(),
            user_agent: default_user_agent(),
        }
    }
}

impl OverpassConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            query_timeout_secs: 5,
            request_timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.interpreter_url.is_empty() {
            return Err("interpreter_url must not be empty".to_string());
        }

        if self.query_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err("timeouts must be greater than 0".to_string());
        }

        if self.request_timeout_secs < self.query_timeout_secs {
            return Err(
                "request_timeout_secs must not be shorter than query_timeout_secs".to_string(),
            );
        }

        if self.max_query_points == 0 {
            return Err("max_query_points must be greater than 0".to_string());
        }

        Ok(())
    }
}
