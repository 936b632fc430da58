//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `dashboard`: map styling and initial sidebar values
//! - `services`: Nominatim, OSRM and Overpass endpoints
//! - `notice`: defaults substituted while loading
//!
//! Sources, lowest priority first: built-in defaults, an optional TOML file
//! (`config.toml`, or the path in `TRIPDASH_CONFIG`), then environment
//! variables such as `TRIPDASH_ROUTE__WEIGHT=8`.
//!
//! Loading never fails. A missing or malformed option falls back to its
//! default and leaves a [`ConfigNotice`] behind.

mod dashboard;
mod notice;
mod server;
mod services;

use std::{fmt, path::Path};

use config::{ConfigError, FileFormat};
use integration_osm::{NominatimConfig, OsrmConfig, OverpassConfig};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

pub use dashboard::DashboardConfig;
pub use notice::{ConfigIssue, ConfigNotice};
pub use server::ServerConfig;
pub use services::ServicesConfig;

use crate::telemetry::LoggingConfig;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "TRIPDASH_CONFIG";

/// Configuration file used when `TRIPDASH_CONFIG` is not set
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "TRIPDASH";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Log filter and output format
    pub logging: LoggingConfig,

    /// Map styling and initial sidebar values
    pub dashboard: DashboardConfig,

    /// External service endpoints
    pub services: ServicesConfig,
}

/// Configuration together with the defaults substituted while loading it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub notices: Vec<ConfigNotice>,
}

impl LoadedConfig {
    /// Notices worth showing on the dashboard
    pub fn visible_notices(&self) -> impl Iterator<Item = &ConfigNotice> {
        self.notices.iter().filter(|n| n.is_user_visible())
    }
}

impl AppConfig {
    /// Load configuration from the environment and the optional file
    #[must_use]
    pub fn load() -> LoadedConfig {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::load_from(Path::new(&path), env_source())
    }

    /// Load configuration from `path` layered under `env`
    ///
    /// A file that does not exist is not an error.
    #[must_use]
    pub fn load_from(path: &Path, env: config::Environment) -> LoadedConfig {
        let builder = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(env);

        Self::resolve(builder, &path.display().to_string())
    }

    /// Load configuration from TOML text only
    #[must_use]
    pub fn from_toml_str(toml: &str) -> LoadedConfig {
        let builder =
            config::Config::builder().add_source(config::File::from_str(toml, FileFormat::Toml));
        Self::resolve(builder, "<inline>")
    }

    fn resolve(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        origin: &str,
    ) -> LoadedConfig {
        let raw = match builder.build() {
            Ok(raw) => raw,
            Err(e) => {
                let notice = ConfigNotice::unreadable(origin, e.to_string());
                warn!(%notice, "Falling back to default configuration");
                return LoadedConfig {
                    config: Self::default(),
                    notices: vec![notice],
                };
            },
        };

        let mut resolver = Resolver::new(&raw);
        let config = Self {
            server: resolver.section("server", ServerConfig::validate),
            logging: resolver.section("logging", LoggingConfig::validate),
            dashboard: DashboardConfig::resolve(&mut resolver),
            services: ServicesConfig {
                nominatim: resolver.section("services.nominatim", NominatimConfig::validate),
                osrm: resolver.section("services.osrm", OsrmConfig::validate),
                overpass: resolver.section("services.overpass", OverpassConfig::validate),
            },
        };
        let notices = resolver.finish();

        info!(origin, substituted = notices.len(), "Configuration loaded");

        LoadedConfig { config, notices }
    }
}

/// Environment source for `TRIPDASH_<SECTION>__<KEY>` variables
#[must_use]
pub fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Reads options one at a time, substituting defaults and recording why
pub(crate) struct Resolver<'a> {
    raw: &'a config::Config,
    notices: Vec<ConfigNotice>,
}

impl<'a> Resolver<'a> {
    const fn new(raw: &'a config::Config) -> Self {
        Self {
            raw,
            notices: Vec::new(),
        }
    }

    /// A single option; unset or rejected values become `default`
    pub(crate) fn value<T, F>(&mut self, key: &str, default: T, check: F) -> T
    where
        T: DeserializeOwned + fmt::Display,
        F: Fn(&T) -> Result<(), String>,
    {
        match self.raw.get::<T>(key) {
            Ok(value) => match check(&value) {
                Ok(()) => value,
                Err(reason) => self.reject(ConfigNotice::invalid(key, reason, &default), default),
            },
            Err(ConfigError::NotFound(_)) => {
                let notice = ConfigNotice::missing(key, &default);
                debug!(%notice, "Using default");
                self.notices.push(notice);
                default
            },
            Err(e) => self.reject(ConfigNotice::invalid(key, e.to_string(), &default), default),
        }
    }

    /// A whole section deserialized at once; absent sections are silently defaulted
    pub(crate) fn section<T, F>(&mut self, key: &str, validate: F) -> T
    where
        T: DeserializeOwned + Default,
        F: Fn(&T) -> Result<(), String>,
    {
        match self.raw.get::<T>(key) {
            Ok(section) => match validate(&section) {
                Ok(()) => section,
                Err(reason) => {
                    self.reject(ConfigNotice::invalid(key, reason, "section"), T::default())
                },
            },
            Err(ConfigError::NotFound(_)) => T::default(),
            Err(e) => self.reject(
                ConfigNotice::invalid(key, e.to_string(), "section"),
                T::default(),
            ),
        }
    }

    fn reject<T>(&mut self, notice: ConfigNotice, default: T) -> T {
        warn!(%notice, "Rejected configuration value");
        self.notices.push(notice);
        default
    }

    fn finish(self) -> Vec<ConfigNotice> {
        self.notices
    }
}
