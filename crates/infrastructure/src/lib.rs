//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer on top of the
//! OpenStreetMap clients, loads configuration, sets up logging and renders
//! the dashboard page.

pub mod adapters;
pub mod config;
pub mod telemetry;
pub mod templates;

pub use adapters::*;
pub use config::{
    AppConfig, ConfigIssue, ConfigNotice, DashboardConfig, LoadedConfig, ServerConfig,
    ServicesConfig,
};
pub use telemetry::{LogFormat, LoggingConfig, TelemetryError, init_telemetry};
pub use templates::{TemplateContext, TemplateEngine, TemplateError};
