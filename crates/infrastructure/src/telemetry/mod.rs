//! Logging initialization
//!
//! Console output through `tracing-subscriber`, as human-readable text or as
//! one JSON object per line.

mod logging;

pub use logging::{LogFormat, LoggingConfig, TelemetryError, init_telemetry};
