//! Application layer - Use cases and orchestration
//!
//! Contains the trip-planning use cases, port definitions, and the view
//! models the dashboard renders. Orchestrates domain objects and
//! infrastructure adapters.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
