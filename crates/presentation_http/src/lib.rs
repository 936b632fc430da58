//! TripDash HTTP presentation layer
//!
//! Serves the trip dashboard as a server-rendered page. Every sidebar
//! action is a form post that updates the single in-memory session and
//! redirects back to the dashboard.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use middleware::ValidatedForm;
pub use routes::create_router;
pub use state::AppState;
