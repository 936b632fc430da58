//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Dashboard page
        .route("/", get(handlers::dashboard::show_dashboard))
        // Sidebar actions
        .route("/trip/mode", post(handlers::trip::set_mode))
        .route("/trip/options", post(handlers::trip::apply_options))
        .route("/trip/route", post(handlers::trip::plan_route))
        .route("/trip/select", post(handlers::trip::select_route))
        .route("/trip/waypoints", post(handlers::trip::add_waypoint))
        .route(
            "/trip/waypoints/editor/open",
            post(handlers::trip::open_waypoint_editor),
        )
        .route(
            "/trip/waypoints/editor/cancel",
            post(handlers::trip::cancel_waypoint_editor),
        )
        .route(
            "/trip/waypoints/{index}/remove",
            post(handlers::trip::remove_waypoint),
        )
        // Health endpoint
        .route("/health", get(handlers::health::health_check))
        .fallback(handlers::dashboard::not_found)
        // Attach state
        .with_state(state)
}
