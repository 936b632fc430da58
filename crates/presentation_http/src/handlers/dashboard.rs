//! Dashboard page handler

use axum::{extract::State, http::Uri, response::Html};
use infrastructure::templates::DashboardPage;
use tracing::{debug, instrument};

use crate::{error::ApiError, state::AppState};

/// Render the dashboard for the current session
///
/// Pending notices from earlier actions are shown once and then dropped.
/// Configuration notices are shown on every page.
#[instrument(skip(state))]
pub async fn show_dashboard(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let mut session = state.session.lock().await;

    let mut notices = state.config_notices.to_vec();
    notices.extend(session.take_notices());

    let dashboard = state.trip_service.dashboard(&session).await;
    debug!(
        routes = dashboard.route_options.len(),
        notices = notices.len() + dashboard.notices.len(),
        "Rendering dashboard"
    );

    let page = DashboardPage::new(&session, dashboard, notices);
    let html = state.templates.render_dashboard(&page)?;
    Ok(Html(html))
}

/// Fallback for unknown paths
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
