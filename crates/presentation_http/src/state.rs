//! Application state shared across handlers

use std::sync::Arc;

use application::{Notice, SessionDefaults, TripService, TripSession};
use chrono::Local;
use infrastructure::TemplateEngine;
use tokio::sync::Mutex;

/// Shared application state
///
/// There is one trip session per server. Handlers hold its lock for the
/// whole request, so actions run one at a time.
#[derive(Clone)]
pub struct AppState {
    /// Trip planning use cases
    pub trip_service: Arc<TripService>,
    /// The trip session being edited
    pub session: Arc<Mutex<TripSession>>,
    /// Page renderer
    pub templates: TemplateEngine,
    /// Configuration problems, shown on every page
    pub config_notices: Arc<[Notice]>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("trip_service", &self.trip_service)
            .field("config_notices", &self.config_notices.len())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State with a fresh session departing now
    #[must_use]
    pub fn new(
        trip_service: TripService,
        defaults: &SessionDefaults,
        templates: TemplateEngine,
        config_notices: Vec<Notice>,
    ) -> Self {
        let session = TripSession::new(defaults, Local::now().naive_local());
        Self {
            trip_service: Arc::new(trip_service),
            session: Arc::new(Mutex::new(session)),
            templates,
            config_notices: config_notices.into(),
        }
    }
}
