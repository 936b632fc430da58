//! Template engine module for rendering the dashboard page
//!
//! Uses the Tera templating engine. Templates are compiled into the binary;
//! HTML templates are auto-escaped.
//!
//! # Example
//!
//! ```rust,ignore
//! use infrastructure::templates::{DashboardPage, TemplateEngine};
//!
//! let engine = TemplateEngine::new()?;
//! let html = engine.render_dashboard(&DashboardPage::new(&session, dashboard, notices))?;
//! ```

use std::{collections::HashMap, sync::Arc};

use application::{
    CoordinateInput, Dashboard, InputMode, Notice, TripSession, WaypointEditor,
    services::session::{MAX_FUEL_RADIUS_KM, MIN_FUEL_EFFICIENCY_KM_L, MIN_FUEL_RADIUS_KM},
};
use serde::Serialize;
use tera::{Context, Tera, Value};
use thiserror::Error;
use tracing::debug;

/// Date format of the departure date field
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";
/// Time format of the departure time field
pub const TIME_INPUT_FORMAT: &str = "%H:%M";

const DASHBOARD_TEMPLATE: &str = "dashboard.html";

/// Error type for template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template not found
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template rendering failed
    #[error("Template rendering failed: {0}")]
    Render(String),

    /// Template compilation failed
    #[error("Template compilation failed: {0}")]
    Compile(String),
}

impl From<tera::Error> for TemplateError {
    fn from(e: tera::Error) -> Self {
        match e.kind {
            tera::ErrorKind::TemplateNotFound(name) => Self::NotFound(name),
            _ => Self::Render(format!("{e:?}")),
        }
    }
}

/// Template context wrapper for type-safe context building
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    inner: Context,
}

impl TemplateContext {
    /// Create a new empty template context
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Context::new(),
        }
    }

    /// Insert a value into the context
    pub fn insert<T: Serialize>(&mut self, key: &str, value: &T) {
        self.inner.insert(key, value);
    }

    /// Build a context from a serializable struct's fields
    ///
    /// # Errors
    ///
    /// Returns an error if `value` does not serialize to an object.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, TemplateError> {
        Context::from_serialize(value)
            .map(|inner| Self { inner })
            .map_err(|e| TemplateError::Render(e.to_string()))
    }
}

/// Sidebar option values as the form shows them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionsView {
    pub show_alternatives: bool,
    pub show_fuel_stations: bool,
    pub fuel_radius_km: u32,
    pub min_fuel_radius_km: u32,
    pub max_fuel_radius_km: u32,
    pub departure_date: String,
    pub departure_time: String,
    pub fuel_efficiency_km_l: f64,
    pub min_fuel_efficiency_km_l: f64,
    pub fuel_price_per_l: f64,
}

/// Dashboard page template data
#[derive(Debug, Clone, Serialize)]
pub struct DashboardPage {
    pub version: &'static str,
    pub input_mode: InputMode,
    pub start_place: String,
    pub end_place: String,
    pub coordinates: CoordinateInput,
    pub waypoints: Vec<String>,
    pub editor_open: bool,
    pub options: OptionsView,
    pub dashboard: Dashboard,
    /// Shown above the dashboard's own notices
    pub notices: Vec<Notice>,
}

impl DashboardPage {
    /// Page data for the current session state
    #[must_use]
    pub fn new(session: &TripSession, dashboard: Dashboard, notices: Vec<Notice>) -> Self {
        let options = session.options();
        Self {
            version: env!("CARGO_PKG_VERSION"),
            input_mode: session.input_mode(),
            start_place: session.start_place().to_string(),
            end_place: session.end_place().to_string(),
            coordinates: session.coordinates(),
            waypoints: session.waypoints().to_vec(),
            editor_open: session.editor() == WaypointEditor::AddingDestination,
            options: OptionsView {
                show_alternatives: options.show_alternatives,
                show_fuel_stations: options.show_fuel_stations,
                fuel_radius_km: options.fuel_radius_km,
                min_fuel_radius_km: MIN_FUEL_RADIUS_KM,
                max_fuel_radius_km: MAX_FUEL_RADIUS_KM,
                departure_date: options.departure.format(DATE_INPUT_FORMAT).to_string(),
                departure_time: options.departure.format(TIME_INPUT_FORMAT).to_string(),
                fuel_efficiency_km_l: options.vehicle.fuel_efficiency_km_l,
                min_fuel_efficiency_km_l: MIN_FUEL_EFFICIENCY_KM_L,
                fuel_price_per_l: options.vehicle.fuel_price_per_l,
            },
            dashboard,
            notices,
        }
    }
}

/// Embedded templates - compiled into the binary
mod embedded {
    pub const DASHBOARD: &str = include_str!("embedded/dashboard.html");
}

/// Template engine using Tera
#[derive(Clone)]
pub struct TemplateEngine {
    tera: Arc<Tera>,
}

impl std::fmt::Debug for TemplateEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEngine")
            .field("templates", &self.tera.get_template_names().count())
            .finish_non_exhaustive()
    }
}

impl TemplateEngine {
    /// Create a template engine with the embedded templates
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded template fails to compile.
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);

        tera.register_filter("json_script", json_script_filter);
        tera.add_raw_template(DASHBOARD_TEMPLATE, embedded::DASHBOARD)
            .map_err(|e| TemplateError::Compile(format!("{e:?}")))?;

        debug!("Template engine initialized");
        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// Render a template with the given context
    ///
    /// # Errors
    ///
    /// Returns an error if the template is unknown or rendering fails.
    pub fn render(
        &self,
        template_name: &str,
        context: &TemplateContext,
    ) -> Result<String, TemplateError> {
        self.tera
            .render(template_name, &context.inner)
            .map_err(TemplateError::from)
    }

    /// Render the dashboard page
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render_dashboard(&self, page: &DashboardPage) -> Result<String, TemplateError> {
        let ctx = TemplateContext::from_serialize(page)?;
        self.render(DASHBOARD_TEMPLATE, &ctx)
    }

    /// Check if a template exists
    #[must_use]
    pub fn template_exists(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }
}

/// Custom filter: serialize to JSON that is safe inside a `<script>` element
fn json_script_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let json = serde_json::to_string(value).map_err(tera::Error::json)?;
    let escaped = json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026");
    Ok(Value::String(escaped))
}
