//! Tripdash HTTP server
//!
//! Serves the trip-planning dashboard.

use std::{sync::Arc, time::Duration};

use application::{Notice, TripService};
use infrastructure::{
    AppConfig, FuelStationAdapter, GeocodingAdapter, RoutingAdapter, TemplateEngine,
    init_telemetry,
};
use presentation_http::{routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

/// Largest accepted form body
const MAX_BODY_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = AppConfig::load();
    let config = &loaded.config;

    init_telemetry(&config.logging)?;

    info!("Tripdash v{} starting...", env!("CARGO_PKG_VERSION"));
    for notice in &loaded.notices {
        if notice.is_user_visible() {
            warn!(key = %notice.key, "{notice}");
        } else {
            debug!(key = %notice.key, "{notice}");
        }
    }

    info!(
        host = %config.server.host,
        port = %config.server.port,
        nominatim = %config.services.nominatim.base_url,
        osrm = %config.services.osrm.base_url,
        overpass = %config.services.overpass.interpreter_url,
        "Configuration loaded"
    );

    // External services
    let geocoder = GeocodingAdapter::new(&config.services.nominatim)
        .map_err(|e| anyhow::anyhow!("Failed to initialize geocoding: {e}"))?;
    let router = RoutingAdapter::new(&config.services.osrm)
        .map_err(|e| anyhow::anyhow!("Failed to initialize routing: {e}"))?;
    let fuel_stations = FuelStationAdapter::new(&config.services.overpass)
        .map_err(|e| anyhow::anyhow!("Failed to initialize fuel station search: {e}"))?;

    let trip_service = TripService::new(
        Arc::new(geocoder),
        Arc::new(router),
        Arc::new(fuel_stations),
        config.dashboard.map_style.clone(),
    );

    let templates = TemplateEngine::new()?;
    let config_notices = loaded
        .visible_notices()
        .map(|n| Notice::warning(n.to_string()))
        .collect();

    let state = AppState::new(
        trip_service,
        &config.dashboard.defaults,
        templates,
        config_notices,
    );

    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!("Dashboard listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
}
