//! Traffic & Website Analytics Dashboard — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use traffic_analytics_dashboard::api::{self, AppState};
use traffic_analytics_dashboard::config::DashboardConfig;
use traffic_analytics_dashboard::http::ReqwestFetcher;
use traffic_analytics_dashboard::metrics::Metrics;
use traffic_analytics_dashboard::traffic::GRID_POINTS;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - DASHBOARD_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("DASHBOARD_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("traffic_analytics_dashboard=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments. This enables
    // SEO_API_KEY / DASHBOARD_CONFIG_PATH from .env.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let config = DashboardConfig::load_default().expect("Failed to load dashboard config");
    let fetcher =
        ReqwestFetcher::new(&config.user_agent).expect("Failed to build the HTTP client");

    // Prometheus recorder + /metrics route.
    let metrics = Metrics::init(GRID_POINTS);

    let state = AppState::new(Arc::new(config), Arc::new(fetcher));
    let router = api::create_router(state).merge(metrics.router());

    Ok(router.into())
}
