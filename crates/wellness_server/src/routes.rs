//! HTTP routes for the wearables data server.

use axum::{Json, Router, extract::State, routing::get};

use crate::report::{HealthReport, build_report};
use crate::state::AppState;

pub const WELCOME: &str = "Welcome to Wearables Data Server. Use /health-data for API.";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/health-data", get(health_data))
        .with_state(state)
}

/// Root route to avoid 404 confusion for people poking the server.
async fn home() -> &'static str {
    WELCOME
}

/// Readiness probe.
async fn health() -> &'static str {
    "ok"
}

/// The aggregated daily report. Always 200: provider failures degrade to
/// per-metric fallbacks inside the orchestrator, never to error responses.
async fn health_data(State(state): State<AppState>) -> Json<HealthReport> {
    Json(build_report(state.client.as_ref(), &state.demographics).await)
}
