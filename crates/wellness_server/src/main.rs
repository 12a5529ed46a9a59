use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::response::IntoResponse;
use axum::routing::get;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use google_fit_client::auth::OAuthTokenProvider;
use google_fit_client::config::Config;
use google_fit_client::http_client::ReqwestGoogleFitClient;
use wellness_server::bmr::Demographics;
use wellness_server::routes;
use wellness_server::state::AppState;

async fn metrics(handle: PrometheusHandle) -> impl IntoResponse {
    let body = handle.render();
    ([("content-type", "text/plain; version=0.0.4")], body)
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Configure logging from env var `WELLNESS_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("WELLNESS_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(env_filter)
        .init();
    tracing::info!("wellness_server: log filter: {}", log_env);

    // A broken credential setup is fatal at startup; the server refuses to
    // begin serving rather than answer every request with fallbacks.
    let cfg = Config::from_env().context("loading Google Fit credentials")?;
    let tokens = Arc::new(OAuthTokenProvider::from_config(&cfg));
    let client = Arc::new(ReqwestGoogleFitClient::new(&cfg.base_url, tokens));
    let demographics = Demographics::from_env();

    // Install prometheus recorder
    let builder = PrometheusBuilder::new();
    let handle = builder.install_recorder()?;

    // CORS stays permissive: the report is consumed by a browser dashboard.
    let app = routes::router(AppState::new(client, demographics))
        .route("/metrics", get(move || metrics(handle.clone())))
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    let addr: SocketAddr = std::env::var("ADDRESS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 5000)));
    tracing::info!(%addr, "starting wearables data server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            signal::ctrl_c()
                .await
                .expect("failed to install ctrl+c handler");
        })
        .await
        .context("server error")?;
    Ok(())
}
