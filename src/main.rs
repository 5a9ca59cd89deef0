// =============================================================================
// Signal Confidence — Main Entry Point
// =============================================================================
//
// Serves the scoring engines over HTTP.  Bars arrive in the request body; the
// service fetches nothing and persists nothing but its config file.
// =============================================================================

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use signal_confidence::api;
use signal_confidence::app_state::AppState;
use signal_confidence::config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Signal Confidence starting up");

    // ── 2. Config ────────────────────────────────────────────────────────
    let config_path = RuntimeConfig::path_from_env();
    let mut config = RuntimeConfig::load_or_default(&config_path);
    config.apply_env_overrides();

    info!(
        config = %config_path.display(),
        bind_addr = %config.bind_addr,
        benchmark = %config.benchmark_symbol,
        max_recent_analyses = config.max_recent_analyses,
        "Configuration ready"
    );

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config));

    // ── 3. API server ────────────────────────────────────────────────────
    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .context("API server failed")?;

    info!("Signal Confidence stopped");
    Ok(())
}
