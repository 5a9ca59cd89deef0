// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`.  Analysis endpoints take raw feed bars,
// sanitise them, run one engine synchronously and answer with an
// `AnalysisEnvelope`.  A request whose primary series has no usable bar is
// answered with `400 {"error": ...}`.
//
// CORS is configured permissively; the service holds no credentials.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::api::envelope::{AnalysisEnvelope, AnalysisRecord, EngineKind};
use crate::app_state::AppState;
use crate::engine::{
    compute_advanced, compute_confidence, compute_confluence, compute_deep,
    compute_institutional, ConfluenceResult, TimeframeBars,
};
use crate::market_data::{sanitize_bars, sanitize_news, Bar, RawBar, RawNewsItem};
use crate::trade_setup::generate_trade_setup;

type ApiError = (StatusCode, Json<serde_json::Value>);

fn bad_request(message: impl Into<String>) -> ApiError {
    let message = message.into();
    warn!(error = %message, "request rejected");
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
}

/// Sanitise the primary series; an empty result rejects the request.
fn primary_bars(raw: &[RawBar], what: &str) -> Result<Vec<Bar>, ApiError> {
    let bars = sanitize_bars(raw);
    if bars.is_empty() {
        return Err(bad_request(format!("no usable {what} bars")));
    }
    Ok(bars)
}

fn optional_bars(raw: Option<&Vec<RawBar>>) -> Vec<Bar> {
    raw.map(|r| sanitize_bars(r)).unwrap_or_default()
}

fn symbol_or_default(symbol: Option<String>) -> String {
    symbol
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/profiles", get(profiles))
        .route("/api/v1/analyses", get(analyses))
        // ── Engines ─────────────────────────────────────────────────
        .route("/api/v1/analyze/confidence", post(analyze_confidence))
        .route("/api/v1/analyze/advanced", post(analyze_advanced))
        .route("/api/v1/analyze/institutional", post(analyze_institutional))
        .route("/api/v1/analyze/deep", post(analyze_deep))
        .route("/api/v1/trade-setup", post(trade_setup))
        // ── Middleware & State ───────────────────────────────────────
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health / profiles / analysis log
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    server_time: i64,
    uptime_secs: u64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        server_time: chrono::Utc::now().timestamp_millis(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn profiles(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.config();
    Json(serde_json::json!({
        "benchmark_symbol": config.benchmark_symbol,
        "basic": config.basic,
        "advanced": config.advanced,
        "institutional": config.institutional,
        "chart": config.chart,
        "multi_timeframe": config.multi_timeframe,
    }))
}

async fn analyses(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.recent())
}

// =============================================================================
// Basic confidence + confluence
// =============================================================================

#[derive(Deserialize)]
struct ConfidenceRequest {
    #[serde(default)]
    symbol: Option<String>,
    daily: Vec<RawBar>,
    #[serde(default)]
    weekly: Option<Vec<RawBar>>,
}

#[derive(Serialize)]
struct ConfidenceResponse {
    multi_timeframe: ConfluenceResult,
    chart: ConfluenceResult,
}

async fn analyze_confidence(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConfidenceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let daily_bars = primary_bars(&req.daily, "daily")?;
    let weekly_bars = optional_bars(req.weekly.as_ref());
    let config = state.config();

    let daily = compute_confidence(&config.basic, &daily_bars);
    let weekly = (!weekly_bars.is_empty()).then(|| compute_confidence(&config.basic, &weekly_bars));

    let multi = compute_confluence(&config.multi_timeframe, &daily, weekly.as_ref());
    let chart = compute_confluence(&config.chart, &daily, weekly.as_ref());

    let record = AnalysisRecord::new(
        symbol_or_default(req.symbol),
        EngineKind::Confidence,
        Some(multi.score),
        Some(multi.bias),
    );
    info!(
        symbol = %record.symbol,
        score = multi.score,
        bias = %multi.bias,
        daily_bars = daily_bars.len(),
        weekly_bars = weekly_bars.len(),
        "confidence analysis complete"
    );
    state.push_analysis(record.clone());

    Ok(Json(AnalysisEnvelope::new(
        record,
        ConfidenceResponse {
            multi_timeframe: multi,
            chart,
        },
    )))
}

// =============================================================================
// Advanced confidence
// =============================================================================

#[derive(Deserialize)]
struct AdvancedRequest {
    #[serde(default)]
    symbol: Option<String>,
    daily: Vec<RawBar>,
    #[serde(default)]
    weekly: Option<Vec<RawBar>>,
    #[serde(default)]
    monthly: Option<Vec<RawBar>>,
}

async fn analyze_advanced(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AdvancedRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let daily = primary_bars(&req.daily, "daily")?;
    let weekly = optional_bars(req.weekly.as_ref());
    let monthly = optional_bars(req.monthly.as_ref());
    let config = state.config();

    let result = compute_advanced(
        &config.advanced,
        TimeframeBars {
            daily: &daily,
            weekly: &weekly,
            monthly: &monthly,
        },
    );

    let record = AnalysisRecord::new(
        symbol_or_default(req.symbol),
        EngineKind::Advanced,
        Some(result.final_score),
        Some(result.bias),
    );
    info!(
        symbol = %record.symbol,
        score = result.final_score,
        grade = %result.grade,
        timeframes = result.timeframes.len(),
        "advanced analysis complete"
    );
    state.push_analysis(record.clone());

    Ok(Json(AnalysisEnvelope::new(record, result)))
}

// =============================================================================
// Institutional signal
// =============================================================================

#[derive(Deserialize)]
struct InstitutionalRequest {
    symbol: String,
    daily: Vec<RawBar>,
    #[serde(default)]
    market: Option<Vec<RawBar>>,
    #[serde(default)]
    news: Option<Vec<RawNewsItem>>,
}

async fn analyze_institutional(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InstitutionalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let daily = primary_bars(&req.daily, "daily")?;
    let market = optional_bars(req.market.as_ref());
    let news = req.news.as_deref().map(sanitize_news).unwrap_or_default();
    let config = state.config();
    let symbol = symbol_or_default(Some(req.symbol));

    let signal = compute_institutional(&config.institutional, &symbol, &daily, &market, &news);

    let record = AnalysisRecord::new(
        symbol,
        EngineKind::Institutional,
        Some(signal.signal.score),
        Some(signal.signal.direction.bias()),
    );
    info!(
        symbol = %record.symbol,
        score = signal.signal.score,
        direction = %signal.signal.direction,
        benchmark = %config.benchmark_symbol,
        benchmark_bars = market.len(),
        "institutional analysis complete"
    );
    state.push_analysis(record.clone());

    Ok(Json(AnalysisEnvelope::new(record, signal)))
}

// =============================================================================
// Deep analysis
// =============================================================================

#[derive(Deserialize)]
struct DeepRequest {
    #[serde(default)]
    symbol: Option<String>,
    daily: Vec<RawBar>,
    #[serde(default)]
    market: Option<Vec<RawBar>>,
}

async fn analyze_deep(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeepRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let daily = primary_bars(&req.daily, "daily")?;
    let market = optional_bars(req.market.as_ref());

    let deep = compute_deep(&daily, &market);

    let record = AnalysisRecord::new(symbol_or_default(req.symbol), EngineKind::Deep, None, None);
    info!(
        symbol = %record.symbol,
        available = deep.available(),
        "deep analysis complete"
    );
    state.push_analysis(record.clone());

    Ok(Json(AnalysisEnvelope::new(record, deep)))
}

// =============================================================================
// Trade setup
// =============================================================================

#[derive(Deserialize)]
struct TradeSetupRequest {
    price: f64,
    atr: f64,
    #[serde(default)]
    ema21: Option<f64>,
}

async fn trade_setup(Json(req): Json<TradeSetupRequest>) -> Result<impl IntoResponse, ApiError> {
    generate_trade_setup(req.price, req.atr, req.ema21)
        .map(Json)
        .ok_or_else(|| bad_request("price and atr must be positive and finite"))
}
