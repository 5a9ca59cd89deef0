// =============================================================================
// Signal Confidence
// =============================================================================
//
// Scores a stock's daily (and optionally weekly / monthly) price history into
// a 0-100 confidence value with a grade and a directional bias.  Indicators
// feed layer analyzers; profile-driven engines weight the layers into a
// final signal.  The `api` module serves the engines over HTTP.

pub mod api;
pub mod app_state;
pub mod config;
pub mod engine;
pub mod indicators;
pub mod layers;
pub mod market_data;
pub mod trade_setup;
pub mod types;
