// =============================================================================
// Scoring Engines
// =============================================================================
//
// Every engine is the same weighted-layer aggregation driven by a
// `ScoringProfile`:
// - Basic confidence (four point layers, 200 daily bars)
// - Multi-timeframe confluence of two basic results
// - Advanced confidence (four layers per timeframe, blended across D/W/M)
// - Institutional signal (EMA stack, swings, volume accumulation, metrics)
// - Deep analysis (order flow, regime, liquidity, smart money, ...)
//
// Engines never fail on short input; they return the profile's fallback.

pub mod advanced;
pub mod confidence;
pub mod confluence;
pub mod deep;
pub mod institutional;
pub mod profile;
pub mod weighted_score;

pub use advanced::{compute_advanced, AdvancedResult, TimeframeBars};
pub use confidence::{compute_confidence, ConfidenceResult};
pub use confluence::{compute_confluence, ConfluenceResult};
pub use deep::{compute_deep, DeepAnalysis};
pub use institutional::{compute_institutional, InstitutionalSignal};
pub use profile::{ConfluenceProfile, ScoringProfile};
pub use weighted_score::{final_score, ScoringResult, WeightedScorer};
