// =============================================================================
// HTTP API
// =============================================================================

pub mod envelope;
pub mod rest;

pub use envelope::{AnalysisEnvelope, AnalysisRecord, EngineKind};
pub use rest::router;
