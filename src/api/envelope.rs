// =============================================================================
// Analysis Envelope — auditable record of every analysis served
// =============================================================================
//
// Every analysis response is wrapped in an envelope carrying a UUID v4 and an
// RFC 3339 timestamp.  The `AnalysisRecord` half (without the payload) is what
// the in-memory log keeps.
// =============================================================================

use serde::Serialize;

use crate::types::Bias;

/// Which engine produced the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Confidence,
    Advanced,
    Institutional,
    Deep,
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confidence => write!(f, "confidence"),
            Self::Advanced => write!(f, "advanced"),
            Self::Institutional => write!(f, "institutional"),
            Self::Deep => write!(f, "deep"),
        }
    }
}

/// Summary of one analysis, kept in the recent-analyses log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRecord {
    /// Unique identifier for this analysis (UUID v4).
    pub id: String,
    pub symbol: String,
    pub engine: EngineKind,
    /// Headline score; absent for deep analysis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bias: Option<Bias>,
    /// ISO 8601 timestamp of when the analysis was produced.
    pub created_at: String,
}

impl AnalysisRecord {
    pub fn new(
        symbol: impl Into<String>,
        engine: EngineKind,
        score: Option<u8>,
        bias: Option<Bias>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            symbol: symbol.into(),
            engine,
            score,
            bias,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body: the record fields flattened next to the engine result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisEnvelope<T: Serialize> {
    #[serde(flatten)]
    pub record: AnalysisRecord,
    pub result: T,
}

impl<T: Serialize> AnalysisEnvelope<T> {
    pub fn new(record: AnalysisRecord, result: T) -> Self {
        Self { record, result }
    }
}
