// =============================================================================
// Layer Analyzers
// =============================================================================
//
// Each analyzer groups a handful of indicators into one semantic layer
// (trend, momentum, structure, ...) and scores it on 0-100 with a small,
// fixed decision tree.  Thresholds are product constants and live next to the
// rule that uses them.
//
// Analyzers never fail: a component whose indicator is not computable scores
// a neutral 50 and says so in its description.

pub mod basic;
pub mod context;
pub mod correlation;
pub mod liquidity;
pub mod microstructure;
pub mod momentum;
pub mod order_flow;
pub mod regime;
pub mod seasonality;
pub mod smart_money;
pub mod structure;
pub mod trend;
pub mod volatility;
pub mod volume;

use serde::{Deserialize, Serialize};

use crate::types::SignalKind;

pub use context::AnalysisContext;

/// Score given to a component whose inputs are not computable.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Slot a layer occupies in a scoring profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Trend,
    Momentum,
    Structure,
    Volatility,
    Volume,
    Fibonacci,
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trend => write!(f, "trend"),
            Self::Momentum => write!(f, "momentum"),
            Self::Structure => write!(f, "structure"),
            Self::Volatility => write!(f, "volatility"),
            Self::Volume => write!(f, "volume"),
            Self::Fibonacci => write!(f, "fibonacci"),
        }
    }
}

/// One scored reading inside a layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub value: f64,
    pub signal: SignalKind,
    pub description: String,
}

impl Component {
    pub fn new(
        name: impl Into<String>,
        value: f64,
        signal: SignalKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            signal,
            description: description.into(),
        }
    }

    /// Neutral placeholder for a component that could not be computed.
    pub fn unavailable(name: impl Into<String>, what: &str) -> Self {
        Self::new(
            name,
            NEUTRAL_SCORE,
            SignalKind::Neutral,
            format!("Insufficient data for {what}"),
        )
    }
}

/// A measured value with its plain-language reading, used by the deep
/// analysis layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub name: String,
    pub value: f64,
    pub description: String,
    pub interpretation: String,
}

impl Reading {
    pub fn new(
        name: impl Into<String>,
        value: f64,
        description: impl Into<String>,
        interpretation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            description: description.into(),
            interpretation: interpretation.into(),
        }
    }
}

/// Score and components of one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerResult {
    pub kind: LayerKind,
    pub score: f64,
    pub components: Vec<Component>,
}

impl LayerResult {
    pub fn new(kind: LayerKind, score: f64, components: Vec<Component>) -> Self {
        Self {
            kind,
            score: crate::indicators::clamp_score(score),
            components,
        }
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_score_is_clamped() {
        let layer = LayerResult::new(LayerKind::Trend, 140.0, Vec::new());
        assert_eq!(layer.score, 100.0);
    }

    #[test]
    fn unavailable_component_is_neutral() {
        let c = Component::unavailable("ADX Strength", "ADX");
        assert_eq!(c.value, NEUTRAL_SCORE);
        assert_eq!(c.signal, SignalKind::Neutral);
        assert_eq!(c.description, "Insufficient data for ADX");
    }

    #[test]
    fn lookup_by_name() {
        let layer = LayerResult::new(
            LayerKind::Momentum,
            60.0,
            vec![Component::new("RSI (14)", 60.0, SignalKind::Neutral, "RSI at 50.0")],
        );
        assert!(layer.component("RSI (14)").is_some());
        assert!(layer.component("MACD Histogram").is_none());
        assert_eq!(LayerKind::Volume.to_string(), "volume");
    }
}
