// =============================================================================
// Volume / Accumulation Layer
// =============================================================================
//
// Accumulation = latest volume more than 1.2x its 20-bar mean, an up close,
// and OBV higher than 20 bars ago.
//
//   ratio >= 1.5 with accumulation   85
//   ratio >= 1.2 with accumulation   70
//   ratio < 0.8                      40
//   otherwise                        50

use serde::Serialize;

use crate::indicators::volume::{calculate_obv, volume_ratio, DEFAULT_LOOKBACK};
use crate::types::SignalKind;

use super::{AnalysisContext, Component, LayerKind, LayerResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeAnalysis {
    pub score: f64,
    pub ratio: Option<f64>,
    pub accumulation: bool,
    pub description: String,
}

impl VolumeAnalysis {
    pub fn to_layer(&self) -> LayerResult {
        let signal = if self.accumulation {
            SignalKind::Bullish
        } else if self.score < 50.0 {
            SignalKind::Bearish
        } else {
            SignalKind::Neutral
        };
        LayerResult::new(
            LayerKind::Volume,
            self.score,
            vec![Component::new(
                "Volume Accumulation",
                self.score,
                signal,
                self.description.clone(),
            )],
        )
    }
}

pub fn volume_accumulation(ctx: &AnalysisContext<'_>) -> VolumeAnalysis {
    let n = ctx.len();
    let ratio = if n >= DEFAULT_LOOKBACK {
        volume_ratio(&ctx.volumes, DEFAULT_LOOKBACK)
    } else {
        None
    };
    let Some(ratio) = ratio else {
        return VolumeAnalysis {
            score: 50.0,
            ratio: None,
            accumulation: false,
            description: "Insufficient data for volume analysis".to_string(),
        };
    };

    let obv = calculate_obv(ctx.bars);
    let obv_rising = obv[n - 1] > obv[n - DEFAULT_LOOKBACK];
    let price_up = ctx.close_back(1).map_or(false, |prev| ctx.closes[n - 1] > prev);
    let accumulation = ratio > 1.2 && price_up && obv_rising;

    let excess = (ratio - 1.0) * 100.0;
    let (score, description) = if ratio >= 1.5 && accumulation {
        (
            85.0,
            format!("Strong accumulation: {excess:.0}% above average on green days"),
        )
    } else if ratio >= 1.2 && accumulation {
        (
            70.0,
            format!("Moderate accumulation: {excess:.0}% above average volume"),
        )
    } else if ratio < 0.8 {
        (40.0, "Below-average volume, weak participation".to_string())
    } else {
        (50.0, "Average volume participation".to_string())
    };

    VolumeAnalysis {
        score,
        ratio: Some(ratio),
        accumulation,
        description,
    }
}
