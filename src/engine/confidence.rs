// =============================================================================
// Basic Confidence Engine
// =============================================================================
//
// Four point layers (trend, momentum, volume, Fibonacci pivot) blended with
// the basic profile.  Needs the profile's `min_bars` (200, for SMA200);
// anything shorter returns the neutral fallback with an "Insufficient data"
// reason instead of a score.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layers::basic::{fibonacci_points, momentum_points, trend_points, volume_points};
use crate::layers::{AnalysisContext, LayerResult};
use crate::market_data::Bar;
use crate::types::{Bias, Grade};

use super::profile::ScoringProfile;
use super::weighted_score::{final_score, LayerContribution, WeightedScorer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceResult {
    pub score: u8,
    pub grade: Grade,
    pub bias: Bias,
    pub reasons: Vec<String>,
    /// Per-layer contribution; for the basic profile this is the point total
    /// of each layer.
    pub breakdown: Vec<LayerContribution>,
    pub layers: Vec<LayerResult>,
    pub bars: usize,
    /// False when the input was too short and this is the fallback result.
    pub sufficient: bool,
}

impl ConfidenceResult {
    pub fn insufficient(profile: &ScoringProfile, bars: usize) -> Self {
        let score = final_score(profile.fallback_score);
        Self {
            score,
            grade: profile.grades.classify(score as f64),
            bias: Bias::Neutral,
            reasons: vec!["Insufficient data".to_string()],
            breakdown: Vec::new(),
            layers: Vec::new(),
            bars,
            sufficient: false,
        }
    }
}

pub fn compute_confidence(profile: &ScoringProfile, bars: &[Bar]) -> ConfidenceResult {
    if bars.len() < profile.min_bars.max(1) {
        debug!(
            profile = %profile.name,
            bars = bars.len(),
            required = profile.min_bars,
            "Confidence fallback: insufficient data"
        );
        return ConfidenceResult::insufficient(profile, bars.len());
    }

    let ctx = AnalysisContext::new(bars);
    let point_layers = [
        trend_points(&ctx),
        momentum_points(&ctx),
        volume_points(&ctx),
        fibonacci_points(&ctx),
    ];

    let layers: Vec<LayerResult> = point_layers.iter().map(|p| p.layer.clone()).collect();
    let reasons: Vec<String> = point_layers.iter().map(|p| p.reason.clone()).collect();

    let scoring = WeightedScorer::from_profile(profile).score(&layers);
    let score = scoring.score;

    debug!(
        profile = %profile.name,
        trend = point_layers[0].points,
        momentum = point_layers[1].points,
        volume = point_layers[2].points,
        fibonacci = point_layers[3].points,
        score,
        "Confidence scored"
    );

    ConfidenceResult {
        score,
        grade: profile.grades.classify(score as f64),
        bias: profile.bias.classify(score as f64),
        reasons,
        breakdown: scoring.contributions,
        layers,
        bars: bars.len(),
        sufficient: true,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayerKind;
    use crate::market_data::fixtures;

    #[test]
    fn short_history_falls_back() {
        let profile = ScoringProfile::basic();
        let result = compute_confidence(&profile, &fixtures::rising(199, 100.0, 1.0));
        assert!(!result.sufficient);
        assert_eq!(result.score, 0);
        assert_eq!(result.bias, Bias::Neutral);
        assert_eq!(result.reasons, vec!["Insufficient data".to_string()]);
    }

    #[test]
    fn empty_input_falls_back() {
        let result = compute_confidence(&ScoringProfile::basic(), &[]);
        assert!(!result.sufficient);
        assert_eq!(result.bars, 0);
    }

    #[test]
    fn steady_uptrend_scores_points() {
        // closes 101..=400
        let bars = fixtures::rising(300, 101.0, 1.0);
        let result = compute_confidence(&ScoringProfile::basic(), &bars);
        assert!(result.sufficient);

        let points = |kind: LayerKind| {
            result
                .breakdown
                .iter()
                .find(|c| c.layer == kind)
                .map(|c| c.contribution.round())
                .unwrap()
        };
        assert_eq!(points(LayerKind::Trend), 35.0);
        // RSI pinned at 100: outside the 60-70 sweet spot.
        assert_eq!(points(LayerKind::Momentum), 18.0);
        assert_eq!(points(LayerKind::Volume), 8.0);
        assert_eq!(points(LayerKind::Fibonacci), 14.0);

        assert_eq!(result.score, 75);
        assert_eq!(result.bias, Bias::Bullish);
        assert_eq!(result.grade, Grade::B);
        assert_eq!(
            result.reasons,
            vec![
                "Short-term trend is clearly above long-term average",
                "Momentum supports continuation",
                "Volume participation is average or low",
                "Price is holding above key Fibonacci structure",
            ]
        );
    }

    #[test]
    fn score_is_always_in_range() {
        for bars in [
            fixtures::wave(260, 80.0, 0.1),
            fixtures::falling(260, 400.0, 1.0),
            fixtures::flat(260, 10.0),
        ] {
            let result = compute_confidence(&ScoringProfile::basic(), &bars);
            assert!(result.score <= 100);
            assert!(result.sufficient);
        }
    }
}
