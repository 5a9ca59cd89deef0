// =============================================================================
// Weighted Scorer — profile-driven layer aggregation
// =============================================================================
//
// Blends layer scores with the weights of a scoring profile.  The weighted sum
// is divided by the total weight of the layers actually supplied, so a
// profile whose weights sum to 1 yields the plain weighted sum and a missing
// layer has its weight redistributed over the others.

use serde::{Deserialize, Serialize};

use crate::layers::{LayerKind, LayerResult};

use super::profile::{LayerWeight, ScoringProfile};

/// The contribution of a single layer to the final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerContribution {
    pub layer: LayerKind,
    pub weight: f64,
    pub score: f64,
    /// `weight * score`
    pub contribution: f64,
}

/// Result of the weighted scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// Unrounded weighted mean.
    pub total_score: f64,
    /// `total_score` rounded and clamped to 0..=100.
    pub score: u8,
    pub contributions: Vec<LayerContribution>,
}

/// Round a score to the nearest integer in 0..=100.  Non-finite input is
/// treated as neutral.
pub fn final_score(value: f64) -> u8 {
    if !value.is_finite() {
        return 50;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// Weighted mean of `(weight, value)` pairs, normalised by the total weight.
/// `None` when no positive weight is present.
pub fn weighted_mean(pairs: &[(f64, f64)]) -> Option<f64> {
    let total_weight: f64 = pairs.iter().map(|(w, _)| w).sum();
    if total_weight <= 0.0 {
        return None;
    }
    Some(pairs.iter().map(|(w, v)| w * v).sum::<f64>() / total_weight)
}

pub struct WeightedScorer {
    weights: Vec<LayerWeight>,
}

impl WeightedScorer {
    pub fn new(weights: Vec<LayerWeight>) -> Self {
        Self { weights }
    }

    pub fn from_profile(profile: &ScoringProfile) -> Self {
        Self::new(profile.layers.clone())
    }

    /// Score the supplied layers.  Layers the profile does not weight are
    /// ignored; weighted layers that were not supplied drop out of the
    /// normalisation.
    pub fn score(&self, layers: &[LayerResult]) -> ScoringResult {
        let mut contributions = Vec::with_capacity(self.weights.len());

        for weight in &self.weights {
            let Some(layer) = layers.iter().find(|l| l.kind == weight.layer) else {
                continue;
            };
            contributions.push(LayerContribution {
                layer: weight.layer,
                weight: weight.weight,
                score: layer.score,
                contribution: weight.weight * layer.score,
            });
        }

        let pairs: Vec<(f64, f64)> = contributions.iter().map(|c| (c.weight, c.score)).collect();
        let total_score = weighted_mean(&pairs).unwrap_or(50.0);

        ScoringResult {
            total_score,
            score: final_score(total_score),
            contributions,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn layer(kind: LayerKind, score: f64) -> LayerResult {
        LayerResult::new(kind, score, Vec::new())
    }

    #[test]
    fn weighted_sum_with_full_weights() {
        let scorer = WeightedScorer::from_profile(&ScoringProfile::advanced());
        let result = scorer.score(&[
            layer(LayerKind::Trend, 80.0),
            layer(LayerKind::Momentum, 60.0),
            layer(LayerKind::Structure, 52.0),
            layer(LayerKind::Volatility, 65.0),
        ]);
        // 24 + 15 + 13 + 13
        assert!((result.total_score - 65.0).abs() < 1e-10);
        assert_eq!(result.score, 65);
        assert_eq!(result.contributions.len(), 4);
    }

    #[test]
    fn missing_layer_weight_is_redistributed() {
        let scorer = WeightedScorer::new(vec![
            LayerWeight { layer: LayerKind::Trend, weight: 0.5 },
            LayerWeight { layer: LayerKind::Momentum, weight: 0.5 },
        ]);
        let result = scorer.score(&[layer(LayerKind::Trend, 70.0)]);
        assert_eq!(result.score, 70);
    }

    #[test]
    fn unweighted_layers_are_ignored() {
        let scorer = WeightedScorer::new(vec![LayerWeight {
            layer: LayerKind::Trend,
            weight: 1.0,
        }]);
        let result = scorer.score(&[layer(LayerKind::Trend, 40.0), layer(LayerKind::Volume, 100.0)]);
        assert_eq!(result.score, 40);
        assert_eq!(result.contributions.len(), 1);
    }

    #[test]
    fn empty_input_is_neutral() {
        let scorer = WeightedScorer::from_profile(&ScoringProfile::basic());
        assert_eq!(scorer.score(&[]).score, 50);
    }

    #[test]
    fn final_score_bounds() {
        assert_eq!(final_score(-3.0), 0);
        assert_eq!(final_score(100.4), 100);
        assert_eq!(final_score(72.5), 73);
        assert_eq!(final_score(f64::NAN), 50);
    }
}
