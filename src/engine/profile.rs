// =============================================================================
// Scoring Profiles — named weight / threshold tables per engine variant
// =============================================================================
//
// Every aggregation engine is driven by a profile: which layers it blends and
// with what weight, how timeframes are blended, and the score thresholds that
// map the final 0-100 score onto a grade, a bias and the descriptive labels.
//
// Thresholds differ between variants on purpose.  Each preset below is an
// independently observable behaviour and must not be unified with the others.
//
// Profiles are plain serde data so they can be overridden from the runtime
// configuration file.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::layers::LayerKind;
use crate::types::{Bias, Grade, Interval};

// =============================================================================
// Threshold scales
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStep<T> {
    pub min: f64,
    pub value: T,
}

/// Descending list of `min` thresholds; the first step with
/// `min <= score` wins, otherwise `floor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreScale<T> {
    pub steps: Vec<ScoreStep<T>>,
    pub floor: T,
}

impl<T: Clone> ScoreScale<T> {
    pub fn new(steps: Vec<(f64, T)>, floor: T) -> Self {
        Self {
            steps: steps
                .into_iter()
                .map(|(min, value)| ScoreStep { min, value })
                .collect(),
            floor,
        }
    }

    pub fn classify(&self, score: f64) -> T {
        self.steps
            .iter()
            .find(|step| score >= step.min)
            .map_or_else(|| self.floor.clone(), |step| step.value.clone())
    }
}

fn labels(steps: &[(f64, &str)], floor: &str) -> ScoreScale<String> {
    ScoreScale::new(
        steps.iter().map(|(min, v)| (*min, v.to_string())).collect(),
        floor.to_string(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    AtLeast,
    AtMost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule<T> {
    pub op: Comparison,
    pub threshold: f64,
    pub value: T,
}

/// Ordered threshold rules; the first matching rule wins, otherwise
/// `default`.
///
/// Bias tables mix "at least" and "at most" tests in an order that matters
/// (e.g. `>= 75` Bullish is checked before `<= 45` Bearish), so they cannot be
/// expressed as a single descending scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleScale<T> {
    pub rules: Vec<Rule<T>>,
    pub default: T,
}

impl<T: Clone> RuleScale<T> {
    pub fn new(rules: Vec<(Comparison, f64, T)>, default: T) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|(op, threshold, value)| Rule { op, threshold, value })
                .collect(),
            default,
        }
    }

    pub fn classify(&self, score: f64) -> T {
        self.rules
            .iter()
            .find(|rule| match rule.op {
                Comparison::AtLeast => score >= rule.threshold,
                Comparison::AtMost => score <= rule.threshold,
            })
            .map_or_else(|| self.default.clone(), |rule| rule.value.clone())
    }
}

pub type BiasScale = RuleScale<Bias>;

impl RuleScale<Bias> {
    /// >= 75 Bullish, <= 45 Bearish, <= 74 Neutral to Bullish,
    /// >= 46 Neutral to Bearish.
    pub fn basic() -> Self {
        use Comparison::*;
        Self::new(
            vec![
                (AtLeast, 75.0, Bias::Bullish),
                (AtMost, 45.0, Bias::Bearish),
                (AtMost, 74.0, Bias::NeutralToBullish),
                (AtLeast, 46.0, Bias::NeutralToBearish),
            ],
            Bias::Neutral,
        )
    }

    /// >= 75 Bullish, >= 60 Neutral to Bullish, <= 45 Bearish,
    /// <= 60 Neutral to Bearish.
    pub fn advanced() -> Self {
        use Comparison::*;
        Self::new(
            vec![
                (AtLeast, 75.0, Bias::Bullish),
                (AtLeast, 60.0, Bias::NeutralToBullish),
                (AtMost, 45.0, Bias::Bearish),
                (AtMost, 60.0, Bias::NeutralToBearish),
            ],
            Bias::Neutral,
        )
    }

    /// Three-way split used by direction-style outputs.
    pub fn three_way(bullish: f64, bearish: f64) -> Self {
        use Comparison::*;
        Self::new(
            vec![(AtLeast, bullish, Bias::Bullish), (AtMost, bearish, Bias::Bearish)],
            Bias::Neutral,
        )
    }
}

// =============================================================================
// Profiles
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerWeight {
    pub layer: LayerKind,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeWeight {
    pub interval: Interval,
    pub weight: f64,
}

fn layer_weights(weights: &[(LayerKind, f64)]) -> Vec<LayerWeight> {
    weights
        .iter()
        .map(|&(layer, weight)| LayerWeight { layer, weight })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringProfile {
    pub name: String,
    pub layers: Vec<LayerWeight>,
    /// Empty for single-timeframe engines.
    #[serde(default)]
    pub timeframes: Vec<TimeframeWeight>,
    pub grades: ScoreScale<Grade>,
    pub bias: BiasScale,
    #[serde(default)]
    pub confidence_labels: Option<ScoreScale<String>>,
    #[serde(default)]
    pub strength_labels: Option<ScoreScale<String>>,
    /// Per-timeframe trend label keyed on the trend layer score.
    #[serde(default)]
    pub trend_labels: Option<RuleScale<String>>,
    /// Daily bars required before the engine scores at all.
    pub min_bars: usize,
    /// Bars a secondary timeframe needs to take part in the blend.
    #[serde(default)]
    pub min_timeframe_bars: usize,
    /// Score reported when the daily series is too short.
    pub fallback_score: f64,
}

impl ScoringProfile {
    pub fn layer_weight(&self, kind: LayerKind) -> Option<f64> {
        self.layers.iter().find(|w| w.layer == kind).map(|w| w.weight)
    }

    /// SMA50/200 trend, RSI band, volume ratio and Fibonacci pivot points.
    pub fn basic() -> Self {
        Self {
            name: "basic".to_string(),
            layers: layer_weights(&[
                (LayerKind::Trend, 0.35),
                (LayerKind::Momentum, 0.25),
                (LayerKind::Volume, 0.20),
                (LayerKind::Fibonacci, 0.20),
            ]),
            timeframes: Vec::new(),
            grades: ScoreScale::new(
                vec![(90.0, Grade::APlus), (80.0, Grade::A), (70.0, Grade::B), (60.0, Grade::C)],
                Grade::D,
            ),
            bias: BiasScale::basic(),
            confidence_labels: None,
            strength_labels: None,
            trend_labels: None,
            min_bars: 200,
            min_timeframe_bars: 0,
            fallback_score: 0.0,
        }
    }

    /// Four-layer analysis blended over daily / weekly / monthly bars.
    pub fn advanced() -> Self {
        Self {
            name: "advanced".to_string(),
            layers: layer_weights(&[
                (LayerKind::Trend, 0.30),
                (LayerKind::Momentum, 0.25),
                (LayerKind::Structure, 0.25),
                (LayerKind::Volatility, 0.20),
            ]),
            timeframes: vec![
                TimeframeWeight { interval: Interval::Daily, weight: 0.40 },
                TimeframeWeight { interval: Interval::Weekly, weight: 0.35 },
                TimeframeWeight { interval: Interval::Monthly, weight: 0.25 },
            ],
            grades: ScoreScale::new(
                vec![(90.0, Grade::APlus), (80.0, Grade::A), (70.0, Grade::B), (60.0, Grade::C)],
                Grade::D,
            ),
            bias: BiasScale::advanced(),
            confidence_labels: Some(labels(
                &[(80.0, "Very High"), (70.0, "High"), (60.0, "Medium-High"), (50.0, "Medium")],
                "Low",
            )),
            strength_labels: None,
            trend_labels: Some(RuleScale::new(
                vec![
                    (Comparison::AtLeast, 70.0, "Strong Up".to_string()),
                    (Comparison::AtLeast, 55.0, "Up".to_string()),
                    (Comparison::AtMost, 40.0, "Down".to_string()),
                ],
                "Ranging".to_string(),
            )),
            min_bars: 55,
            min_timeframe_bars: 35,
            fallback_score: 50.0,
        }
    }

    /// EMA stack + swing structure, momentum, accumulation and structure.
    pub fn institutional() -> Self {
        Self {
            name: "institutional".to_string(),
            layers: layer_weights(&[
                (LayerKind::Trend, 0.35),
                (LayerKind::Momentum, 0.30),
                (LayerKind::Volume, 0.20),
                (LayerKind::Structure, 0.15),
            ]),
            timeframes: Vec::new(),
            grades: ScoreScale::new(
                vec![
                    (85.0, Grade::APlus),
                    (80.0, Grade::A),
                    (75.0, Grade::BPlus),
                    (70.0, Grade::B),
                    (65.0, Grade::BMinus),
                    (60.0, Grade::CPlus),
                    (55.0, Grade::C),
                    (50.0, Grade::CMinus),
                    (45.0, Grade::DPlus),
                ],
                Grade::D,
            ),
            bias: BiasScale::three_way(65.0, 45.0),
            confidence_labels: Some(labels(
                &[(80.0, "VERY HIGH"), (70.0, "HIGH"), (55.0, "MEDIUM")],
                "LOW",
            )),
            strength_labels: Some(labels(&[(75.0, "STRONG"), (60.0, "MODERATE")], "WEAK")),
            trend_labels: None,
            min_bars: 60,
            min_timeframe_bars: 0,
            fallback_score: 50.0,
        }
    }

    pub fn trend_label(&self, trend_score: f64) -> Option<String> {
        Some(self.trend_labels.as_ref()?.classify(trend_score))
    }
}

/// Two-timeframe blend of basic confidence results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceProfile {
    pub name: String,
    pub daily_weight: f64,
    pub weekly_weight: f64,
    pub bias: BiasScale,
    /// Append "aligned" / "divergence" lines to the reasons.
    #[serde(default)]
    pub alignment_reasons: bool,
}

impl ConfluenceProfile {
    /// 60% daily, 40% weekly with the basic bias table.
    pub fn chart() -> Self {
        Self {
            name: "chart".to_string(),
            daily_weight: 0.6,
            weekly_weight: 0.4,
            bias: BiasScale::basic(),
            alignment_reasons: false,
        }
    }

    /// 40% daily, 60% weekly; >= 65 Bullish, <= 35 Bearish.
    pub fn multi_timeframe() -> Self {
        Self {
            name: "multi_timeframe".to_string(),
            daily_weight: 0.4,
            weekly_weight: 0.6,
            bias: BiasScale::three_way(65.0, 35.0),
            alignment_reasons: true,
        }
    }
}
