// =============================================================================
// Advanced Confidence Engine
// =============================================================================
//
// Runs the trend / momentum / structure / volatility layers on every
// timeframe of the profile, scores each timeframe, then blends the timeframe
// scores (daily 40%, weekly 35%, monthly 25% by default).
//
// The daily series must reach `min_bars`; a weekly or monthly series shorter
// than `min_timeframe_bars` is left out and its weight is spread over the
// timeframes that remain.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::pivots::{key_levels, KeyLevels};
use crate::layers::momentum::analyze_momentum;
use crate::layers::structure::analyze_structure;
use crate::layers::trend::analyze_trend;
use crate::layers::volatility::analyze_volatility;
use crate::layers::{AnalysisContext, LayerKind, LayerResult};
use crate::market_data::Bar;
use crate::types::{Bias, Grade, Interval};

use super::profile::ScoringProfile;
use super::weighted_score::{final_score, weighted_mean, WeightedScorer};

/// Bars per timeframe handed to the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeframeBars<'a> {
    pub daily: &'a [Bar],
    pub weekly: &'a [Bar],
    pub monthly: &'a [Bar],
}

impl<'a> TimeframeBars<'a> {
    pub fn get(&self, interval: Interval) -> &'a [Bar] {
        match interval {
            Interval::Daily => self.daily,
            Interval::Weekly => self.weekly,
            Interval::Monthly => self.monthly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Likelihood {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub level: Likelihood,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub probability: Likelihood,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeAnalysis {
    pub interval: Interval,
    pub score: u8,
    pub bias: Bias,
    pub trend: String,
    pub weight: f64,
    pub bars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancedResult {
    pub final_score: u8,
    pub grade: Grade,
    pub bias: Bias,
    pub confidence: String,
    /// Daily layers.
    pub layers: Vec<LayerResult>,
    pub timeframes: Vec<TimeframeAnalysis>,
    pub key_levels: KeyLevels,
    pub risks: Vec<Risk>,
    pub opportunities: Vec<Opportunity>,
    pub sufficient: bool,
}

fn confidence_label(profile: &ScoringProfile, score: f64) -> String {
    profile
        .confidence_labels
        .as_ref()
        .map_or_else(String::new, |labels| labels.classify(score))
}

fn analyze_timeframe(
    profile: &ScoringProfile,
    interval: Interval,
    weight: f64,
    bars: &[Bar],
) -> (TimeframeAnalysis, Vec<LayerResult>) {
    let ctx = AnalysisContext::new(bars);
    let layers = vec![
        analyze_trend(&ctx),
        analyze_momentum(&ctx),
        analyze_structure(&ctx),
        analyze_volatility(&ctx),
    ];
    let score = WeightedScorer::from_profile(profile).score(&layers).score;
    let trend_score = layers
        .iter()
        .find(|l| l.kind == LayerKind::Trend)
        .map_or(50.0, |l| l.score);

    debug!(
        interval = %interval,
        trend = layers[0].score,
        momentum = layers[1].score,
        structure = layers[2].score,
        volatility = layers[3].score,
        score,
        "Timeframe scored"
    );

    let analysis = TimeframeAnalysis {
        interval,
        score,
        bias: profile.bias.classify(score as f64),
        trend: profile.trend_label(trend_score).unwrap_or_default(),
        weight,
        bars: bars.len(),
    };
    (analysis, layers)
}

/// Entry ideas and warnings derived from the blended result.
pub fn assess(
    final_score: u8,
    daily: &TimeframeAnalysis,
    daily_momentum: f64,
    weekly: Option<&TimeframeAnalysis>,
    levels: &KeyLevels,
) -> (Vec<Opportunity>, Vec<Risk>) {
    let mut opportunities = Vec::new();
    let mut risks = Vec::new();

    if let Some(support) = levels.support.first() {
        if final_score >= 60 {
            opportunities.push(Opportunity {
                probability: Likelihood::High,
                description: format!("Pullback to ${support:.2} support offers entry"),
            });
        }
    }
    if let Some(resistance) = levels.resistance.first() {
        if daily_momentum >= 65.0 {
            opportunities.push(Opportunity {
                probability: Likelihood::Medium,
                description: format!("Breakout above ${resistance:.2} confirms continuation"),
            });
        }
    }
    if let Some(weekly) = weekly {
        if daily.score > 70 && weekly.score < 55 {
            risks.push(Risk {
                level: Likelihood::Medium,
                description: "Daily strength not confirmed by weekly timeframe".to_string(),
            });
        }
    }

    (opportunities, risks)
}

pub fn compute_advanced(profile: &ScoringProfile, bars: TimeframeBars<'_>) -> AdvancedResult {
    if bars.daily.len() < profile.min_bars.max(1) {
        debug!(
            profile = %profile.name,
            bars = bars.daily.len(),
            required = profile.min_bars,
            "Advanced fallback: insufficient data"
        );
        let score = final_score(profile.fallback_score);
        return AdvancedResult {
            final_score: score,
            grade: profile.grades.classify(score as f64),
            bias: Bias::Neutral,
            confidence: confidence_label(profile, score as f64),
            layers: Vec::new(),
            timeframes: Vec::new(),
            key_levels: KeyLevels::default(),
            risks: vec![Risk {
                level: Likelihood::High,
                description: "Insufficient data for multi-timeframe analysis".to_string(),
            }],
            opportunities: Vec::new(),
            sufficient: false,
        };
    }

    let mut timeframes = Vec::new();
    let mut daily_layers = Vec::new();
    for tf in &profile.timeframes {
        let series = bars.get(tf.interval);
        let required = if tf.interval == Interval::Daily {
            profile.min_bars
        } else {
            profile.min_timeframe_bars
        };
        if series.is_empty() || series.len() < required {
            debug!(interval = %tf.interval, bars = series.len(), "Timeframe skipped");
            continue;
        }
        let (analysis, layers) = analyze_timeframe(profile, tf.interval, tf.weight, series);
        if tf.interval == Interval::Daily {
            daily_layers = layers;
        }
        timeframes.push(analysis);
    }

    // A profile without a daily timeframe entry still reports the daily layers.
    if daily_layers.is_empty() {
        let (analysis, layers) = analyze_timeframe(profile, Interval::Daily, 1.0, bars.daily);
        daily_layers = layers;
        if timeframes.is_empty() {
            timeframes.push(analysis);
        }
    }

    let pairs: Vec<(f64, f64)> = timeframes.iter().map(|t| (t.weight, t.score as f64)).collect();
    let score = final_score(weighted_mean(&pairs).unwrap_or(profile.fallback_score));

    let levels = key_levels(bars.daily);
    let daily = timeframes.iter().find(|t| t.interval == Interval::Daily);
    let weekly = timeframes.iter().find(|t| t.interval == Interval::Weekly);
    let momentum = daily_layers
        .iter()
        .find(|l| l.kind == LayerKind::Momentum)
        .map_or(50.0, |l| l.score);
    let (opportunities, risks) = match daily {
        Some(daily) => assess(score, daily, momentum, weekly, &levels),
        None => (Vec::new(), Vec::new()),
    };

    debug!(
        profile = %profile.name,
        timeframes = timeframes.len(),
        score,
        "Advanced confidence scored"
    );

    AdvancedResult {
        final_score: score,
        grade: profile.grades.classify(score as f64),
        bias: profile.bias.classify(score as f64),
        confidence: confidence_label(profile, score as f64),
        layers: daily_layers,
        timeframes,
        key_levels: levels,
        risks,
        opportunities,
        sufficient: true,
    }
}
