// =============================================================================
// Market Regime Detection
// =============================================================================
//
// Classifies the market from three return statistics:
//
//   trend strength   |Σ gains - Σ losses| / (Σ gains + Σ losses) over the
//                    last 20 returns, in percent
//   mean reversion   (1 - lag-1 autocorrelation of the last 40 returns) * 50
//   volatility       20-return vs 60-return annualised volatility:
//                    > 1.5x HIGH, < 0.7x LOW, otherwise MEDIUM
//
// Detection hierarchy (first match wins):
//
//   1. TRENDING        trend strength > 60 and volatility not HIGH
//   2. MEAN_REVERTING  mean reversion > 60 and volatility LOW
//   3. VOLATILE        volatility HIGH
//   4. QUIET           volatility LOW and trend strength < 30
//
// Anything else is MEAN_REVERTING at 50% confidence.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::stats::{annualized_volatility, autocorrelation, returns};
use crate::market_data::Bar;

/// Closes needed for the 60-return volatility baseline.
pub const MIN_BARS: usize = 61;

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketRegime {
    Trending,
    MeanReverting,
    Volatile,
    Quiet,
}

impl std::fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trending => write!(f, "TRENDING"),
            Self::MeanReverting => write!(f, "MEAN_REVERTING"),
            Self::Volatile => write!(f, "VOLATILE"),
            Self::Quiet => write!(f, "QUIET"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolatilityRegime {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeDetection {
    pub current_regime: MarketRegime,
    pub confidence: f64,
    pub trend_strength: f64,
    pub mean_reversion_score: f64,
    pub volatility_regime: VolatilityRegime,
    pub description: String,
    pub recommendations: Vec<String>,
}

// =============================================================================
// Per-regime playbook
// =============================================================================

impl MarketRegime {
    pub fn recommendations(self) -> [&'static str; 3] {
        match self {
            Self::Trending => [
                "Trend-following strategies optimal",
                "Use momentum indicators and moving average systems",
                "Wider stops to avoid noise",
            ],
            Self::MeanReverting => [
                "Range-bound strategies preferred",
                "Use oscillators (RSI, Stochastic)",
                "Fade extremes, take profits quickly",
            ],
            Self::Volatile => [
                "Reduce position sizes",
                "Widen stops or use time-based exits",
                "Consider options strategies",
            ],
            Self::Quiet => [
                "Low volatility - good for accumulation",
                "Tight stops acceptable",
                "Watch for breakout setups",
            ],
        }
    }

    /// Lower-case label with spaces, as used in prose.
    fn phrase(self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::MeanReverting => "mean reverting",
            Self::Volatile => "volatile",
            Self::Quiet => "quiet",
        }
    }
}

// =============================================================================
// Detection
// =============================================================================

/// Apply the detection hierarchy.  Returns the regime and its confidence.
pub fn classify(
    trend_strength: f64,
    mean_reversion: f64,
    volatility: VolatilityRegime,
) -> (MarketRegime, f64) {
    if trend_strength > 60.0 && volatility != VolatilityRegime::High {
        (MarketRegime::Trending, (50.0 + trend_strength / 2.0).min(90.0))
    } else if mean_reversion > 60.0 && volatility == VolatilityRegime::Low {
        (MarketRegime::MeanReverting, (50.0 + mean_reversion / 3.0).min(85.0))
    } else if volatility == VolatilityRegime::High {
        (MarketRegime::Volatile, 75.0)
    } else if volatility == VolatilityRegime::Low && trend_strength < 30.0 {
        (MarketRegime::Quiet, 70.0)
    } else {
        (MarketRegime::MeanReverting, 50.0)
    }
}

fn trend_strength(rets: &[f64]) -> f64 {
    let gains: f64 = rets.iter().filter(|r| **r > 0.0).sum();
    let losses: f64 = rets.iter().filter(|r| **r < 0.0).map(|r| r.abs()).sum();
    let total = gains + losses;
    if total > 0.0 {
        (gains - losses).abs() / total * 100.0
    } else {
        0.0
    }
}

pub fn detect_regime(bars: &[Bar]) -> Option<RegimeDetection> {
    if bars.len() < MIN_BARS {
        return None;
    }
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let rets = returns(&closes);

    let strength = trend_strength(&rets[rets.len() - 20..]);
    let autocorr = autocorrelation(&rets[rets.len() - 40..], 1).unwrap_or(0.0);
    let mean_reversion = (1.0 - autocorr) * 50.0;

    let vol20 = annualized_volatility(&closes[closes.len() - 21..]).unwrap_or(0.0);
    let vol60 = annualized_volatility(&closes[closes.len() - 61..]).unwrap_or(0.0);
    let volatility = if vol20 > vol60 * 1.5 {
        VolatilityRegime::High
    } else if vol20 < vol60 * 0.7 {
        VolatilityRegime::Low
    } else {
        VolatilityRegime::Medium
    };

    let (regime, confidence) = classify(strength, mean_reversion, volatility);

    debug!(
        regime = %regime,
        trend_strength = format!("{:.1}", strength),
        mean_reversion = format!("{:.1}", mean_reversion),
        vol20 = format!("{:.2}", vol20),
        vol60 = format!("{:.2}", vol60),
        "Regime detected"
    );

    Some(RegimeDetection {
        current_regime: regime,
        confidence: confidence.round(),
        trend_strength: strength.round(),
        mean_reversion_score: mean_reversion.round(),
        volatility_regime: volatility,
        description: format!(
            "Market is in {} regime with {:.0}% confidence",
            regime.phrase(),
            confidence
        ),
        recommendations: regime
            .recommendations()
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::fixtures;

    #[test]
    fn hierarchy_first_match_wins() {
        use VolatilityRegime::*;
        assert_eq!(classify(80.0, 90.0, Low), (MarketRegime::Trending, 90.0));
        assert_eq!(classify(70.0, 0.0, Medium), (MarketRegime::Trending, 85.0));
        assert_eq!(classify(80.0, 0.0, High), (MarketRegime::Volatile, 75.0));
        assert_eq!(classify(40.0, 90.0, Low), (MarketRegime::MeanReverting, 80.0));
        assert_eq!(classify(20.0, 50.0, Low), (MarketRegime::Quiet, 70.0));
        assert_eq!(classify(40.0, 50.0, Low), (MarketRegime::MeanReverting, 50.0));
        assert_eq!(classify(40.0, 90.0, Medium), (MarketRegime::MeanReverting, 50.0));
    }

    #[test]
    fn steady_climb_is_trending() {
        let r = detect_regime(&fixtures::rising(80, 100.0, 1.0)).unwrap();
        assert_eq!(r.current_regime, MarketRegime::Trending);
        assert_eq!(r.trend_strength, 100.0);
        assert_eq!(r.confidence, 90.0);
        assert_eq!(r.description, "Market is in trending regime with 90% confidence");
        assert_eq!(r.recommendations[0], "Trend-following strategies optimal");
    }

    #[test]
    fn volatility_burst_is_volatile() {
        let closes: Vec<f64> = (0..81)
            .map(|i| match (i >= 61, i % 2 == 1) {
                (false, false) => 100.0,
                (false, true) => 100.1,
                (true, true) => 110.0,
                (true, false) => 100.0,
            })
            .collect();
        let r = detect_regime(&fixtures::from_closes(&closes, 1_000_000.0)).unwrap();
        assert_eq!(r.volatility_regime, VolatilityRegime::High);
        assert_eq!(r.current_regime, MarketRegime::Volatile);
        assert_eq!(r.recommendations[0], "Reduce position sizes");
    }

    #[test]
    fn flat_tape_defaults_to_mean_reverting() {
        let r = detect_regime(&fixtures::flat(70, 100.0)).unwrap();
        assert_eq!(r.current_regime, MarketRegime::MeanReverting);
        assert_eq!(r.confidence, 50.0);
        assert_eq!(r.description, "Market is in mean reverting regime with 50% confidence");
    }

    #[test]
    fn needs_sixty_returns() {
        assert!(detect_regime(&fixtures::rising(60, 100.0, 1.0)).is_none());
    }
}
