// =============================================================================
// Smart Money Indicators
// =============================================================================
//
// Wyckoff phase of the last 40 closes, a money-flow composite over 20 typical
// prices, the share of the last 20 bars printing institutional size volume
// (> 1.5x the 60-bar mean) and an overnight-gap proxy for off-exchange
// activity.
//
//   score = 0.4 * composite + 0.3 * activity + 0.3 * (70 if the phase is
//           Accumulation or Markup, else 30)

use serde::{Deserialize, Serialize};

use crate::indicators::stats::{mean, std_dev};
use crate::market_data::Bar;

pub const MIN_BARS: usize = 41;
const PHASE_WINDOW: usize = 40;
const FLOW_WINDOW: usize = 20;
const VOLUME_BASELINE: usize = 60;
const LARGE_VOLUME_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WyckoffPhase {
    Accumulation,
    Distribution,
    Markup,
    Markdown,
}

impl std::fmt::Display for WyckoffPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accumulation => write!(f, "Accumulation"),
            Self::Distribution => write!(f, "Distribution"),
            Self::Markup => write!(f, "Markup"),
            Self::Markdown => write!(f, "Markdown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SmartMoneySignal {
    Accumulation,
    Distribution,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmartMoneyComponents {
    pub wyckoff_phase: WyckoffPhase,
    pub composite_index: f64,
    pub institutional_activity: f64,
    pub dark_pool_activity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmartMoneyAnalysis {
    pub score: f64,
    pub signal: SmartMoneySignal,
    pub components: SmartMoneyComponents,
    pub description: String,
}

pub fn wyckoff_phase(closes: &[f64], volumes: &[f64]) -> Option<WyckoffPhase> {
    let window = &closes[closes.len().saturating_sub(PHASE_WINDOW)..];
    let price = *window.last()?;
    let high = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = window.iter().copied().fold(f64::INFINITY, f64::min);
    let dispersion = std_dev(window)?;
    let avg = mean(window)?;

    // Sum of consecutive differences: last minus first of the window.
    let recent = &volumes[volumes.len().saturating_sub(FLOW_WINDOW)..];
    let volume_trend = match (recent.first(), recent.last()) {
        (Some(first), Some(last)) => last - first,
        _ => 0.0,
    };

    let phase = if price < low * 1.05 && volume_trend > 0.0 {
        WyckoffPhase::Accumulation
    } else if price > high * 0.95 && volume_trend > 0.0 {
        WyckoffPhase::Distribution
    } else if price > low * 1.2 && dispersion < avg * 0.05 {
        WyckoffPhase::Markup
    } else {
        WyckoffPhase::Markdown
    };
    Some(phase)
}

/// Money-flow index over `bars`: flow on a rising typical price is positive,
/// anything else negative.  All-positive flow reads 100.
pub fn money_flow_index(bars: &[Bar]) -> f64 {
    let mut positive = 0.0;
    let mut negative = 0.0;
    for pair in bars.windows(2) {
        let flow = pair[1].typical_price() * pair[1].volume;
        if pair[1].typical_price() > pair[0].typical_price() {
            positive += flow;
        } else {
            negative += flow;
        }
    }
    if negative > 0.0 {
        100.0 - 100.0 / (1.0 + positive / negative)
    } else if positive > 0.0 {
        100.0
    } else {
        50.0
    }
}

pub fn analyze_smart_money(bars: &[Bar]) -> Option<SmartMoneyAnalysis> {
    if bars.len() < MIN_BARS {
        return None;
    }
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

    let phase = wyckoff_phase(&closes, &volumes)?;
    let recent = &bars[bars.len() - FLOW_WINDOW..];
    let composite = money_flow_index(recent);

    let baseline = mean(&volumes[volumes.len().saturating_sub(VOLUME_BASELINE)..])?;
    let large = recent
        .iter()
        .filter(|b| b.volume > baseline * LARGE_VOLUME_MULTIPLIER)
        .count();
    let activity = large as f64 / FLOW_WINDOW as f64 * 100.0;

    let gaps: Vec<f64> = recent
        .windows(2)
        .map(|w| (w[1].open - w[0].close).abs() / w[0].close)
        .collect();
    let dark_pool = mean(&gaps).unwrap_or(0.0) * 100.0;

    let phase_score = match phase {
        WyckoffPhase::Accumulation | WyckoffPhase::Markup => 70.0,
        _ => 30.0,
    };
    let score = (composite * 0.4 + activity * 0.3 + phase_score * 0.3).round();

    let signal = if phase == WyckoffPhase::Accumulation || (composite > 60.0 && activity > 30.0) {
        SmartMoneySignal::Accumulation
    } else if phase == WyckoffPhase::Distribution || (composite < 40.0 && activity > 30.0) {
        SmartMoneySignal::Distribution
    } else {
        SmartMoneySignal::Neutral
    };

    let description = match signal {
        SmartMoneySignal::Accumulation => {
            format!("Smart money accumulation detected ({phase} phase)")
        }
        SmartMoneySignal::Distribution => {
            format!("Institutional distribution pattern ({phase} phase)")
        }
        SmartMoneySignal::Neutral => "Neutral institutional positioning".to_string(),
    };

    Some(SmartMoneyAnalysis {
        score,
        signal,
        components: SmartMoneyComponents {
            wyckoff_phase: phase,
            composite_index: composite.round(),
            institutional_activity: activity.round(),
            dark_pool_activity: dark_pool,
        },
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::fixtures;

    fn ramp_volume(bars: &mut [Bar]) {
        for (i, b) in bars.iter_mut().enumerate() {
            b.volume = 1_000_000.0 + i as f64 * 10_000.0;
        }
    }

    #[test]
    fn selloff_on_rising_volume_is_accumulation() {
        let mut bars = fixtures::falling(60, 200.0, 1.0);
        ramp_volume(&mut bars);
        let sm = analyze_smart_money(&bars).unwrap();
        assert_eq!(sm.components.wyckoff_phase, WyckoffPhase::Accumulation);
        assert_eq!(sm.signal, SmartMoneySignal::Accumulation);
        assert_eq!(sm.description, "Smart money accumulation detected (Accumulation phase)");
    }

    #[test]
    fn rally_on_rising_volume_is_distribution() {
        let mut bars = fixtures::rising(60, 100.0, 1.0);
        ramp_volume(&mut bars);
        let sm = analyze_smart_money(&bars).unwrap();
        assert_eq!(sm.components.wyckoff_phase, WyckoffPhase::Distribution);
        assert_eq!(sm.signal, SmartMoneySignal::Distribution);
        // Every typical price rises: full positive money flow.
        assert_eq!(sm.components.composite_index, 100.0);
    }

    #[test]
    fn tight_base_then_breakout_is_markup() {
        let mut closes = vec![100.0; 59];
        closes.push(125.0);
        let bars = fixtures::from_closes(&closes, 1_000_000.0);
        let sm = analyze_smart_money(&bars).unwrap();
        assert_eq!(sm.components.wyckoff_phase, WyckoffPhase::Markup);
    }

    #[test]
    fn money_flow_extremes() {
        assert_eq!(money_flow_index(&fixtures::rising(20, 100.0, 1.0)), 100.0);
        assert_eq!(money_flow_index(&fixtures::falling(20, 100.0, 1.0)), 0.0);
    }

    #[test]
    fn needs_41_bars() {
        assert!(analyze_smart_money(&fixtures::flat(40, 10.0)).is_none());
    }
}
