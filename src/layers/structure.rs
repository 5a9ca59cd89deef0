// =============================================================================
// Structure Layer
// =============================================================================
//
// Where does price sit inside its recent range, and what shape do the swing
// points make?
//
// Range position (last 50 bars, percentile of the high/low range):
//   < 5  and higher than 4 bars ago   85  near support, bouncing
//   < 15                              65  lower part of range
//   > 85                              35  near resistance
//   otherwise                         50  mid-range
//
// Swing structure (last 100 bars, strict ±5-bar extrema, last three swings):
//   higher highs and higher lows      UPTREND      85
//   lower highs and lower lows        DOWNTREND    20
//   either higher highs or lows       BUILDING_UP  65
//   otherwise                         RANGING      50
//   fewer than two highs or lows      UNDEFINED    50
//
// The layer score is the range-position score; the swing reading is attached
// as an informational component.

use serde::Serialize;

use crate::indicators::pivots::{find_swing_points, SWING_LOOKBACK};
use crate::market_data::Bar;
use crate::types::SignalKind;

use super::{AnalysisContext, Component, LayerKind, LayerResult};

const RANGE_WINDOW: usize = 50;
const SWING_WINDOW: usize = 100;

pub fn analyze_structure(ctx: &AnalysisContext<'_>) -> LayerResult {
    let position = range_component(ctx);
    let score = position.value;

    let swings = swing_structure(ctx.bars);
    let swing_component = Component::new(
        "Swing Structure",
        swings.score,
        swings.trend.signal(),
        format!("{} swing pattern", swings.trend),
    );

    LayerResult::new(LayerKind::Structure, score, vec![position, swing_component])
}

/// Percentile of `price` inside [low, high]; 50 for a degenerate range.
pub fn range_position(price: f64, low: f64, high: f64) -> f64 {
    let range = high - low;
    if range <= 0.0 {
        return 50.0;
    }
    (price - low) / range * 100.0
}

fn range_component(ctx: &AnalysisContext<'_>) -> Component {
    let name = "Price Structure";
    let recent = ctx.tail(RANGE_WINDOW);
    let Some(price) = ctx.price() else {
        return Component::unavailable(name, "price structure");
    };

    let high = recent.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let low = recent.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let position = range_position(price, low, high);
    let bouncing = ctx.close_back(4).map_or(false, |earlier| price > earlier);

    if position < 5.0 && bouncing {
        Component::new(name, 85.0, SignalKind::Bullish, "Near support, bouncing")
    } else if position < 15.0 {
        Component::new(name, 65.0, SignalKind::Bullish, "In lower third of range")
    } else if position > 85.0 {
        Component::new(name, 35.0, SignalKind::Bearish, "Near resistance")
    } else {
        Component::new(name, 50.0, SignalKind::Neutral, "Mid-range")
    }
}

// =============================================================================
// Swing structure
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StructureTrend {
    Uptrend,
    Downtrend,
    BuildingUp,
    Ranging,
    Undefined,
}

impl StructureTrend {
    pub(crate) fn signal(self) -> SignalKind {
        match self {
            Self::Uptrend | Self::BuildingUp => SignalKind::Bullish,
            Self::Downtrend => SignalKind::Bearish,
            Self::Ranging | Self::Undefined => SignalKind::Neutral,
        }
    }
}

impl std::fmt::Display for StructureTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uptrend => write!(f, "UPTREND"),
            Self::Downtrend => write!(f, "DOWNTREND"),
            Self::BuildingUp => write!(f, "BUILDING_UP"),
            Self::Ranging => write!(f, "RANGING"),
            Self::Undefined => write!(f, "UNDEFINED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwingStructure {
    pub trend: StructureTrend,
    pub score: f64,
}

pub fn swing_structure(bars: &[Bar]) -> SwingStructure {
    let recent = &bars[bars.len().saturating_sub(SWING_WINDOW)..];
    let swings = find_swing_points(recent, SWING_LOOKBACK);

    if swings.highs.len() < 2 || swings.lows.len() < 2 {
        return SwingStructure {
            trend: StructureTrend::Undefined,
            score: 50.0,
        };
    }

    let highs = &swings.highs[swings.highs.len().saturating_sub(3)..];
    let lows = &swings.lows[swings.lows.len().saturating_sub(3)..];
    let (first_high, last_high) = (highs[0], highs[highs.len() - 1]);
    let (first_low, last_low) = (lows[0], lows[lows.len() - 1]);

    let higher_highs = last_high > first_high;
    let higher_lows = last_low > first_low;
    let lower_highs = last_high < first_high;
    let lower_lows = last_low < first_low;

    let (trend, score) = if higher_highs && higher_lows {
        (StructureTrend::Uptrend, 85.0)
    } else if lower_highs && lower_lows {
        (StructureTrend::Downtrend, 20.0)
    } else if higher_highs || higher_lows {
        (StructureTrend::BuildingUp, 65.0)
    } else {
        (StructureTrend::Ranging, 50.0)
    };

    SwingStructure { trend, score }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::fixtures;

    /// Saw-tooth closes: `cycles` waves of `period` bars around a drift.
    fn sawtooth(cycles: usize, period: usize, drift: f64) -> Vec<Bar> {
        let closes: Vec<f64> = (0..cycles * period)
            .map(|i| {
                let phase = (i % period) as f64 / period as f64;
                let tri = if phase < 0.5 { phase } else { 1.0 - phase };
                100.0 + drift * i as f64 + tri * 20.0
            })
            .collect();
        let mut bars = fixtures::flat(closes.len(), 100.0);
        for (bar, close) in bars.iter_mut().zip(closes) {
            bar.open = close;
            bar.close = close;
            bar.high = close + 0.5;
            bar.low = close - 0.5;
        }
        bars
    }

    #[test]
    fn range_position_bounds() {
        assert_eq!(range_position(100.0, 100.0, 100.0), 50.0);
        assert!((range_position(110.0, 100.0, 120.0) - 50.0).abs() < 1e-10);
        assert!((range_position(100.0, 100.0, 120.0)).abs() < 1e-10);
    }

    #[test]
    fn top_of_range_is_near_resistance() {
        let bars = fixtures::rising(60, 100.0, 1.0);
        let layer = analyze_structure(&AnalysisContext::new(&bars));
        assert_eq!(layer.score, 35.0);
        assert_eq!(layer.components[0].description, "Near resistance");
    }

    #[test]
    fn bottom_of_falling_range() {
        let bars = fixtures::falling(60, 200.0, 1.0);
        let layer = analyze_structure(&AnalysisContext::new(&bars));
        // Not bouncing (still falling), so the lower-range branch applies.
        assert_eq!(layer.score, 65.0);
    }

    #[test]
    fn flat_range_is_mid() {
        let bars = fixtures::flat(60, 100.0);
        let layer = analyze_structure(&AnalysisContext::new(&bars));
        assert_eq!(layer.score, 50.0);
        assert_eq!(layer.components[1].description, "UNDEFINED swing pattern");
    }

    #[test]
    fn rising_sawtooth_is_uptrend() {
        let s = swing_structure(&sawtooth(6, 16, 0.5));
        assert_eq!(s.trend, StructureTrend::Uptrend);
        assert_eq!(s.score, 85.0);
    }

    #[test]
    fn falling_sawtooth_is_downtrend() {
        let s = swing_structure(&sawtooth(6, 16, -0.5));
        assert_eq!(s.trend, StructureTrend::Downtrend);
        assert_eq!(s.score, 20.0);
    }

    #[test]
    fn level_sawtooth_is_ranging() {
        let s = swing_structure(&sawtooth(6, 16, 0.0));
        assert_eq!(s.trend, StructureTrend::Ranging);
    }

    #[test]
    fn empty_structure_layer() {
        let layer = analyze_structure(&AnalysisContext::new(&[]));
        assert_eq!(layer.score, 50.0);
    }
}
