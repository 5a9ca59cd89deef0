// =============================================================================
// Pivots, Swing Points and Key Levels
// =============================================================================
//
// Fibonacci pivots (from one reference bar's high / low / close):
//   PP = (H + L + C) / 3,  R1/R2/R3 = PP + {0.382, 0.618, 1.0} * (H - L)
//                          S1/S2/S3 = PP - {0.382, 0.618, 1.0} * (H - L)
//
// Swing points are strict local extrema: a bar's high must exceed the highs of
// the `lookback` bars on both sides (lows symmetrically).
//
// Key levels are ±2-bar pivot highs / lows inside a 5-bar margin of the last
// 100 bars, split around the current price.
// =============================================================================

use serde::Serialize;

use crate::market_data::Bar;

pub const SWING_LOOKBACK: usize = 5;
pub const KEY_LEVEL_WINDOW: usize = 100;
const KEY_LEVEL_MARGIN: usize = 5;
const KEY_LEVEL_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FibonacciPivots {
    pub pp: f64,
    pub r1: f64,
    pub r2: f64,
    pub r3: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
}

pub fn fibonacci_pivots(high: f64, low: f64, close: f64) -> FibonacciPivots {
    let pp = (high + low + close) / 3.0;
    let range = high - low;
    FibonacciPivots {
        pp,
        r1: pp + 0.382 * range,
        r2: pp + 0.618 * range,
        r3: pp + range,
        s1: pp - 0.382 * range,
        s2: pp - 0.618 * range,
        s3: pp - range,
    }
}

/// Swing highs and lows in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SwingPoints {
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
}

pub fn find_swing_points(bars: &[Bar], lookback: usize) -> SwingPoints {
    let mut swings = SwingPoints::default();
    if lookback == 0 || bars.len() < 2 * lookback + 1 {
        return swings;
    }

    for i in lookback..bars.len() - lookback {
        let is_high = (1..=lookback)
            .all(|j| bars[i].high > bars[i - j].high && bars[i].high > bars[i + j].high);
        let is_low = (1..=lookback)
            .all(|j| bars[i].low < bars[i - j].low && bars[i].low < bars[i + j].low);

        if is_high {
            swings.highs.push(bars[i].high);
        }
        if is_low {
            swings.lows.push(bars[i].low);
        }
    }
    swings
}

/// Nearest resistances above (ascending) and supports below (descending)
/// the last close.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyLevels {
    pub resistance: Vec<f64>,
    pub support: Vec<f64>,
}

pub fn key_levels(bars: &[Bar]) -> KeyLevels {
    let Some(last) = bars.last() else {
        return KeyLevels::default();
    };
    let price = last.close;
    let recent = &bars[bars.len().saturating_sub(KEY_LEVEL_WINDOW)..];

    let mut highs = Vec::new();
    let mut lows = Vec::new();
    if recent.len() > 2 * KEY_LEVEL_MARGIN {
        for i in KEY_LEVEL_MARGIN..recent.len() - KEY_LEVEL_MARGIN {
            let h = recent[i].high;
            if [i - 1, i - 2, i + 1, i + 2].iter().all(|&j| h > recent[j].high) {
                highs.push(h);
            }
            let l = recent[i].low;
            if [i - 1, i - 2, i + 1, i + 2].iter().all(|&j| l < recent[j].low) {
                lows.push(l);
            }
        }
    }

    let mut resistance: Vec<f64> = highs.into_iter().filter(|&h| h > price).collect();
    resistance.sort_by(f64::total_cmp);
    resistance.truncate(KEY_LEVEL_COUNT);

    let mut support: Vec<f64> = lows.into_iter().filter(|&l| l < price).collect();
    support.sort_by(|a, b| b.total_cmp(a));
    support.truncate(KEY_LEVEL_COUNT);

    KeyLevels {
        resistance,
        support,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::fixtures;

    #[test]
    fn fibonacci_levels() {
        let p = fibonacci_pivots(110.0, 90.0, 100.0);
        assert!((p.pp - 100.0).abs() < 1e-10);
        assert!((p.r1 - 107.64).abs() < 1e-10);
        assert!((p.s2 - 87.64).abs() < 1e-10);
        assert!((p.r3 - 120.0).abs() < 1e-10);
        assert!((p.s3 - 80.0).abs() < 1e-10);
    }

    /// Closes forming a tent: up for `half` bars then down.
    fn tent(half: usize) -> Vec<Bar> {
        let mut closes: Vec<f64> = (0..=half).map(|i| 100.0 + i as f64).collect();
        closes.extend((1..=half).map(|i| 100.0 + half as f64 - i as f64));
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
    fn swing_high_at_peak() {
        let bars = tent(10);
        let swings = find_swing_points(&bars, 5);
        assert_eq!(swings.highs.len(), 1);
        assert!(swings.lows.is_empty());
    }

    #[test]
    fn swing_requires_strictness() {
        let swings = find_swing_points(&fixtures::flat(30, 50.0), 5);
        assert!(swings.highs.is_empty() && swings.lows.is_empty());
        assert_eq!(find_swing_points(&fixtures::flat(3, 50.0), 5), SwingPoints::default());
    }

    #[test]
    fn key_levels_split_around_price() {
        let bars = fixtures::wave(150, 100.0, 0.0);
        let price = bars.last().unwrap().close;
        let levels = key_levels(&bars);
        assert!(levels.resistance.len() <= 3 && levels.support.len() <= 3);
        assert!(levels.resistance.iter().all(|&r| r > price));
        assert!(levels.support.iter().all(|&s| s < price));
        assert!(levels.resistance.windows(2).all(|w| w[0] <= w[1]));
        assert!(levels.support.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn key_levels_empty_input() {
        assert_eq!(key_levels(&[]), KeyLevels::default());
    }
}
