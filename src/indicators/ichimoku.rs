// =============================================================================
// Ichimoku Kinko Hyo
// =============================================================================
//
//   Tenkan-sen (conversion) = midpoint of highest high / lowest low over 9
//   Kijun-sen  (base)       = midpoint over 26
//   Senkou A                = (tenkan + kijun) / 2
//   Senkou B                = midpoint over 52
//
// Spans are reported at the bar they are computed on (no forward shift); the
// cloud therefore describes the structure behind the current price.
// =============================================================================

use serde::Serialize;

use crate::market_data::Bar;

use super::Series;

pub const TENKAN: usize = 9;
pub const KIJUN: usize = 26;
pub const SENKOU_B: usize = 52;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IchimokuSeries {
    pub tenkan: Series,
    pub kijun: Series,
    pub span_a: Series,
    pub span_b: Series,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IchimokuPoint {
    pub tenkan: f64,
    pub kijun: f64,
    pub span_a: f64,
    pub span_b: f64,
}

impl IchimokuPoint {
    pub fn cloud_top(&self) -> f64 {
        self.span_a.max(self.span_b)
    }

    pub fn cloud_bottom(&self) -> f64 {
        self.span_a.min(self.span_b)
    }
}

/// Rolling (highest high + lowest low) / 2 over `period` bars.
pub fn midpoint_series(bars: &[Bar], period: usize) -> Series {
    let mut out = vec![None; bars.len()];
    if period == 0 || bars.len() < period {
        return out;
    }
    for i in (period - 1)..bars.len() {
        let window = &bars[i + 1 - period..=i];
        let high = window.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let low = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        out[i] = Some((high + low) / 2.0);
    }
    out
}

pub fn calculate_ichimoku(bars: &[Bar]) -> IchimokuSeries {
    let tenkan = midpoint_series(bars, TENKAN);
    let kijun = midpoint_series(bars, KIJUN);
    let span_b = midpoint_series(bars, SENKOU_B);
    let span_a = tenkan
        .iter()
        .zip(&kijun)
        .map(|(t, k)| match (t, k) {
            (Some(t), Some(k)) => Some((t + k) / 2.0),
            _ => None,
        })
        .collect();

    IchimokuSeries {
        tenkan,
        kijun,
        span_a,
        span_b,
    }
}

/// Components at the last bar; needs at least 52 bars.
pub fn ichimoku_latest(bars: &[Bar]) -> Option<IchimokuPoint> {
    let s = calculate_ichimoku(bars);
    Some(IchimokuPoint {
        tenkan: super::last(&s.tenkan)?,
        kijun: super::last(&s.kijun)?,
        span_a: super::last(&s.span_a)?,
        span_b: super::last(&s.span_b)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::fixtures;

    #[test]
    fn needs_52_bars() {
        assert!(ichimoku_latest(&fixtures::rising(51, 100.0, 1.0)).is_none());
        assert!(ichimoku_latest(&fixtures::rising(52, 100.0, 1.0)).is_some());
    }

    #[test]
    fn flat_market_collapses_cloud() {
        let p = ichimoku_latest(&fixtures::flat(60, 100.0)).unwrap();
        assert_eq!(p.cloud_top(), 100.0);
        assert_eq!(p.cloud_bottom(), 100.0);
    }

    #[test]
    fn uptrend_price_above_cloud() {
        let bars = fixtures::rising(120, 100.0, 1.0);
        let p = ichimoku_latest(&bars).unwrap();
        let price = bars.last().unwrap().close;
        assert!(price > p.cloud_top());
        assert!(p.tenkan > p.kijun);
    }

    #[test]
    fn midpoint_window() {
        let bars = fixtures::from_closes(&[10.0, 20.0, 30.0], 1.0);
        let mid = midpoint_series(&bars, 2);
        assert!(mid[0].is_none());
        let expected = (bars[2].high + bars[1].low) / 2.0;
        assert!((mid[2].unwrap() - expected).abs() < 1e-10);
    }
}
