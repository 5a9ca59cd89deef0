// =============================================================================
// Average True Range (ATR) — Wilder's Smoothing Method
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is then the smoothed average of TR using Wilder's method:
//   ATR_0   = SMA of first `period` TR values
//   ATR_t   = (ATR_{t-1} * (period - 1) + TR_t) / period
//
// Default period: 14
// =============================================================================

use crate::market_data::Bar;

use super::Series;

pub const DEFAULT_PERIOD: usize = 14;

/// True range of `bar` given the previous close.
pub fn true_range(bar: &Bar, prev_close: f64) -> f64 {
    (bar.high - bar.low)
        .max((bar.high - prev_close).abs())
        .max((bar.low - prev_close).abs())
}

/// Aligned ATR series.  TR needs a previous bar, so the first ATR value sits
/// at index `period`.
pub fn calculate_atr_series(bars: &[Bar], period: usize) -> Series {
    let mut out = vec![None; bars.len()];
    if period == 0 || bars.len() < period + 1 {
        return out;
    }

    let tr_values: Vec<f64> = bars
        .windows(2)
        .map(|w| true_range(&w[1], w[0].close))
        .collect();

    let seed = tr_values[..period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return out;
    }
    out[period] = Some(seed);

    let period_f = period as f64;
    let mut atr = seed;
    for (i, &tr) in tr_values.iter().enumerate().skip(period) {
        atr = (atr * (period_f - 1.0) + tr) / period_f;
        if !atr.is_finite() {
            break;
        }
        out[i + 1] = Some(atr);
    }

    out
}

/// Most recent ATR value.
pub fn calculate_atr(bars: &[Bar], period: usize) -> Option<f64> {
    super::last(&calculate_atr_series(bars, period))
}

/// Calculate ATR as a percentage of the current price.
///
/// Useful for comparing volatility across assets with different price scales.
pub fn atr_percent(bars: &[Bar], period: usize) -> Option<f64> {
    let atr = calculate_atr(bars, period)?;
    let price = bars.last()?.close;
    if price <= 0.0 {
        return None;
    }
    let pct = atr / price * 100.0;
    pct.is_finite().then_some(pct)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::fixtures;

    #[test]
    fn atr_insufficient_data() {
        let bars = fixtures::flat(14, 100.0);
        assert!(calculate_atr_series(&bars, 14).iter().all(Option::is_none));
        assert!(calculate_atr(&bars, 0).is_none());
    }

    #[test]
    fn atr_flat_is_zero() {
        let bars = fixtures::flat(30, 100.0);
        let series = calculate_atr_series(&bars, 14);
        assert!(series[13].is_none());
        assert_eq!(series[14], Some(0.0));
        assert_eq!(atr_percent(&bars, 14), Some(0.0));
    }

    #[test]
    fn atr_constant_range() {
        // Every bar spans exactly 2.0 around an unchanged close.
        let mut bars = fixtures::flat(40, 100.0);
        for b in &mut bars {
            b.high = 101.0;
            b.low = 99.0;
        }
        let atr = calculate_atr(&bars, 14).unwrap();
        assert!((atr - 2.0).abs() < 1e-10);
        assert!((atr_percent(&bars, 14).unwrap() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn true_range_uses_gap() {
        let bar = Bar {
            date: fixtures::business_days(1)[0],
            open: 110.0,
            high: 112.0,
            low: 109.0,
            close: 111.0,
            volume: 0.0,
        };
        assert!((true_range(&bar, 100.0) - 12.0).abs() < 1e-10);
    }
}
