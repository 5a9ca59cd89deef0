// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = (close_t - EMA_{t-1}) * multiplier + EMA_{t-1}
//
// The very first EMA value (index `period - 1`) is seeded with the SMA of the
// first `period` values.
// =============================================================================

use super::Series;

/// Compute the aligned EMA series for `values` and look-back `period`.
///
/// # Edge cases
/// - `period == 0` or `values.len() < period` => all `None`
/// - A non-finite seed or intermediate value ends the series: every later
///   index stays `None`, downstream consumers should not trust a broken run.
pub fn calculate_ema(values: &[f64], period: usize) -> Series {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let seed = values[..period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return out;
    }
    out[period - 1] = Some(seed);

    let mut prev = seed;
    for (i, &value) in values.iter().enumerate().skip(period) {
        let ema = (value - prev) * multiplier + prev;
        if !ema.is_finite() {
            break;
        }
        out[i] = Some(ema);
        prev = ema;
    }

    out
}

/// Latest EMA value, if computable.
pub fn ema_latest(values: &[f64], period: usize) -> Option<f64> {
    super::last(&calculate_ema(values, period))
}

/// Stack ordering of three EMAs (fast, mid, slow).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RibbonAlignment {
    /// fast > mid > slow
    Up,
    /// fast < mid < slow
    Down,
    Mixed,
}

pub fn ribbon_alignment(fast: f64, mid: f64, slow: f64) -> RibbonAlignment {
    if fast > mid && mid > slow {
        RibbonAlignment::Up
    } else if fast < mid && mid < slow {
        RibbonAlignment::Down
    } else {
        RibbonAlignment::Mixed
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_period_zero() {
        assert!(calculate_ema(&[1.0, 2.0, 3.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn ema_insufficient_data() {
        assert_eq!(calculate_ema(&[1.0, 2.0], 5), vec![None, None]);
    }

    #[test]
    fn ema_seed_is_sma() {
        let ema = calculate_ema(&[2.0, 4.0, 6.0], 3);
        assert_eq!(ema.len(), 3);
        assert!(ema[0].is_none() && ema[1].is_none());
        assert!((ema[2].unwrap() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn ema_known_values() {
        // 5-period EMA of 1..=10: seed 3.0, multiplier 1/3.
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let ema = calculate_ema(&closes, 5);

        let mult = 2.0 / 6.0;
        let mut expected = 3.0;
        assert!((ema[4].unwrap() - expected).abs() < 1e-10);
        for i in 5..10 {
            expected = (closes[i] - expected) * mult + expected;
            assert!((ema[i].unwrap() - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn ema_stops_at_nan() {
        let ema = calculate_ema(&[1.0, 2.0, 3.0, f64::NAN, 5.0], 3);
        assert!(ema[2].is_some());
        assert!(ema[3].is_none() && ema[4].is_none());
    }

    #[test]
    fn ribbon_orderings() {
        assert_eq!(ribbon_alignment(3.0, 2.0, 1.0), RibbonAlignment::Up);
        assert_eq!(ribbon_alignment(1.0, 2.0, 3.0), RibbonAlignment::Down);
        assert_eq!(ribbon_alignment(1.0, 1.0, 1.0), RibbonAlignment::Mixed);
    }

    #[test]
    fn rising_series_is_aligned_up() {
        let closes: Vec<f64> = (1..=200).map(|x| x as f64).collect();
        let (f, m, s) = (
            ema_latest(&closes, 8).unwrap(),
            ema_latest(&closes, 21).unwrap(),
            ema_latest(&closes, 55).unwrap(),
        );
        assert_eq!(ribbon_alignment(f, m, s), RibbonAlignment::Up);
    }
}
