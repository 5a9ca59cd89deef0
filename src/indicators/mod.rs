// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the technical indicators used by
// the scoring layers.  Series-producing functions return a `Series`: one
// `Option<f64>` per input element, `None` wherever the look-back is not yet
// satisfied (or an input value was unusable).  A `None` is never silently
// replaced by zero inside this module; callers decide what "insufficient
// data" means for them.  Point-in-time helpers return `Option<T>`.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod crossover;
pub mod ema;
pub mod ichimoku;
pub mod macd;
pub mod pivots;
pub mod rsi;
pub mod sma;
pub mod stats;
pub mod volume;

/// An indicator series aligned one-to-one with its input.
pub type Series = Vec<Option<f64>>;

/// Most recent computed value of a series.
pub fn last(series: &[Option<f64>]) -> Option<f64> {
    series.last().copied().flatten()
}

/// Value `back` positions before the last one (`back == 0` is the last).
pub fn nth_back(series: &[Option<f64>], back: usize) -> Option<f64> {
    let idx = series.len().checked_sub(back + 1)?;
    series[idx]
}

/// Clamp a score into `[0, 100]`.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return 50.0;
    }
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_and_nth_back() {
        let s = vec![None, Some(1.0), Some(2.0), None];
        assert_eq!(last(&s), None);
        assert_eq!(nth_back(&s, 1), Some(2.0));
        assert_eq!(nth_back(&s, 2), Some(1.0));
        assert_eq!(nth_back(&s, 10), None);
        assert_eq!(last(&[]), None);
    }

    #[test]
    fn clamp_score_bounds() {
        assert_eq!(clamp_score(-3.0), 0.0);
        assert_eq!(clamp_score(130.0), 100.0);
        assert_eq!(clamp_score(f64::NAN), 50.0);
        assert_eq!(clamp_score(42.0), 42.0);
    }
}
