// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
//   SMA_i = (v[i-period+1] + ... + v[i]) / period
//
// Indices before `period - 1` are `None`.  A window containing a non-finite
// value also yields `None` for that index only.
// =============================================================================

use super::Series;

/// Aligned SMA series.
pub fn calculate_sma(values: &[f64], period: usize) -> Series {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        if window.iter().all(|v| v.is_finite()) {
            out[i] = Some(window.iter().sum::<f64>() / period as f64);
        }
    }
    out
}

/// Mean of the trailing `period` values.
pub fn sma_latest(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    let mean = window.iter().sum::<f64>() / period as f64;
    mean.is_finite().then_some(mean)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_leading_nones_and_window_means() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let sma = calculate_sma(&values, 3);
        assert_eq!(sma.len(), values.len());
        assert!(sma[0].is_none() && sma[1].is_none());
        for i in 2..values.len() {
            let expected = (values[i - 2] + values[i - 1] + values[i]) / 3.0;
            assert!((sma[i].unwrap() - expected).abs() < 1e-10);
        }
    }

    #[test]
    fn sma_short_input_is_all_none() {
        let sma = calculate_sma(&[1.0, 2.0], 5);
        assert_eq!(sma, vec![None, None]);
        assert!(calculate_sma(&[], 5).is_empty());
        assert!(calculate_sma(&[1.0], 0).iter().all(Option::is_none));
    }

    #[test]
    fn sma_skips_non_finite_windows() {
        let sma = calculate_sma(&[1.0, f64::NAN, 3.0, 4.0, 5.0], 2);
        assert_eq!(sma[1], None);
        assert_eq!(sma[2], None);
        assert!((sma[3].unwrap() - 3.5).abs() < 1e-10);
    }

    #[test]
    fn sma_latest_matches_series() {
        let values: Vec<f64> = (1..=30).map(|x| x as f64 * 1.5).collect();
        let series = calculate_sma(&values, 7);
        assert_eq!(sma_latest(&values, 7), super::super::last(&series));
        assert_eq!(sma_latest(&values, 31), None);
    }
}
