// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD line   = EMA(fast) - EMA(slow)
//   Signal line = EMA(signal) of the MACD line
//   Histogram   = MACD line - Signal line
//
// Defaults 12 / 26 / 9.  The signal EMA is computed over the computable part
// of the MACD line and realigned, so all three series match the input length.
// =============================================================================

use serde::Serialize;

use super::ema::calculate_ema;
use super::Series;

pub const FAST: usize = 12;
pub const SLOW: usize = 26;
pub const SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdSeries {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// Point-in-time MACD reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD with the standard 12/26/9 parameters.
pub fn calculate_macd(closes: &[f64]) -> MacdSeries {
    calculate_macd_with(closes, FAST, SLOW, SIGNAL)
}

pub fn calculate_macd_with(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);

    let macd: Series = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let mut signal_line = vec![None; closes.len()];
    if let Some(start) = macd.iter().position(Option::is_some) {
        // The MACD line is contiguous from its first value onward.
        let defined: Vec<f64> = macd[start..].iter().map_while(|v| *v).collect();
        for (offset, value) in calculate_ema(&defined, signal).into_iter().enumerate() {
            signal_line[start + offset] = value;
        }
    }

    let histogram: Series = macd
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    MacdSeries {
        macd,
        signal: signal_line,
        histogram,
    }
}

impl MacdSeries {
    /// Reading at the last bar, if all three lines are computable there.
    pub fn latest(&self) -> Option<MacdPoint> {
        Some(MacdPoint {
            macd: super::last(&self.macd)?,
            signal: super::last(&self.signal)?,
            histogram: super::last(&self.histogram)?,
        })
    }

    /// (previous, current) histogram values.
    pub fn histogram_pair(&self) -> Option<(f64, f64)> {
        Some((
            super::nth_back(&self.histogram, 1)?,
            super::nth_back(&self.histogram, 0)?,
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_lengths_align() {
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let m = calculate_macd(&closes);
        assert_eq!(m.macd.len(), 60);
        assert_eq!(m.signal.len(), 60);
        assert_eq!(m.histogram.len(), 60);
        // MACD line first defined at slow - 1, signal at slow + signal - 2.
        assert!(m.macd[24].is_none() && m.macd[25].is_some());
        assert!(m.signal[32].is_none() && m.signal[33].is_some());
        assert!(m.histogram[33].is_some());
    }

    #[test]
    fn macd_short_input() {
        let m = calculate_macd(&[1.0, 2.0, 3.0]);
        assert!(m.latest().is_none());
        assert!(m.histogram_pair().is_none());
    }

    #[test]
    fn macd_positive_in_uptrend() {
        let closes: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        let p = calculate_macd(&closes).latest().unwrap();
        assert!(p.macd > 0.0);
        assert!((p.histogram - (p.macd - p.signal)).abs() < 1e-10);
    }

    #[test]
    fn macd_flat_is_zero() {
        let p = calculate_macd(&[50.0; 80]).latest().unwrap();
        assert!(p.macd.abs() < 1e-10);
        assert!(p.histogram.abs() < 1e-10);
    }
}
