// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), σ being the population standard deviation of
// the window.  The Band Width (BBW) is the normalised distance:
//   BBW = (upper - lower) / middle * 100.

use serde::Serialize;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STD: f64 = 2.0;

/// Result of a Bollinger Band calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerBand {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub width: f64,
}

/// Bands over one window.  `None` for an empty window or a zero middle band.
fn band(window: &[f64], num_std: f64) -> Option<BollingerBand> {
    if window.is_empty() {
        return None;
    }
    let n = window.len() as f64;
    let middle = window.iter().sum::<f64>() / n;
    if middle == 0.0 {
        return None;
    }
    let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let upper = middle + num_std * std_dev;
    let lower = middle - num_std * std_dev;
    let width = (upper - lower) / middle * 100.0;

    width.is_finite().then_some(BollingerBand {
        upper,
        middle,
        lower,
        width,
    })
}

/// Aligned band series: `None` until `period` values are available.
pub fn calculate_bollinger_series(
    values: &[f64],
    period: usize,
    num_std: f64,
) -> Vec<Option<BollingerBand>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }
    for i in (period - 1)..values.len() {
        out[i] = band(&values[i + 1 - period..=i], num_std);
    }
    out
}

/// Bands for the most recent `period` values.
pub fn calculate_bollinger(values: &[f64], period: usize, num_std: f64) -> Option<BollingerBand> {
    if period == 0 || values.len() < period {
        return None;
    }
    band(&values[values.len() - period..], num_std)
}
