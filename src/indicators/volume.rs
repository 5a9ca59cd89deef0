// =============================================================================
// Volume Indicators
// =============================================================================
//
//   OBV          running sum of +volume on up closes, -volume on down closes
//   VWAP         sum(typical price * volume) / sum(volume) over a window
//   Volume ratio latest volume / mean volume of the trailing window (the
//                latest bar included)
//   Breakout     latest volume >= multiplier * trailing mean
// =============================================================================

use crate::market_data::Bar;

/// Default trailing window for volume averages.
pub const DEFAULT_LOOKBACK: usize = 20;
/// Multiple of the trailing mean that counts as a volume breakout.
pub const BREAKOUT_MULTIPLIER: f64 = 1.5;

/// On-balance volume, aligned with `bars` and starting at 0.
pub fn calculate_obv(bars: &[Bar]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bars.len());
    if bars.is_empty() {
        return out;
    }
    out.push(0.0);
    for w in bars.windows(2) {
        let prev = out[out.len() - 1];
        let next = if w[1].close > w[0].close {
            prev + w[1].volume
        } else if w[1].close < w[0].close {
            prev - w[1].volume
        } else {
            prev
        };
        out.push(next);
    }
    out
}

/// Volume-weighted average of the typical price over `bars`.
///
/// `None` for an empty slice or zero total volume.
pub fn calculate_vwap(bars: &[Bar]) -> Option<f64> {
    let total_volume: f64 = bars.iter().map(|b| b.volume).sum();
    if total_volume <= 0.0 {
        return None;
    }
    let weighted: f64 = bars.iter().map(|b| b.typical_price() * b.volume).sum();
    let vwap = weighted / total_volume;
    vwap.is_finite().then_some(vwap)
}

/// Mean of the trailing `lookback` volumes.
pub fn average_volume(volumes: &[f64], lookback: usize) -> Option<f64> {
    if lookback == 0 || volumes.len() < lookback {
        return None;
    }
    let avg = volumes[volumes.len() - lookback..].iter().sum::<f64>() / lookback as f64;
    avg.is_finite().then_some(avg)
}

/// Latest volume relative to the trailing mean.  `None` when the mean is zero.
pub fn volume_ratio(volumes: &[f64], lookback: usize) -> Option<f64> {
    let avg = average_volume(volumes, lookback)?;
    if avg <= 0.0 {
        return None;
    }
    Some(volumes[volumes.len() - 1] / avg)
}

/// Whether the latest volume is a breakout versus the trailing mean.
///
/// Needs `lookback + 1` values; shorter input is never a breakout.
pub fn volume_breakout(volumes: &[f64], lookback: usize) -> bool {
    if volumes.len() < lookback + 1 {
        return false;
    }
    match average_volume(volumes, lookback) {
        Some(avg) => volumes[volumes.len() - 1] >= avg * BREAKOUT_MULTIPLIER,
        None => false,
    }
}
