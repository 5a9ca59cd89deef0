// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the mean of the first
//          `period` gains / losses.
// Step 3 — Apply Wilder's smoothing:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// avg_loss == 0 gives 100; a perfectly flat run (both averages zero) gives 50.
// =============================================================================

use super::Series;

pub const DEFAULT_PERIOD: usize = 14;

/// Aligned RSI series.  The first value sits at index `period` (the first
/// `period` deltas seed the averages); everything before is `None`.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Series {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return out;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let (sum_gain, sum_loss) = deltas[..period].iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l + d.abs())
        }
    });

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    match rsi_from_averages(avg_gain, avg_loss) {
        Some(rsi) => out[period] = Some(rsi),
        None => return out,
    }

    // deltas[i] is the change into closes[i + 1].
    for (i, &delta) in deltas.iter().enumerate().skip(period) {
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { delta.abs() } else { 0.0 };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        match rsi_from_averages(avg_gain, avg_loss) {
            Some(rsi) => out[i + 1] = Some(rsi),
            None => break,
        }
    }

    out
}

/// Most recent RSI value.
pub fn rsi_latest(closes: &[f64], period: usize) -> Option<f64> {
    super::last(&calculate_rsi(closes, period))
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}
