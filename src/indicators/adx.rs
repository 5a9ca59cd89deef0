// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline:
//   1. Compute +DM (positive directional movement) and -DM per bar.
//   2. Compute True Range (TR) per bar.
//   3. Apply Wilder's smoothing (period) to +DM, -DM, and TR.
//   4. Derive +DI = smoothed(+DM) / smoothed(TR) * 100
//            -DI = smoothed(-DM) / smoothed(TR) * 100
//   5. DX  = |+DI - -DI| / (+DI + -DI) * 100
//   6. ADX = Wilder's smoothed average of DX over `period` bars.
//
// Interpretation:
//   ADX > 40  => very strong trend
//   ADX > 25  => trend strengthening
//   otherwise => weak trend / range
// =============================================================================

use crate::market_data::Bar;

use super::atr::true_range;

pub const DEFAULT_PERIOD: usize = 14;

/// Compute the most recent ADX value from a slice of bars.
///
/// Returns `None` when:
/// - `period` is zero.
/// - There are fewer than `2 * period + 1` bars.
/// - The smoothed true range collapses to zero (no price movement at all).
/// - Any intermediate calculation produces a non-finite result.
pub fn calculate_adx(bars: &[Bar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < 2 * period + 1 {
        return None;
    }

    let period_f = period as f64;
    let transitions = bars.len() - 1;

    let mut plus_dm = Vec::with_capacity(transitions);
    let mut minus_dm = Vec::with_capacity(transitions);
    let mut tr_vals = Vec::with_capacity(transitions);

    for w in bars.windows(2) {
        let (prev, cur) = (&w[0], &w[1]);

        let up_move = cur.high - prev.high;
        let down_move = prev.low - cur.low;

        plus_dm.push(if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 });
        minus_dm.push(if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 });
        tr_vals.push(true_range(cur, prev.close));
    }

    // --- Wilder's smoothing of +DM, -DM, TR ----------------------------------
    let mut smooth_plus_dm: f64 = plus_dm[..period].iter().sum();
    let mut smooth_minus_dm: f64 = minus_dm[..period].iter().sum();
    let mut smooth_tr: f64 = tr_vals[..period].iter().sum();

    let mut dx_values: Vec<f64> = Vec::with_capacity(transitions - period + 1);
    dx_values.push(compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr)?);

    for i in period..transitions {
        smooth_plus_dm = smooth_plus_dm - smooth_plus_dm / period_f + plus_dm[i];
        smooth_minus_dm = smooth_minus_dm - smooth_minus_dm / period_f + minus_dm[i];
        smooth_tr = smooth_tr - smooth_tr / period_f + tr_vals[i];

        dx_values.push(compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr)?);
    }

    // --- ADX = Wilder's smoothed average of DX -------------------------------
    if dx_values.len() < period {
        return None;
    }

    let mut adx = dx_values[..period].iter().sum::<f64>() / period_f;
    for &dx in &dx_values[period..] {
        adx = (adx * (period_f - 1.0) + dx) / period_f;
    }

    adx.is_finite().then_some(adx)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Compute DX from smoothed +DM, -DM, and TR values.
fn compute_dx(smooth_plus_dm: f64, smooth_minus_dm: f64, smooth_tr: f64) -> Option<f64> {
    if smooth_tr == 0.0 {
        return None;
    }

    let plus_di = (smooth_plus_dm / smooth_tr) * 100.0;
    let minus_di = (smooth_minus_dm / smooth_tr) * 100.0;

    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        return Some(0.0);
    }

    let dx = ((plus_di - minus_di).abs() / di_sum) * 100.0;
    dx.is_finite().then_some(dx)
}
