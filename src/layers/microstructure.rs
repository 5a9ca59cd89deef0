// =============================================================================
// Market Microstructure
// =============================================================================
//
// Proxies for execution quality built from daily bars:
//
//   spread      mean (high - low) / close over 20 bars, in percent
//   depth       coefficient of variation of the last 20 volumes, in percent
//   impact      mean |return| per million shares over 20 bars (Amihud)
//   asymmetry   |lag-1 autocorrelation| of the last 60 returns, in percent
//
//   score = 100 - 10*spread - 0.5*depth - 20*impact - 0.5*asymmetry

use serde::Serialize;

use crate::indicators::clamp_score;
use crate::indicators::stats::{autocorrelation, mean, returns, std_dev};
use crate::market_data::Bar;

const WINDOW: usize = 20;
const AUTOCORR_WINDOW: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Microstructure {
    pub score: f64,
    pub bid_ask_spread: f64,
    pub market_depth: f64,
    pub price_impact: f64,
    pub information_asymmetry: f64,
    pub description: String,
}

/// Mean |return| per million shares, pairing each return with the volume of
/// the bar it ends on.  Zero-volume bars are skipped.
pub(crate) fn amihud(rets: &[f64], volumes: &[f64], window: usize) -> Option<f64> {
    let n = rets.len().min(volumes.len()).min(window);
    let rets = &rets[rets.len() - n..];
    let volumes = &volumes[volumes.len() - n..];
    let impacts: Vec<f64> = rets
        .iter()
        .zip(volumes)
        .filter(|(_, &v)| v > 0.0)
        .map(|(r, v)| r.abs() / (v / 1_000_000.0))
        .collect();
    mean(&impacts)
}

/// Coefficient of variation in percent; zero when the mean is zero.
pub(crate) fn dispersion(values: &[f64]) -> f64 {
    match (mean(values), std_dev(values)) {
        (Some(avg), Some(sd)) if avg > 0.0 => sd / avg * 100.0,
        _ => 0.0,
    }
}

pub fn analyze_microstructure(bars: &[Bar]) -> Option<Microstructure> {
    if bars.len() < WINDOW + 1 {
        return None;
    }
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let rets = returns(&closes);

    let recent = &bars[bars.len() - WINDOW..];
    let spreads: Vec<f64> = recent
        .iter()
        .map(|b| (b.high - b.low) / b.close * 100.0)
        .collect();
    let spread = mean(&spreads)?;
    let depth = dispersion(&volumes[volumes.len() - WINDOW..]);
    let impact = amihud(&rets, &volumes, WINDOW).unwrap_or(0.0);

    let tail = &rets[rets.len().saturating_sub(AUTOCORR_WINDOW)..];
    let asymmetry = autocorrelation(tail, 1).map_or(0.0, |ac| ac.abs() * 100.0);

    let raw = (100.0 - spread * 10.0 - depth * 0.5 - impact * 20.0 - asymmetry * 0.5).round();
    let description = if raw > 70.0 {
        "Excellent market microstructure with tight spreads and deep liquidity"
    } else if raw > 50.0 {
        "Good microstructure - normal trading conditions"
    } else {
        "Challenged microstructure - wider spreads or lower liquidity"
    };

    Some(Microstructure {
        score: clamp_score(raw),
        bid_ask_spread: spread,
        market_depth: depth,
        price_impact: impact,
        information_asymmetry: asymmetry,
        description: description.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::fixtures;

    #[test]
    fn flat_tape_is_frictionless() {
        let m = analyze_microstructure(&fixtures::flat(80, 50.0)).unwrap();
        assert_eq!(m.bid_ask_spread, 0.0);
        assert_eq!(m.market_depth, 0.0);
        assert_eq!(m.price_impact, 0.0);
        assert_eq!(m.information_asymmetry, 0.0);
        assert_eq!(m.score, 100.0);
        assert!(m.description.starts_with("Excellent"));
    }

    #[test]
    fn wide_ranges_cost_points() {
        let tight = analyze_microstructure(&fixtures::flat(80, 50.0)).unwrap();
        let wide = analyze_microstructure(&fixtures::wave(80, 50.0, 0.0)).unwrap();
        assert!(wide.bid_ask_spread > 1.0);
        assert!(wide.score < tight.score);
        assert!((0.0..=100.0).contains(&wide.score));
    }

    #[test]
    fn amihud_skips_zero_volume() {
        let rets = [0.01, -0.02, 0.03];
        let vols = [1_000_000.0, 0.0, 2_000_000.0];
        let v = amihud(&rets, &vols, 20).unwrap();
        assert!((v - (0.01 + 0.015) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn short_input_is_none() {
        assert!(analyze_microstructure(&fixtures::flat(20, 50.0)).is_none());
    }
}
