// =============================================================================
// Liquidity Analysis
// =============================================================================
//
// Amihud illiquidity over the last 20 returns plus a 20-bucket volume profile
// of the last 60 closes.  The point of control (POC) is the lower edge of the
// bucket holding the most volume.
//
//   score = (1 - 100 * amihud) * 50 + (1 - cv(volume20)) * 50
//
// Risk: score > 70 LOW, < 40 HIGH, otherwise MEDIUM.

use serde::{Deserialize, Serialize};

use crate::indicators::clamp_score;
use crate::indicators::stats::{mean, returns, std_dev};
use crate::market_data::Bar;

use super::microstructure::amihud;

const WINDOW: usize = 20;
const PROFILE_WINDOW: usize = 60;
const BUCKETS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiquidityRisk {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeProfile {
    /// Lower edges of the three heaviest buckets, heaviest first.
    pub high_volume: Vec<f64>,
    /// Lower edges of the three lightest occupied buckets.
    pub low_volume: Vec<f64>,
    pub poc: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiquidityAnalysis {
    pub score: f64,
    pub amihud_illiquidity: f64,
    pub volume_profile: VolumeProfile,
    pub liquidity_risk: LiquidityRisk,
    pub description: String,
}

/// Volume-at-price histogram over the closes of `bars`.
pub fn volume_profile(bars: &[Bar]) -> Option<VolumeProfile> {
    let min = bars.iter().map(|b| b.close).fold(f64::INFINITY, f64::min);
    let max = bars.iter().map(|b| b.close).fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let size = (max - min) / BUCKETS as f64;

    let mut volume = [0.0_f64; BUCKETS];
    let mut occupied = [false; BUCKETS];
    for bar in bars {
        let bucket = if size > 0.0 {
            (((bar.close - min) / size).floor() as usize).min(BUCKETS - 1)
        } else {
            0
        };
        volume[bucket] += bar.volume;
        occupied[bucket] = true;
    }

    let mut ranked: Vec<usize> = (0..BUCKETS).filter(|&i| occupied[i]).collect();
    // Stable: equal volumes keep ascending price order.
    ranked.sort_by(|a, b| volume[*b].total_cmp(&volume[*a]));

    let edge = |bucket: usize| min + bucket as f64 * size;
    let poc = edge(*ranked.first()?);
    let high_volume = ranked.iter().take(3).map(|&b| edge(b)).collect();
    let low_volume = ranked[ranked.len().saturating_sub(3)..]
        .iter()
        .map(|&b| edge(b))
        .collect();

    Some(VolumeProfile {
        high_volume,
        low_volume,
        poc,
    })
}

pub fn analyze_liquidity(bars: &[Bar]) -> Option<LiquidityAnalysis> {
    if bars.len() < WINDOW + 1 {
        return None;
    }
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let illiquidity = amihud(&returns(&closes), &volumes, WINDOW).unwrap_or(0.0);

    let profile = volume_profile(&bars[bars.len().saturating_sub(PROFILE_WINDOW)..])?;

    let recent = &volumes[volumes.len() - WINDOW..];
    let consistency = match (mean(recent), std_dev(recent)) {
        (Some(avg), Some(sd)) if avg > 0.0 => 1.0 - sd / avg,
        _ => 0.0,
    };
    let raw = ((1.0 - illiquidity * 100.0) * 50.0 + consistency * 50.0).round();

    let (risk, description) = if raw > 70.0 {
        (LiquidityRisk::Low, "Excellent liquidity - minimal slippage expected")
    } else if raw < 40.0 {
        (LiquidityRisk::High, "Poor liquidity - significant slippage risk")
    } else {
        (
            LiquidityRisk::Medium,
            "Adequate liquidity - moderate slippage possible on large orders",
        )
    };

    Some(LiquidityAnalysis {
        score: clamp_score(raw),
        amihud_illiquidity: illiquidity,
        volume_profile: profile,
        liquidity_risk: risk,
        description: description.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::fixtures;

    #[test]
    fn flat_tape_is_liquid() {
        let l = analyze_liquidity(&fixtures::flat(80, 50.0)).unwrap();
        assert_eq!(l.amihud_illiquidity, 0.0);
        assert_eq!(l.score, 100.0);
        assert_eq!(l.liquidity_risk, LiquidityRisk::Low);
        assert_eq!(l.volume_profile.poc, 50.0);
        assert_eq!(l.volume_profile.high_volume, vec![50.0]);
    }

    #[test]
    fn poc_follows_heaviest_bucket() {
        let mut bars = fixtures::rising(60, 100.0, 1.0);
        // close 130 lands in bucket floor(30 / 2.95) = 10
        bars[30].volume = 10_000_000.0;
        let profile = volume_profile(&bars).unwrap();
        assert!((profile.poc - 129.5).abs() < 1e-9);
        assert_eq!(profile.high_volume.len(), 3);
        assert_eq!(profile.low_volume.len(), 3);
        // the max close is folded into the top bucket
        let top = 100.0 + 19.0 * 2.95;
        assert!(profile
            .high_volume
            .iter()
            .chain(&profile.low_volume)
            .all(|edge| *edge <= top + 1e-9));
    }

    #[test]
    fn illiquid_names_are_high_risk() {
        let mut bars = fixtures::wave(80, 50.0, 0.0);
        for b in &mut bars {
            b.volume = 10_000.0;
        }
        let l = analyze_liquidity(&bars).unwrap();
        assert_eq!(l.liquidity_risk, LiquidityRisk::High);
        assert_eq!(l.score, 0.0);
    }
}
