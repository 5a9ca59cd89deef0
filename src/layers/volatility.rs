// =============================================================================
// Volatility Layer and Volatility Surface
// =============================================================================
//
// The scoring layer reads ATR(14) as a percentage of price.  Its score is a
// constant 65: volatility is reported, not judged.  Bollinger band width is
// attached as an informational component.
//
// The volatility surface is the descriptive deep-analysis view: realised
// volatility over 10 / 20 / 60 returns, a range-based implied-volatility
// proxy, the dispersion of those three estimates (vol of vol), and the skew
// and excess kurtosis of the last 60 returns.

use serde::Serialize;

use crate::indicators::bollinger::{calculate_bollinger, DEFAULT_PERIOD, DEFAULT_STD};
use crate::indicators::stats::{kurtosis, mean, returns, skewness, std_dev, TRADING_DAYS};
use crate::market_data::Bar;
use crate::types::SignalKind;

use super::{AnalysisContext, Component, LayerKind, LayerResult, Reading};

const VOLATILITY_SCORE: f64 = 65.0;

pub fn analyze_volatility(ctx: &AnalysisContext<'_>) -> LayerResult {
    let atr = atr_component(ctx);

    let bands = match calculate_bollinger(&ctx.closes, DEFAULT_PERIOD, DEFAULT_STD) {
        Some(bb) => Component::new(
            "Bollinger Width",
            bb.width,
            if bb.width > 10.0 {
                SignalKind::Expanding
            } else {
                SignalKind::Moderate
            },
            format!("Band width {:.2}% of the 20-bar mean", bb.width),
        ),
        None => Component::unavailable("Bollinger Width", "Bollinger bands"),
    };

    LayerResult::new(LayerKind::Volatility, VOLATILITY_SCORE, vec![atr, bands])
}

fn atr_component(ctx: &AnalysisContext<'_>) -> Component {
    let name = "ATR Analysis";
    let (Some(atr), Some(price)) = (ctx.atr(), ctx.price()) else {
        return Component::new(
            name,
            VOLATILITY_SCORE,
            SignalKind::Moderate,
            "Insufficient data for ATR",
        );
    };

    let pct = atr / price * 100.0;
    let regime = if pct < 1.0 {
        "low volatility"
    } else if pct < 2.0 {
        "normal range"
    } else {
        "elevated"
    };

    Component::new(
        name,
        VOLATILITY_SCORE,
        SignalKind::Moderate,
        format!("ATR {pct:.2}%, {regime}"),
    )
}

// =============================================================================
// Volatility surface
// =============================================================================

/// Closes needed for a full surface (60 returns).
pub const SURFACE_MIN_BARS: usize = 61;
const RANGE_WINDOW: usize = 14;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilitySurface {
    pub realized_vol: f64,
    pub implied_vol: f64,
    pub vol_of_vol: f64,
    pub skew: Option<f64>,
    pub kurtosis: Option<f64>,
    pub term: String,
    pub components: Vec<Reading>,
}

/// Annualised volatility (%) of the trailing `n` returns.
fn realized(rets: &[f64], n: usize) -> Option<f64> {
    Some(std_dev(&rets[rets.len().saturating_sub(n)..])? * TRADING_DAYS.sqrt() * 100.0)
}

pub fn volatility_surface(bars: &[Bar]) -> Option<VolatilitySurface> {
    if bars.len() < SURFACE_MIN_BARS {
        return None;
    }
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let rets = returns(&closes);
    let price = *closes.last()?;

    let vol10 = realized(&rets, 10)?;
    let vol20 = realized(&rets, 20)?;
    let vol60 = realized(&rets, 60)?;

    let ranges: Vec<f64> = bars[bars.len() - RANGE_WINDOW..]
        .iter()
        .map(|b| b.high - b.low)
        .collect();
    let implied_vol = mean(&ranges)? / price * TRADING_DAYS.sqrt() * 100.0;
    let vol_of_vol = std_dev(&[vol10, vol20, vol60])?;

    let last60 = &rets[rets.len() - 60..];
    let skew = skewness(last60);
    let kurt = kurtosis(last60);

    let skew_reading = match skew {
        Some(s) if s < -0.5 => "Negative skew - puts more expensive (fear premium)",
        Some(s) if s > 0.5 => "Positive skew - calls more expensive (greed premium)",
        _ => "Balanced skew - neutral sentiment",
    };
    let tail_reading = match kurt {
        Some(k) if k > 1.0 => "Fat tails - outsized moves more likely than normal",
        Some(k) if k < -1.0 => "Thin tails - moves cluster near the mean",
        _ => "Near-normal tail behaviour",
    };

    let components = vec![
        Reading::new(
            "10-Day Realized Vol",
            vol10,
            format!("{vol10:.2}% annualised"),
            if vol10 > vol20 {
                "Rising short-term volatility"
            } else {
                "Declining short-term volatility"
            },
        ),
        Reading::new(
            "20-Day Realized Vol",
            vol20,
            format!("{vol20:.2}% annualised"),
            "Current volatility baseline",
        ),
        Reading::new(
            "60-Day Realized Vol",
            vol60,
            format!("{vol60:.2}% annualised"),
            if vol60 > vol20 {
                "Volatility declining from highs"
            } else {
                "Volatility rising from lows"
            },
        ),
        Reading::new(
            "Vol Skew",
            skew.unwrap_or(0.0) * 10.0,
            format!("Return skew {:.3}", skew.unwrap_or(0.0)),
            skew_reading,
        ),
        Reading::new(
            "Excess Kurtosis",
            kurt.unwrap_or(0.0),
            format!("Excess kurtosis {:.3}", kurt.unwrap_or(0.0)),
            tail_reading,
        ),
    ];

    Some(VolatilitySurface {
        realized_vol: vol20,
        implied_vol,
        vol_of_vol,
        skew,
        kurtosis: kurt,
        term: "20-day".to_string(),
        components,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::fixtures;

    #[test]
    fn volatility_score_is_constant() {
        for bars in [
            fixtures::flat(60, 100.0),
            fixtures::wave(60, 100.0, 0.1),
            fixtures::rising(5, 100.0, 1.0),
        ] {
            let layer = analyze_volatility(&AnalysisContext::new(&bars));
            assert_eq!(layer.score, 65.0);
        }
    }

    #[test]
    fn atr_description_bands() {
        let bars = fixtures::flat(60, 100.0);
        let layer = analyze_volatility(&AnalysisContext::new(&bars));
        assert_eq!(layer.components[0].description, "ATR 0.00%, low volatility");

        let mut wide = fixtures::flat(60, 100.0);
        for b in &mut wide {
            b.high = 103.0;
            b.low = 97.0;
        }
        let layer = analyze_volatility(&AnalysisContext::new(&wide));
        assert_eq!(layer.components[0].description, "ATR 6.00%, elevated");
    }

    #[test]
    fn surface_needs_sixty_returns() {
        assert!(volatility_surface(&fixtures::wave(60, 100.0, 0.1)).is_none());
        assert!(volatility_surface(&fixtures::wave(61, 100.0, 0.1)).is_some());
    }

    #[test]
    fn surface_values_are_consistent() {
        let bars = fixtures::wave(150, 100.0, 0.05);
        let s = volatility_surface(&bars).unwrap();
        assert_eq!(s.components.len(), 5);
        assert!(s.realized_vol > 0.0);
        assert!(s.implied_vol > 0.0);
        assert!(s.vol_of_vol >= 0.0);
        assert_eq!(s.realized_vol, s.components[1].value);
    }

    #[test]
    fn flat_surface_has_no_skew() {
        let s = volatility_surface(&fixtures::flat(80, 100.0)).unwrap();
        assert_eq!(s.realized_vol, 0.0);
        assert!(s.skew.is_none());
        assert_eq!(s.components[3].interpretation, "Balanced skew - neutral sentiment");
    }
}
