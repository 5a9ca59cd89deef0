// =============================================================================
// Trend Layer
// =============================================================================
//
// Three readings, blended 0.35 / 0.35 / 0.30:
//
//   Ichimoku cloud   price above a thick cloud (>2% of price) 90, above a thin
//                    cloud 75, below the cloud 25, inside 50
//   EMA ribbon       8 > 21 > 55 with price above EMA8 85, the mirror image
//                    20, price above EMA21 65, otherwise 50
//   ADX(14)          > 40 90, > 25 70, otherwise 40
//
// The institutional engine uses a coarser EMA-stack score on its own; it is
// exposed here as `ema_stack`.

use serde::Serialize;

use crate::indicators::adx::{calculate_adx, DEFAULT_PERIOD as ADX_PERIOD};
use crate::indicators::ema::{ribbon_alignment, RibbonAlignment};
use crate::indicators::ichimoku::ichimoku_latest;
use crate::types::SignalKind;

use super::{AnalysisContext, Component, LayerKind, LayerResult};

const THICK_CLOUD: f64 = 0.02;

pub fn analyze_trend(ctx: &AnalysisContext<'_>) -> LayerResult {
    let cloud = ichimoku_component(ctx);
    let ribbon = ribbon_component(ctx);
    let adx = adx_component(ctx);

    let score = (cloud.value * 0.35 + ribbon.value * 0.35 + adx.value * 0.30).round();
    LayerResult::new(LayerKind::Trend, score, vec![cloud, ribbon, adx])
}

fn ichimoku_component(ctx: &AnalysisContext<'_>) -> Component {
    let name = "Ichimoku Cloud";
    let (Some(cloud), Some(price)) = (ichimoku_latest(ctx.bars), ctx.price()) else {
        return Component::unavailable(name, "Ichimoku cloud");
    };

    let thickness = (cloud.span_a - cloud.span_b).abs() / price;
    if price > cloud.cloud_top() {
        let thick = thickness > THICK_CLOUD;
        Component::new(
            name,
            if thick { 90.0 } else { 75.0 },
            SignalKind::Bullish,
            format!(
                "Price above cloud, {} support",
                if thick { "thick" } else { "moderate" }
            ),
        )
    } else if price < cloud.cloud_bottom() {
        Component::new(name, 25.0, SignalKind::Bearish, "Price below cloud")
    } else {
        Component::new(name, 50.0, SignalKind::Neutral, "Price inside cloud")
    }
}

fn ribbon_component(ctx: &AnalysisContext<'_>) -> Component {
    let name = "EMA Ribbon";
    let (Some((e8, e21, e55)), Some(price)) = (ctx.ribbon(), ctx.price()) else {
        return Component::unavailable(name, "EMA ribbon");
    };

    match ribbon_alignment(e8, e21, e55) {
        RibbonAlignment::Up if price > e8 => {
            Component::new(name, 85.0, SignalKind::Bullish, "8/21/55 aligned upward")
        }
        RibbonAlignment::Down if price < e8 => {
            Component::new(name, 20.0, SignalKind::Bearish, "8/21/55 aligned downward")
        }
        _ if price > e21 => Component::new(name, 65.0, SignalKind::Bullish, "Price above key EMAs"),
        _ => Component::new(name, 50.0, SignalKind::Neutral, "EMAs mixed"),
    }
}

fn adx_component(ctx: &AnalysisContext<'_>) -> Component {
    let name = "ADX Strength";
    let Some(adx) = calculate_adx(ctx.bars, ADX_PERIOD) else {
        return Component::unavailable(name, "ADX");
    };

    if adx > 40.0 {
        Component::new(name, 90.0, SignalKind::Bullish, format!("ADX at {adx:.0}, very strong trend"))
    } else if adx > 25.0 {
        Component::new(name, 70.0, SignalKind::Moderate, format!("ADX at {adx:.0}, strengthening"))
    } else {
        Component::new(name, 40.0, SignalKind::Moderate, format!("ADX at {adx:.0}, weak trend"))
    }
}

// =============================================================================
// EMA stack (institutional)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmaStack {
    pub score: f64,
    /// EMA8 > EMA21 > EMA55
    pub aligned: bool,
    /// Price above EMA21
    pub above_key_levels: bool,
    pub ema21: f64,
}

/// aligned and above EMA21 85, above EMA21 65, above EMA55 55, otherwise 35.
pub fn ema_stack(ctx: &AnalysisContext<'_>) -> Option<EmaStack> {
    let (e8, e21, e55) = ctx.ribbon()?;
    let price = ctx.price()?;

    let aligned = ribbon_alignment(e8, e21, e55) == RibbonAlignment::Up;
    let above = price > e21;
    let score = if aligned && above {
        85.0
    } else if above {
        65.0
    } else if price > e55 {
        55.0
    } else {
        35.0
    };

    Some(EmaStack {
        score,
        aligned,
        above_key_levels: above,
        ema21: e21,
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
    fn strictly_rising_series_is_max_bullish() {
        let closes: Vec<f64> = (1..=300).map(|i| 100.0 + i as f64).collect();
        let bars = fixtures::from_closes(&closes, 1_000_000.0);
        let ctx = AnalysisContext::new(&bars);
        let trend = analyze_trend(&ctx);

        let ribbon = trend.component("EMA Ribbon").unwrap();
        assert_eq!(ribbon.value, 85.0);
        assert_eq!(ribbon.signal, SignalKind::Bullish);
        assert_eq!(trend.component("ADX Strength").unwrap().value, 90.0);
        assert!(trend.component("Ichimoku Cloud").unwrap().value >= 75.0);
        assert!(trend.score >= 83.0);
    }

    #[test]
    fn flat_series_is_neutral() {
        let bars = fixtures::flat(60, 100.0);
        let ctx = AnalysisContext::new(&bars);
        let trend = analyze_trend(&ctx);
        assert_eq!(trend.component("Ichimoku Cloud").unwrap().description, "Price inside cloud");
        assert_eq!(trend.component("EMA Ribbon").unwrap().description, "EMAs mixed");
        assert_eq!(trend.score, 50.0);
    }

    #[test]
    fn falling_series_is_bearish() {
        let bars = fixtures::falling(120, 300.0, 1.0);
        let ctx = AnalysisContext::new(&bars);
        let trend = analyze_trend(&ctx);
        assert_eq!(trend.component("Ichimoku Cloud").unwrap().value, 25.0);
        assert_eq!(trend.component("EMA Ribbon").unwrap().value, 20.0);
        assert!(trend.score < 50.0);
    }

    #[test]
    fn short_history_falls_back_to_neutral_components() {
        let bars = fixtures::rising(20, 100.0, 1.0);
        let ctx = AnalysisContext::new(&bars);
        let trend = analyze_trend(&ctx);
        assert!(trend
            .components
            .iter()
            .all(|c| c.description.starts_with("Insufficient data")));
        assert_eq!(trend.score, 50.0);
    }

    #[test]
    fn ema_stack_scores() {
        let up = fixtures::rising(80, 100.0, 1.0);
        let stack = ema_stack(&AnalysisContext::new(&up)).unwrap();
        assert!(stack.aligned && stack.above_key_levels);
        assert_eq!(stack.score, 85.0);

        let down = fixtures::falling(80, 300.0, 1.0);
        assert_eq!(ema_stack(&AnalysisContext::new(&down)).unwrap().score, 35.0);

        assert!(ema_stack(&AnalysisContext::new(&up[..30])).is_none());
    }
}
