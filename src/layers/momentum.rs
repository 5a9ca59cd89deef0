// =============================================================================
// Momentum Layer
// =============================================================================
//
// RSI(14) band and MACD histogram direction, blended 50 / 50.
//
//   RSI   60-70 75 (strong), > 70 55 (overbought), < 30 70 (oversold
//         bounce), > 40 60, otherwise 50
//   MACD  histogram positive and rising 80, positive 65, negative and
//         falling 25, otherwise 45
//
// `institutional_momentum` is the single-number variant that reads RSI
// together with the sign of the histogram.

use crate::types::SignalKind;

use super::{AnalysisContext, Component, LayerKind, LayerResult};

pub fn analyze_momentum(ctx: &AnalysisContext<'_>) -> LayerResult {
    let rsi = rsi_component(ctx);
    let macd = macd_component(ctx);
    let score = (rsi.value * 0.5 + macd.value * 0.5).round();
    LayerResult::new(LayerKind::Momentum, score, vec![rsi, macd])
}

fn rsi_component(ctx: &AnalysisContext<'_>) -> Component {
    let name = "RSI (14)";
    let Some(rsi) = ctx.rsi() else {
        return Component::unavailable(name, "RSI");
    };

    let (value, signal, note) = if rsi > 60.0 && rsi < 70.0 {
        (75.0, SignalKind::Bullish, ", strong momentum")
    } else if rsi > 70.0 {
        (55.0, SignalKind::Neutral, ", overbought")
    } else if rsi < 30.0 {
        (70.0, SignalKind::Bullish, ", oversold bounce potential")
    } else if rsi > 40.0 {
        (60.0, SignalKind::Neutral, ", neutral momentum")
    } else {
        (50.0, SignalKind::Neutral, "")
    };

    Component::new(name, value, signal, format!("RSI at {rsi:.1}{note}"))
}

fn macd_component(ctx: &AnalysisContext<'_>) -> Component {
    let name = "MACD Histogram";
    let Some((prev, cur)) = ctx.macd.histogram_pair() else {
        return Component::unavailable(name, "MACD");
    };

    if cur > 0.0 && cur > prev {
        Component::new(name, 80.0, SignalKind::Bullish, "Positive and expanding")
    } else if cur > 0.0 {
        Component::new(name, 65.0, SignalKind::Bullish, "Positive but weakening")
    } else if cur < 0.0 && cur < prev {
        Component::new(name, 25.0, SignalKind::Bearish, "Negative and expanding")
    } else {
        Component::new(name, 45.0, SignalKind::Neutral, "Negative but improving")
    }
}

/// RSI 60-70 with a positive histogram 80, RSI > 50 with a positive
/// histogram 65, RSI < 30 70, RSI > 70 45, otherwise 50.
pub fn institutional_momentum(rsi: f64, histogram: f64) -> f64 {
    if rsi > 60.0 && rsi < 70.0 && histogram > 0.0 {
        80.0
    } else if rsi > 50.0 && histogram > 0.0 {
        65.0
    } else if rsi < 30.0 {
        70.0
    } else if rsi > 70.0 {
        45.0
    } else {
        50.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::fixtures;

    #[test]
    fn flat_series_rsi_is_50() {
        let bars = fixtures::flat(60, 100.0);
        let ctx = AnalysisContext::new(&bars);
        let m = analyze_momentum(&ctx);
        let rsi = m.component("RSI (14)").unwrap();
        assert_eq!(rsi.description, "RSI at 50.0, neutral momentum");
        assert_eq!(rsi.value, 60.0);
        // Zero histogram falls through to the last MACD branch.
        assert_eq!(m.component("MACD Histogram").unwrap().value, 45.0);
        assert_eq!(m.score, 53.0);
    }

    #[test]
    fn pure_uptrend_is_overbought() {
        let bars = fixtures::rising(100, 100.0, 1.0);
        let ctx = AnalysisContext::new(&bars);
        let m = analyze_momentum(&ctx);
        assert_eq!(m.component("RSI (14)").unwrap().value, 55.0);
    }

    #[test]
    fn pure_downtrend_is_oversold() {
        let bars = fixtures::falling(100, 300.0, 1.0);
        let ctx = AnalysisContext::new(&bars);
        let m = analyze_momentum(&ctx);
        let rsi = m.component("RSI (14)").unwrap();
        assert_eq!(rsi.value, 70.0);
        assert!(rsi.description.ends_with("oversold bounce potential"));
    }

    #[test]
    fn short_history_is_neutral() {
        let bars = fixtures::rising(10, 100.0, 1.0);
        let ctx = AnalysisContext::new(&bars);
        let m = analyze_momentum(&ctx);
        assert_eq!(m.score, 50.0);
    }

    #[test]
    fn institutional_momentum_table() {
        assert_eq!(institutional_momentum(65.0, 0.5), 80.0);
        assert_eq!(institutional_momentum(55.0, 0.5), 65.0);
        assert_eq!(institutional_momentum(65.0, -0.5), 50.0);
        assert_eq!(institutional_momentum(25.0, -0.5), 70.0);
        assert_eq!(institutional_momentum(75.0, 0.5), 45.0);
    }
}
