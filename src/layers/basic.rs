// =============================================================================
// Basic Point Layers
// =============================================================================
//
// The basic confidence profile awards fixed points per layer:
//
//   Trend      35   SMA50 vs SMA200 spread
//   Momentum   25   RSI(14) band
//   Volume     20   last volume / 20-bar mean
//   Fibonacci  20   distance of price from the Fibonacci pivot point
//
// Each layer is reported on 0-100 (points / max * 100) so it can be blended
// like any other layer; with weights 0.35 / 0.25 / 0.20 / 0.20 the weighted
// sum reproduces the raw point total.  Every layer also yields one
// human-readable reason.

use crate::indicators::pivots::fibonacci_pivots;
use crate::indicators::volume::{volume_ratio, DEFAULT_LOOKBACK};
use crate::indicators::last;
use crate::types::SignalKind;

use super::{AnalysisContext, Component, LayerKind, LayerResult};

pub const TREND_MAX: f64 = 35.0;
pub const MOMENTUM_MAX: f64 = 25.0;
pub const VOLUME_MAX: f64 = 20.0;
pub const FIBONACCI_MAX: f64 = 20.0;

/// A layer scored in points plus the reason line it contributes.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLayer {
    pub layer: LayerResult,
    pub points: f64,
    pub reason: String,
}

fn point_layer(
    kind: LayerKind,
    max: f64,
    points: f64,
    component: Component,
    reason: impl Into<String>,
) -> PointLayer {
    PointLayer {
        layer: LayerResult::new(kind, points / max * 100.0, vec![component]),
        points,
        reason: reason.into(),
    }
}

// =============================================================================
// Trend
// =============================================================================

pub fn trend_points(ctx: &AnalysisContext<'_>) -> PointLayer {
    let name = "SMA 50/200 Spread";
    let (Some(s50), Some(s200)) = (last(&ctx.sma50), last(&ctx.sma200)) else {
        return point_layer(
            LayerKind::Trend,
            TREND_MAX,
            0.0,
            Component::new(name, 0.0, SignalKind::Neutral, "Insufficient data for SMA 200"),
            "Insufficient data for long-term trend",
        );
    };

    let strength = (s50 - s200) / s200 * 100.0;
    let (points, signal) = if strength > 2.0 {
        (35.0, SignalKind::Bullish)
    } else if strength > 0.5 {
        (25.0, SignalKind::Bullish)
    } else if strength > -0.5 {
        (15.0, SignalKind::Neutral)
    } else {
        (5.0, SignalKind::Bearish)
    };

    let reason = if points >= 25.0 {
        "Short-term trend is clearly above long-term average"
    } else {
        "Trend is weak or ranging relative to long-term average"
    };

    point_layer(
        LayerKind::Trend,
        TREND_MAX,
        points,
        Component::new(
            name,
            points,
            signal,
            format!("SMA50 {:+.2}% versus SMA200", strength),
        ),
        reason,
    )
}

// =============================================================================
// Momentum
// =============================================================================

pub fn momentum_points(ctx: &AnalysisContext<'_>) -> PointLayer {
    let rsi = ctx.rsi().unwrap_or(50.0);

    let (points, signal) = if rsi > 60.0 && rsi < 70.0 {
        (25.0, SignalKind::Bullish)
    } else if rsi >= 50.0 {
        (18.0, SignalKind::Bullish)
    } else if rsi >= 40.0 {
        (12.0, SignalKind::Neutral)
    } else {
        (5.0, SignalKind::Bearish)
    };

    let reason = if points >= 18.0 {
        "Momentum supports continuation"
    } else {
        "Momentum is neutral or weakening"
    };

    point_layer(
        LayerKind::Momentum,
        MOMENTUM_MAX,
        points,
        Component::new("RSI (14)", points, signal, format!("RSI at {rsi:.1}")),
        reason,
    )
}

// =============================================================================
// Volume
// =============================================================================

pub fn volume_points(ctx: &AnalysisContext<'_>) -> PointLayer {
    let window = DEFAULT_LOOKBACK.min(ctx.volumes.len());
    let ratio = volume_ratio(&ctx.volumes, window);

    let points = match ratio {
        Some(r) if r >= 1.5 => 20.0,
        Some(r) if r >= 1.2 => 14.0,
        Some(r) if r >= 1.0 => 8.0,
        _ => 4.0,
    };
    let signal = if points >= 14.0 {
        SignalKind::Expanding
    } else {
        SignalKind::Neutral
    };

    let reason = if points >= 14.0 {
        "Above-average volume confirms participation"
    } else {
        "Volume participation is average or low"
    };

    let description = match ratio {
        Some(r) => format!("Volume {r:.2}x the {window}-bar average"),
        None => "No volume recorded".to_string(),
    };

    point_layer(
        LayerKind::Volume,
        VOLUME_MAX,
        points,
        Component::new("Volume Ratio", points, signal, description),
        reason,
    )
}

// =============================================================================
// Fibonacci pivot
// =============================================================================

/// Pivot built from the three closes before the last bar, used as
/// high / low / close, and the last close's distance from it.
pub fn fibonacci_points(ctx: &AnalysisContext<'_>) -> PointLayer {
    let name = "Fibonacci Pivot";
    let inputs = (
        ctx.close_back(1),
        ctx.close_back(2),
        ctx.close_back(3),
        ctx.price(),
    );
    let (Some(high), Some(low), Some(close), Some(price)) = inputs else {
        return point_layer(
            LayerKind::Fibonacci,
            FIBONACCI_MAX,
            0.0,
            Component::new(name, 0.0, SignalKind::Neutral, "Insufficient data for pivots"),
            "Insufficient data for Fibonacci pivots",
        );
    };

    let pivots = fibonacci_pivots(high, low, close);
    let distance = (price - pivots.pp) / pivots.pp * 100.0;

    let (points, signal) = if distance > 1.0 {
        (20.0, SignalKind::Bullish)
    } else if distance > 0.0 {
        (14.0, SignalKind::Bullish)
    } else if distance > -1.0 {
        (8.0, SignalKind::Neutral)
    } else {
        (4.0, SignalKind::Bearish)
    };

    let reason = if points >= 14.0 {
        "Price is holding above key Fibonacci structure"
    } else {
        "Price is near or below Fibonacci pivot"
    };

    point_layer(
        LayerKind::Fibonacci,
        FIBONACCI_MAX,
        points,
        Component::new(
            name,
            points,
            signal,
            format!("Price {distance:+.2}% from pivot {:.2}", pivots.pp),
        ),
        reason,
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::fixtures;

    #[test]
    fn rising_series_earns_full_trend_points() {
        let bars = fixtures::rising(250, 100.0, 1.0);
        let ctx = AnalysisContext::new(&bars);
        let trend = trend_points(&ctx);
        assert_eq!(trend.points, 35.0);
        assert!((trend.layer.score - 100.0).abs() < 1e-10);
        assert_eq!(trend.reason, "Short-term trend is clearly above long-term average");
    }

    #[test]
    fn short_history_has_no_trend_points() {
        let bars = fixtures::rising(120, 100.0, 1.0);
        let ctx = AnalysisContext::new(&bars);
        let trend = trend_points(&ctx);
        assert_eq!(trend.points, 0.0);
        assert_eq!(trend.layer.score, 0.0);
    }

    #[test]
    fn flat_series_momentum_is_18_points() {
        // Flat RSI resolves to 50, which sits in the >= 50 band.
        let bars = fixtures::flat(60, 100.0);
        let ctx = AnalysisContext::new(&bars);
        let m = momentum_points(&ctx);
        assert_eq!(m.points, 18.0);
        assert!((m.layer.score - 72.0).abs() < 1e-10);
    }

    #[test]
    fn volume_spike_earns_full_points() {
        let mut bars = fixtures::flat(40, 100.0);
        bars.last_mut().unwrap().volume = 5_000_000.0;
        let ctx = AnalysisContext::new(&bars);
        let v = volume_points(&ctx);
        assert_eq!(v.points, 20.0);
        assert_eq!(v.reason, "Above-average volume confirms participation");
    }

    #[test]
    fn steady_volume_is_8_points() {
        let bars = fixtures::flat(40, 100.0);
        let ctx = AnalysisContext::new(&bars);
        assert_eq!(volume_points(&ctx).points, 8.0);
    }

    #[test]
    fn fibonacci_distance_bands() {
        let bars = fixtures::rising(10, 100.0, 2.0);
        let ctx = AnalysisContext::new(&bars);
        // Pivot of (116, 114, 112) = 114; price 118 is 3.5% above.
        let f = fibonacci_points(&ctx);
        assert_eq!(f.points, 20.0);

        let flat = fixtures::flat(10, 100.0);
        let ctx = AnalysisContext::new(&flat);
        assert_eq!(fibonacci_points(&ctx).points, 8.0);

        let few = fixtures::flat(3, 100.0);
        let ctx = AnalysisContext::new(&few);
        assert_eq!(fibonacci_points(&ctx).points, 0.0);
    }

    #[test]
    fn falling_series_is_weak() {
        let bars = fixtures::falling(250, 400.0, 1.0);
        let ctx = AnalysisContext::new(&bars);
        assert_eq!(trend_points(&ctx).points, 5.0);
        assert_eq!(momentum_points(&ctx).points, 5.0);
        assert_eq!(fibonacci_points(&ctx).points, 4.0);
    }
}
