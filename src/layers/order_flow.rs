// =============================================================================
// Order Flow
// =============================================================================
//
// Daily bars carry no tape, so order flow is proxied over the last 20 bars:
//
//   VWAP position     price vs 20-bar VWAP: > +1% 75, > +0.5% 65, < -1% 30,
//                     otherwise 50
//   Volume delta      +volume on up bars, -volume otherwise; the 20-bar sum
//                     relative to 20x the mean volume, mapped 50 + 50 * d
//   Imbalance         (buy - sell) / (buy + sell) in percent, mapped 50 + i
//
// The score is the rounded mean of the three readings; >= 65 is bullish,
// <= 40 bearish.

use serde::Serialize;

use crate::indicators::stats::mean;
use crate::indicators::volume::calculate_vwap;
use crate::indicators::clamp_score;
use crate::market_data::Bar;
use crate::types::Direction;

use super::Reading;

const WINDOW: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderFlowAnalysis {
    pub score: f64,
    pub signal: Direction,
    pub components: Vec<Reading>,
    pub summary: String,
}

pub fn analyze_order_flow(bars: &[Bar]) -> Option<OrderFlowAnalysis> {
    if bars.len() < WINDOW + 1 {
        return None;
    }
    let recent = &bars[bars.len() - WINDOW..];
    let price = recent[recent.len() - 1].close;

    let components = vec![
        vwap_reading(recent, price),
        delta_reading(recent),
        imbalance_reading(recent),
    ];

    let values: Vec<f64> = components.iter().map(|c| c.value).collect();
    let score = mean(&values)?.round();

    let (signal, summary) = if score >= 65.0 {
        (
            Direction::Bullish,
            "Institutional order flow shows strong accumulation patterns with buy-side dominance",
        )
    } else if score <= 40.0 {
        (
            Direction::Bearish,
            "Distribution pattern detected with persistent sell-side pressure",
        )
    } else {
        (
            Direction::Neutral,
            "Neutral order flow with balanced institutional activity",
        )
    };

    Some(OrderFlowAnalysis {
        score,
        signal,
        components,
        summary: summary.to_string(),
    })
}

fn vwap_reading(recent: &[Bar], price: f64) -> Reading {
    let name = "VWMA Position";
    let Some(vwap) = calculate_vwap(recent) else {
        return Reading::new(
            name,
            50.0,
            "No volume in window",
            "Price near fair value - balanced order flow",
        );
    };

    let distance = (price - vwap) / vwap * 100.0;
    let value = if distance > 1.0 {
        75.0
    } else if distance > 0.5 {
        65.0
    } else if distance < -1.0 {
        30.0
    } else {
        50.0
    };

    let interpretation = if distance > 1.0 {
        "Strong buying pressure - institutional accumulation likely"
    } else if distance < -1.0 {
        "Selling pressure dominant - potential distribution"
    } else {
        "Price near fair value - balanced order flow"
    };

    Reading::new(
        name,
        value,
        format!(
            "Price is {} VWMA by {:.2}%",
            if distance > 0.0 { "above" } else { "below" },
            distance.abs()
        ),
        interpretation,
    )
}

fn delta_reading(recent: &[Bar]) -> Reading {
    let cumulative: f64 = recent
        .iter()
        .map(|b| if b.is_up() { b.volume } else { -b.volume })
        .sum();
    let avg_volume = recent.iter().map(|b| b.volume).sum::<f64>() / recent.len() as f64;

    let delta_pct = if avg_volume > 0.0 {
        cumulative / (avg_volume * WINDOW as f64) * 100.0
    } else {
        0.0
    };
    let value = clamp_score(50.0 + delta_pct * 50.0).round();

    let interpretation = if cumulative > avg_volume {
        "Strong net buying - aggressive buy orders overwhelming supply"
    } else if cumulative < -avg_volume {
        "Strong net selling - supply exceeding demand"
    } else {
        "Balanced order flow - neutral market sentiment"
    };

    Reading::new(
        "Cumulative Volume Delta",
        value,
        format!(
            "{} delta of {:.1}%",
            if cumulative > 0.0 { "Positive" } else { "Negative" },
            delta_pct.abs()
        ),
        interpretation,
    )
}

fn imbalance_reading(recent: &[Bar]) -> Reading {
    let buy: f64 = recent.iter().filter(|b| b.close > b.open).map(|b| b.volume).sum();
    let sell: f64 = recent.iter().filter(|b| b.close < b.open).map(|b| b.volume).sum();
    let total = buy + sell;
    let imbalance = if total > 0.0 {
        (buy - sell) / total * 100.0
    } else {
        0.0
    };
    let value = clamp_score(50.0 + imbalance).round();

    let side = if imbalance > 0.0 { "buying" } else { "selling" };
    let interpretation = if imbalance.abs() > 20.0 {
        format!("Very strong {side} pressure - one-sided order flow")
    } else if imbalance.abs() > 10.0 {
        format!("Moderate {side} bias")
    } else {
        "Balanced two-way order flow".to_string()
    };

    Reading::new(
        "Order Flow Imbalance",
        value,
        format!(
            "{} side dominance of {:.1}%",
            if imbalance > 0.0 { "Buy" } else { "Sell" },
            imbalance.abs()
        ),
        interpretation,
    )
}
