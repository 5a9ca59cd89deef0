// =============================================================================
// Institutional Signal Engine
// =============================================================================
//
// Daily-only signal built for position entries:
//
//   Trend      35%   mean of the EMA 8/21/55 stack score and swing structure
//   Momentum   30%   RSI band gated by the MACD histogram sign
//   Volume     20%   volume accumulation (ratio + OBV + up close)
//   Structure  15%   swing structure (higher highs / higher lows)
//
// The signal carries risk metrics (Sharpe over 60 bars, beta / alpha against
// the benchmark over 60 bars, annualised volatility over 30 bars), a long
// trade setup from ATR(14), and any supplied headlines as catalysts.

use serde::Serialize;
use tracing::debug;

use crate::indicators::stats::{alpha, annualized_volatility, beta, sharpe_ratio, RISK_FREE_RATE};
use crate::layers::momentum::institutional_momentum;
use crate::layers::structure::swing_structure;
use crate::layers::trend::ema_stack;
use crate::layers::volume::volume_accumulation;
use crate::layers::{AnalysisContext, Component, LayerKind, LayerResult};
use crate::market_data::{Bar, NewsItem};
use crate::trade_setup::{generate_trade_setup, TradeSetup};
use crate::types::{Bias, Direction, Grade, SignalKind};

use super::profile::{ScoreScale, ScoringProfile};
use super::weighted_score::{final_score, WeightedScorer};

pub const TIME_HORIZON: &str = "2-4 weeks";
const METRIC_WINDOW: usize = 60;
const VOLATILITY_WINDOW: usize = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinancialMetrics {
    pub sharpe_ratio: Option<f64>,
    /// Jensen's alpha in percent; needs a benchmark.
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    /// Annualised, percent.
    pub volatility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalDetail {
    pub score: u8,
    pub grade: Grade,
    pub direction: Direction,
    pub confidence: String,
    pub strength: String,
    pub time_horizon: String,
    pub metrics: FinancialMetrics,
    pub summary: String,
    pub reasoning: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstitutionalSignal {
    pub symbol: String,
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub signal: SignalDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade: Option<TradeSetup>,
    pub layers: Vec<LayerResult>,
    pub catalysts: Vec<NewsItem>,
    pub sufficient: bool,
}

fn direction(bias: Bias) -> Direction {
    match bias {
        Bias::Bullish => Direction::Bullish,
        Bias::Bearish => Direction::Bearish,
        _ => Direction::Neutral,
    }
}

fn label(scale: Option<&ScoreScale<String>>, score: f64) -> String {
    scale.map_or_else(String::new, |s| s.classify(score))
}

fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

pub fn financial_metrics(closes: &[f64], market: &[Bar]) -> FinancialMetrics {
    let stock = tail(closes, METRIC_WINDOW);
    let market_closes: Vec<f64> = market.iter().map(|b| b.close).collect();
    let market = tail(&market_closes, METRIC_WINDOW);

    let beta_value = beta(stock, market);
    FinancialMetrics {
        sharpe_ratio: sharpe_ratio(stock, RISK_FREE_RATE),
        alpha: beta_value.and_then(|b| alpha(stock, market, b, RISK_FREE_RATE)),
        beta: beta_value,
        volatility: annualized_volatility(tail(closes, VOLATILITY_WINDOW)),
    }
}

/// Last close, change and change in percent against the previous close.
fn price_change(closes: &[f64]) -> (Option<f64>, Option<f64>, Option<f64>) {
    let price = closes.last().copied();
    let prev = closes.len().checked_sub(2).map(|i| closes[i]);
    match (price, prev) {
        (Some(p), Some(prev)) if prev != 0.0 => {
            let change = p - prev;
            (Some(p), Some(change), Some(change / prev * 100.0))
        }
        _ => (price, None, None),
    }
}

pub fn compute_institutional(
    profile: &ScoringProfile,
    symbol: &str,
    bars: &[Bar],
    market: &[Bar],
    news: &[NewsItem],
) -> InstitutionalSignal {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let (price, change, change_percent) = price_change(&closes);

    if bars.len() < profile.min_bars.max(2) {
        debug!(
            symbol,
            bars = bars.len(),
            required = profile.min_bars,
            "Institutional fallback: insufficient data"
        );
        let score = final_score(profile.fallback_score);
        return InstitutionalSignal {
            symbol: symbol.to_string(),
            price,
            change,
            change_percent,
            signal: SignalDetail {
                score,
                grade: profile.grades.classify(score as f64),
                direction: Direction::Neutral,
                confidence: label(profile.confidence_labels.as_ref(), score as f64),
                strength: label(profile.strength_labels.as_ref(), score as f64),
                time_horizon: TIME_HORIZON.to_string(),
                metrics: FinancialMetrics::default(),
                summary: "Insufficient data for institutional analysis".to_string(),
                reasoning: vec!["Insufficient data".to_string()],
            },
            trade: None,
            layers: Vec::new(),
            catalysts: news.to_vec(),
            sufficient: false,
        };
    }

    let ctx = AnalysisContext::new(bars);

    // --- Layers ------------------------------------------------------------
    let stack = ema_stack(&ctx);
    let swings = swing_structure(bars);
    let stack_score = stack.map_or(35.0, |s| s.score);
    let trend_score = (stack_score + swings.score) / 2.0;

    let rsi = ctx.rsi().unwrap_or(50.0);
    let histogram = ctx.macd.latest().map_or(0.0, |p| p.histogram);
    let momentum_score = institutional_momentum(rsi, histogram);

    let volume = volume_accumulation(&ctx);
    let structure_signal = swings.trend.signal();

    let aligned = stack.map_or(false, |s| s.aligned);
    let above = stack.map_or(false, |s| s.above_key_levels);

    let layers = vec![
        LayerResult::new(
            LayerKind::Trend,
            trend_score,
            vec![
                Component::new(
                    "EMA Stack",
                    stack_score,
                    if aligned && above {
                        SignalKind::Bullish
                    } else if above {
                        SignalKind::Neutral
                    } else {
                        SignalKind::Bearish
                    },
                    if aligned {
                        "Perfect EMA alignment (8>21>55)"
                    } else {
                        "EMAs mixed"
                    },
                ),
                Component::new(
                    "Swing Structure",
                    swings.score,
                    structure_signal,
                    format!("{} swing pattern", swings.trend),
                ),
            ],
        ),
        LayerResult::new(
            LayerKind::Momentum,
            momentum_score,
            vec![Component::new(
                "RSI / MACD",
                momentum_score,
                if histogram > 0.0 { SignalKind::Bullish } else { SignalKind::Bearish },
                format!("RSI {rsi:.1}, MACD histogram {histogram:.3}"),
            )],
        ),
        volume.to_layer(),
        LayerResult::new(
            LayerKind::Structure,
            swings.score,
            vec![Component::new(
                "Market Structure",
                swings.score,
                structure_signal,
                swings.trend.to_string(),
            )],
        ),
    ];

    // --- Score -------------------------------------------------------------
    let score = WeightedScorer::from_profile(profile).score(&layers).score;
    let grade = profile.grades.classify(score as f64);
    let dir = direction(profile.bias.classify(score as f64));
    let confidence = label(profile.confidence_labels.as_ref(), score as f64);
    let strength = label(profile.strength_labels.as_ref(), score as f64);

    let summary = format!(
        "{dir} signal with {} confidence. {}",
        confidence.to_lowercase(),
        if score >= 70 {
            "Strong technical setup with favorable risk/reward across multiple timeframes."
        } else {
            "Mixed signals suggest cautious approach or waiting for better confirmation."
        }
    );

    let reasoning = vec![
        format!(
            "Trend: {} with price {} key levels (+{trend_score} pts)",
            if aligned { "Perfect EMA alignment (8>21>55)" } else { "EMAs mixed" },
            if above { "above" } else { "below" },
        ),
        format!(
            "Momentum: RSI at {rsi:.1}, MACD {} (+{momentum_score} pts)",
            if histogram > 0.0 { "positive" } else { "negative" }
        ),
        format!("Volume: {} (+{} pts)", volume.description, volume.score),
        format!(
            "Structure: {} pattern confirmed (+{} pts)",
            swings.trend, swings.score
        ),
    ];

    let trade = match (price, ctx.atr()) {
        (Some(p), Some(atr)) => generate_trade_setup(p, atr, stack.map(|s| s.ema21)),
        _ => None,
    };

    debug!(
        symbol,
        trend = trend_score,
        momentum = momentum_score,
        volume = volume.score,
        structure = swings.score,
        score,
        direction = %dir,
        "Institutional signal scored"
    );

    InstitutionalSignal {
        symbol: symbol.to_string(),
        price,
        change,
        change_percent,
        signal: SignalDetail {
            score,
            grade,
            direction: dir,
            confidence,
            strength,
            time_horizon: TIME_HORIZON.to_string(),
            metrics: financial_metrics(&closes, market),
            summary,
            reasoning,
        },
        trade,
        layers,
        catalysts: news.to_vec(),
        sufficient: true,
    }
}
