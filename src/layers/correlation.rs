// =============================================================================
// Correlation Analysis
// =============================================================================
//
// Return correlation against the benchmark over 60 and 120 returns, and the
// stability of a rolling 20-return beta.  Stock and benchmark returns are
// aligned on their most recent observations.

use serde::Serialize;

use crate::indicators::stats::{correlation, covariance, mean, returns, std_dev};
use crate::market_data::Bar;

const MARKET_WINDOW: usize = 60;
const SECTOR_WINDOW: usize = 120;
const BETA_WINDOW: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationAnalysis {
    pub market_correlation: f64,
    pub sector_correlation: Option<f64>,
    pub beta_stability: Option<f64>,
    pub description: String,
}

fn tail(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

/// Betas of consecutive `window`-return slices, oldest first.
pub fn rolling_betas(stock: &[f64], market: &[f64], window: usize) -> Vec<f64> {
    let n = stock.len().min(market.len());
    let (stock, market) = (tail(stock, n), tail(market, n));
    (window..n)
        .filter_map(|end| {
            let s = &stock[end - window..end];
            let m = &market[end - window..end];
            let var = std_dev(m)?.powi(2);
            if var == 0.0 {
                return None;
            }
            Some(covariance(s, m)? / var)
        })
        .collect()
}

/// `1 - std(betas) / mean(|betas|)`; 1.0 is a perfectly stable beta.
pub fn beta_stability(betas: &[f64]) -> Option<f64> {
    let abs: Vec<f64> = betas.iter().map(|b| b.abs()).collect();
    let scale = mean(&abs)?;
    if scale == 0.0 {
        return None;
    }
    Some(1.0 - std_dev(betas)? / scale)
}

pub fn analyze_correlations(bars: &[Bar], market: &[Bar]) -> Option<CorrelationAnalysis> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let market_closes: Vec<f64> = market.iter().map(|b| b.close).collect();
    let rets = returns(&closes);
    let market_rets = returns(&market_closes);
    if rets.len().min(market_rets.len()) < BETA_WINDOW {
        return None;
    }

    let market_corr = correlation(tail(&rets, MARKET_WINDOW), tail(&market_rets, MARKET_WINDOW))?;
    let sector_corr = correlation(tail(&rets, SECTOR_WINDOW), tail(&market_rets, SECTOR_WINDOW));
    let stability = beta_stability(&rolling_betas(&rets, &market_rets, BETA_WINDOW));

    let description = if market_corr.abs() > 0.7 {
        "Strong market correlation - moves with overall market"
    } else if market_corr.abs() < 0.3 {
        "Low market correlation - independent behavior"
    } else {
        "Moderate market correlation"
    };

    Some(CorrelationAnalysis {
        market_correlation: market_corr,
        sector_correlation: sector_corr,
        beta_stability: stability,
        description: description.to_string(),
    })
}
