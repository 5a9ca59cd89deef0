// =============================================================================
// Statistical Primitives
// =============================================================================
//
// Whole-array statistics over in-memory slices.  Every function returns
// `None` where the statistic is undefined (empty input, zero variance, too
// few observations) instead of producing NaN.
//
// Paired statistics (covariance, correlation, beta) align the two inputs on
// their most recent observations: the longer slice is trimmed from the front.
// =============================================================================

/// Trading days per year used for annualisation.
pub const TRADING_DAYS: f64 = 252.0;
/// Annual risk-free rate used by Sharpe and alpha.
pub const RISK_FREE_RATE: f64 = 0.045;

/// Simple period-over-period returns: `(p[i] - p[i-1]) / p[i-1]`.
pub fn returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let m = values.iter().sum::<f64>() / values.len() as f64;
    m.is_finite().then_some(m)
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    let sd = var.sqrt();
    sd.is_finite().then_some(sd)
}

fn tail_aligned<'a>(x: &'a [f64], y: &'a [f64]) -> (&'a [f64], &'a [f64]) {
    let n = x.len().min(y.len());
    (&x[x.len() - n..], &y[y.len() - n..])
}

/// Population covariance of the tail-aligned inputs.
pub fn covariance(x: &[f64], y: &[f64]) -> Option<f64> {
    let (x, y) = tail_aligned(x, y);
    let (mx, my) = (mean(x)?, mean(y)?);
    let cov = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum::<f64>() / x.len() as f64;
    cov.is_finite().then_some(cov)
}

/// Pearson correlation of the tail-aligned inputs.
pub fn correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let (x, y) = tail_aligned(x, y);
    let denom = std_dev(x)? * std_dev(y)?;
    if denom == 0.0 {
        return None;
    }
    let r = covariance(x, y)? / denom;
    r.is_finite().then_some(r)
}

/// Correlation of the series with itself shifted by `lag`.
pub fn autocorrelation(values: &[f64], lag: usize) -> Option<f64> {
    if lag == 0 || lag >= values.len() {
        return None;
    }
    correlation(&values[..values.len() - lag], &values[lag..])
}

/// Sample skewness: n / ((n-1)(n-2)) * Σ z³.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let (m, sd) = (mean(values)?, std_dev(values)?);
    if sd == 0.0 {
        return None;
    }
    let nf = n as f64;
    let sum: f64 = values.iter().map(|v| ((v - m) / sd).powi(3)).sum();
    let skew = nf / ((nf - 1.0) * (nf - 2.0)) * sum;
    skew.is_finite().then_some(skew)
}

/// Sample excess kurtosis:
/// n(n+1)/((n-1)(n-2)(n-3)) Σ z⁴ − 3(n-1)²/((n-2)(n-3)).
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let (m, sd) = (mean(values)?, std_dev(values)?);
    if sd == 0.0 {
        return None;
    }
    let nf = n as f64;
    let sum: f64 = values.iter().map(|v| ((v - m) / sd).powi(4)).sum();
    let kurt = nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0)) * sum
        - 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0));
    kurt.is_finite().then_some(kurt)
}

/// Annualised volatility of `prices` in percent.
pub fn annualized_volatility(prices: &[f64]) -> Option<f64> {
    Some(std_dev(&returns(prices))? * TRADING_DAYS.sqrt() * 100.0)
}

/// Annualised Sharpe ratio of `prices` against `risk_free`.
pub fn sharpe_ratio(prices: &[f64], risk_free: f64) -> Option<f64> {
    let rets = returns(prices);
    let sd = std_dev(&rets)?;
    if sd == 0.0 {
        return None;
    }
    let annual_return = mean(&rets)? * TRADING_DAYS;
    let sharpe = (annual_return - risk_free) / (sd * TRADING_DAYS.sqrt());
    sharpe.is_finite().then_some(sharpe)
}

/// Beta of the stock's returns against the market's (tail-aligned).
pub fn beta(stock_prices: &[f64], market_prices: &[f64]) -> Option<f64> {
    let stock = returns(stock_prices);
    let market = returns(market_prices);
    let (stock, market) = tail_aligned(&stock, &market);
    let var = std_dev(market)?.powi(2);
    if var == 0.0 {
        return None;
    }
    let b = covariance(stock, market)? / var;
    b.is_finite().then_some(b)
}

/// Jensen's alpha in percent, from annualised mean returns.
pub fn alpha(stock_prices: &[f64], market_prices: &[f64], beta: f64, risk_free: f64) -> Option<f64> {
    let stock_return = mean(&returns(stock_prices))? * TRADING_DAYS;
    let market_return = mean(&returns(market_prices))? * TRADING_DAYS;
    let a = (stock_return - (risk_free + beta * (market_return - risk_free))) * 100.0;
    a.is_finite().then_some(a)
}
