// =============================================================================
// Analysis Context — indicator series computed once per bar set
// =============================================================================
//
// Several layers read the same moving averages, RSI and ATR.  The context
// computes them once for a bar slice so a full analysis pass does not repeat
// the work.  Everything here is aligned with `bars`.

use crate::indicators::macd::{calculate_macd, MacdSeries};
use crate::indicators::{atr, ema, last, rsi, sma, Series};
use crate::market_data::Bar;

pub struct AnalysisContext<'a> {
    pub bars: &'a [Bar],
    pub closes: Vec<f64>,
    pub volumes: Vec<f64>,
    pub ema8: Series,
    pub ema21: Series,
    pub ema55: Series,
    pub sma50: Series,
    pub sma200: Series,
    pub rsi14: Series,
    pub macd: MacdSeries,
    pub atr14: Series,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(bars: &'a [Bar]) -> Self {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

        Self {
            ema8: ema::calculate_ema(&closes, 8),
            ema21: ema::calculate_ema(&closes, 21),
            ema55: ema::calculate_ema(&closes, 55),
            sma50: sma::calculate_sma(&closes, 50),
            sma200: sma::calculate_sma(&closes, 200),
            rsi14: rsi::calculate_rsi(&closes, rsi::DEFAULT_PERIOD),
            macd: calculate_macd(&closes),
            atr14: atr::calculate_atr_series(bars, atr::DEFAULT_PERIOD),
            bars,
            closes,
            volumes,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Last close.
    pub fn price(&self) -> Option<f64> {
        self.closes.last().copied()
    }

    /// Close `back` bars before the last one.
    pub fn close_back(&self, back: usize) -> Option<f64> {
        let idx = self.closes.len().checked_sub(back + 1)?;
        Some(self.closes[idx])
    }

    /// Latest EMA 8 / 21 / 55.
    pub fn ribbon(&self) -> Option<(f64, f64, f64)> {
        Some((last(&self.ema8)?, last(&self.ema21)?, last(&self.ema55)?))
    }

    pub fn rsi(&self) -> Option<f64> {
        last(&self.rsi14)
    }

    pub fn atr(&self) -> Option<f64> {
        last(&self.atr14)
    }

    /// Trailing `n` bars (fewer when the slice is shorter).
    pub fn tail(&self, n: usize) -> &'a [Bar] {
        &self.bars[self.bars.len().saturating_sub(n)..]
    }
}
