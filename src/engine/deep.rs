// =============================================================================
// Deep Analysis
// =============================================================================
//
// Runs every institutional-grade analyzer over the daily history.  Each slot
// is independent and stays `None` when its analyzer has too little data; the
// correlation slot also needs a benchmark series.

use serde::Serialize;
use tracing::debug;

use crate::layers::correlation::{analyze_correlations, CorrelationAnalysis};
use crate::layers::liquidity::{analyze_liquidity, LiquidityAnalysis};
use crate::layers::microstructure::{analyze_microstructure, Microstructure};
use crate::layers::order_flow::{analyze_order_flow, OrderFlowAnalysis};
use crate::layers::regime::{detect_regime, RegimeDetection};
use crate::layers::seasonality::{analyze_seasonality, SeasonalityAnalysis};
use crate::layers::smart_money::{analyze_smart_money, SmartMoneyAnalysis};
use crate::layers::volatility::{volatility_surface, VolatilitySurface};
use crate::market_data::Bar;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeepAnalysis {
    pub order_flow: Option<OrderFlowAnalysis>,
    pub microstructure: Option<Microstructure>,
    pub regime: Option<RegimeDetection>,
    pub volatility_surface: Option<VolatilitySurface>,
    pub liquidity: Option<LiquidityAnalysis>,
    pub smart_money: Option<SmartMoneyAnalysis>,
    pub correlation: Option<CorrelationAnalysis>,
    pub seasonality: Option<SeasonalityAnalysis>,
}

impl DeepAnalysis {
    /// Number of analyzers that produced a result.
    pub fn available(&self) -> usize {
        [
            self.order_flow.is_some(),
            self.microstructure.is_some(),
            self.regime.is_some(),
            self.volatility_surface.is_some(),
            self.liquidity.is_some(),
            self.smart_money.is_some(),
            self.correlation.is_some(),
            self.seasonality.is_some(),
        ]
        .iter()
        .filter(|&&x| x)
        .count()
    }
}

pub fn compute_deep(bars: &[Bar], market: &[Bar]) -> DeepAnalysis {
    let deep = DeepAnalysis {
        order_flow: analyze_order_flow(bars),
        microstructure: analyze_microstructure(bars),
        regime: detect_regime(bars),
        volatility_surface: volatility_surface(bars),
        liquidity: analyze_liquidity(bars),
        smart_money: analyze_smart_money(bars),
        correlation: analyze_correlations(bars, market),
        seasonality: analyze_seasonality(bars),
    };

    debug!(
        bars = bars.len(),
        benchmark_bars = market.len(),
        available = deep.available(),
        order_flow = ?deep.order_flow.as_ref().map(|o| o.score),
        smart_money = ?deep.smart_money.as_ref().map(|s| s.score),
        liquidity = ?deep.liquidity.as_ref().map(|l| l.score),
        "Deep analysis complete"
    );

    deep
}
