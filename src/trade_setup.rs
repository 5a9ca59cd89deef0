// =============================================================================
// Trade Setup — entries, stop, targets and sizing from price and ATR
// =============================================================================
//
//   stop      price - 2.0 ATR
//   targets   price + 1.5 / 3.0 / 4.5 ATR
//   R:R       (target 2 - price) / stop distance
//   sizing    risk 2% of a $10,000 reference account per trade
//
// All multipliers are fixed product parameters.  Prices are not rounded here;
// presentation layers format them.

use serde::{Deserialize, Serialize};

pub const STOP_ATR_MULTIPLIER: f64 = 2.0;
pub const TARGET_ATR_MULTIPLIERS: [f64; 3] = [1.5, 3.0, 4.5];
pub const TARGET_PROBABILITIES: [u8; 3] = [78, 61, 42];
const TARGET_NOTES: [&str; 3] = [
    "First resistance, take 30%",
    "Major resistance, take 50%",
    "Extended target, let 20% run",
];
pub const ACCOUNT_SIZE: f64 = 10_000.0;
pub const RISK_PER_TRADE: f64 = 0.02;
const AGGRESSIVE_PREMIUM: f64 = 1.002;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryZone {
    pub optimal: f64,
    pub aggressive: f64,
    pub conservative: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopLoss {
    pub price: f64,
    /// Negative: distance below entry in percent.
    pub percent: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub price: f64,
    pub percent: f64,
    pub probability: u8,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSetup {
    pub entry: EntryZone,
    pub stop_loss: StopLoss,
    pub targets: Vec<Target>,
    pub risk_reward: f64,
    /// Notional as a percentage of the reference account.
    pub position_size_percent: f64,
    pub position_size: String,
    pub max_loss: String,
}

/// Build a long setup.  `ema21` is the conservative pullback entry; the
/// current price is used when it is unavailable.  `None` when price or ATR is
/// not positive and finite.
pub fn generate_trade_setup(price: f64, atr: f64, ema21: Option<f64>) -> Option<TradeSetup> {
    if !(price.is_finite() && price > 0.0 && atr.is_finite() && atr > 0.0) {
        return None;
    }

    let stop_distance = atr * STOP_ATR_MULTIPLIER;

    let targets: Vec<Target> = TARGET_ATR_MULTIPLIERS
        .iter()
        .zip(TARGET_PROBABILITIES)
        .zip(TARGET_NOTES)
        .map(|((multiplier, probability), note)| {
            let target = price + atr * multiplier;
            Target {
                price: target,
                percent: (target - price) / price * 100.0,
                probability,
                reasoning: note.to_string(),
            }
        })
        .collect();

    let risk_reward = (targets[1].price - price) / stop_distance;

    let max_loss = ACCOUNT_SIZE * RISK_PER_TRADE;
    let notional = max_loss / stop_distance * price;
    let position_size_percent = notional / ACCOUNT_SIZE * 100.0;

    Some(TradeSetup {
        entry: EntryZone {
            optimal: price,
            aggressive: price * AGGRESSIVE_PREMIUM,
            conservative: ema21.filter(|e| e.is_finite() && *e > 0.0).unwrap_or(price),
            reasoning: "Optimal entry at current levels. Conservative waits for EMA21 pullback."
                .to_string(),
        },
        stop_loss: StopLoss {
            price: price - stop_distance,
            percent: -stop_distance / price * 100.0,
            reasoning: "2x ATR below entry - invalidates bullish structure".to_string(),
        },
        targets,
        risk_reward,
        position_size_percent,
        position_size: format!("{position_size_percent:.1}% of portfolio"),
        max_loss: format!("${max_loss:.0} per $10k account"),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_100_atr_2() {
        let setup = generate_trade_setup(100.0, 2.0, None).unwrap();
        assert_eq!(setup.stop_loss.price, 96.0);
        assert_eq!(setup.targets[0].price, 103.0);
        assert_eq!(setup.targets[1].price, 106.0);
        assert_eq!(setup.targets[2].price, 109.0);
        assert!((setup.stop_loss.percent + 4.0).abs() < 1e-10);
        assert!((setup.risk_reward - 1.5).abs() < 1e-10);
        assert_eq!(setup.entry.conservative, 100.0);
        assert!((setup.entry.aggressive - 100.2).abs() < 1e-10);
    }

    #[test]
    fn two_percent_risk_sizing() {
        // $200 risk over a $4 stop = 50 shares = $5,000 notional.
        let setup = generate_trade_setup(100.0, 2.0, Some(98.0)).unwrap();
        assert!((setup.position_size_percent - 50.0).abs() < 1e-10);
        assert_eq!(setup.position_size, "50.0% of portfolio");
        assert_eq!(setup.max_loss, "$200 per $10k account");
        assert_eq!(setup.entry.conservative, 98.0);
    }

    #[test]
    fn targets_carry_probabilities_and_notes() {
        let setup = generate_trade_setup(50.0, 1.0, None).unwrap();
        let probs: Vec<u8> = setup.targets.iter().map(|t| t.probability).collect();
        assert_eq!(probs, vec![78, 61, 42]);
        assert_eq!(setup.targets[2].reasoning, "Extended target, let 20% run");
        assert!((setup.targets[0].percent - 3.0).abs() < 1e-10);
    }

    #[test]
    fn degenerate_inputs_yield_none() {
        assert!(generate_trade_setup(100.0, 0.0, None).is_none());
        assert!(generate_trade_setup(100.0, -1.0, None).is_none());
        assert!(generate_trade_setup(100.0, f64::NAN, None).is_none());
        assert!(generate_trade_setup(0.0, 1.0, None).is_none());
    }
}
