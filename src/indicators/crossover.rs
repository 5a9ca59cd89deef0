// =============================================================================
// Moving-Average Crossover Signals
// =============================================================================
//
// BUY  when the fast series crosses from below to above the slow series.
// SELL when it crosses from above to below.
// Both bars of the transition must have computable values on both series.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CrossoverKind {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CrossoverSignal {
    pub index: usize,
    pub kind: CrossoverKind,
}

pub fn ma_crossover_signals(fast: &[Option<f64>], slow: &[Option<f64>]) -> Vec<CrossoverSignal> {
    let n = fast.len().min(slow.len());
    let mut signals = Vec::new();

    for i in 1..n {
        let (Some(f0), Some(s0), Some(f1), Some(s1)) = (fast[i - 1], slow[i - 1], fast[i], slow[i])
        else {
            continue;
        };
        if f0 < s0 && f1 > s1 {
            signals.push(CrossoverSignal {
                index: i,
                kind: CrossoverKind::Buy,
            });
        } else if f0 > s0 && f1 < s1 {
            signals.push(CrossoverSignal {
                index: i,
                kind: CrossoverKind::Sell,
            });
        }
    }
    signals
}
