// =============================================================================
// Seasonality Patterns
// =============================================================================
//
// Mean return by weekday over the last 120 bars, the mean of the last 21
// returns ("monthly trend") and the calendar quarter with the best mean
// return over the last 252 returns.  A return is dated by the bar it ends on.

use chrono::{Datelike, Weekday};
use serde::Serialize;

use crate::indicators::stats::mean;
use crate::market_data::Bar;

const WEEKDAY_WINDOW: usize = 120;
const MONTH_RETURNS: usize = 21;
const YEAR_RETURNS: usize = 252;

/// Mean return (%) per weekday; `None` when no bar fell on that day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DayOfWeekReturns {
    pub monday: Option<f64>,
    pub tuesday: Option<f64>,
    pub wednesday: Option<f64>,
    pub thursday: Option<f64>,
    pub friday: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalityAnalysis {
    pub day_of_week: DayOfWeekReturns,
    pub monthly_trend: f64,
    pub best_quarter: u32,
    pub quarterly_pattern: String,
    pub description: String,
}

/// (date of the later bar, return) for each consecutive pair.
fn dated_returns(bars: &[Bar]) -> Vec<(chrono::NaiveDate, f64)> {
    bars.windows(2)
        .map(|w| (w[1].date, (w[1].close - w[0].close) / w[0].close))
        .collect()
}

pub fn day_of_week_returns(bars: &[Bar]) -> DayOfWeekReturns {
    let window = &bars[bars.len().saturating_sub(WEEKDAY_WINDOW)..];
    let mut buckets: [Vec<f64>; 5] = Default::default();
    for (date, ret) in dated_returns(window) {
        let slot = match date.weekday() {
            Weekday::Mon => 0,
            Weekday::Tue => 1,
            Weekday::Wed => 2,
            Weekday::Thu => 3,
            Weekday::Fri => 4,
            _ => continue,
        };
        buckets[slot].push(ret);
    }
    let avg = |i: usize| mean(&buckets[i]).map(|m| m * 100.0);
    DayOfWeekReturns {
        monday: avg(0),
        tuesday: avg(1),
        wednesday: avg(2),
        thursday: avg(3),
        friday: avg(4),
    }
}

/// Calendar quarter (1-4) with the highest mean return; earlier quarter on
/// ties.  Quarters without returns are skipped.
pub fn best_quarter(rets: &[(chrono::NaiveDate, f64)]) -> Option<u32> {
    let mut buckets: [Vec<f64>; 4] = Default::default();
    for (date, ret) in rets {
        buckets[(date.month0() / 3) as usize].push(*ret);
    }
    let mut best: Option<(u32, f64)> = None;
    for (i, bucket) in buckets.iter().enumerate() {
        let Some(m) = mean(bucket) else { continue };
        if best.map_or(true, |(_, b)| m > b) {
            best = Some((i as u32 + 1, m));
        }
    }
    best.map(|(q, _)| q)
}

pub fn analyze_seasonality(bars: &[Bar]) -> Option<SeasonalityAnalysis> {
    if bars.len() < MONTH_RETURNS + 1 {
        return None;
    }
    let rets = dated_returns(bars);
    let last_month: Vec<f64> = rets[rets.len() - MONTH_RETURNS..].iter().map(|(_, r)| *r).collect();
    let monthly_trend = mean(&last_month)? * 100.0;
    let quarter = best_quarter(&rets[rets.len().saturating_sub(YEAR_RETURNS)..])?;

    Some(SeasonalityAnalysis {
        day_of_week: day_of_week_returns(bars),
        monthly_trend,
        best_quarter: quarter,
        quarterly_pattern: format!("Q{quarter} historically strongest"),
        description: format!(
            "Monthly trend: {} {:.2}%",
            if monthly_trend > 0.0 { "positive" } else { "negative" },
            monthly_trend.abs()
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::fixtures;

    #[test]
    fn monthly_trend_sign() {
        let up = analyze_seasonality(&fixtures::rising(60, 100.0, 1.0)).unwrap();
        assert!(up.monthly_trend > 0.0);
        assert!(up.description.starts_with("Monthly trend: positive"));

        let down = analyze_seasonality(&fixtures::falling(60, 100.0, 1.0)).unwrap();
        assert!(down.description.starts_with("Monthly trend: negative"));
    }

    #[test]
    fn flat_weekdays_are_zero() {
        let s = analyze_seasonality(&fixtures::flat(130, 20.0)).unwrap();
        assert_eq!(s.day_of_week.monday, Some(0.0));
        assert_eq!(s.day_of_week.friday, Some(0.0));
        assert_eq!(s.monthly_trend, 0.0);
        // All quarters tie at zero: the earliest present wins.
        assert_eq!(s.best_quarter, 1);
    }

    #[test]
    fn second_quarter_rally_is_detected() {
        let dates = fixtures::business_days(260);
        let mut closes = vec![100.0];
        for d in &dates[1..] {
            let prev = closes[closes.len() - 1];
            let growth = if (4..=6).contains(&d.month()) { 1.01 } else { 1.0 };
            closes.push(prev * growth);
        }
        let s = analyze_seasonality(&fixtures::from_closes(&closes, 1e6)).unwrap();
        assert_eq!(s.best_quarter, 2);
        assert_eq!(s.quarterly_pattern, "Q2 historically strongest");
    }

    #[test]
    fn weekday_keys_serialise_capitalised() {
        let s = analyze_seasonality(&fixtures::flat(30, 20.0)).unwrap();
        let json = serde_json::to_value(&s.day_of_week).unwrap();
        assert!(json.get("Monday").is_some());
    }
}
