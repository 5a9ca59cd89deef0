// =============================================================================
// Price Bars — the price-feed contract
// =============================================================================
//
// A price feed hands us loosely-typed rows (`RawBar`): any field may be
// missing, prices may be NaN, dates arrive either as `YYYY-MM-DD` or as an
// RFC 3339 timestamp.  `sanitize_bars` turns those rows into a clean,
// ascending-date `Vec<Bar>` that every indicator can trust:
//
//   - rows with missing / non-finite / non-positive OHLC are dropped
//   - rows where low/high do not bracket open and close are dropped
//   - a missing volume becomes 0, a negative one is rejected
//   - duplicate dates keep the last occurrence
//
// Rejections are never fatal: a feed that returns nothing usable simply
// produces an empty vector, which the engines answer with their neutral
// fallback.
// =============================================================================

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// One validated trading-period observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Close strictly above open.
    pub fn is_up(&self) -> bool {
        self.close > self.open
    }
}

/// A bar exactly as the feed delivered it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl From<&Bar> for RawBar {
    fn from(bar: &Bar) -> Self {
        Self {
            date: Some(bar.date.format("%Y-%m-%d").to_string()),
            open: Some(bar.open),
            high: Some(bar.high),
            low: Some(bar.low),
            close: Some(bar.close),
            volume: Some(bar.volume),
        }
    }
}

/// Why a raw bar was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("non-finite value in `{0}`")]
    NonFinite(&'static str),

    #[error("non-positive price in `{field}`: {value}")]
    NonPositivePrice { field: &'static str, value: f64 },

    #[error("negative volume: {0}")]
    NegativeVolume(f64),

    #[error("inconsistent OHLC: low {low} / high {high} do not bracket open {open} and close {close}")]
    InconsistentOhlc {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },

    #[error("unparsable date `{0}`")]
    InvalidDate(String),
}

impl TryFrom<&RawBar> for Bar {
    type Error = BarError;

    fn try_from(raw: &RawBar) -> Result<Self, Self::Error> {
        let date = match raw.date.as_deref() {
            Some(text) => parse_date(text)?,
            None => return Err(BarError::MissingField("date")),
        };

        let open = price(raw.open, "open")?;
        let high = price(raw.high, "high")?;
        let low = price(raw.low, "low")?;
        let close = price(raw.close, "close")?;

        let volume = match raw.volume {
            None => 0.0,
            Some(v) if !v.is_finite() => return Err(BarError::NonFinite("volume")),
            Some(v) if v < 0.0 => return Err(BarError::NegativeVolume(v)),
            Some(v) => v,
        };

        if low > high || open < low || open > high || close < low || close > high {
            return Err(BarError::InconsistentOhlc {
                open,
                high,
                low,
                close,
            });
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

fn price(value: Option<f64>, field: &'static str) -> Result<f64, BarError> {
    let v = value.ok_or(BarError::MissingField(field))?;
    if !v.is_finite() {
        return Err(BarError::NonFinite(field));
    }
    if v <= 0.0 {
        return Err(BarError::NonPositivePrice { field, value: v });
    }
    Ok(v)
}

/// Accept `YYYY-MM-DD` or a full RFC 3339 timestamp (the date part is kept).
pub fn parse_date(text: &str) -> Result<NaiveDate, BarError> {
    let trimmed = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.date_naive());
    }
    Err(BarError::InvalidDate(trimmed.to_string()))
}

/// Validate, order and de-duplicate a raw feed response.
pub fn sanitize_bars(raw: &[RawBar]) -> Vec<Bar> {
    let mut by_date: BTreeMap<NaiveDate, Bar> = BTreeMap::new();
    let mut rejected = 0usize;

    for (idx, row) in raw.iter().enumerate() {
        match Bar::try_from(row) {
            Ok(bar) => {
                by_date.insert(bar.date, bar);
            }
            Err(e) => {
                rejected += 1;
                debug!(index = idx, error = %e, "dropping malformed bar");
            }
        }
    }

    if rejected > 0 {
        warn!(
            rejected,
            kept = by_date.len(),
            "price feed contained malformed bars"
        );
    }

    by_date.into_values().collect()
}

/// Close prices in bar order.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Volumes in bar order.
pub fn volumes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.volume).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, o: f64, h: f64, l: f64, c: f64, v: f64) -> RawBar {
        RawBar {
            date: Some(date.to_string()),
            open: Some(o),
            high: Some(h),
            low: Some(l),
            close: Some(c),
            volume: Some(v),
        }
    }

    #[test]
    fn valid_bar_converts() {
        let bar = Bar::try_from(&raw("2024-03-01", 10.0, 11.0, 9.5, 10.5, 1000.0)).unwrap();
        assert_eq!(bar.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!((bar.typical_price() - 31.0 / 3.0).abs() < 1e-10);
        assert!(bar.is_up());
    }

    #[test]
    fn rfc3339_dates_are_accepted() {
        let d = parse_date("2024-03-01T14:30:00Z").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(matches!(parse_date("03/01/2024"), Err(BarError::InvalidDate(_))));
    }

    #[test]
    fn rejects_each_malformed_kind() {
        let mut missing = raw("2024-03-01", 10.0, 11.0, 9.0, 10.0, 1.0);
        missing.close = None;
        assert_eq!(Bar::try_from(&missing), Err(BarError::MissingField("close")));

        let nan = raw("2024-03-01", 10.0, f64::NAN, 9.0, 10.0, 1.0);
        assert_eq!(Bar::try_from(&nan), Err(BarError::NonFinite("high")));

        let zero = raw("2024-03-01", 0.0, 11.0, 9.0, 10.0, 1.0);
        assert!(matches!(
            Bar::try_from(&zero),
            Err(BarError::NonPositivePrice { field: "open", .. })
        ));

        let inverted = raw("2024-03-01", 10.0, 9.0, 11.0, 10.0, 1.0);
        assert!(matches!(
            Bar::try_from(&inverted),
            Err(BarError::InconsistentOhlc { .. })
        ));

        let neg_vol = raw("2024-03-01", 10.0, 11.0, 9.0, 10.0, -5.0);
        assert_eq!(Bar::try_from(&neg_vol), Err(BarError::NegativeVolume(-5.0)));
    }

    #[test]
    fn missing_volume_becomes_zero() {
        let mut row = raw("2024-03-01", 10.0, 11.0, 9.0, 10.0, 0.0);
        row.volume = None;
        assert_eq!(Bar::try_from(&row).unwrap().volume, 0.0);
    }

    #[test]
    fn sanitize_sorts_dedupes_and_drops() {
        let rows = vec![
            raw("2024-03-04", 12.0, 13.0, 11.0, 12.5, 10.0),
            raw("2024-03-01", 10.0, 11.0, 9.0, 10.5, 10.0),
            raw("2024-03-01", 10.0, 11.0, 9.0, 10.8, 20.0),
            raw("2024-03-02", 10.0, 9.0, 11.0, 10.0, 10.0),
            RawBar::default(),
        ];
        let bars = sanitize_bars(&rows);
        assert_eq!(bars.len(), 2);
        assert!(bars[0].date < bars[1].date);
        // Last duplicate wins.
        assert!((bars[0].close - 10.8).abs() < 1e-10);
    }

    #[test]
    fn sanitize_empty_feed() {
        assert!(sanitize_bars(&[]).is_empty());
    }

    #[test]
    fn bar_error_messages() {
        assert_eq!(BarError::MissingField("open").to_string(), "missing field `open`");
        assert_eq!(
            BarError::InvalidDate("x".into()).to_string(),
            "unparsable date `x`"
        );
    }
}
