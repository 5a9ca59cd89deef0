pub mod bars;
pub mod news;

// Re-export the bar types for convenient access (e.g. `use crate::market_data::Bar`).
pub use bars::{closes, sanitize_bars, volumes, Bar, BarError, RawBar};
pub use news::{sanitize_news, NewsItem, RawNewsItem};

/// Synthetic bar series shared by the unit tests of every module.
#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Datelike, Duration, NaiveDate, Weekday};

    use super::Bar;

    /// Weekday dates starting Monday 2024-01-01.
    pub fn business_days(n: usize) -> Vec<NaiveDate> {
        let mut out = Vec::with_capacity(n);
        let mut d = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
        while out.len() < n {
            if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
                out.push(d);
            }
            d += Duration::days(1);
        }
        out
    }

    /// Bars built from closes: open = previous close, high/low 0.5% outside
    /// the body, constant volume.
    pub fn from_closes(closes: &[f64], volume: f64) -> Vec<Bar> {
        let dates = business_days(closes.len());
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                Bar {
                    date: dates[i],
                    open,
                    high: open.max(close) * 1.005,
                    low: open.min(close) * 0.995,
                    close,
                    volume,
                }
            })
            .collect()
    }

    /// Strictly rising closes: start, start + step, ...
    pub fn rising(n: usize, start: f64, step: f64) -> Vec<Bar> {
        let closes: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
        from_closes(&closes, 1_000_000.0)
    }

    /// Strictly falling closes.
    pub fn falling(n: usize, start: f64, step: f64) -> Vec<Bar> {
        let closes: Vec<f64> = (0..n).map(|i| start - step * i as f64).collect();
        from_closes(&closes, 1_000_000.0)
    }

    /// Every OHLC value identical, constant volume.
    pub fn flat(n: usize, price: f64) -> Vec<Bar> {
        business_days(n)
            .into_iter()
            .map(|date| Bar {
                date,
                open: price,
                high: price,
                low: price,
                close: price,
                volume: 1_000_000.0,
            })
            .collect()
    }

    /// Deterministic oscillating series around `base` with a slow drift.
    pub fn wave(n: usize, base: f64, drift: f64) -> Vec<Bar> {
        let closes: Vec<f64> = (0..n)
            .map(|i| {
                let t = i as f64;
                base + drift * t + (t / 3.0).sin() * base * 0.03 + (t / 11.0).cos() * base * 0.02
            })
            .collect();
        let dates = business_days(n);
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                Bar {
                    date: dates[i],
                    open,
                    high: open.max(close) * 1.01,
                    low: open.min(close) * 0.99,
                    close,
                    volume: 1_000_000.0 + ((i * 7919) % 500_000) as f64,
                }
            })
            .collect()
    }
}
