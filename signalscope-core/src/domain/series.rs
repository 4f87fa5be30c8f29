//! PriceSeries — canonical closing-price history for one ticker.
//!
//! Construction canonicalizes provider output: void closes are dropped, bars
//! are sorted by date, and duplicate dates collapse to the last occurrence.
//! After construction dates are strictly ascending and every close is finite
//! and positive, so return calculations never divide by zero.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::bar::PriceBar;
use crate::stats::round_to;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    dates: Vec<NaiveDate>,
    closes: Vec<f64>,
    volumes: Vec<u64>,
}

impl PriceSeries {
    /// Build a canonical series from raw provider bars.
    pub fn from_bars(ticker: impl Into<String>, bars: &[PriceBar]) -> Self {
        let mut usable: Vec<&PriceBar> = bars.iter().filter(|b| !b.is_void()).collect();
        // Stable sort keeps provider order within a date, so the last
        // duplicate wins below.
        usable.sort_by_key(|b| b.date);

        let mut dates: Vec<NaiveDate> = Vec::with_capacity(usable.len());
        let mut closes: Vec<f64> = Vec::with_capacity(usable.len());
        let mut volumes: Vec<u64> = Vec::with_capacity(usable.len());

        for bar in usable {
            if dates.last() == Some(&bar.date) {
                let i = closes.len() - 1;
                closes[i] = bar.close;
                volumes[i] = bar.volume;
            } else {
                dates.push(bar.date);
                closes.push(bar.close);
                volumes.push(bar.volume);
            }
        }

        Self {
            ticker: ticker.into(),
            dates,
            closes,
            volumes,
        }
    }

    /// Build a series from bare closes, assigning consecutive calendar dates
    /// from the Unix epoch. Void closes are dropped.
    pub fn from_closes(ticker: impl Into<String>, closes: &[f64]) -> Self {
        let epoch = NaiveDate::default();
        let bars: Vec<PriceBar> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: epoch + Days::new(i as u64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 0,
            })
            .collect();
        Self::from_bars(ticker, &bars)
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.closes.last().copied()
    }

    pub fn last_volume(&self) -> Option<u64> {
        self.volumes.last().copied()
    }

    /// Simple daily returns `p[t]/p[t-1] - 1`. Empty below two points.
    pub fn daily_returns(&self) -> Vec<f64> {
        self.closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
    }
}

/// Latest price and day-over-day change for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub ticker: String,
    pub name: String,
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub volume: Option<u64>,
}

impl Quote {
    /// A quote with every field empty, used for tickers that failed to fetch.
    pub fn unavailable(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: String::new(),
            price: None,
            change: None,
            change_percent: None,
            volume: None,
        }
    }

    /// Derive a quote from the last two closes of a series.
    ///
    /// Price and change are rounded to cents; the change is taken against
    /// the rounded price.
    pub fn from_series(series: &PriceSeries, name: impl Into<String>) -> Self {
        let mut quote = Self::unavailable(series.ticker());
        quote.name = name.into();

        let closes = series.closes();
        let Some(&last) = closes.last() else {
            return quote;
        };
        let price = round_to(last, 2);
        quote.price = Some(price);
        quote.volume = series.last_volume();

        if closes.len() >= 2 {
            let prev = closes[closes.len() - 2];
            let change = round_to(price - prev, 2);
            quote.change = Some(change);
            quote.change_percent = Some(round_to(change / prev * 100.0, 2));
        }
        quote
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(y: i32, m: u32, d: u32, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100,
        }
    }

    #[test]
    fn canonicalizes_order_duplicates_and_voids() {
        let bars = vec![
            bar(2024, 1, 4, 103.0),
            bar(2024, 1, 2, 101.0),
            bar(2024, 1, 3, f64::NAN),
            bar(2024, 1, 2, 102.0),
            bar(2024, 1, 5, 0.0),
        ];
        let s = PriceSeries::from_bars("X", &bars);
        assert_eq!(s.closes(), &[102.0, 103.0]);
        assert!(s.dates().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn daily_returns_need_two_points() {
        assert!(PriceSeries::from_closes("X", &[100.0]).daily_returns().is_empty());
        let r = PriceSeries::from_closes("X", &[100.0, 110.0, 99.0]).daily_returns();
        assert_eq!(r.len(), 2);
        assert!((r[0] - 0.1).abs() < 1e-12);
        assert!((r[1] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn quote_from_last_two_closes() {
        let s = PriceSeries::from_closes("AAPL", &[200.0, 210.0]);
        let q = Quote::from_series(&s, "Apple Inc.");
        assert_eq!(q.price, Some(210.0));
        assert_eq!(q.change, Some(10.0));
        assert_eq!(q.change_percent, Some(5.0));
        assert_eq!(q.name, "Apple Inc.");
    }

    #[test]
    fn quote_single_point_has_no_change() {
        let s = PriceSeries::from_closes("AAPL", &[200.0]);
        let q = Quote::from_series(&s, "");
        assert_eq!(q.price, Some(200.0));
        assert_eq!(q.change, None);
        assert_eq!(q.change_percent, None);
    }

    #[test]
    fn quote_empty_series_is_unavailable() {
        let s = PriceSeries::from_closes("AAPL", &[]);
        assert_eq!(Quote::from_series(&s, ""), Quote::unavailable("AAPL"));
    }
}
