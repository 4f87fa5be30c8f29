//! Synthetic price provider for offline runs and demos.
//!
//! Each ticker gets a deterministic random walk seeded from a BLAKE3 hash of
//! its name, so repeated runs see identical prices. Weekends are skipped.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use signalscope_core::domain::PriceBar;

use super::{DataError, PriceProvider, TickerProfile};

#[derive(Debug, Clone, Default)]
pub struct SyntheticProvider;

impl SyntheticProvider {
    pub fn new() -> Self {
        Self
    }

    fn rng_for(ticker: &str, stream: &str) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(stream.as_bytes());
        hasher.update(ticker.as_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }
}

/// Random walk with a small per-ticker drift.
fn generate_bars(ticker: &str, start: NaiveDate, end: NaiveDate) -> Vec<PriceBar> {
    let mut rng = SyntheticProvider::rng_for(ticker, "bars");
    let drift: f64 = rng.gen_range(-0.0005..0.001);

    let mut bars = Vec::new();
    let mut price = rng.gen_range(20.0..400.0_f64);
    let mut current = start;

    while current <= end {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current = current + Days::new(1);
            continue;
        }

        let daily_return: f64 = drift + rng.gen_range(-0.025..0.025);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);

        bars.push(PriceBar {
            date: current,
            open,
            high,
            low,
            close,
            volume,
        });

        price = close;
        current = current + Days::new(1);
    }
    bars
}

impl PriceProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError> {
        let bars = generate_bars(ticker, start, end);
        if bars.is_empty() {
            return Err(DataError::EmptySeries {
                symbol: ticker.to_string(),
            });
        }
        Ok(bars)
    }

    fn fetch_profile(&self, ticker: &str) -> Result<TickerProfile, DataError> {
        let mut rng = Self::rng_for(ticker, "profile");
        Ok(TickerProfile {
            name: Some(format!("{ticker} (synthetic)")),
            trailing_pe: Some((rng.gen_range(5.0..40.0_f64) * 100.0).round() / 100.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
    }

    #[test]
    fn deterministic_per_ticker() {
        let (start, end) = range();
        let p = SyntheticProvider::new();
        let a1 = p.fetch_bars("AAA", start, end).unwrap();
        let a2 = p.fetch_bars("AAA", start, end).unwrap();
        let b = p.fetch_bars("BBB", start, end).unwrap();
        assert_eq!(a1, a2);
        assert_ne!(a1[10].close, b[10].close);
    }

    #[test]
    fn skips_weekends_and_stays_positive() {
        let (start, end) = range();
        let bars = SyntheticProvider::new().fetch_bars("AAA", start, end).unwrap();
        assert!(bars
            .iter()
            .all(|b| !matches!(b.date.weekday(), Weekday::Sat | Weekday::Sun)));
        assert!(bars.iter().all(|b| b.close > 0.0 && b.low <= b.high));
        // 2024 has 262 weekdays
        assert_eq!(bars.len(), 262);
    }

    #[test]
    fn weekend_only_range_is_empty() {
        let sat = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let sun = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert!(matches!(
            SyntheticProvider::new().fetch_bars("AAA", sat, sun),
            Err(DataError::EmptySeries { .. })
        ));
    }

    #[test]
    fn profile_is_stable() {
        let p = SyntheticProvider::new();
        assert_eq!(p.fetch_profile("AAA").unwrap(), p.fetch_profile("AAA").unwrap());
    }
}
