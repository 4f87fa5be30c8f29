//! PriceBar — one daily OHLCV observation from a price provider.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar for a single ticker, as delivered by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// A bar whose close cannot be used for any calculation.
    pub fn is_void(&self) -> bool {
        !self.close.is_finite() || self.close <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn void_closes() {
        assert!(!bar(100.0).is_void());
        assert!(bar(f64::NAN).is_void());
        assert!(bar(0.0).is_void());
        assert!(bar(-1.0).is_void());
        assert!(bar(f64::INFINITY).is_void());
    }
}
