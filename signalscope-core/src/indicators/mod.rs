//! Technical indicators over a closing-price series.
//!
//! Each indicator produces a reading for the latest bar: optional numeric
//! values plus a categorical signal with an explicit `InsufficientData`
//! variant. Readings degrade independently, so a short series can still yield
//! an RSI while MACD and the long SMAs report insufficient data.
//!
//! `IndicatorSnapshot` bundles the four readings for one ticker.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod trend;

use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;

pub use bollinger::{BandSignal, BollingerReading};
pub use macd::{MacdReading, MacdSignal};
pub use rsi::{RsiReading, RsiSignal};
pub use trend::{SmaTrend, TrendSignal};

/// All indicator readings for one ticker at its latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub ticker: String,
    pub data_points: usize,
    pub rsi: RsiReading,
    pub macd: MacdReading,
    pub bollinger: BollingerReading,
    pub sma: SmaTrend,
}

impl IndicatorSnapshot {
    pub fn compute(series: &PriceSeries) -> Self {
        let closes = series.closes();
        Self {
            ticker: series.ticker().to_string(),
            data_points: closes.len(),
            rsi: RsiReading::compute(closes),
            macd: MacdReading::compute(closes),
            bollinger: BollingerReading::compute(closes),
            sma: SmaTrend::compute(closes),
        }
    }
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Steady compounding uptrend with a small three-day wobble.
#[cfg(test)]
pub fn uptrend(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let wobble = if i % 3 == 1 { 1.0 } else { 0.0 };
            100.0 * 1.012_f64.powi(i as i32) + wobble
        })
        .collect()
}
