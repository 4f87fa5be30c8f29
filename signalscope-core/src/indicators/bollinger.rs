//! Bollinger Bands (20, 2σ).
//!
//! - Middle: SMA(close, 20)
//! - Upper: middle + 2 * stddev(close, 20)
//! - Lower: middle - 2 * stddev(close, 20)
//!
//! Uses population stddev (divide by N). Values are rounded to 2 decimals in
//! a fixed order: upper from the unrounded mean, then the middle, then lower
//! from the rounded middle. Rounding is monotone, so lower ≤ middle ≤ upper
//! holds.

use serde::{Deserialize, Serialize};

use crate::stats::{population_std_dev, round_to};

pub const PERIOD: usize = 20;
pub const MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BandSignal {
    /// Price at or above the upper band (overbought).
    AboveUpper,
    /// Price at or below the lower band (oversold).
    BelowLower,
    WithinBand,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerReading {
    pub upper: Option<f64>,
    pub middle: Option<f64>,
    pub lower: Option<f64>,
    pub signal: BandSignal,
}

impl BollingerReading {
    pub fn compute(closes: &[f64]) -> Self {
        if closes.len() < PERIOD {
            return Self {
                upper: None,
                middle: None,
                lower: None,
                signal: BandSignal::InsufficientData,
            };
        }
        let window = &closes[closes.len() - PERIOD..];
        let mid = window.iter().sum::<f64>() / PERIOD as f64;
        let std = population_std_dev(window);

        let upper = round_to(mid + MULTIPLIER * std, 2);
        let middle = round_to(mid, 2);
        let lower = round_to(middle - MULTIPLIER * std, 2);
        let current = window[PERIOD - 1];

        let signal = if current >= upper {
            BandSignal::AboveUpper
        } else if current <= lower {
            BandSignal::BelowLower
        } else {
            BandSignal::WithinBand
        };

        Self {
            upper: Some(upper),
            middle: Some(middle),
            lower: Some(lower),
            signal,
        }
    }
}
