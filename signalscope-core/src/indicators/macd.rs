//! Moving Average Convergence Divergence (MACD 12/26/9).
//!
//! MACD line = EMA(12) - EMA(26), aligned on the EMA(26) window.
//! Signal line = EMA(9) of the MACD line. Histogram = MACD - signal.
//! Values are rounded to 4 decimals before classification.
//! Needs 26 + 9 closes.

use serde::{Deserialize, Serialize};

use super::ema::ema_series;
use crate::stats::round_to;

pub const FAST: usize = 12;
pub const SLOW: usize = 26;
pub const SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MacdSignal {
    BullishCrossover,
    BearishCrossover,
    Neutral,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdReading {
    pub macd_line: Option<f64>,
    pub signal_line: Option<f64>,
    pub histogram: Option<f64>,
    pub signal: MacdSignal,
}

impl MacdReading {
    pub fn insufficient() -> Self {
        Self {
            macd_line: None,
            signal_line: None,
            histogram: None,
            signal: MacdSignal::InsufficientData,
        }
    }

    pub fn compute(closes: &[f64]) -> Self {
        let Some(line) = macd_line(closes, FAST, SLOW) else {
            return Self::insufficient();
        };
        let signal_series = ema_series(&line, SIGNAL);
        let (Some(&m), Some(&s)) = (line.last(), signal_series.last()) else {
            return Self::insufficient();
        };

        let macd = round_to(m, 4);
        let signal_line = round_to(s, 4);
        let histogram = round_to(macd - signal_line, 4);

        let signal = if macd > signal_line && histogram > 0.0 {
            MacdSignal::BullishCrossover
        } else if macd < signal_line && histogram < 0.0 {
            MacdSignal::BearishCrossover
        } else {
            MacdSignal::Neutral
        };

        Self {
            macd_line: Some(macd),
            signal_line: Some(signal_line),
            histogram: Some(histogram),
            signal,
        }
    }
}

/// MACD line over the slow EMA's window, or `None` when the series cannot
/// also seed the signal EMA.
fn macd_line(closes: &[f64], fast: usize, slow: usize) -> Option<Vec<f64>> {
    if closes.len() < slow + SIGNAL {
        return None;
    }
    let ema_fast = ema_series(closes, fast);
    let ema_slow = ema_series(closes, slow);
    let offset = ema_fast.len().checked_sub(ema_slow.len())?;
    Some(
        ema_slow
            .iter()
            .enumerate()
            .map(|(i, s)| ema_fast[offset + i] - s)
            .collect(),
    )
}
