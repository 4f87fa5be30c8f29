//! Relative Strength Index (RSI).
//!
//! Uses Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Needs period + 1 closes. avg_loss == 0 → RSI = 100.
//! The reading is rounded to 2 decimals before classification.

use serde::{Deserialize, Serialize};

use crate::stats::round_to;

pub const RSI_PERIOD: usize = 14;
pub const OVERBOUGHT: f64 = 70.0;
pub const OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsiSignal {
    /// RSI ≥ 70, a sell signal.
    Overbought,
    /// RSI ≤ 30, a buy signal.
    Oversold,
    Neutral,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiReading {
    pub value: Option<f64>,
    pub signal: RsiSignal,
}

impl RsiReading {
    pub fn compute(closes: &[f64]) -> Self {
        match wilder_rsi(closes, RSI_PERIOD) {
            Some(raw) => {
                let value = round_to(raw, 2);
                Self {
                    value: Some(value),
                    signal: classify(value),
                }
            }
            None => Self {
                value: None,
                signal: RsiSignal::InsufficientData,
            },
        }
    }
}

fn classify(value: f64) -> RsiSignal {
    if value >= OVERBOUGHT {
        RsiSignal::Overbought
    } else if value <= OVERSOLD {
        RsiSignal::Oversold
    } else {
        RsiSignal::Neutral
    }
}

/// Latest unrounded Wilder RSI, or `None` below `period + 1` closes.
pub fn wilder_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    // Seed: average gain and average loss over the first `period` deltas
    let (mut avg_gain, mut avg_loss) = deltas[..period]
        .iter()
        .fold((0.0, 0.0), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l - d)
            }
        });
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    let n = period as f64;
    for &d in &deltas[period..] {
        let gain = d.max(0.0);
        let loss = (-d).max(0.0);
        avg_gain = (avg_gain * (n - 1.0) + gain) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss) / n;
    }

    if avg_loss == 0.0 {
        return Some(100.0);
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}
