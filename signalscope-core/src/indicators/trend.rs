//! SMA trend alignment (20/60/120).
//!
//! With all three SMAs available the trend is aligned when they stack in
//! order. With only the 20 and 60 available, the short average is compared
//! against the medium one.

use serde::{Deserialize, Serialize};

use super::sma::sma_last;
use crate::stats::round_to;

pub const SHORT: usize = 20;
pub const MEDIUM: usize = 60;
pub const LONG: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendSignal {
    /// sma20 > sma60 > sma120
    AlignedBullish,
    /// sma20 < sma60 < sma120
    AlignedBearish,
    Mixed,
    /// Only 20/60 available, sma20 > sma60.
    ShortAboveMedium,
    /// Only 20/60 available, sma20 ≤ sma60.
    ShortBelowMedium,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmaTrend {
    pub sma_20: Option<f64>,
    pub sma_60: Option<f64>,
    pub sma_120: Option<f64>,
    pub signal: TrendSignal,
}

impl SmaTrend {
    pub fn compute(closes: &[f64]) -> Self {
        let sma_20 = sma_last(closes, SHORT).map(|v| round_to(v, 2));
        let sma_60 = sma_last(closes, MEDIUM).map(|v| round_to(v, 2));
        let sma_120 = sma_last(closes, LONG).map(|v| round_to(v, 2));

        let signal = match (sma_20, sma_60, sma_120) {
            (Some(s), Some(m), Some(l)) if s > m && m > l => TrendSignal::AlignedBullish,
            (Some(s), Some(m), Some(l)) if s < m && m < l => TrendSignal::AlignedBearish,
            (Some(_), Some(_), Some(_)) => TrendSignal::Mixed,
            (Some(s), Some(m), None) if s > m => TrendSignal::ShortAboveMedium,
            (Some(_), Some(_), None) => TrendSignal::ShortBelowMedium,
            _ => TrendSignal::InsufficientData,
        };

        Self {
            sma_20,
            sma_60,
            sma_120,
            signal,
        }
    }
}
