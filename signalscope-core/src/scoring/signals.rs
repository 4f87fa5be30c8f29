//! Per-domain composite signals.
//!
//! Each signal carries the sub-scores that justify it and a `composite` in
//! `[-100, 100]`, rounded to 2 decimals. All five composites go through the
//! same `clip_composite` before weighting.

use serde::{Deserialize, Serialize};

use crate::domain::{GeopoliticalRecord, MacroSnapshot, SentimentRecord, Stance, Urgency};
use crate::indicators::{BandSignal, IndicatorSnapshot, MacdSignal};
use crate::stats::round_to;

pub const COMPOSITE_BOUND: f64 = 100.0;

/// Confidence assumed for a sentiment record that carries none.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Clamp to `[-100, 100]` and round to 2 decimals.
pub fn clip_composite(value: f64) -> f64 {
    round_to(value.clamp(-COMPOSITE_BOUND, COMPOSITE_BOUND), 2)
}

// ─── Technical ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSignal {
    pub rsi_score: f64,
    pub macd_score: f64,
    pub bb_score: f64,
    pub composite: f64,
}

impl TechnicalSignal {
    pub fn from_snapshot(snapshot: &IndicatorSnapshot) -> Self {
        let rsi_score = snapshot
            .rsi
            .value
            .map(|rsi| ((50.0 - rsi) * 5.0).clamp(-COMPOSITE_BOUND, COMPOSITE_BOUND))
            .unwrap_or(0.0);
        let macd_score = match snapshot.macd.signal {
            MacdSignal::BullishCrossover => 100.0,
            MacdSignal::BearishCrossover => -100.0,
            _ => 0.0,
        };
        let bb_score = match snapshot.bollinger.signal {
            BandSignal::BelowLower => 50.0,
            BandSignal::AboveUpper => -50.0,
            _ => 0.0,
        };
        Self {
            rsi_score,
            macd_score,
            bb_score,
            composite: clip_composite((rsi_score + macd_score + bb_score) / 3.0),
        }
    }
}

// ─── Macro ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroSignal {
    pub vix_score: f64,
    pub yield_score: f64,
    pub index_score: f64,
    pub composite: f64,
}

impl MacroSignal {
    pub fn from_snapshot(snapshot: &MacroSnapshot) -> Self {
        let vix_score = snapshot.vix.map(vix_tier).unwrap_or(0.0);
        let yield_score = snapshot.us_10y_yield.map(yield_tier).unwrap_or(0.0);
        let index_score = vix_score * 0.5;
        Self {
            vix_score,
            yield_score,
            index_score,
            composite: clip_composite((vix_score + yield_score + index_score) / 3.0),
        }
    }
}

fn vix_tier(vix: f64) -> f64 {
    if vix < 15.0 {
        100.0
    } else if vix < 20.0 {
        50.0
    } else if vix <= 30.0 {
        -50.0
    } else {
        -100.0
    }
}

fn yield_tier(y: f64) -> f64 {
    if y < 3.5 {
        50.0
    } else if y < 4.5 {
        0.0
    } else if y < 5.0 {
        -50.0
    } else {
        -100.0
    }
}

// ─── Sentiment ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSignal {
    pub avg_weighted_score: f64,
    pub article_count: usize,
    pub composite: f64,
}

impl SentimentSignal {
    pub fn from_records(records: &[SentimentRecord]) -> Self {
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        for record in records {
            let value = match record.direction {
                Stance::Bullish => 100.0,
                Stance::Bearish => -100.0,
                Stance::Neutral => 0.0,
            };
            let weight = record
                .confidence
                .filter(|c| c.is_finite())
                .map(|c| c.clamp(0.0, 1.0))
                .unwrap_or(DEFAULT_CONFIDENCE);
            weighted_sum += value * weight;
            total_weight += weight;
        }
        let avg = if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        };
        Self {
            avg_weighted_score: round_to(avg, 2),
            article_count: records.len(),
            composite: clip_composite(avg),
        }
    }
}

// ─── Currency ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySignal {
    pub usd_krw: f64,
    pub direction: Stance,
    pub composite: f64,
}

impl CurrencySignal {
    /// Step function of the USD/KRW level, boundaries at 1250/1300/1350/1400.
    pub fn from_level(usd_krw: f64) -> Self {
        let (score, direction) = if usd_krw < 1250.0 {
            (80.0, Stance::Bullish)
        } else if usd_krw < 1300.0 {
            (30.0, Stance::Bullish)
        } else if usd_krw < 1350.0 {
            (0.0, Stance::Neutral)
        } else if usd_krw < 1400.0 {
            (-30.0, Stance::Bearish)
        } else {
            (-80.0, Stance::Bearish)
        };
        Self {
            usd_krw,
            direction,
            composite: clip_composite(score),
        }
    }
}

// ─── Geopolitical ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeopoliticalSignal {
    pub high_urgency_count: usize,
    pub avg_geopolitical_score: f64,
    pub composite: f64,
}

impl GeopoliticalSignal {
    pub fn from_records(records: &[GeopoliticalRecord]) -> Self {
        if records.is_empty() {
            return Self {
                high_urgency_count: 0,
                avg_geopolitical_score: 0.0,
                composite: 0.0,
            };
        }
        let total: f64 = records
            .iter()
            .map(|r| match r.urgency {
                Urgency::High => -100.0,
                Urgency::Medium => -40.0,
                Urgency::Low => -10.0,
            })
            .sum();
        let avg = total / records.len() as f64;
        Self {
            high_urgency_count: records
                .iter()
                .filter(|r| r.urgency == Urgency::High)
                .count(),
            avg_geopolitical_score: round_to(avg, 2),
            composite: clip_composite(avg),
        }
    }
}
