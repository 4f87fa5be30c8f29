//! Rule-based screening.
//!
//! Score = sum of rule contributions, at most 100:
//!
//! | rule                         | points |
//! |------------------------------|--------|
//! | RSI ≤ 30 (else ≤ 40)         | 30 (15)|
//! | MACD bullish crossover       | 25     |
//! | price at/below lower band    | 20     |
//! | SMA 20/60/120 aligned bullish| 10     |
//! | trailing P/E ≤ 15 (else ≤ 25)| 15 (5) |
//!
//! Missing readings contribute nothing. A ticker without any indicator
//! snapshot scores 0 and never passes.

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::indicators::{BandSignal, IndicatorSnapshot, MacdSignal, TrendSignal};
use crate::stats::round_to;

pub const DEFAULT_THRESHOLD: u8 = 60;

/// Pass mark for the screening score, validated to `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Threshold(u8);

impl Threshold {
    pub fn new(value: i64) -> Result<Self, InputError> {
        u8::try_from(value)
            .ok()
            .filter(|v| *v <= 100)
            .map(Threshold)
            .ok_or(InputError::ThresholdOutOfRange(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<i64> for Threshold {
    type Error = InputError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Threshold::new(value)
    }
}

impl From<Threshold> for i64 {
    fn from(t: Threshold) -> Self {
        i64::from(t.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub ticker: String,
    pub name: String,
    pub rsi: Option<f64>,
    pub macd_signal: Option<MacdSignal>,
    pub bb_signal: Option<BandSignal>,
    pub sma_signal: Option<TrendSignal>,
    pub per: Option<f64>,
    pub composite_score: u8,
    pub passed: bool,
}

impl ScreeningResult {
    /// Zero-score, non-passing result for a ticker whose price history
    /// could not be fetched.
    pub fn unavailable(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: String::new(),
            rsi: None,
            macd_signal: None,
            bb_signal: None,
            sma_signal: None,
            per: None,
            composite_score: 0,
            passed: false,
        }
    }

    pub fn evaluate(
        snapshot: &IndicatorSnapshot,
        per: Option<f64>,
        name: impl Into<String>,
        threshold: Threshold,
    ) -> Self {
        let score = screening_score(snapshot, per);
        Self {
            ticker: snapshot.ticker.clone(),
            name: name.into(),
            rsi: snapshot.rsi.value,
            macd_signal: Some(snapshot.macd.signal),
            bb_signal: Some(snapshot.bollinger.signal),
            sma_signal: Some(snapshot.sma.signal),
            per: per.filter(|p| p.is_finite()).map(|p| round_to(p, 2)),
            composite_score: score,
            passed: score >= threshold.value(),
        }
    }
}

pub fn screening_score(snapshot: &IndicatorSnapshot, per: Option<f64>) -> u8 {
    let mut score: u8 = 0;

    match snapshot.rsi.value {
        Some(rsi) if rsi <= 30.0 => score += 30,
        Some(rsi) if rsi <= 40.0 => score += 15,
        _ => {}
    }
    if snapshot.macd.signal == MacdSignal::BullishCrossover {
        score += 25;
    }
    if snapshot.bollinger.signal == BandSignal::BelowLower {
        score += 20;
    }
    if snapshot.sma.signal == TrendSignal::AlignedBullish {
        score += 10;
    }
    match per.filter(|p| p.is_finite()) {
        Some(p) if p <= 15.0 => score += 15,
        Some(p) if p <= 25.0 => score += 5,
        _ => {}
    }

    score.min(100)
}

// ─── Rule-based recommendation ──────────────────────────────────────

pub const TARGET_UPSIDE: f64 = 0.15;
pub const STOP_DOWNSIDE: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    Swing,
}

/// Plain-rule rationale and price levels for a passing ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub ticker: String,
    pub name: String,
    pub reasons: Vec<String>,
    pub current_price: f64,
    pub target_price: f64,
    pub stop_loss: f64,
    pub strategy: Strategy,
    pub confidence: f64,
}

impl Recommendation {
    /// `None` when the result did not pass or no price is known.
    pub fn from_result(result: &ScreeningResult, price: Option<f64>) -> Option<Self> {
        if !result.passed {
            return None;
        }
        let price = price.filter(|p| p.is_finite() && *p > 0.0)?;

        let mut reasons = Vec::new();
        if let Some(rsi) = result.rsi.filter(|r| *r <= 40.0) {
            reasons.push(format!("RSI {rsi:.1} signals an oversold zone"));
        }
        if result.macd_signal == Some(MacdSignal::BullishCrossover) {
            reasons.push("MACD bullish crossover".to_string());
        }
        if result.bb_signal == Some(BandSignal::BelowLower) {
            reasons.push("price touched the lower Bollinger band".to_string());
        }
        if result.sma_signal == Some(TrendSignal::AlignedBullish) {
            reasons.push("moving averages aligned bullish".to_string());
        }
        if let Some(per) = result.per.filter(|p| *p <= 25.0) {
            reasons.push(format!("trailing P/E {per:.1} is undervalued"));
        }
        if reasons.is_empty() {
            reasons.push(format!("composite score {}", result.composite_score));
        }

        Some(Self {
            ticker: result.ticker.clone(),
            name: result.name.clone(),
            reasons,
            current_price: round_to(price, 2),
            target_price: round_to(price * (1.0 + TARGET_UPSIDE), 2),
            stop_loss: round_to(price * (1.0 - STOP_DOWNSIDE), 2),
            strategy: Strategy::Swing,
            confidence: round_to(f64::from(result.composite_score) / 100.0, 2),
        })
    }
}
