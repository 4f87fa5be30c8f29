//! Fear & Greed index.
//!
//! Four equally weighted components, each clamped to `0..=100` and
//! falling back to a neutral 50 when its input is missing:
//!
//! | component  | input                                   | value                         |
//! |------------|-----------------------------------------|-------------------------------|
//! | vix        | latest VIX                              | `100 - (vix - 10) * 100 / 30` |
//! | momentum   | S&P 500 % change over 5 snapshots       | `50 + pct * 10`               |
//! | sentiment  | bullish/bearish share of the window     | `bull% + (50 - bear%) * 0.5`  |
//! | safe_haven | gold % change over 5 snapshots          | `50 - pct * 10`               |
//!
//! Component values are rounded half to even; the index is the rounded
//! mean of the four rounded values. Low is fear, high is greed.

use serde::{Deserialize, Serialize};

use crate::domain::{MarketContext, Stance};
use crate::stats::{round_half_even, round_to};

pub const NEUTRAL_VALUE: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FearGreedLabel {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl FearGreedLabel {
    /// ≤20 extreme fear, ≤40 fear, ≤60 neutral, ≤80 greed, else extreme greed.
    pub fn from_value(value: u8) -> Self {
        match value {
            0..=20 => FearGreedLabel::ExtremeFear,
            21..=40 => FearGreedLabel::Fear,
            41..=60 => FearGreedLabel::Neutral,
            61..=80 => FearGreedLabel::Greed,
            _ => FearGreedLabel::ExtremeGreed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FearGreedComponent {
    pub value: u8,
    pub label: FearGreedLabel,
    /// The reading the value was derived from (VIX level, % change or
    /// bullish share), rounded to 2 decimals. `None` when the component fell back to 50.
    pub input: Option<f64>,
}

impl FearGreedComponent {
    pub fn neutral() -> Self {
        Self {
            value: NEUTRAL_VALUE,
            label: FearGreedLabel::Neutral,
            input: None,
        }
    }

    /// Clamp to `0..=100`. The label follows the truncated value, the
    /// stored value is rounded.
    fn from_raw(raw: f64, input: Option<f64>) -> Self {
        let clamped = if raw.is_finite() { raw.clamp(0.0, 100.0) } else { 50.0 };
        Self {
            value: round_half_even(clamped) as u8,
            label: FearGreedLabel::from_value(clamped.trunc() as u8),
            input: input.map(|v| round_to(v, 2)),
        }
    }
}

pub fn vix_component(vix: Option<f64>) -> FearGreedComponent {
    match vix {
        Some(vix) => FearGreedComponent::from_raw(100.0 - (vix - 10.0) * (100.0 / 30.0), Some(vix)),
        None => FearGreedComponent::neutral(),
    }
}

/// `pct` is the S&P 500 percent change across the trend window.
pub fn momentum_component(pct: Option<f64>) -> FearGreedComponent {
    match pct {
        Some(pct) => FearGreedComponent::from_raw(50.0 + pct * 10.0, Some(pct)),
        None => FearGreedComponent::neutral(),
    }
}

/// Bullish and bearish shares over every record in the window, neutral
/// records included in the denominator.
pub fn sentiment_component(directions: &[Stance]) -> FearGreedComponent {
    if directions.is_empty() {
        return FearGreedComponent::neutral();
    }
    let total = directions.len() as f64;
    let bullish = directions.iter().filter(|d| **d == Stance::Bullish).count() as f64;
    let bearish = directions.iter().filter(|d| **d == Stance::Bearish).count() as f64;
    let bull_pct = bullish / total * 100.0;
    let bear_pct = bearish / total * 100.0;
    FearGreedComponent::from_raw(bull_pct + (50.0 - bear_pct) * 0.5, Some(bull_pct))
}

/// `pct` is the gold percent change across the trend window. Rising gold
/// reads as fear.
pub fn safe_haven_component(pct: Option<f64>) -> FearGreedComponent {
    match pct {
        Some(pct) => FearGreedComponent::from_raw(50.0 - pct * 10.0, Some(pct)),
        None => FearGreedComponent::neutral(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FearGreedComponents {
    pub vix: FearGreedComponent,
    pub momentum: FearGreedComponent,
    pub sentiment: FearGreedComponent,
    pub safe_haven: FearGreedComponent,
}

impl FearGreedComponents {
    pub fn values(&self) -> [u8; 4] {
        [
            self.vix.value,
            self.momentum.value,
            self.sentiment.value,
            self.safe_haven.value,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FearGreedIndex {
    pub value: u8,
    pub label: FearGreedLabel,
    pub components: FearGreedComponents,
}

impl FearGreedIndex {
    pub fn compute(context: &MarketContext) -> Self {
        let directions: Vec<Stance> = context
            .sentiment_window()
            .unwrap_or_default()
            .iter()
            .map(|r| r.direction)
            .collect();
        let components = FearGreedComponents {
            vix: vix_component(context.vix()),
            momentum: momentum_component(context.macro_trend(|m| m.sp500)),
            sentiment: sentiment_component(&directions),
            safe_haven: safe_haven_component(context.macro_trend(|m| m.gold)),
        };
        Self::from_components(components)
    }

    pub fn from_components(components: FearGreedComponents) -> Self {
        let sum: f64 = components.values().iter().map(|v| f64::from(*v)).sum();
        let value = round_half_even(sum / 4.0) as u8;
        Self {
            value,
            label: FearGreedLabel::from_value(value),
            components,
        }
    }
}
