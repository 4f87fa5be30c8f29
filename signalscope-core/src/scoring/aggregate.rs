//! Weighted composite score, direction and risk classification.

use serde::{Deserialize, Serialize};

use super::signals::{
    clip_composite, CurrencySignal, GeopoliticalSignal, MacroSignal, SentimentSignal,
    TechnicalSignal,
};
use super::weights::ScoreWeights;
use crate::domain::MarketContext;
use crate::error::InputError;
use crate::indicators::IndicatorSnapshot;

pub const BULLISH_THRESHOLD: f64 = 25.0;
pub const BEARISH_THRESHOLD: f64 = -25.0;

/// The five composite signals. `None` marks an unavailable source, which
/// contributes 0 to the weighted score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalBreakdown {
    pub technical: Option<TechnicalSignal>,
    #[serde(rename = "macro")]
    pub macro_signal: Option<MacroSignal>,
    pub sentiment: Option<SentimentSignal>,
    pub currency: Option<CurrencySignal>,
    pub geopolitical: Option<GeopoliticalSignal>,
}

impl SignalBreakdown {
    pub fn assemble(snapshot: Option<&IndicatorSnapshot>, context: &MarketContext) -> Self {
        Self {
            technical: snapshot.map(TechnicalSignal::from_snapshot),
            macro_signal: context
                .macro_snapshot
                .as_ref()
                .map(MacroSignal::from_snapshot),
            sentiment: context
                .sentiment_window()
                .map(SentimentSignal::from_records),
            currency: context.usd_krw().map(CurrencySignal::from_level),
            geopolitical: context
                .geopolitical_window()
                .map(GeopoliticalSignal::from_records),
        }
    }

    /// Composites in weight order, with 0 for unavailable sources.
    pub fn composites(&self) -> [f64; 5] {
        [
            self.technical.as_ref().map_or(0.0, |s| s.composite),
            self.macro_signal.as_ref().map_or(0.0, |s| s.composite),
            self.sentiment.as_ref().map_or(0.0, |s| s.composite),
            self.currency.as_ref().map_or(0.0, |s| s.composite),
            self.geopolitical.as_ref().map_or(0.0, |s| s.composite),
        ]
    }

    pub fn geopolitical_composite(&self) -> f64 {
        self.geopolitical.as_ref().map_or(0.0, |s| s.composite)
    }

    /// Names of sources that were unavailable.
    pub fn missing_sources(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.technical.is_none() {
            missing.push("technical");
        }
        if self.macro_signal.is_none() {
            missing.push("macro");
        }
        if self.sentiment.is_none() {
            missing.push("sentiment");
        }
        if self.currency.is_none() {
            missing.push("currency");
        }
        if self.geopolitical.is_none() {
            missing.push("geopolitical");
        }
        missing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl Direction {
    pub fn from_score(score: f64) -> Self {
        if score >= BULLISH_THRESHOLD {
            Direction::Bullish
        } else if score <= BEARISH_THRESHOLD {
            Direction::Bearish
        } else {
            Direction::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Missing VIX counts as 0 here only.
    pub fn assess(vix: Option<f64>, geopolitical_composite: f64) -> Self {
        let vix = vix.unwrap_or(0.0);
        if vix >= 30.0 || geopolitical_composite < -50.0 {
            RiskLevel::High
        } else if vix >= 20.0 || geopolitical_composite < -20.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub score: f64,
    pub direction: Direction,
    pub risk_level: RiskLevel,
}

/// Full scoring result for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub ticker: String,
    pub breakdown: SignalBreakdown,
    #[serde(flatten)]
    pub composite: CompositeScore,
}

/// Combines a breakdown into a composite score with injected weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalAggregator {
    weights: ScoreWeights,
}

impl SignalAggregator {
    pub fn new(weights: ScoreWeights) -> Result<Self, InputError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Weighted sum of the composites, clamped and rounded to 2 decimals.
    pub fn weighted_score(&self, breakdown: &SignalBreakdown) -> f64 {
        let sum: f64 = breakdown
            .composites()
            .iter()
            .zip(self.weights.as_array())
            .map(|(c, w)| c * w)
            .sum();
        clip_composite(sum)
    }

    pub fn score(&self, breakdown: &SignalBreakdown, vix: Option<f64>) -> CompositeScore {
        let score = self.weighted_score(breakdown);
        CompositeScore {
            score,
            direction: Direction::from_score(score),
            risk_level: RiskLevel::assess(vix, breakdown.geopolitical_composite()),
        }
    }

    pub fn evaluate(
        &self,
        ticker: &str,
        snapshot: Option<&IndicatorSnapshot>,
        context: &MarketContext,
    ) -> Prediction {
        let breakdown = SignalBreakdown::assemble(snapshot, context);
        let composite = self.score(&breakdown, context.vix());
        Prediction {
            ticker: ticker.to_string(),
            breakdown,
            composite,
        }
    }
}
