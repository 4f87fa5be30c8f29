//! Market context supplied by external collaborators.
//!
//! The engine never sources these records itself; callers load them (for
//! example from a JSON file) and pass them in. Every part is optional: a
//! missing part means the source was unavailable.

use serde::{Deserialize, Serialize};

/// Maximum number of sentiment or geopolitical records consulted per call.
pub const CONTEXT_WINDOW: usize = 50;

/// Number of newest macro snapshots a trend is measured across.
pub const TREND_LOOKBACK: usize = 5;

/// Latest macro snapshot. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroSnapshot {
    #[serde(default)]
    pub vix: Option<f64>,
    #[serde(default)]
    pub us_10y_yield: Option<f64>,
    #[serde(default)]
    pub usd_krw: Option<f64>,
    #[serde(default)]
    pub wti: Option<f64>,
    #[serde(default)]
    pub gold: Option<f64>,
    #[serde(default)]
    pub sp500: Option<f64>,
}

/// Directional stance of a news item or currency move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stance {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub direction: Stance,
    /// Expected in `[0, 1]`; absent means 0.5.
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeopoliticalRecord {
    #[serde(default)]
    pub urgency: Urgency,
}

/// Everything besides price history that feeds the signal aggregator.
///
/// Sentiment, geopolitical and macro history windows are ordered newest
/// first. `macro_history[0]` is the latest snapshot, normally the same one
/// as `macro`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    #[serde(default, rename = "macro")]
    pub macro_snapshot: Option<MacroSnapshot>,
    #[serde(default)]
    pub macro_history: Option<Vec<MacroSnapshot>>,
    #[serde(default)]
    pub sentiment: Option<Vec<SentimentRecord>>,
    #[serde(default)]
    pub geopolitical: Option<Vec<GeopoliticalRecord>>,
}

impl MarketContext {
    /// The most recent sentiment records, capped at `CONTEXT_WINDOW`.
    pub fn sentiment_window(&self) -> Option<&[SentimentRecord]> {
        self.sentiment
            .as_deref()
            .map(|w| &w[..w.len().min(CONTEXT_WINDOW)])
    }

    /// The most recent geopolitical records, capped at `CONTEXT_WINDOW`.
    pub fn geopolitical_window(&self) -> Option<&[GeopoliticalRecord]> {
        self.geopolitical
            .as_deref()
            .map(|w| &w[..w.len().min(CONTEXT_WINDOW)])
    }

    pub fn vix(&self) -> Option<f64> {
        self.macro_snapshot.as_ref().and_then(|m| m.vix)
    }

    pub fn usd_krw(&self) -> Option<f64> {
        self.macro_snapshot.as_ref().and_then(|m| m.usd_krw)
    }

    pub fn wti(&self) -> Option<f64> {
        self.macro_snapshot.as_ref().and_then(|m| m.wti)
    }

    /// The snapshot collected before the latest one.
    pub fn previous_macro(&self) -> Option<&MacroSnapshot> {
        self.macro_history.as_ref().and_then(|h| h.get(1))
    }

    /// Percent change of one macro field from the oldest to the newest of the
    /// last `TREND_LOOKBACK` snapshots. `None` with fewer than two snapshots,
    /// a missing endpoint value, or a zero base.
    pub fn macro_trend<F>(&self, field: F) -> Option<f64>
    where
        F: Fn(&MacroSnapshot) -> Option<f64>,
    {
        let history = self.macro_history.as_deref()?;
        let window = &history[..history.len().min(TREND_LOOKBACK)];
        if window.len() < 2 {
            return None;
        }
        let latest = field(window.first()?)?;
        let oldest = field(window.last()?)?;
        if oldest == 0.0 {
            return None;
        }
        Some((latest - oldest) / oldest * 100.0)
    }
}
