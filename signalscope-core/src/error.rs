//! Error taxonomy shared by every layer.
//!
//! `ErrorKind` is the classification the runner uses for retry and reporting
//! decisions. `InputError` is the only error that aborts a whole call; every
//! other problem is recorded per ticker as a `TickerFailure`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a failure, independent of where it was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Price series, valuation or context source could not be retrieved.
    DataUnavailable,
    /// Data was fetched but is too short for the requested statistic.
    InsufficientHistory,
    /// Transient; the fetch boundary may retry.
    RateLimited,
    /// Caller supplied invalid arguments. Aborts the call.
    MalformedInput,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorKind::DataUnavailable => "data unavailable",
            ErrorKind::InsufficientHistory => "insufficient history",
            ErrorKind::RateLimited => "rate limited",
            ErrorKind::MalformedInput => "malformed input",
        };
        f.write_str(label)
    }
}

/// Invalid caller input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("ticker list is empty")]
    EmptyTickerList,

    #[error("blank ticker at position {0}")]
    BlankTicker(usize),

    #[error("invalid ticker '{0}': path separators and '..' are not allowed")]
    InvalidTicker(String),

    #[error("too many tickers: {count} (max {max})")]
    TooManyTickers { count: usize, max: usize },

    #[error("threshold {0} is outside 0..=100")]
    ThresholdOutOfRange(i64),

    #[error("unsupported period '{0}'")]
    UnsupportedPeriod(String),

    #[error("risk-free rate {0} is outside 0.0..=0.2")]
    RiskFreeRateOutOfRange(f64),

    #[error("invalid score weights: {0}")]
    InvalidWeights(String),
}

impl InputError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::MalformedInput
    }
}

/// A ticker that dropped out of a batch, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerFailure {
    pub ticker: String,
    pub kind: ErrorKind,
    pub reason: String,
}

impl TickerFailure {
    pub fn new(ticker: impl Into<String>, kind: ErrorKind, reason: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            kind,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for TickerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.ticker, self.reason, self.kind)
    }
}
