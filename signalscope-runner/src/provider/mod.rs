//! Price provider trait and structured error types.
//!
//! The PriceProvider trait abstracts over data sources (Yahoo Finance, a CSV
//! directory, a synthetic random walk) so the engine can swap implementations
//! and tests can inject failures. Providers make a single attempt per call;
//! retrying is the engine's job, driven by `DataError::kind`.

pub mod csv_dir;
pub mod synthetic;
pub mod yahoo;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use signalscope_core::domain::PriceBar;
use signalscope_core::ErrorKind;
use thiserror::Error;

pub use csv_dir::CsvProvider;
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;

/// Structured error types for provider calls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no usable closes for '{symbol}'")]
    EmptySeries { symbol: String },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("still rate limited after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    /// Only `RateLimited` is transient. Everything else, including an
    /// exhausted retry budget, means the data is unavailable.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DataError::RateLimited { .. } => ErrorKind::RateLimited,
            _ => ErrorKind::DataUnavailable,
        }
    }
}

/// Descriptive data that accompanies a ticker's prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerProfile {
    pub name: Option<String>,
    pub trailing_pe: Option<f64>,
}

/// Trait for price providers (Yahoo Finance, CSV directory, synthetic).
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for a ticker over an inclusive date range.
    /// Either the whole series or an error; never a partial series.
    fn fetch_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError>;

    /// Display name and trailing P/E. Providers without a profile source
    /// return an empty profile.
    fn fetch_profile(&self, _ticker: &str) -> Result<TickerProfile, DataError> {
        Ok(TickerProfile::default())
    }
}
