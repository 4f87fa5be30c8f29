//! SignalScope Runner — providers, retry, batch pool and the engine services.
//!
//! This crate builds on `signalscope-core` to provide:
//! - Price providers: Yahoo Finance, CSV directory, synthetic random walk
//! - Retry of rate-limited fetches with linear backoff
//! - A bounded rayon worker pool for per-ticker batches
//! - `Engine`: indicators, predictions, screening, performance analytics,
//!   quotes, price-alert checks
//! - TOML configuration, JSON input loading, logging setup, CSV export

pub mod config;
pub mod context;
pub mod engine;
pub mod export;
pub mod logging;
pub mod pool;
pub mod provider;
pub mod retry;

pub use config::{ConfigError, EngineConfig};
pub use context::{load_context, load_price_alerts, load_scenarios, ContextError};
pub use engine::{
    AlertReport, Engine, IndicatorReport, PerformanceReport, PredictionReport, QuoteReport,
    RunError, ScreeningReport, MAX_PERFORMANCE_TICKERS,
};
pub use logging::{init_logging, LogFormat};
pub use pool::{BatchPool, BatchResults};
pub use provider::{
    CsvProvider, DataError, PriceProvider, SyntheticProvider, TickerProfile, YahooProvider,
};
pub use retry::RetryPolicy;
