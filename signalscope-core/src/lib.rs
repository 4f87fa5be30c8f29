//! SignalScope core — pure numeric layer.
//!
//! Everything in this crate is a stateless transform: price series and market
//! context in, indicators, scores and metrics out. No I/O, no clocks, no
//! shared state. Fetching and batching live in `signalscope-runner`.
//!
//! Modules:
//! - `domain` — price bars, canonical price series, periods, tickers, market context
//! - `indicators` — RSI, MACD, Bollinger Bands, SMA trend
//! - `scoring` — five composite signals and the weighted composite score
//! - `screening` — rule-based 0–100 screening score and recommendations
//! - `analytics` — Sharpe, drawdown, rolling returns, correlation
//! - `alerts` — macro risk conditions, target and stop-loss price alerts
//! - `scenario` — macro scenario relevance ranking

pub mod alerts;
pub mod analytics;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod scenario;
pub mod scoring;
pub mod screening;
pub mod stats;

pub use error::{ErrorKind, InputError, TickerFailure};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn domain_types_are_send_sync() {
        assert_send::<domain::PriceSeries>();
        assert_sync::<domain::PriceSeries>();
        assert_send::<domain::MarketContext>();
        assert_sync::<domain::MarketContext>();
    }

    #[test]
    fn indicator_snapshot_is_send_sync() {
        assert_send::<indicators::IndicatorSnapshot>();
        assert_sync::<indicators::IndicatorSnapshot>();
    }

    #[test]
    fn scoring_types_are_send_sync() {
        assert_send::<scoring::SignalAggregator>();
        assert_sync::<scoring::SignalAggregator>();
        assert_send::<scoring::Prediction>();
        assert_sync::<scoring::Prediction>();
        assert_send::<scoring::FearGreedIndex>();
        assert_sync::<scoring::FearGreedIndex>();
    }

    #[test]
    fn alert_types_are_send_sync() {
        assert_send::<alerts::RiskAlert>();
        assert_sync::<alerts::RiskAlert>();
        assert_send::<alerts::TriggeredAlert>();
        assert_sync::<alerts::TriggeredAlert>();
        assert_send::<scenario::ScenarioSuggestion>();
        assert_sync::<scenario::ScenarioSuggestion>();
    }

    #[test]
    fn analytics_types_are_send_sync() {
        assert_send::<analytics::PerformanceAnalysis>();
        assert_sync::<analytics::PerformanceAnalysis>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<InputError>();
        assert_sync::<InputError>();
        assert_send::<TickerFailure>();
        assert_sync::<TickerFailure>();
    }
}
