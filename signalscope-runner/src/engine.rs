//! Engine: the service layer over providers, pool and core calculations.
//!
//! Every public call validates its input first (a `RunError` aborts the
//! call), then fans out one job per ticker on the batch pool. Per-ticker
//! problems never abort a batch; they come back in the report's `failed`
//! list while the ticker keeps a placeholder entry in the results.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use signalscope_core::alerts::{check_price_alerts, PriceAlert, TriggeredAlert};
use signalscope_core::analytics::{
    self, CorrelationPair, PerformanceMetrics, RollingReturn, TickerHistory,
};
use signalscope_core::domain::{normalize_tickers, MarketContext, Period, PriceSeries, Quote};
use signalscope_core::indicators::IndicatorSnapshot;
use signalscope_core::scoring::{Prediction, SignalAggregator};
use signalscope_core::screening::{Recommendation, ScreeningResult, Threshold};
use signalscope_core::{ErrorKind, InputError, TickerFailure};
use thiserror::Error;

use crate::config::{validate_risk_free_rate, ConfigError, EngineConfig};
use crate::pool::BatchPool;
use crate::provider::{PriceProvider, TickerProfile};
use crate::retry::RetryPolicy;

pub const MAX_PERFORMANCE_TICKERS: usize = 20;

/// History used for indicators, predictions and screening.
const SIGNAL_PERIOD: Period = Period::OneYear;
/// History used for quotes; only the last two bars matter.
const QUOTE_PERIOD: Period = Period::OneMonth;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("malformed input: {0}")]
    MalformedInput(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to start worker pool: {0}")]
    Pool(String),
}

impl RunError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RunError::MalformedInput(_) | RunError::Config(_) => ErrorKind::MalformedInput,
            RunError::Pool(_) => ErrorKind::DataUnavailable,
        }
    }
}

// ─── Reports ────────────────────────────────────────────────────────

/// Indicators for one ticker. A failed fetch yields an all-insufficient
/// snapshot plus the failure instead of aborting the call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorReport {
    #[serde(flatten)]
    pub snapshot: IndicatorSnapshot,
    pub failed: Vec<TickerFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    #[serde(flatten)]
    pub prediction: Prediction,
    pub failed: Vec<TickerFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningReport {
    pub threshold: u8,
    pub results: Vec<ScreeningResult>,
    pub passed_count: usize,
    pub recommendations: Vec<Recommendation>,
    pub failed: Vec<TickerFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub period: Period,
    pub risk_free_rate: f64,
    pub metrics: Vec<PerformanceMetrics>,
    pub rolling_returns: Vec<RollingReturn>,
    pub correlations: Vec<CorrelationPair>,
    pub failed: Vec<TickerFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteReport {
    pub quotes: Vec<Quote>,
    pub count: usize,
    pub failed: Vec<TickerFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertReport {
    pub checked: usize,
    pub triggered: Vec<TriggeredAlert>,
    pub failed: Vec<TickerFailure>,
}

// ─── Engine ─────────────────────────────────────────────────────────

pub struct Engine {
    provider: Arc<dyn PriceProvider>,
    pool: BatchPool,
    retry: RetryPolicy,
    aggregator: SignalAggregator,
    config: EngineConfig,
    as_of: Option<NaiveDate>,
}

impl Engine {
    pub fn new(provider: Arc<dyn PriceProvider>, config: EngineConfig) -> Result<Self, RunError> {
        config.validate().map_err(ConfigError::Invalid)?;
        let aggregator =
            SignalAggregator::new(config.scoring.weights).map_err(ConfigError::Invalid)?;
        let pool = BatchPool::new(config.pool.workers).map_err(|e| RunError::Pool(e.to_string()))?;
        tracing::debug!(
            provider = provider.name(),
            workers = pool.workers(),
            "engine ready"
        );
        Ok(Self {
            provider,
            pool,
            retry: config.retry_policy(),
            aggregator,
            config,
            as_of: None,
        })
    }

    /// Pin the last date of every fetched range instead of using today.
    pub fn with_as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn end_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }

    fn fetch_series(&self, ticker: &str, period: Period) -> Result<PriceSeries, TickerFailure> {
        let end = self.end_date();
        let start = period.start_date(end);
        let bars = self
            .retry
            .run(ticker, || self.provider.fetch_bars(ticker, start, end))
            .map_err(|e| {
                tracing::warn!(ticker, provider = self.provider.name(), error = %e, "fetch failed");
                TickerFailure::new(ticker, e.kind(), e.to_string())
            })?;

        let series = PriceSeries::from_bars(ticker, &bars);
        if series.is_empty() {
            tracing::warn!(ticker, bars = bars.len(), "no usable closes");
            return Err(TickerFailure::new(
                ticker,
                ErrorKind::DataUnavailable,
                "no usable closes in price history",
            ));
        }
        Ok(series)
    }

    /// Profile lookup never fails a ticker; errors degrade to an empty profile.
    fn fetch_profile(&self, ticker: &str) -> TickerProfile {
        self.retry
            .run(ticker, || self.provider.fetch_profile(ticker))
            .unwrap_or_else(|e| {
                tracing::warn!(ticker, error = %e, "profile lookup failed");
                TickerProfile::default()
            })
    }

    fn single_ticker(ticker: &str) -> Result<String, InputError> {
        let mut list = normalize_tickers(&[ticker])?;
        list.pop().ok_or(InputError::EmptyTickerList)
    }

    /// Indicator snapshot for one ticker over a one-year history.
    pub fn indicators(&self, ticker: &str) -> Result<IndicatorReport, RunError> {
        let ticker = Self::single_ticker(ticker)?;
        let mut failed = Vec::new();
        let series = self
            .fetch_series(&ticker, SIGNAL_PERIOD)
            .unwrap_or_else(|f| {
                failed.push(f);
                PriceSeries::from_closes(ticker.as_str(), &[])
            });
        let snapshot = IndicatorSnapshot::compute(&series);
        tracing::info!(
            ticker = %ticker,
            data_points = snapshot.data_points,
            failed = failed.len(),
            "indicators complete"
        );
        Ok(IndicatorReport { snapshot, failed })
    }

    /// Composite prediction. A failed price fetch leaves the technical
    /// signal unavailable rather than failing the call.
    pub fn predict(
        &self,
        ticker: &str,
        context: &MarketContext,
    ) -> Result<PredictionReport, RunError> {
        let ticker = Self::single_ticker(ticker)?;
        let mut failed = Vec::new();
        let snapshot = match self.fetch_series(&ticker, SIGNAL_PERIOD) {
            Ok(series) => Some(IndicatorSnapshot::compute(&series)),
            Err(f) => {
                failed.push(f);
                None
            }
        };

        let prediction = self.aggregator.evaluate(&ticker, snapshot.as_ref(), context);
        let missing = prediction.breakdown.missing_sources();
        tracing::info!(
            ticker = %ticker,
            score = prediction.composite.score,
            direction = ?prediction.composite.direction,
            risk = ?prediction.composite.risk_level,
            missing = ?missing,
            "prediction complete"
        );
        Ok(PredictionReport { prediction, failed })
    }

    /// Screen a batch against `threshold` (config default when `None`).
    pub fn screen<S: AsRef<str>>(
        &self,
        tickers: &[S],
        threshold: Option<i64>,
    ) -> Result<ScreeningReport, RunError> {
        let tickers = normalize_tickers(tickers)?;
        let threshold = match threshold {
            Some(t) => Threshold::new(t)?,
            None => self.config.screening.threshold,
        };

        let mut batch = self.pool.run(&tickers, |ticker| {
            let series = self.fetch_series(ticker, SIGNAL_PERIOD)?;
            let profile = self.fetch_profile(ticker);
            Ok((IndicatorSnapshot::compute(&series), profile, series.last_close()))
        });
        let failed = batch.failures();

        let mut results = Vec::with_capacity(tickers.len());
        let mut recommendations = Vec::new();
        for ticker in &tickers {
            match batch.take(ticker) {
                Some(Ok((snapshot, profile, last_close))) => {
                    let name = profile.name.unwrap_or_else(|| ticker.clone());
                    let result =
                        ScreeningResult::evaluate(&snapshot, profile.trailing_pe, name, threshold);
                    if let Some(rec) = Recommendation::from_result(&result, last_close) {
                        recommendations.push(rec);
                    }
                    results.push(result);
                }
                _ => results.push(ScreeningResult::unavailable(ticker.as_str())),
            }
        }

        let passed_count = results.iter().filter(|r| r.passed).count();
        tracing::info!(
            tickers = tickers.len(),
            passed = passed_count,
            failed = failed.len(),
            threshold = threshold.value(),
            "screening complete"
        );
        Ok(ScreeningReport {
            threshold: threshold.value(),
            results,
            passed_count,
            recommendations,
            failed,
        })
    }

    /// Sharpe, drawdown, returns, rolling returns and correlations for up to
    /// 20 tickers. `period` and `risk_free_rate` fall back to the config.
    pub fn analyze_performance<S: AsRef<str>>(
        &self,
        tickers: &[S],
        period: Option<&str>,
        risk_free_rate: Option<f64>,
    ) -> Result<PerformanceReport, RunError> {
        let tickers = normalize_tickers(tickers)?;
        if tickers.len() > MAX_PERFORMANCE_TICKERS {
            return Err(InputError::TooManyTickers {
                count: tickers.len(),
                max: MAX_PERFORMANCE_TICKERS,
            }
            .into());
        }
        let period = match period {
            Some(p) => Period::parse_for_analytics(p)?,
            None => self.config.performance.period,
        };
        let risk_free_rate = validate_risk_free_rate(
            risk_free_rate.unwrap_or(self.config.performance.risk_free_rate),
        )?;

        // A series too short for returns keeps its metrics entry and is
        // also reported as failed.
        let mut batch = self.pool.run(&tickers, |ticker| {
            let series = self.fetch_series(ticker, period)?;
            let short = (series.len() < 2).then(|| {
                TickerFailure::new(
                    ticker,
                    ErrorKind::InsufficientHistory,
                    format!("{} price point(s), need at least 2", series.len()),
                )
            });
            let name = self
                .fetch_profile(ticker)
                .name
                .unwrap_or_else(|| ticker.to_string());
            Ok((TickerHistory { series, name }, short))
        });
        let mut failed = batch.failures();

        let mut histories: BTreeMap<String, TickerHistory> = BTreeMap::new();
        for ticker in &tickers {
            if let Some(Ok((history, short))) = batch.take(ticker) {
                failed.extend(short);
                histories.insert(ticker.clone(), history);
            }
        }
        failed.sort_by(|a, b| a.ticker.cmp(&b.ticker));

        let analysis = analytics::analyze(&tickers, &histories, risk_free_rate);
        tracing::info!(
            tickers = tickers.len(),
            analyzed = histories.len(),
            failed = failed.len(),
            period = %period,
            pairs = analysis.correlations.len(),
            "performance analysis complete"
        );
        Ok(PerformanceReport {
            period,
            risk_free_rate,
            metrics: analysis.metrics,
            rolling_returns: analysis.rolling_returns,
            correlations: analysis.correlations,
            failed,
        })
    }

    /// Latest price and day-over-day change per ticker.
    pub fn quotes<S: AsRef<str>>(&self, tickers: &[S]) -> Result<QuoteReport, RunError> {
        let tickers = normalize_tickers(tickers)?;
        let mut batch = self.pool.run(&tickers, |ticker| {
            let series = self.fetch_series(ticker, QUOTE_PERIOD)?;
            let name = self
                .fetch_profile(ticker)
                .name
                .unwrap_or_else(|| ticker.to_string());
            Ok(Quote::from_series(&series, name))
        });
        let failed = batch.failures();

        let quotes: Vec<Quote> = tickers
            .iter()
            .map(|t| match batch.take(t) {
                Some(Ok(q)) => q,
                _ => Quote::unavailable(t.as_str()),
            })
            .collect();
        let count = quotes.iter().filter(|q| q.price.is_some()).count();
        tracing::info!(tickers = tickers.len(), failed = failed.len(), "quotes complete");
        Ok(QuoteReport {
            quotes,
            count,
            failed,
        })
    }

    /// Fetch quotes for every alerted ticker and report the alerts whose
    /// trigger the current price crosses.
    pub fn check_alerts(&self, alerts: &[PriceAlert]) -> Result<AlertReport, RunError> {
        if alerts.is_empty() {
            return Ok(AlertReport {
                checked: 0,
                triggered: Vec::new(),
                failed: Vec::new(),
            });
        }
        let tickers = normalize_tickers(&alerts.iter().map(|a| &a.ticker).collect::<Vec<_>>())?;
        let alerts: Vec<PriceAlert> = alerts
            .iter()
            .map(|a| PriceAlert {
                ticker: a.ticker.trim().to_uppercase(),
                ..a.clone()
            })
            .collect();
        let report = self.quotes(&tickers)?;
        let triggered = check_price_alerts(&alerts, &report.quotes);
        tracing::info!(
            alerts = alerts.len(),
            triggered = triggered.len(),
            failed = report.failed.len(),
            "price alerts checked"
        );
        Ok(AlertReport {
            checked: alerts.len(),
            triggered,
            failed: report.failed,
        })
    }
}
