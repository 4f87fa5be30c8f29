//! Performance analytics over a batch of price series.
//!
//! `analyze` takes whatever histories were fetched and produces one metrics
//! entry per requested ticker, in request order. Tickers without a history
//! get an all-null entry, no rolling returns, and stay out of the
//! correlation matrix.

pub mod correlation;
pub mod metrics;
pub mod rolling;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;

pub use correlation::{correlation_pairs, CorrelationMatrix, CorrelationPair};
pub use metrics::{Drawdown, PerformanceMetrics, MIN_OBSERVATIONS, TRADING_DAYS};
pub use rolling::{rolling_returns, RollingReturn};

/// A fetched price series with the display name that came with it.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerHistory {
    pub series: PriceSeries,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAnalysis {
    pub metrics: Vec<PerformanceMetrics>,
    pub rolling_returns: Vec<RollingReturn>,
    pub correlations: Vec<CorrelationPair>,
}

pub fn analyze(
    tickers: &[String],
    histories: &BTreeMap<String, TickerHistory>,
    risk_free_rate: f64,
) -> PerformanceAnalysis {
    let mut metrics = Vec::with_capacity(tickers.len());
    let mut rolling = Vec::new();
    let mut returns: Vec<(&str, Vec<f64>)> = Vec::new();

    for ticker in tickers {
        match histories.get(ticker) {
            Some(h) => {
                metrics.push(PerformanceMetrics::compute(
                    &h.series,
                    risk_free_rate,
                    h.name.clone(),
                ));
                rolling.extend(rolling_returns(ticker, h.series.closes()));
                returns.push((ticker.as_str(), h.series.daily_returns()));
            }
            None => metrics.push(PerformanceMetrics::unavailable(ticker.as_str())),
        }
    }

    let views: Vec<(&str, &[f64])> = returns.iter().map(|(t, r)| (*t, r.as_slice())).collect();

    PerformanceAnalysis {
        metrics,
        rolling_returns: rolling,
        correlations: correlation_pairs(&views),
    }
}
