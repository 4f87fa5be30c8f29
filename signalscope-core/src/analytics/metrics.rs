//! Per-ticker performance metrics — pure functions over a price series.
//!
//! Percent-valued metrics are rounded to 2 decimals; the Sharpe ratio and the
//! drawdown ratio to 4. Every metric is `None` when its minimum sample is not
//! met.

use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;
use crate::stats::{mean, round_to, sample_std_dev};

pub const TRADING_DAYS: f64 = 252.0;

/// Minimum number of daily returns for Sharpe and volatility.
pub const MIN_OBSERVATIONS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub ticker: String,
    pub name: String,
    pub sharpe_ratio: Option<f64>,
    /// Maximum drawdown in percent.
    pub mdd: Option<f64>,
    /// Maximum drawdown as a ratio, always ≤ 0.
    pub mdd_ratio: Option<f64>,
    pub annualized_return: Option<f64>,
    pub volatility: Option<f64>,
    pub total_return: Option<f64>,
    pub data_points: usize,
}

impl PerformanceMetrics {
    /// All-null entry for a ticker whose history could not be fetched.
    pub fn unavailable(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: String::new(),
            sharpe_ratio: None,
            mdd: None,
            mdd_ratio: None,
            annualized_return: None,
            volatility: None,
            total_return: None,
            data_points: 0,
        }
    }

    pub fn compute(series: &PriceSeries, risk_free_rate: f64, name: impl Into<String>) -> Self {
        let prices = series.closes();
        let returns = series.daily_returns();
        let drawdown = max_drawdown(prices);
        Self {
            ticker: series.ticker().to_string(),
            name: name.into(),
            sharpe_ratio: sharpe_ratio(&returns, risk_free_rate),
            mdd: drawdown.map(|d| d.percent),
            mdd_ratio: drawdown.map(|d| d.ratio),
            annualized_return: annualized_return(prices).map(|r| round_to(r * 100.0, 2)),
            volatility: volatility(&returns).map(|v| round_to(v * 100.0, 2)),
            total_return: total_return(prices).map(|r| round_to(r * 100.0, 2)),
            data_points: prices.len(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.data_points == 0
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Daily returns `p[t]/p[t-1] - 1`.
pub fn daily_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Annualized Sharpe ratio from daily returns.
///
/// Sharpe = mean(r - rf/252) / std(r - rf/252, ddof=1) * sqrt(252).
/// `None` below 20 returns or for zero excess-return variance.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> Option<f64> {
    if returns.len() < MIN_OBSERVATIONS {
        return None;
    }
    let daily_rf = risk_free_rate / TRADING_DAYS;
    let excess: Vec<f64> = returns.iter().map(|r| r - daily_rf).collect();
    let std = sample_std_dev(&excess);
    if !std.is_finite() || std < 1e-15 {
        return None;
    }
    Some(round_to(mean(&excess) / std * TRADING_DAYS.sqrt(), 4))
}

/// Maximum drawdown reported both ways.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drawdown {
    /// Most negative `(price - peak) / peak`, 4 decimals.
    pub ratio: f64,
    /// Same in percent, 2 decimals.
    pub percent: f64,
}

/// `None` below two prices.
pub fn max_drawdown(prices: &[f64]) -> Option<Drawdown> {
    if prices.len() < 2 {
        return None;
    }
    let mut peak = prices[0];
    let mut max_dd = 0.0_f64;
    for &p in prices {
        if p > peak {
            peak = p;
        }
        let dd = (p - peak) / peak;
        if dd < max_dd {
            max_dd = dd;
        }
    }
    Some(Drawdown {
        ratio: round_to(max_dd, 4),
        percent: round_to(max_dd * 100.0, 2),
    })
}

/// Total return as a fraction. `None` below two prices.
pub fn total_return(prices: &[f64]) -> Option<f64> {
    match (prices.first(), prices.last()) {
        (Some(&first), Some(&last)) if prices.len() >= 2 => Some(last / first - 1.0),
        _ => None,
    }
}

/// `(1 + total)^(252/n) - 1` as a fraction, `n` = number of prices.
/// `None` when the total return is -100% or worse.
pub fn annualized_return(prices: &[f64]) -> Option<f64> {
    let total = total_return(prices)?;
    if total <= -1.0 {
        return None;
    }
    let exponent = TRADING_DAYS / prices.len() as f64;
    let annualized = (1.0 + total).powf(exponent) - 1.0;
    annualized.is_finite().then_some(annualized)
}

/// Annualized standard deviation of daily returns as a fraction.
/// `None` below 20 returns.
pub fn volatility(returns: &[f64]) -> Option<f64> {
    if returns.len() < MIN_OBSERVATIONS {
        return None;
    }
    Some(sample_std_dev(returns) * TRADING_DAYS.sqrt())
}
