//! Trailing-window returns.

use serde::{Deserialize, Serialize};

use crate::stats::round_to;

/// Window label and length in trading days.
pub const WINDOWS: [(&str, usize); 4] = [("1M", 21), ("3M", 63), ("6M", 126), ("12M", 252)];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingReturn {
    pub ticker: String,
    pub window: String,
    /// Percent, 2 decimals. `None` when history is shorter than the window.
    pub value: Option<f64>,
}

/// `p[-1] / p[-(w+1)] - 1` as a fraction, or `None` without `w + 1` prices.
pub fn trailing_return(prices: &[f64], window: usize) -> Option<f64> {
    if window == 0 || prices.len() < window + 1 {
        return None;
    }
    let last = prices[prices.len() - 1];
    let base = prices[prices.len() - 1 - window];
    Some(last / base - 1.0)
}

/// One entry per standard window; windows are independent of each other.
pub fn rolling_returns(ticker: &str, prices: &[f64]) -> Vec<RollingReturn> {
    WINDOWS
        .iter()
        .map(|&(label, days)| RollingReturn {
            ticker: ticker.to_string(),
            window: label.to_string(),
            value: trailing_return(prices, days).map(|r| round_to(r * 100.0, 2)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_history_nulls_long_windows_only() {
        let prices: Vec<f64> = (0..70).map(|i| 100.0 + i as f64).collect();
        let r = rolling_returns("T", &prices);
        assert_eq!(r.len(), 4);
        assert!(r[0].value.is_some());
        assert!(r[1].value.is_some());
        assert_eq!(r[2].value, None);
        assert_eq!(r[3].value, None);
        assert_eq!(r[0].window, "1M");
    }

    #[test]
    fn one_month_return() {
        let mut prices = vec![100.0; 21];
        prices.push(110.0);
        let r = rolling_returns("T", &prices);
        assert_eq!(r[0].value, Some(10.0));
    }

    #[test]
    fn exact_window_boundary() {
        assert_eq!(trailing_return(&[1.0; 21], 21), None);
        assert_eq!(trailing_return(&[1.0; 22], 21), Some(0.0));
    }
}
