//! Simple Moving Average (SMA).
//!
//! Arithmetic mean of the trailing `period` closes.
//! Uses a running sum for O(n) computation.

/// SMA for every full window: `len - period + 1` values, oldest first.
/// Empty when the series is shorter than `period`.
pub fn sma_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(values.len() - period + 1);
    let mut sum: f64 = values[..period].iter().sum();
    out.push(sum / period as f64);
    for i in period..values.len() {
        sum += values[i] - values[i - period];
        out.push(sum / period as f64);
    }
    out
}

/// SMA of the trailing window, or `None` if fewer than `period` values.
pub fn sma_last(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}
