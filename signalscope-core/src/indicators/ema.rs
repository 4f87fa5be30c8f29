//! Exponential Moving Average (EMA).
//!
//! Seeded with the SMA of the first `period` values, then
//! ema[t] = value[t] * k + ema[t-1] * (1 - k), with k = 2 / (period + 1).

/// EMA series starting at the seed: `len - period + 1` values, oldest first.
/// Empty when the input is shorter than `period`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    let k = 2.0 / (period as f64 + 1.0);
    let seed = values[..period].iter().sum::<f64>() / period as f64;

    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(seed);
    let mut prev = seed;
    for &v in &values[period..] {
        prev = v * k + prev * (1.0 - k);
        out.push(prev);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn ema_seed_is_sma() {
        let result = ema_series(&[10.0, 20.0, 30.0, 40.0], 3);
        assert_eq!(result.len(), 2);
        assert_approx(result[0], 20.0, DEFAULT_EPSILON);
        // k = 0.5: 40 * 0.5 + 20 * 0.5 = 30
        assert_approx(result[1], 30.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_constant_series() {
        let result = ema_series(&[50.0; 10], 4);
        assert!(result.iter().all(|&v| (v - 50.0).abs() < DEFAULT_EPSILON));
    }

    #[test]
    fn ema_too_short() {
        assert!(ema_series(&[1.0, 2.0], 3).is_empty());
        assert!(ema_series(&[1.0, 2.0], 0).is_empty());
    }
}
