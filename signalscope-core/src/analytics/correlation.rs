//! Pairwise return correlation across tickers.
//!
//! Daily returns are truncated to their trailing common length, which must be
//! at least `MIN_OBSERVATIONS`. The matrix is symmetric with a unit diagonal;
//! only distinct upper-triangular pairs are emitted, and pairs involving a
//! zero-variance series are dropped.

use serde::{Deserialize, Serialize};

use super::metrics::MIN_OBSERVATIONS;
use crate::stats::{pearson, round_to};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub ticker_a: String,
    pub ticker_b: String,
    pub correlation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub tickers: Vec<String>,
    /// Row-major; `None` where the coefficient is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// `None` for fewer than two series or too short a common history.
    pub fn compute(series: &[(&str, &[f64])]) -> Option<Self> {
        if series.len() < 2 {
            return None;
        }
        let common = series.iter().map(|(_, r)| r.len()).min()?;
        if common < MIN_OBSERVATIONS {
            return None;
        }
        let aligned: Vec<&[f64]> = series.iter().map(|(_, r)| &r[r.len() - common..]).collect();

        let n = series.len();
        let mut values = vec![vec![None; n]; n];
        for i in 0..n {
            values[i][i] = Some(1.0);
            for j in (i + 1)..n {
                let r = pearson(aligned[i], aligned[j]).map(|r| round_to(r, 4));
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Some(Self {
            tickers: series.iter().map(|(t, _)| t.to_string()).collect(),
            values,
        })
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.tickers.iter().position(|t| t == a)?;
        let j = self.tickers.iter().position(|t| t == b)?;
        self.values[i][j]
    }

    /// Distinct pairs `i < j` with a defined coefficient.
    pub fn pairs(&self) -> Vec<CorrelationPair> {
        let n = self.tickers.len();
        let mut out = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if let Some(correlation) = self.values[i][j] {
                    out.push(CorrelationPair {
                        ticker_a: self.tickers[i].clone(),
                        ticker_b: self.tickers[j].clone(),
                        correlation,
                    });
                }
            }
        }
        out
    }
}

/// Upper-triangular pairs over the given return series; empty when the
/// matrix cannot be formed.
pub fn correlation_pairs(series: &[(&str, &[f64])]) -> Vec<CorrelationPair> {
    CorrelationMatrix::compute(series)
        .map(|m| m.pairs())
        .unwrap_or_default()
}
