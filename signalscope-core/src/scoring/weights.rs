//! Weights for combining the five composite signals.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

const SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub technical: f64,
    #[serde(rename = "macro")]
    pub macro_weight: f64,
    pub sentiment: f64,
    pub currency: f64,
    pub geopolitical: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            technical: 0.30,
            macro_weight: 0.25,
            sentiment: 0.20,
            currency: 0.15,
            geopolitical: 0.10,
        }
    }
}

impl ScoreWeights {
    /// Weights in breakdown order: technical, macro, sentiment, currency,
    /// geopolitical.
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.technical,
            self.macro_weight,
            self.sentiment,
            self.currency,
            self.geopolitical,
        ]
    }

    /// Every weight finite and non-negative, summing to 1.
    pub fn validate(&self) -> Result<(), InputError> {
        let weights = self.as_array();
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(InputError::InvalidWeights(format!(
                "weight {w} is negative or not finite"
            )));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(InputError::InvalidWeights(format!(
                "weights sum to {sum}, expected 1.0"
            )));
        }
        Ok(())
    }
}
