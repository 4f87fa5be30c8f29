//! Engine configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration:
//!
//! ```toml
//! [pool]
//! workers = 8
//!
//! [fetch]
//! max_attempts = 3
//! retry_delay_ms = 5000
//! timeout_secs = 30
//!
//! [scoring.weights]
//! technical = 0.30
//! macro = 0.25
//! sentiment = 0.20
//! currency = 0.15
//! geopolitical = 0.10
//!
//! [screening]
//! threshold = 60
//!
//! [performance]
//! period = "1y"
//! risk_free_rate = 0.035
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use signalscope_core::domain::Period;
use signalscope_core::scoring::ScoreWeights;
use signalscope_core::screening::Threshold;
use signalscope_core::InputError;
use thiserror::Error;

use crate::pool::DEFAULT_WORKERS;
use crate::retry::RetryPolicy;

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.035;
pub const MAX_RISK_FREE_RATE: f64 = 0.2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] InputError),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub pool: PoolConfig,
    pub fetch: FetchConfig,
    pub scoring: ScoringConfig,
    pub screening: ScreeningConfig,
    pub performance: PerformanceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub workers: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_ms: 5_000,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    pub threshold: Threshold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub period: Period,
    pub risk_free_rate: f64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            period: Period::OneYear,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }
}

/// Risk-free rate must be finite and within `0.0..=0.2`.
pub fn validate_risk_free_rate(rate: f64) -> Result<f64, InputError> {
    if rate.is_finite() && (0.0..=MAX_RISK_FREE_RATE).contains(&rate) {
        Ok(rate)
    } else {
        Err(InputError::RiskFreeRateOutOfRange(rate))
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), InputError> {
        self.scoring.weights.validate()?;
        if !Period::ANALYTICS.contains(&self.performance.period) {
            return Err(InputError::UnsupportedPeriod(
                self.performance.period.as_str().to_string(),
            ));
        }
        validate_risk_free_rate(self.performance.risk_free_rate)?;
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.fetch.max_attempts,
            Duration::from_millis(self.fetch.retry_delay_ms),
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_secs)
    }
}
