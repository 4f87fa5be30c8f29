//! Loading of caller-supplied JSON inputs: market context, scenario
//! mappings and price alerts.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use signalscope_core::alerts::PriceAlert;
use signalscope_core::domain::MarketContext;
use signalscope_core::scenario::ScenarioMapping;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn parse_context(json: &str) -> Result<MarketContext, ContextError> {
    Ok(serde_json::from_str(json)?)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ContextError> {
    let text = std::fs::read_to_string(path).map_err(|source| ContextError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

pub fn load_context(path: &Path) -> Result<MarketContext, ContextError> {
    let context: MarketContext = read_json(path)?;
    tracing::debug!(
        path = %path.display(),
        macro_history = context.macro_history.as_ref().map_or(0, Vec::len),
        sentiment = context.sentiment.as_ref().map_or(0, Vec::len),
        geopolitical = context.geopolitical.as_ref().map_or(0, Vec::len),
        "loaded market context"
    );
    Ok(context)
}

/// A JSON array of `{scenario, tickers, rationale}` objects.
pub fn load_scenarios(path: &Path) -> Result<Vec<ScenarioMapping>, ContextError> {
    let mappings: Vec<ScenarioMapping> = read_json(path)?;
    tracing::debug!(path = %path.display(), scenarios = mappings.len(), "loaded scenarios");
    Ok(mappings)
}

/// A JSON array of `{ticker, kind, trigger_price}` objects.
pub fn load_price_alerts(path: &Path) -> Result<Vec<PriceAlert>, ContextError> {
    let alerts: Vec<PriceAlert> = read_json(path)?;
    tracing::debug!(path = %path.display(), alerts = alerts.len(), "loaded price alerts");
    Ok(alerts)
}
