//! Export of reports as JSON and CSV.
//!
//! Null values become empty CSV cells. Enum labels match their JSON form.

use anyhow::{Context, Result};
use serde::Serialize;
use signalscope_core::analytics::PerformanceMetrics;
use signalscope_core::screening::ScreeningResult;

// ─── JSON export ────────────────────────────────────────────────────

pub fn export_json<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

fn cell(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Serialized label of a unit enum variant (e.g. `BULLISH_CROSSOVER`).
fn label<T: Serialize>(v: Option<&T>) -> String {
    v.and_then(|v| serde_json::to_value(v).ok())
        .and_then(|j| j.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Columns: ticker, name, composite_score, passed, rsi, macd_signal,
/// bb_signal, sma_signal, per
pub fn export_screening_csv(results: &[ScreeningResult]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "ticker",
        "name",
        "composite_score",
        "passed",
        "rsi",
        "macd_signal",
        "bb_signal",
        "sma_signal",
        "per",
    ])?;

    for r in results {
        wtr.write_record([
            r.ticker.clone(),
            r.name.clone(),
            r.composite_score.to_string(),
            r.passed.to_string(),
            cell(r.rsi),
            label(r.macd_signal.as_ref()),
            label(r.bb_signal.as_ref()),
            label(r.sma_signal.as_ref()),
            cell(r.per),
        ])?;
    }
    finish(wtr)
}

/// Columns: ticker, name, sharpe_ratio, mdd, mdd_ratio, annualized_return,
/// volatility, total_return, data_points
pub fn export_metrics_csv(metrics: &[PerformanceMetrics]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "ticker",
        "name",
        "sharpe_ratio",
        "mdd",
        "mdd_ratio",
        "annualized_return",
        "volatility",
        "total_return",
        "data_points",
    ])?;

    for m in metrics {
        wtr.write_record([
            m.ticker.clone(),
            m.name.clone(),
            cell(m.sharpe_ratio),
            cell(m.mdd),
            cell(m.mdd_ratio),
            cell(m.annualized_return),
            cell(m.volatility),
            cell(m.total_return),
            m.data_points.to_string(),
        ])?;
    }
    finish(wtr)
}
