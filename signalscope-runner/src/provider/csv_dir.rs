//! CSV directory provider.
//!
//! Reads `<dir>/<TICKER>.csv` with a `date,open,high,low,close,volume`
//! header (dates as YYYY-MM-DD). Profiles come from an optional
//! `<dir>/profiles.csv` with `ticker,name,trailing_pe` columns.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use signalscope_core::domain::ticker::is_safe_symbol;
use signalscope_core::domain::PriceBar;

use super::{DataError, PriceProvider, TickerProfile};

const PROFILES_FILE: &str = "profiles.csv";

#[derive(Debug, Deserialize)]
struct ProfileRow {
    ticker: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    trailing_pe: Option<f64>,
}

pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn bars_path(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }

    fn read_bars(path: &Path, ticker: &str) -> Result<Vec<PriceBar>, DataError> {
        let mut reader = ::csv::Reader::from_path(path).map_err(|e| DataError::Io(e.to_string()))?;
        reader
            .deserialize::<PriceBar>()
            .map(|row| {
                row.map_err(|e| {
                    DataError::ResponseFormatChanged(format!("{ticker}: bad CSV row: {e}"))
                })
            })
            .collect()
    }
}

impl PriceProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError> {
        let path = self.bars_path(ticker);
        if !is_safe_symbol(ticker) || !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            });
        }
        let bars: Vec<PriceBar> = Self::read_bars(&path, ticker)?
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();
        if bars.is_empty() {
            return Err(DataError::EmptySeries {
                symbol: ticker.to_string(),
            });
        }
        Ok(bars)
    }

    fn fetch_profile(&self, ticker: &str) -> Result<TickerProfile, DataError> {
        let path = self.dir.join(PROFILES_FILE);
        if !path.exists() {
            return Ok(TickerProfile::default());
        }
        let mut reader =
            ::csv::Reader::from_path(&path).map_err(|e| DataError::Io(e.to_string()))?;
        for row in reader.deserialize::<ProfileRow>() {
            let row = row.map_err(|e| {
                DataError::ResponseFormatChanged(format!("{PROFILES_FILE}: bad row: {e}"))
            })?;
            if row.ticker.eq_ignore_ascii_case(ticker) {
                return Ok(TickerProfile {
                    name: row.name.filter(|n| !n.is_empty()),
                    trailing_pe: row.trailing_pe,
                });
            }
        }
        Ok(TickerProfile::default())
    }
}
