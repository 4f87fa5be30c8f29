//! Yahoo Finance price provider.
//!
//! Daily bars come from the v8 chart API; name and trailing P/E from the v7
//! quote API. Each call makes exactly one HTTP request and classifies the
//! outcome into a `DataError`, so the engine's retry policy decides what to
//! do with a 429.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. The CSV provider is the fallback when Yahoo is unavailable.

use std::time::Duration;

use chrono::{Days, NaiveDate, NaiveTime};
use serde::Deserialize;
use signalscope_core::domain::PriceBar;

use super::{DataError, PriceProvider, TickerProfile};

const CHART_BASE: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const QUOTE_BASE: &str = "https://query2.finance.yahoo.com/v7/finance/quote";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

// ─── Chart API response ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

// ─── Quote API response ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    quote_response: QuoteResult,
}

#[derive(Debug, Deserialize)]
struct QuoteResult {
    result: Vec<QuoteSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummary {
    short_name: Option<String>,
    long_name: Option<String>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<f64>,
}

/// Yahoo Finance price provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    /// Build a provider whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Build the chart API URL for a ticker and inclusive date range.
    fn chart_url(ticker: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let end_ts = (end + Days::new(1)).and_time(NaiveTime::MIN).and_utc().timestamp() - 1;
        format!(
            "{CHART_BASE}/{ticker}?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true"
        )
    }

    fn quote_url(ticker: &str) -> String {
        format!("{QUOTE_BASE}?symbols={ticker}")
    }

    /// Parse the chart API response into bars.
    fn parse_chart(ticker: &str, resp: ChartResponse) -> Result<Vec<PriceBar>, DataError> {
        let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            },
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::ResponseFormatChanged("empty result with no error".into()),
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data.timestamp.ok_or_else(|| DataError::EmptySeries {
            symbol: ticker.to_string(),
        })?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let open = quote.open.get(i).copied().flatten();
            let high = quote.high.get(i).copied().flatten();
            let low = quote.low.get(i).copied().flatten();
            let close = quote.close.get(i).copied().flatten();
            let volume = quote.volume.get(i).copied().flatten();

            // Holidays come back as all-null rows
            if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
                continue;
            }

            bars.push(PriceBar {
                date,
                open: open.unwrap_or(f64::NAN),
                high: high.unwrap_or(f64::NAN),
                low: low.unwrap_or(f64::NAN),
                close: close.unwrap_or(f64::NAN),
                volume: volume.unwrap_or(0),
            });
        }

        if bars.is_empty() {
            return Err(DataError::EmptySeries {
                symbol: ticker.to_string(),
            });
        }
        Ok(bars)
    }

    fn parse_quote(ticker: &str, resp: QuoteResponse) -> Result<TickerProfile, DataError> {
        let summary = resp
            .quote_response
            .result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            })?;
        Ok(TickerProfile {
            name: summary
                .short_name
                .or(summary.long_name)
                .filter(|n| !n.is_empty()),
            trailing_pe: summary.trailing_pe.filter(|p| p.is_finite()),
        })
    }

    /// One GET, with the status and transport errors classified.
    fn get(&self, ticker: &str, url: &str) -> Result<reqwest::blocking::Response, DataError> {
        let resp = self.client.get(url).send().map_err(classify_transport)?;
        let status = resp.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {ticker}")));
        }
        Ok(resp)
    }
}

fn classify_transport(e: reqwest::Error) -> DataError {
    if e.is_timeout() {
        DataError::Timeout(e.to_string())
    } else if e.is_connect() {
        DataError::NetworkUnreachable(e.to_string())
    } else {
        DataError::Other(e.to_string())
    }
}

impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError> {
        let resp = self.get(ticker, &Self::chart_url(ticker, start, end))?;
        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse chart for {ticker}: {e}"))
        })?;
        Self::parse_chart(ticker, chart)
    }

    fn fetch_profile(&self, ticker: &str) -> Result<TickerProfile, DataError> {
        let resp = self.get(ticker, &Self::quote_url(ticker))?;
        let quote: QuoteResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse quote for {ticker}: {e}"))
        })?;
        Self::parse_quote(ticker, quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_url_covers_whole_end_day() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let url = YahooProvider::chart_url("AAPL", start, end);
        assert!(url.starts_with(
            "https://query2.finance.yahoo.com/v8/finance/chart/AAPL?period1=1704153600"
        ));
        assert!(url.contains("period2=1704326399"));
        assert!(url.contains("interval=1d"));
    }

    #[test]
    fn parses_chart_and_skips_holidays() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704205800, 1704292200, 1704378600],
                    "indicators": {
                        "quote": [{
                            "open":   [187.15, null, 184.22],
                            "high":   [188.44, null, 185.88],
                            "low":    [183.89, null, 183.43],
                            "close":  [185.64, null, 184.25],
                            "volume": [82488700, null, 58414500]
                        }]
                    }
                }],
                "error": null
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        let bars = YahooProvider::parse_chart("AAPL", resp).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 185.64);
        assert_eq!(bars[1].volume, 58_414_500);
    }

    #[test]
    fn not_found_maps_to_symbol_not_found() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            YahooProvider::parse_chart("ZZZZ", resp).unwrap_err(),
            DataError::SymbolNotFound {
                symbol: "ZZZZ".into()
            }
        );
    }

    #[test]
    fn missing_timestamps_is_empty_series() {
        let json = r#"{
            "chart": {
                "result": [{ "indicators": { "quote": [{
                    "open": [], "high": [], "low": [], "close": [], "volume": []
                }] } }],
                "error": null
            }
        }"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            YahooProvider::parse_chart("NEW", resp),
            Err(DataError::EmptySeries { .. })
        ));
    }

    #[test]
    fn parses_quote_profile() {
        let json = r#"{
            "quoteResponse": {
                "result": [{ "shortName": "Apple Inc.", "trailingPE": 29.4 }],
                "error": null
            }
        }"#;
        let resp: QuoteResponse = serde_json::from_str(json).unwrap();
        let profile = YahooProvider::parse_quote("AAPL", resp).unwrap();
        assert_eq!(profile.name.as_deref(), Some("Apple Inc."));
        assert_eq!(profile.trailing_pe, Some(29.4));
    }

    #[test]
    fn empty_quote_result_is_not_found() {
        let resp: QuoteResponse =
            serde_json::from_str(r#"{ "quoteResponse": { "result": [] } }"#).unwrap();
        assert!(matches!(
            YahooProvider::parse_quote("ZZZZ", resp),
            Err(DataError::SymbolNotFound { .. })
        ));
    }
}
