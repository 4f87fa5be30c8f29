use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Days, NaiveDate};
use signalscope_core::alerts::{AlertKind, PriceAlert};
use signalscope_core::domain::{MarketContext, PriceBar};
use signalscope_core::indicators::{BandSignal, MacdSignal};
use signalscope_core::{ErrorKind, InputError};
use signalscope_runner::{
    DataError, Engine, EngineConfig, PriceProvider, RunError, TickerProfile,
};

// ─── Scripted provider ──────────────────────────────────────────────

#[derive(Clone)]
enum Script {
    Bars(Vec<f64>),
    RateLimitedThen { failures: u32, closes: Vec<f64> },
    Fail(DataError),
}

#[derive(Default)]
struct ScriptedProvider {
    scripts: HashMap<String, Script>,
    profiles: HashMap<String, Result<TickerProfile, DataError>>,
    calls: Mutex<HashMap<String, u32>>,
}

impl ScriptedProvider {
    fn with(mut self, ticker: &str, script: Script) -> Self {
        self.scripts.insert(ticker.to_string(), script);
        self
    }

    fn with_profile(mut self, ticker: &str, profile: Result<TickerProfile, DataError>) -> Self {
        self.profiles.insert(ticker.to_string(), profile);
        self
    }

    fn calls(&self, ticker: &str) -> u32 {
        self.calls.lock().unwrap().get(ticker).copied().unwrap_or(0)
    }

    fn total_calls(&self) -> u32 {
        self.calls.lock().unwrap().values().sum()
    }
}

fn to_bars(closes: &[f64]) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceBar {
            date: start + Days::new(i as u64),
            open: c,
            high: c,
            low: c,
            close: c,
            volume: 1_000,
        })
        .collect()
}

impl PriceProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch_bars(
        &self,
        ticker: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            let n = calls.entry(ticker.to_string()).or_insert(0);
            *n += 1;
            *n
        };
        match self.scripts.get(ticker) {
            Some(Script::Bars(closes)) => Ok(to_bars(closes)),
            Some(Script::RateLimitedThen { failures, closes }) => {
                if call <= *failures {
                    Err(DataError::RateLimited {
                        retry_after_secs: 1,
                    })
                } else {
                    Ok(to_bars(closes))
                }
            }
            Some(Script::Fail(e)) => Err(e.clone()),
            None => Err(DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            }),
        }
    }

    fn fetch_profile(&self, ticker: &str) -> Result<TickerProfile, DataError> {
        self.profiles
            .get(ticker)
            .cloned()
            .unwrap_or_else(|| Ok(TickerProfile::default()))
    }
}

fn wave(n: usize, phase: f64, drift: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + 8.0 * (t * 0.13 + phase).sin() + 3.0 * (t * 0.41 + 2.0 * phase).cos() + drift * t
        })
        .collect()
}

fn test_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.pool.workers = 4;
    config.fetch.retry_delay_ms = 0;
    config
}

fn engine(provider: &Arc<ScriptedProvider>) -> Engine {
    let dyn_provider: Arc<dyn PriceProvider> = provider.clone();
    Engine::new(dyn_provider, test_config())
        .unwrap()
        .with_as_of(NaiveDate::from_ymd_opt(2024, 6, 28).unwrap())
}

// ─── Batch partial failure ──────────────────────────────────────────

#[test]
fn performance_batch_with_one_missing_ticker() {
    let provider = Arc::new(
        ScriptedProvider::default()
            .with("AAA", Script::Bars(wave(260, 0.0, 0.05)))
            .with("BBB", Script::Bars(wave(260, 0.7, -0.02)))
            .with("DDD", Script::Bars(wave(260, 1.9, 0.10)))
            .with("EEE", Script::Bars(wave(260, 2.6, 0.00))),
    );
    let report = engine(&provider)
        .analyze_performance(&["AAA", "BBB", "CCC", "DDD", "EEE"], Some("1y"), Some(0.03))
        .unwrap();

    assert_eq!(report.metrics.len(), 5);
    let order: Vec<&str> = report.metrics.iter().map(|m| m.ticker.as_str()).collect();
    assert_eq!(order, ["AAA", "BBB", "CCC", "DDD", "EEE"]);

    let ccc = &report.metrics[2];
    assert!(ccc.is_unavailable());
    assert!(ccc.sharpe_ratio.is_none() && ccc.mdd.is_none() && ccc.total_return.is_none());
    assert!(report.metrics.iter().filter(|m| m.ticker != "CCC").all(|m| m.sharpe_ratio.is_some()));

    assert_eq!(report.correlations.len(), 6);
    assert!(report
        .correlations
        .iter()
        .all(|p| p.ticker_a != "CCC" && p.ticker_b != "CCC" && p.ticker_a != p.ticker_b));
    assert!(report.rolling_returns.iter().all(|r| r.ticker != "CCC"));

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].ticker, "CCC");
    assert_eq!(report.failed[0].kind, ErrorKind::DataUnavailable);
}

#[test]
fn single_point_series_is_insufficient_history() {
    let provider = Arc::new(
        ScriptedProvider::default()
            .with("ONE", Script::Bars(vec![42.0]))
            .with("AAA", Script::Bars(wave(100, 0.0, 0.05))),
    );
    let report = engine(&provider)
        .analyze_performance(&["ONE", "AAA"], None, None)
        .unwrap();
    let one = &report.metrics[0];
    assert_eq!(one.ticker, "ONE");
    assert_eq!(one.name, "ONE");
    assert_eq!(one.data_points, 1);
    assert!(!one.is_unavailable());
    assert!(one.sharpe_ratio.is_none() && one.mdd.is_none() && one.total_return.is_none());
    assert!(one.annualized_return.is_none() && one.volatility.is_none());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].ticker, "ONE");
    assert_eq!(report.failed[0].kind, ErrorKind::InsufficientHistory);
    assert!(report.correlations.is_empty());
}

// ─── Single-ticker calls ────────────────────────────────────────────

#[test]
fn indicators_survive_missing_prices() {
    let provider = Arc::new(ScriptedProvider::default());
    let report = engine(&provider).indicators("gone").unwrap();
    assert_eq!(report.snapshot.ticker, "GONE");
    assert_eq!(report.snapshot.data_points, 0);
    assert!(report.snapshot.rsi.value.is_none());
    assert_eq!(report.snapshot.macd.signal, MacdSignal::InsufficientData);
    assert_eq!(report.snapshot.bollinger.signal, BandSignal::InsufficientData);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].kind, ErrorKind::DataUnavailable);
}

// ─── Price alerts ───────────────────────────────────────────────────

#[test]
fn alerts_trigger_on_latest_close() {
    // last close 100.0 for both tickers
    let provider = Arc::new(
        ScriptedProvider::default()
            .with("AAA", Script::Bars(vec![90.0, 100.0]))
            .with("BBB", Script::Bars(vec![110.0, 100.0])),
    );
    let alerts = vec![
        PriceAlert::new("aaa", AlertKind::TargetPrice, 100.0),
        PriceAlert::new("BBB", AlertKind::StopLoss, 99.99),
        PriceAlert::new("BBB", AlertKind::TargetPrice, 100.0),
        PriceAlert::new("ZZZ", AlertKind::StopLoss, 1_000.0),
    ];
    let report = engine(&provider).check_alerts(&alerts).unwrap();
    assert_eq!(report.checked, 4);
    let fired: Vec<(&str, AlertKind)> = report
        .triggered
        .iter()
        .map(|t| (t.alert.ticker.as_str(), t.alert.kind))
        .collect();
    assert_eq!(fired, [("AAA", AlertKind::TargetPrice), ("BBB", AlertKind::TargetPrice)]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].ticker, "ZZZ");
}

// ─── Retry semantics ────────────────────────────────────────────────

#[test]
fn rate_limited_fetch_is_retried_then_succeeds() {
    let provider = Arc::new(ScriptedProvider::default().with(
        "AAA",
        Script::RateLimitedThen {
            failures: 2,
            closes: wave(80, 0.0, 0.05),
        },
    ));
    let report = engine(&provider).quotes(&["AAA"]).unwrap();
    assert!(report.failed.is_empty());
    assert_eq!(report.count, 1);
    assert_eq!(provider.calls("AAA"), 3);
}

#[test]
fn exhausted_retries_become_data_unavailable() {
    let provider = Arc::new(ScriptedProvider::default().with(
        "AAA",
        Script::RateLimitedThen {
            failures: u32::MAX,
            closes: vec![],
        },
    ));
    let report = engine(&provider).quotes(&["AAA"]).unwrap();
    assert_eq!(provider.calls("AAA"), 3);
    assert_eq!(report.count, 0);
    assert_eq!(report.quotes[0].price, None);
    assert_eq!(report.failed[0].kind, ErrorKind::DataUnavailable);
    assert!(report.failed[0].reason.contains("3 attempts"));
}

#[test]
fn non_rate_limit_errors_are_not_retried() {
    let provider = Arc::new(
        ScriptedProvider::default()
            .with("SLOW", Script::Fail(DataError::Timeout("30s".into())))
            .with(
                "GONE",
                Script::Fail(DataError::SymbolNotFound {
                    symbol: "GONE".into(),
                }),
            ),
    );
    let report = engine(&provider).quotes(&["SLOW", "GONE"]).unwrap();
    assert_eq!(provider.calls("SLOW"), 1);
    assert_eq!(provider.calls("GONE"), 1);
    assert_eq!(report.failed.len(), 2);
    assert!(report
        .failed
        .iter()
        .all(|f| f.kind == ErrorKind::DataUnavailable));
}

// ─── Malformed input ────────────────────────────────────────────────

#[test]
fn malformed_input_aborts_before_any_fetch() {
    let provider = Arc::new(ScriptedProvider::default());
    let engine = engine(&provider);
    let empty: [&str; 0] = [];

    let cases: Vec<Result<(), RunError>> = vec![
        engine.screen(&empty, None).map(|_| ()),
        engine.screen(&["AAA", " "], None).map(|_| ()),
        engine.screen(&["AAA"], Some(101)).map(|_| ()),
        engine.screen(&["AAA"], Some(-1)).map(|_| ()),
        engine
            .analyze_performance(&["AAA"], Some("1mo"), None)
            .map(|_| ()),
        engine
            .analyze_performance(&["AAA"], Some("10y"), None)
            .map(|_| ()),
        engine
            .analyze_performance(&["AAA"], None, Some(0.5))
            .map(|_| ()),
        engine.quotes(&empty).map(|_| ()),
    ];
    for case in cases {
        let err = case.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput, "{err}");
    }
    assert_eq!(provider.total_calls(), 0);
}

#[test]
fn more_than_twenty_tickers_is_rejected() {
    let provider = Arc::new(ScriptedProvider::default());
    let tickers: Vec<String> = (0..21).map(|i| format!("T{i:02}")).collect();
    let err = engine(&provider)
        .analyze_performance(&tickers, None, None)
        .unwrap_err();
    assert!(matches!(
        err,
        RunError::MalformedInput(InputError::TooManyTickers { count: 21, max: 20 })
    ));
}

#[test]
fn duplicate_tickers_count_once() {
    let provider = Arc::new(ScriptedProvider::default());
    let tickers: Vec<String> = (0..25).map(|i| format!("t{}", i % 20)).collect();
    let report = engine(&provider)
        .analyze_performance(&tickers, None, None)
        .unwrap();
    assert_eq!(report.metrics.len(), 20);
}

// ─── Screening ──────────────────────────────────────────────────────

#[test]
fn failed_fetch_never_passes_screening() {
    let provider = Arc::new(
        ScriptedProvider::default()
            .with("AAA", Script::Bars(wave(260, 0.3, 0.05)))
            .with("BAD", Script::Fail(DataError::Other("boom".into()))),
    );
    let report = engine(&provider).screen(&["AAA", "BAD"], Some(0)).unwrap();
    assert_eq!(report.threshold, 0);
    assert_eq!(report.results.len(), 2);
    assert!(report.results[0].passed);
    let bad = &report.results[1];
    assert_eq!(bad.ticker, "BAD");
    assert_eq!(bad.composite_score, 0);
    assert!(!bad.passed);
    assert_eq!(report.passed_count, 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(report.recommendations[0].ticker, "AAA");
}

#[test]
fn profile_failure_degrades_without_failing_ticker() {
    let provider = Arc::new(
        ScriptedProvider::default()
            .with("AAA", Script::Bars(wave(260, 0.3, 0.05)))
            .with_profile("AAA", Err(DataError::Timeout("30s".into())))
            .with("BBB", Script::Bars(wave(260, 1.1, 0.05)))
            .with_profile(
                "BBB",
                Ok(TickerProfile {
                    name: Some("Beta Corp".into()),
                    trailing_pe: Some(12.0),
                }),
            ),
    );
    let report = engine(&provider).screen(&["AAA", "BBB"], None).unwrap();
    assert!(report.failed.is_empty());

    let aaa = &report.results[0];
    assert_eq!(aaa.name, "AAA");
    assert_eq!(aaa.per, None);

    let bbb = &report.results[1];
    assert_eq!(bbb.name, "Beta Corp");
    assert_eq!(bbb.per, Some(12.0));
    assert!(bbb.composite_score >= 15);
}

#[test]
fn default_threshold_comes_from_config() {
    let provider = Arc::new(ScriptedProvider::default().with("AAA", Script::Bars(wave(260, 0.3, 0.05))));
    let report = engine(&provider).screen(&["aaa"], None).unwrap();
    assert_eq!(report.threshold, 60);
    assert_eq!(report.results[0].ticker, "AAA");
}

// ─── Prediction ─────────────────────────────────────────────────────

#[test]
fn prediction_survives_missing_prices() {
    let provider = Arc::new(ScriptedProvider::default());
    let report = engine(&provider)
        .predict("GONE", &MarketContext::default())
        .unwrap();
    assert_eq!(report.failed.len(), 1);
    assert!(report.prediction.breakdown.technical.is_none());
    assert_eq!(report.prediction.composite.score, 0.0);
}

#[test]
fn prediction_with_prices_has_technical_signal() {
    let provider = Arc::new(ScriptedProvider::default().with("AAA", Script::Bars(wave(260, 0.3, 0.05))));
    let report = engine(&provider)
        .predict("AAA", &MarketContext::default())
        .unwrap();
    assert!(report.failed.is_empty());
    assert!(report.prediction.breakdown.technical.is_some());
    assert!((-100.0..=100.0).contains(&report.prediction.composite.score));
}
