//! SignalScope CLI — indicators, predictions, screening, analytics, quotes.
//!
//! Commands:
//! - `indicators` — RSI, MACD, Bollinger and SMA trend for one ticker
//! - `predict` — five-signal composite score, with an optional context file
//! - `screen` — rule-based 0–100 screening of a ticker batch
//! - `performance` — Sharpe, drawdown, rolling returns, correlations
//! - `quotes` — latest price and day-over-day change
//! - `fear-greed` — 0–100 market mood index from a context file
//! - `risk` — VIX, currency and geopolitical risk conditions
//! - `scenarios` — macro scenario mappings ranked by relevance
//! - `alerts` — target and stop-loss alerts checked against live quotes
//!
//! Results go to stdout as pretty JSON; logs go to stderr.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use signalscope_core::alerts::RiskAlert;
use signalscope_core::domain::MarketContext;
use signalscope_core::scenario::rank_scenarios;
use signalscope_core::scoring::FearGreedIndex;
use signalscope_runner::export::{export_json, export_metrics_csv, export_screening_csv};
use signalscope_runner::{
    init_logging, load_context, load_price_alerts, load_scenarios, CsvProvider, Engine, EngineConfig, LogFormat, PriceProvider,
    SyntheticProvider, YahooProvider,
};

#[derive(Parser)]
#[command(
    name = "signalscope",
    about = "SignalScope CLI — market signals and portfolio analytics"
)]
struct Cli {
    /// Path to a TOML engine config. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Price source.
    #[arg(long, value_enum, default_value_t = ProviderKind::Yahoo, global = true)]
    provider: ProviderKind,

    /// Directory of `<TICKER>.csv` files (required with `--provider csv`).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Last date of every fetched range (YYYY-MM-DD). Defaults to today.
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    /// Log output format: pretty or json.
    #[arg(long, default_value = "pretty", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderKind {
    Yahoo,
    Csv,
    Synthetic,
}

#[derive(Subcommand)]
enum Commands {
    /// Technical indicators for one ticker.
    Indicators { ticker: String },
    /// Composite prediction for one ticker.
    Predict {
        ticker: String,

        /// JSON file with macro, sentiment and geopolitical context.
        #[arg(long)]
        context: Option<PathBuf>,
    },
    /// Screen tickers against a score threshold.
    Screen {
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Pass mark, 0–100. Defaults to the config value (60).
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<i64>,

        /// Also write screening results as CSV to this path.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Performance analytics for up to 20 tickers.
    Performance {
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Lookback: 6mo, 1y, 2y or 5y.
        #[arg(long)]
        period: Option<String>,

        /// Annual risk-free rate, 0.0–0.2.
        #[arg(long)]
        risk_free: Option<f64>,

        /// Also write metrics as CSV to this path.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Latest quotes.
    Quotes {
        #[arg(required = true)]
        tickers: Vec<String>,
    },
    /// Fear & Greed index.
    FearGreed {
        /// JSON file with macro history and sentiment.
        #[arg(long)]
        context: PathBuf,
    },
    /// Macro risk conditions.
    Risk {
        /// JSON file with macro history and geopolitical records.
        #[arg(long)]
        context: PathBuf,
    },
    /// Rank macro scenarios by relevance to the latest snapshot.
    Scenarios {
        /// JSON array of {scenario, tickers, rationale}.
        #[arg(long)]
        mappings: PathBuf,

        #[arg(long)]
        context: Option<PathBuf>,
    },
    /// Check target and stop-loss alerts against current prices.
    Alerts {
        /// JSON array of {ticker, kind, trigger_price}.
        #[arg(long)]
        alerts: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    let provider = build_provider(cli.provider, cli.data_dir.as_deref(), &config)?;
    let mut engine = Engine::new(provider, config)?;
    if let Some(date) = cli.as_of {
        engine = engine.with_as_of(date);
    }

    let output = match cli.command {
        Commands::Indicators { ticker } => export_json(&engine.indicators(&ticker)?)?,
        Commands::Predict { ticker, context } => {
            let context = optional_context(context.as_deref())?;
            export_json(&engine.predict(&ticker, &context)?)?
        }
        Commands::Screen {
            tickers,
            threshold,
            csv,
        } => {
            let report = engine.screen(&tickers, threshold)?;
            if let Some(path) = csv {
                write_file(&path, &export_screening_csv(&report.results)?)?;
            }
            export_json(&report)?
        }
        Commands::Performance {
            tickers,
            period,
            risk_free,
            csv,
        } => {
            let report = engine.analyze_performance(&tickers, period.as_deref(), risk_free)?;
            if let Some(path) = csv {
                write_file(&path, &export_metrics_csv(&report.metrics)?)?;
            }
            export_json(&report)?
        }
        Commands::Quotes { tickers } => export_json(&engine.quotes(&tickers)?)?,
        Commands::FearGreed { context } => {
            export_json(&FearGreedIndex::compute(&load_context(&context)?))?
        }
        Commands::Risk { context } => export_json(&RiskAlert::check(&load_context(&context)?))?,
        Commands::Scenarios { mappings, context } => {
            let context = optional_context(context.as_deref())?;
            let mappings = load_scenarios(&mappings)?;
            export_json(&rank_scenarios(&mappings, context.macro_snapshot.as_ref()))?
        }
        Commands::Alerts { alerts } => {
            let alerts = load_price_alerts(&alerts)?;
            export_json(&engine.check_alerts(&alerts)?)?
        }
    };

    println!("{output}");
    Ok(())
}

fn optional_context(path: Option<&Path>) -> Result<MarketContext> {
    Ok(match path {
        Some(path) => load_context(path)?,
        None => MarketContext::default(),
    })
}

fn build_provider(
    kind: ProviderKind,
    data_dir: Option<&Path>,
    config: &EngineConfig,
) -> Result<Arc<dyn PriceProvider>> {
    let provider: Arc<dyn PriceProvider> = match kind {
        ProviderKind::Yahoo => Arc::new(YahooProvider::new(config.timeout())?),
        ProviderKind::Csv => {
            let dir = data_dir.context("--data-dir is required with --provider csv")?;
            Arc::new(CsvProvider::new(dir))
        }
        ProviderKind::Synthetic => Arc::new(SyntheticProvider::new()),
    };
    Ok(provider)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}
