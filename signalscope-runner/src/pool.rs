//! Bounded worker pool for per-ticker batch work.
//!
//! Each ticker runs as an independent job on a private rayon pool. Results
//! come back keyed by ticker; a failing or panicking job only affects its own
//! entry.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use signalscope_core::{ErrorKind, TickerFailure};

pub const DEFAULT_WORKERS: usize = 8;

pub struct BatchPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl BatchPool {
    pub fn new(workers: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let workers = workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("signalscope-worker-{i}"))
            .build()?;
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `work` once per ticker. Duplicate tickers collapse to one entry.
    pub fn run<T, F>(&self, tickers: &[String], work: F) -> BatchResults<T>
    where
        T: Send,
        F: Fn(&str) -> Result<T, TickerFailure> + Sync,
    {
        let entries: Vec<(String, Result<T, TickerFailure>)> = self.pool.install(|| {
            tickers
                .par_iter()
                .map(|ticker| {
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| work(ticker)))
                        .unwrap_or_else(|payload| {
                            let msg = panic_message(payload.as_ref());
                            tracing::error!(ticker = %ticker, panic = %msg, "worker panicked");
                            Err(TickerFailure::new(
                                ticker.as_str(),
                                ErrorKind::DataUnavailable,
                                format!("worker panicked: {msg}"),
                            ))
                        });
                    (ticker.clone(), outcome)
                })
                .collect()
        });

        BatchResults {
            entries: entries.into_iter().collect(),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Per-ticker outcomes of a batch.
#[derive(Debug)]
pub struct BatchResults<T> {
    entries: BTreeMap<String, Result<T, TickerFailure>>,
}

impl<T> BatchResults<T> {
    pub fn get(&self, ticker: &str) -> Option<&Result<T, TickerFailure>> {
        self.entries.get(ticker)
    }

    pub fn take(&mut self, ticker: &str) -> Option<Result<T, TickerFailure>> {
        self.entries.remove(ticker)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn successes(&self) -> usize {
        self.entries.values().filter(|r| r.is_ok()).count()
    }

    /// Failures in ticker order.
    pub fn failures(&self) -> Vec<TickerFailure> {
        self.entries
            .values()
            .filter_map(|r| r.as_ref().err().cloned())
            .collect()
    }
}
