//! Risk and price alerts.
//!
//! Both checks are pure: they read a `MarketContext` or a batch of quotes and
//! report what crossed its line. Delivery is the caller's concern.
//!
//! Risk conditions:
//! - VIX ≥ 30
//! - |USD/KRW change vs the previous snapshot| ≥ 2%
//! - any HIGH-urgency record among the 10 newest geopolitical records
//!
//! Price alerts trigger inclusively: a target at or above the trigger, a
//! stop-loss at or below it.

use serde::{Deserialize, Serialize};

use crate::domain::{MarketContext, Quote, Urgency};
use crate::screening::Recommendation;
use crate::stats::round_to;

pub const VIX_ALERT_LEVEL: f64 = 30.0;
pub const CURRENCY_ALERT_PCT: f64 = 2.0;
pub const GEOPOLITICAL_LOOKBACK: usize = 10;

// ─── Risk conditions ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAlert {
    pub vix_alert: bool,
    pub vix_value: Option<f64>,
    pub currency_alert: bool,
    /// Percent change of USD/KRW against the previous snapshot, 2 decimals.
    pub usd_krw_change_pct: Option<f64>,
    pub geopolitical_alert: bool,
    pub high_urgency_count: usize,
}

impl RiskAlert {
    pub fn check(context: &MarketContext) -> Self {
        let vix_value = context.vix();
        let vix_alert = vix_value.is_some_and(|v| v >= VIX_ALERT_LEVEL);

        let usd_krw_change_pct = usd_krw_change_pct(context);
        let currency_alert = usd_krw_change_pct.is_some_and(|pct| pct.abs() >= CURRENCY_ALERT_PCT);

        let high_urgency_count = context
            .geopolitical
            .as_deref()
            .unwrap_or_default()
            .iter()
            .take(GEOPOLITICAL_LOOKBACK)
            .filter(|r| r.urgency == Urgency::High)
            .count();

        Self {
            vix_alert,
            vix_value,
            currency_alert,
            usd_krw_change_pct,
            geopolitical_alert: high_urgency_count > 0,
            high_urgency_count,
        }
    }

    pub fn any(&self) -> bool {
        self.vix_alert || self.currency_alert || self.geopolitical_alert
    }
}

/// Latest USD/KRW against the snapshot before it. `None` without a
/// positive previous rate.
fn usd_krw_change_pct(context: &MarketContext) -> Option<f64> {
    let latest = context.usd_krw()?;
    let previous = context.previous_macro()?.usd_krw.filter(|p| *p > 0.0)?;
    Some(round_to((latest - previous) / previous * 100.0, 2))
}

// ─── Price alerts ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    TargetPrice,
    StopLoss,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAlert {
    pub ticker: String,
    pub kind: AlertKind,
    pub trigger_price: f64,
}

impl PriceAlert {
    pub fn new(ticker: impl Into<String>, kind: AlertKind, trigger_price: f64) -> Self {
        Self {
            ticker: ticker.into(),
            kind,
            trigger_price,
        }
    }

    pub fn is_triggered(&self, price: f64) -> bool {
        match self.kind {
            AlertKind::TargetPrice => price >= self.trigger_price,
            AlertKind::StopLoss => price <= self.trigger_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredAlert {
    pub alert: PriceAlert,
    pub current_price: f64,
}

/// Alerts whose ticker has a priced quote that crosses the trigger, in
/// alert order. Alerts for unquoted or unpriced tickers are skipped.
pub fn check_price_alerts(alerts: &[PriceAlert], quotes: &[Quote]) -> Vec<TriggeredAlert> {
    alerts
        .iter()
        .filter_map(|alert| {
            let price = quotes
                .iter()
                .find(|q| q.ticker == alert.ticker)
                .and_then(|q| q.price)?;
            alert.is_triggered(price).then(|| TriggeredAlert {
                alert: alert.clone(),
                current_price: price,
            })
        })
        .collect()
}

impl Recommendation {
    /// Target and stop-loss alerts at the recommended levels.
    pub fn price_alerts(&self) -> [PriceAlert; 2] {
        [
            PriceAlert::new(&self.ticker, AlertKind::TargetPrice, self.target_price),
            PriceAlert::new(&self.ticker, AlertKind::StopLoss, self.stop_loss),
        ]
    }
}
