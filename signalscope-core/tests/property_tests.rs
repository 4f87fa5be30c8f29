//! Property tests for numeric invariants.
//!
//! Uses proptest to verify:
//! 1. RSI bounds — 0 ≤ RSI ≤ 100 for any series with ≥ 15 closes
//! 2. Bollinger ordering — lower ≤ middle ≤ upper
//! 3. Composite bounds — every composite and the weighted score in [-100, 100]
//! 4. Score idempotence — recomputing from the same breakdown is identical
//! 5. Correlation symmetry — corr(a, b) == corr(b, a), no self pairs
//! 6. Drawdown sign — MDD ratio ≤ 0
//! 7. Screening cap — score ≤ 100

use proptest::prelude::*;
use signalscope_core::analytics::{correlation_pairs, metrics::max_drawdown, CorrelationMatrix};
use signalscope_core::domain::{
    GeopoliticalRecord, MacroSnapshot, MarketContext, PriceSeries, SentimentRecord, Stance,
    Urgency,
};
use signalscope_core::indicators::{BollingerReading, IndicatorSnapshot, RsiReading};
use signalscope_core::scoring::{SignalAggregator, SignalBreakdown};
use signalscope_core::screening::screening_score;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes(min: usize, max: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..1000.0_f64, min..max)
}

fn arb_stance() -> impl Strategy<Value = Stance> {
    prop_oneof![
        Just(Stance::Bullish),
        Just(Stance::Bearish),
        Just(Stance::Neutral)
    ]
}

fn arb_urgency() -> impl Strategy<Value = Urgency> {
    prop_oneof![Just(Urgency::Low), Just(Urgency::Medium), Just(Urgency::High)]
}

fn arb_context() -> impl Strategy<Value = MarketContext> {
    (
        prop::option::of(0.0..90.0_f64),
        prop::option::of(0.0..9.0_f64),
        prop::option::of(900.0..1700.0_f64),
        prop::option::of(prop::collection::vec(
            (arb_stance(), prop::option::of(-1.0..2.0_f64)),
            0..80,
        )),
        prop::option::of(prop::collection::vec(arb_urgency(), 0..80)),
    )
        .prop_map(|(vix, yld, krw, sentiment, geo)| MarketContext {
            macro_history: None,
            macro_snapshot: Some(MacroSnapshot {
                vix,
                us_10y_yield: yld,
                usd_krw: krw,
                ..Default::default()
            }),
            sentiment: sentiment.map(|v| {
                v.into_iter()
                    .map(|(direction, confidence)| SentimentRecord {
                        direction,
                        confidence,
                    })
                    .collect()
            }),
            geopolitical: geo.map(|v| {
                v.into_iter()
                    .map(|urgency| GeopoliticalRecord { urgency })
                    .collect()
            }),
        })
}

// ── 1. RSI bounds ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_is_bounded(closes in arb_closes(15, 200)) {
        let reading = RsiReading::compute(&closes);
        let rsi = reading.value.expect("15+ closes always produce a value");
        prop_assert!((0.0..=100.0).contains(&rsi), "rsi = {rsi}");
    }
}

// ── 2. Bollinger ordering ────────────────────────────────────────────

proptest! {
    #[test]
    fn bollinger_bands_are_ordered(closes in arb_closes(20, 120)) {
        let r = BollingerReading::compute(&closes);
        let (u, m, l) = (r.upper.unwrap(), r.middle.unwrap(), r.lower.unwrap());
        prop_assert!(l <= m && m <= u, "lower={l} middle={m} upper={u}");
    }
}

// ── 3 & 4. Composite bounds and idempotence ──────────────────────────

proptest! {
    #[test]
    fn composites_and_score_are_bounded(
        closes in arb_closes(0, 160),
        context in arb_context(),
    ) {
        let snapshot = IndicatorSnapshot::compute(&PriceSeries::from_closes("P", &closes));
        let breakdown = SignalBreakdown::assemble(Some(&snapshot), &context);
        for c in breakdown.composites() {
            prop_assert!((-100.0..=100.0).contains(&c), "composite = {c}");
        }
        let agg = SignalAggregator::default();
        let first = agg.score(&breakdown, context.vix());
        prop_assert!((-100.0..=100.0).contains(&first.score));

        let second = agg.score(&breakdown, context.vix());
        prop_assert_eq!(first, second);
    }
}

// ── 5. Correlation symmetry ──────────────────────────────────────────

proptest! {
    #[test]
    fn correlation_is_symmetric(
        a in prop::collection::vec(-0.05..0.05_f64, 20..60),
        b in prop::collection::vec(-0.05..0.05_f64, 20..60),
        c in prop::collection::vec(-0.05..0.05_f64, 20..60),
    ) {
        let forward = CorrelationMatrix::compute(&[("A", &a), ("B", &b), ("C", &c)]).unwrap();
        let reverse = CorrelationMatrix::compute(&[("C", &c), ("B", &b), ("A", &a)]).unwrap();
        for x in ["A", "B", "C"] {
            for y in ["A", "B", "C"] {
                prop_assert_eq!(forward.get(x, y), forward.get(y, x));
                prop_assert_eq!(forward.get(x, y), reverse.get(x, y));
            }
        }
        for pair in correlation_pairs(&[("A", &a), ("B", &b), ("C", &c)]) {
            prop_assert_ne!(&pair.ticker_a, &pair.ticker_b);
            prop_assert!((-1.0..=1.0).contains(&pair.correlation));
        }
    }
}

// ── 6. Drawdown sign ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn max_drawdown_is_non_positive(closes in arb_closes(2, 300)) {
        let dd = max_drawdown(&closes).unwrap();
        prop_assert!(dd.ratio <= 0.0);
        prop_assert!(dd.percent <= 0.0);
    }
}

// ── 7. Screening cap ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn screening_score_is_capped(
        closes in arb_closes(0, 160),
        per in prop::option::of(-50.0..80.0_f64),
    ) {
        let snapshot = IndicatorSnapshot::compute(&PriceSeries::from_closes("P", &closes));
        prop_assert!(screening_score(&snapshot, per) <= 100);
    }
}
