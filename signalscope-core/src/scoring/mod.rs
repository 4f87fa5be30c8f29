//! Signal aggregation.
//!
//! An `IndicatorSnapshot` and a `MarketContext` become five composite
//! signals (technical, macro, sentiment, currency, geopolitical), each in
//! `[-100, 100]`. `SignalAggregator` weights them into one score and derives
//! a direction and a risk level. A missing source is `None` in the
//! breakdown and contributes its neutral baseline of 0.
//!
//! `fear_greed` reads the same context as a 0–100 market mood index.

pub mod aggregate;
pub mod fear_greed;
pub mod signals;
pub mod weights;

pub use aggregate::{CompositeScore, Direction, Prediction, RiskLevel, SignalAggregator, SignalBreakdown};
pub use fear_greed::{FearGreedComponent, FearGreedComponents, FearGreedIndex, FearGreedLabel};
pub use signals::{
    clip_composite, CurrencySignal, GeopoliticalSignal, MacroSignal, SentimentSignal,
    TechnicalSignal,
};
pub use weights::ScoreWeights;
