//! Domain types: bars, price series, lookback periods, tickers, market context.

pub mod bar;
pub mod context;
pub mod period;
pub mod series;
pub mod ticker;

pub use bar::PriceBar;
pub use context::{
    GeopoliticalRecord, MacroSnapshot, MarketContext, SentimentRecord, Stance, Urgency,
    CONTEXT_WINDOW, TREND_LOOKBACK,
};
pub use period::Period;
pub use series::{PriceSeries, Quote};
pub use ticker::normalize_tickers;
