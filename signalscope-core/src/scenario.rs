//! Macro scenario relevance.
//!
//! A scenario is a free-text theme ("달러 강세 수혜", "safe haven rotation")
//! mapped to a basket of ETF tickers. Its relevance starts at 50 and gains
//! points when the latest macro reading backs the theme its text names:
//!
//! | keywords                              | reading   | +40   | +25   | +10   |
//! |---------------------------------------|-----------|-------|-------|-------|
//! | vix, volatility, fear, 변동성, 공포   | VIX       | ≥30   | ≥25   | ≥20   |
//! | safe, 안전자산                        | VIX       |       | ≥25 (+30)     |
//! | dollar, currency, 원화, 환율, 달러    | USD/KRW   | ≥1400 | ≥1350 | ≥1300 |
//! | commodit, energy, oil, 원자재, 에너지, 유가 | WTI | ≥90   | ≥80   | ≥70   |
//!
//! Matching is case-insensitive on substrings. The score is capped at 100.

use serde::{Deserialize, Serialize};

use crate::domain::MacroSnapshot;
use crate::stats::round_to;

pub const BASE_RELEVANCE: f64 = 50.0;
pub const MAX_RELEVANCE: f64 = 100.0;

const VOLATILITY_KEYWORDS: &[&str] = &["vix", "volatility", "fear", "변동성", "공포"];
const SAFE_HAVEN_KEYWORDS: &[&str] = &["safe", "안전자산"];
const CURRENCY_KEYWORDS: &[&str] = &["dollar", "currency", "원화", "환율", "달러"];
const COMMODITY_KEYWORDS: &[&str] = &["commodit", "energy", "oil", "원자재", "에너지", "유가"];

/// Tiered bonus: the first threshold the reading meets wins.
fn tier(reading: f64, tiers: [(f64, f64); 3]) -> f64 {
    tiers
        .iter()
        .find(|(level, _)| reading >= *level)
        .map_or(0.0, |(_, bonus)| *bonus)
}

fn mentions(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Relevance of one scenario text under the latest macro snapshot, in
/// `[50, 100]`. Without a snapshot every scenario scores the base 50.
pub fn relevance_score(scenario: &str, snapshot: Option<&MacroSnapshot>) -> f64 {
    let Some(snapshot) = snapshot else {
        return BASE_RELEVANCE;
    };
    let text = scenario.to_lowercase();
    let mut score = BASE_RELEVANCE;

    if let Some(vix) = snapshot.vix {
        if mentions(&text, VOLATILITY_KEYWORDS) {
            score += tier(vix, [(30.0, 40.0), (25.0, 25.0), (20.0, 10.0)]);
        }
        if mentions(&text, SAFE_HAVEN_KEYWORDS) && vix >= 25.0 {
            score += 30.0;
        }
    }
    if let Some(usd_krw) = snapshot.usd_krw {
        if mentions(&text, CURRENCY_KEYWORDS) {
            score += tier(usd_krw, [(1400.0, 40.0), (1350.0, 25.0), (1300.0, 10.0)]);
        }
    }
    if let Some(wti) = snapshot.wti {
        if mentions(&text, COMMODITY_KEYWORDS) {
            score += tier(wti, [(90.0, 40.0), (80.0, 25.0), (70.0, 10.0)]);
        }
    }

    score.min(MAX_RELEVANCE)
}

/// A scenario theme and the tickers that express it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMapping {
    pub scenario: String,
    #[serde(default)]
    pub tickers: Vec<String>,
    #[serde(default)]
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSuggestion {
    pub scenario: String,
    pub tickers: Vec<String>,
    pub rationale: String,
    pub relevance_score: f64,
}

/// Score every mapping and sort by relevance, highest first. Ties keep
/// their input order.
pub fn rank_scenarios(
    mappings: &[ScenarioMapping],
    snapshot: Option<&MacroSnapshot>,
) -> Vec<ScenarioSuggestion> {
    let mut suggestions: Vec<ScenarioSuggestion> = mappings
        .iter()
        .map(|m| ScenarioSuggestion {
            scenario: m.scenario.clone(),
            tickers: m.tickers.clone(),
            rationale: m.rationale.clone(),
            relevance_score: round_to(relevance_score(&m.scenario, snapshot), 2),
        })
        .collect();
    suggestions.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    suggestions
}
