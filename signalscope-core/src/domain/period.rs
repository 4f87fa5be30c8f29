//! Lookback periods accepted by fetch and analytics calls.

use std::fmt;
use std::str::FromStr;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::InputError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    pub const ALL: [Period; 7] = [
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
        Period::Max,
    ];

    /// Periods the performance analytics call accepts.
    pub const ANALYTICS: [Period; 4] = [
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::Max => "max",
        }
    }

    fn months(&self) -> Option<u32> {
        match self {
            Period::OneMonth => Some(1),
            Period::ThreeMonths => Some(3),
            Period::SixMonths => Some(6),
            Period::OneYear => Some(12),
            Period::TwoYears => Some(24),
            Period::FiveYears => Some(60),
            Period::Max => None,
        }
    }

    /// First calendar date covered by this period when it ends on `end`.
    pub fn start_date(&self, end: NaiveDate) -> NaiveDate {
        // Providers clamp anything earlier than their first bar.
        let earliest = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap_or_default();
        match self.months() {
            Some(m) => end.checked_sub_months(Months::new(m)).unwrap_or(earliest),
            None => earliest,
        }
    }

    /// Parse a period for the performance analytics call.
    pub fn parse_for_analytics(s: &str) -> Result<Self, InputError> {
        let period: Period = s.parse()?;
        if Self::ANALYTICS.contains(&period) {
            Ok(period)
        } else {
            Err(InputError::UnsupportedPeriod(s.to_string()))
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| InputError::UnsupportedPeriod(s.to_string()))
    }
}
