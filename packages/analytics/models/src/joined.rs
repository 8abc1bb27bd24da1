//! Rows produced by joining crime counts with the explanatory datasets.

use chrono::NaiveDate;
use crime_analysis_calendar_models::Holiday;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Incidents on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// A day's incident count alongside that day's weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyWeatherCrime {
    pub date: NaiveDate,
    pub crimes: u64,
    /// Inches.
    pub precipitation: f64,
    /// Inches.
    pub snowfall: f64,
    /// Degrees Fahrenheit.
    pub avg_temperature: f64,
}

/// Median household income band.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IncomeBracket {
    /// Below $50,000.
    Low,
    /// $50,000 to $99,999.
    Middle,
    /// $100,000 and above.
    High,
}

impl IncomeBracket {
    pub const MIDDLE_FLOOR: f64 = 50_000.0;
    pub const HIGH_FLOOR: f64 = 100_000.0;

    #[must_use]
    pub fn of(median_income: f64) -> Self {
        if median_income >= Self::HIGH_FLOOR {
            Self::High
        } else if median_income >= Self::MIDDLE_FLOOR {
            Self::Middle
        } else {
            Self::Low
        }
    }
}

/// Crime totals for one area joined with its income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaIncomeCrime {
    pub area: String,
    pub median_income: f64,
    pub bracket: IncomeBracket,
    pub crimes: u64,
    pub population: Option<u64>,
    /// Incidents per 1,000 residents when the population is known.
    pub crimes_per_thousand: Option<f64>,
}

/// Mean daily count in one holiday's window compared with baseline days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayLift {
    pub holiday: Holiday,
    pub date: NaiveDate,
    pub window_days: usize,
    pub window_mean: f64,
    /// Percent difference from the baseline mean; `None` when the baseline
    /// is empty or zero.
    pub lift_pct: Option<f64>,
}

/// Near-holiday versus baseline daily counts for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayWindowSummary {
    pub radius_days: u32,
    pub near_holiday_days: usize,
    pub baseline_days: usize,
    pub near_holiday_mean: f64,
    pub baseline_mean: f64,
    pub lifts: Vec<HolidayLift>,
}
