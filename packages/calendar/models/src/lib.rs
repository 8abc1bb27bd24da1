#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Holiday and holiday-window types.
//!
//! The holiday set is the one the Boston analyses annotate their daily
//! incident charts with: federal holidays plus the two Suffolk County ones
//! (St. Patrick's Day and Patriots' Day, which is also Marathon Monday).

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How a holiday's date is determined in a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidayRule {
    /// Same month and day every year.
    Fixed {
        /// Month (1-12).
        month: u32,
        /// Day of month.
        day: u32,
    },
    /// The `n`th occurrence of `weekday` in `month` (e.g. 4th Thursday).
    NthWeekday {
        /// Month (1-12).
        month: u32,
        /// Weekday to count.
        weekday: Weekday,
        /// 1-based occurrence.
        n: u8,
    },
    /// The last occurrence of `weekday` in `month`.
    LastWeekday {
        /// Month (1-12).
        month: u32,
        /// Weekday to find.
        weekday: Weekday,
    },
}

/// A public holiday in the canonical set.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Holiday {
    NewYearsDay,
    MartinLutherKingDay,
    StPatricksDay,
    PatriotsDay,
    MemorialDay,
    IndependenceDay,
    LaborDay,
    ColumbusDay,
    VeteransDay,
    Thanksgiving,
    Christmas,
}

impl Holiday {
    /// Returns all holidays in calendar order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::NewYearsDay,
            Self::MartinLutherKingDay,
            Self::StPatricksDay,
            Self::PatriotsDay,
            Self::MemorialDay,
            Self::IndependenceDay,
            Self::LaborDay,
            Self::ColumbusDay,
            Self::VeteransDay,
            Self::Thanksgiving,
            Self::Christmas,
        ]
    }

    /// The rule that places this holiday in a year.
    #[must_use]
    pub const fn rule(self) -> HolidayRule {
        use HolidayRule::{Fixed, LastWeekday, NthWeekday};

        match self {
            Self::NewYearsDay => Fixed { month: 1, day: 1 },
            Self::MartinLutherKingDay => NthWeekday {
                month: 1,
                weekday: Weekday::Mon,
                n: 3,
            },
            Self::StPatricksDay => Fixed { month: 3, day: 17 },
            Self::PatriotsDay => NthWeekday {
                month: 4,
                weekday: Weekday::Mon,
                n: 3,
            },
            Self::MemorialDay => LastWeekday {
                month: 5,
                weekday: Weekday::Mon,
            },
            Self::IndependenceDay => Fixed { month: 7, day: 4 },
            Self::LaborDay => NthWeekday {
                month: 9,
                weekday: Weekday::Mon,
                n: 1,
            },
            Self::ColumbusDay => NthWeekday {
                month: 10,
                weekday: Weekday::Mon,
                n: 2,
            },
            Self::VeteransDay => Fixed { month: 11, day: 11 },
            Self::Thanksgiving => NthWeekday {
                month: 11,
                weekday: Weekday::Thu,
                n: 4,
            },
            Self::Christmas => Fixed { month: 12, day: 25 },
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NewYearsDay => "New Year's Day",
            Self::MartinLutherKingDay => "Martin Luther King Jr. Day",
            Self::StPatricksDay => "St. Patrick's Day",
            Self::PatriotsDay => "Patriots' Day (Boston Marathon)",
            Self::MemorialDay => "Memorial Day",
            Self::IndependenceDay => "Independence Day",
            Self::LaborDay => "Labor Day",
            Self::ColumbusDay => "Columbus Day",
            Self::VeteransDay => "Veterans Day",
            Self::Thanksgiving => "Thanksgiving",
            Self::Christmas => "Christmas",
        }
    }

    /// Short label drawn above the holiday marker on line charts.
    #[must_use]
    pub const fn short_label(self) -> &'static str {
        match self {
            Self::NewYearsDay => "NY",
            Self::MartinLutherKingDay => "MLK",
            Self::StPatricksDay => "St Pats",
            Self::PatriotsDay => "Marathon",
            Self::MemorialDay => "Mem",
            Self::IndependenceDay => "July 4",
            Self::LaborDay => "Labor",
            Self::ColumbusDay => "Columbus",
            Self::VeteransDay => "Vets",
            Self::Thanksgiving => "Thnx",
            Self::Christmas => "Xmas",
        }
    }
}

/// A holiday placed on its date for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub holiday: Holiday,
}

/// Whether a date falls near a holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum DayClass {
    /// Within the window around `holiday`; `offset_days` is negative before
    /// the holiday and positive after it.
    NearHoliday {
        /// The nearest holiday.
        holiday: Holiday,
        /// Signed distance from the holiday in days.
        offset_days: i64,
    },
    /// Outside every holiday window.
    Baseline,
}

impl DayClass {
    /// Returns `true` for [`DayClass::NearHoliday`].
    #[must_use]
    pub const fn is_near_holiday(self) -> bool {
        matches!(self, Self::NearHoliday { .. })
    }
}
