#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for the crime analyses.
//!
//! - [`TimeGranularity`] / [`TimeBucket`]: the hour, day-of-week and year
//!   partitions incidents are counted in.
//! - [`BucketedSeries`]: crime type × bucket counts over a declared domain.
//! - [`ComparisonTable`]: two series compared cell by cell.
//! - Statistics and joined-dataset rows in [`stats`] and [`joined`].

mod comparison;
pub mod joined;
mod series;
pub mod stats;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

pub use comparison::{ComparisonRow, ComparisonTable};
pub use series::{BucketedSeries, OutOfDomain, SeriesCell};

/// Granularity of the time buckets incidents are counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeGranularity {
    /// Hour of day, 0-23.
    Hour,
    /// Day of week, Monday-Sunday.
    DayOfWeek,
    /// Calendar year.
    Year,
}

impl TimeGranularity {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Hour, Self::DayOfWeek, Self::Year]
    }
}

impl fmt::Display for TimeGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hour => write!(f, "hour"),
            Self::DayOfWeek => write!(f, "day"),
            Self::Year => write!(f, "year"),
        }
    }
}

/// Error returned when parsing an unknown [`TimeGranularity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGranularity {
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for UnknownGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown time unit '{}': expected year, day or hour",
            self.value
        )
    }
}

impl std::error::Error for UnknownGranularity {}

impl FromStr for TimeGranularity {
    type Err = UnknownGranularity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(Self::Hour),
            "day" | "day_of_week" | "weekday" => Ok(Self::DayOfWeek),
            "year" => Ok(Self::Year),
            _ => Err(UnknownGranularity {
                value: s.to_string(),
            }),
        }
    }
}

/// One time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum TimeBucket {
    /// Hour of day (0-23).
    Hour(u8),
    /// Day of week.
    DayOfWeek(Weekday),
    /// Calendar year.
    Year(i32),
}

impl TimeBucket {
    /// The granularity this bucket belongs to.
    #[must_use]
    pub const fn granularity(self) -> TimeGranularity {
        match self {
            Self::Hour(_) => TimeGranularity::Hour,
            Self::DayOfWeek(_) => TimeGranularity::DayOfWeek,
            Self::Year(_) => TimeGranularity::Year,
        }
    }

    /// The full, ordered bucket domain for hours or days of the week.
    ///
    /// Returns `None` for [`TimeGranularity::Year`], whose domain depends on
    /// the data; see [`TimeBucket::years`].
    #[must_use]
    pub fn fixed_domain(granularity: TimeGranularity) -> Option<Vec<Self>> {
        match granularity {
            TimeGranularity::Hour => Some((0..24).map(Self::Hour).collect()),
            TimeGranularity::DayOfWeek => Some(
                [
                    Weekday::Mon,
                    Weekday::Tue,
                    Weekday::Wed,
                    Weekday::Thu,
                    Weekday::Fri,
                    Weekday::Sat,
                    Weekday::Sun,
                ]
                .into_iter()
                .map(Self::DayOfWeek)
                .collect(),
            ),
            TimeGranularity::Year => None,
        }
    }

    /// Contiguous year buckets `first..=last`.
    #[must_use]
    pub fn years(first: i32, last: i32) -> Vec<Self> {
        (first..=last).map(Self::Year).collect()
    }

    fn sort_key(self) -> (u8, i64) {
        match self {
            Self::Hour(h) => (0, i64::from(h)),
            Self::DayOfWeek(d) => (1, i64::from(d.num_days_from_monday())),
            Self::Year(y) => (2, i64::from(y)),
        }
    }
}

impl Ord for TimeBucket {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for TimeBucket {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hour(h) => write!(f, "{h:02}"),
            Self::DayOfWeek(d) => write!(f, "{d}"),
            Self::Year(y) => write!(f, "{y}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_time_units() {
        assert_eq!("hour".parse::<TimeGranularity>().unwrap(), TimeGranularity::Hour);
        assert_eq!("Day".parse::<TimeGranularity>().unwrap(), TimeGranularity::DayOfWeek);
        assert_eq!("year".parse::<TimeGranularity>().unwrap(), TimeGranularity::Year);
    }

    #[test]
    fn rejects_week_with_accepted_values() {
        let err = "week".parse::<TimeGranularity>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown time unit 'week': expected year, day or hour"
        );
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for g in TimeGranularity::all() {
            assert_eq!(g.to_string().parse::<TimeGranularity>().unwrap(), *g);
        }
    }

    #[test]
    fn fixed_domains_are_exhaustive_and_ordered() {
        let hours = TimeBucket::fixed_domain(TimeGranularity::Hour).unwrap();
        assert_eq!(hours.len(), 24);
        assert!(hours.windows(2).all(|w| w[0] < w[1]));

        let days = TimeBucket::fixed_domain(TimeGranularity::DayOfWeek).unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], TimeBucket::DayOfWeek(Weekday::Mon));
        assert!(days.windows(2).all(|w| w[0] < w[1]));

        assert!(TimeBucket::fixed_domain(TimeGranularity::Year).is_none());
    }

    #[test]
    fn bucket_labels() {
        assert_eq!(TimeBucket::Hour(7).to_string(), "07");
        assert_eq!(TimeBucket::DayOfWeek(Weekday::Thu).to_string(), "Thu");
        assert_eq!(TimeBucket::Year(2020).to_string(), "2020");
    }
}
