#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-year holiday tables and near-holiday date windows.
//!
//! [`HolidayCalendar`] places each [`Holiday`] on its date for a year,
//! following the holiday's [`HolidayRule`] (fixed date, nth weekday, or last
//! weekday of a month). A [`HolidayWindow`] expands those dates by a radius
//! so a daily series can be split into near-holiday and baseline days.

use std::collections::BTreeMap;

use chrono::{Datelike as _, Days, NaiveDate};
use crime_analysis_calendar_models::{DayClass, Holiday, HolidayEntry, HolidayRule};
use thiserror::Error;

/// First year covered by the Boston incident reports.
pub const DEFAULT_FIRST_YEAR: i32 = 2015;
/// Last year covered by the datasets the analyses were run against.
pub const DEFAULT_LAST_YEAR: i32 = 2022;

/// Errors from holiday lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// The year is outside the calendar's supported range.
    #[error("Unsupported year {year}: holidays are available for {first}-{last}")]
    UnsupportedYear {
        /// The requested year.
        year: i32,
        /// First supported year.
        first: i32,
        /// Last supported year.
        last: i32,
    },

    /// The supported range itself is invalid.
    #[error("Invalid year range {first}-{last}: expected four-digit years, first <= last")]
    InvalidRange {
        /// Requested first year.
        first: i32,
        /// Requested last year.
        last: i32,
    },

    /// Two holidays resolved to the same date.
    #[error("{first} and {second} both fall on {date}")]
    DuplicateDate {
        /// The shared date.
        date: NaiveDate,
        /// The earlier holiday in canonical order.
        first: Holiday,
        /// The later holiday in canonical order.
        second: Holiday,
    },
}

/// Resolves holiday dates for a bounded range of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HolidayCalendar {
    first_year: i32,
    last_year: i32,
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self {
            first_year: DEFAULT_FIRST_YEAR,
            last_year: DEFAULT_LAST_YEAR,
        }
    }
}

impl HolidayCalendar {
    /// Creates a calendar supporting `first_year..=last_year`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidRange`] unless both bounds are
    /// four-digit years and `first_year <= last_year`.
    pub fn new(first_year: i32, last_year: i32) -> Result<Self, CalendarError> {
        let four_digit = 1000..=9999;
        if !four_digit.contains(&first_year)
            || !four_digit.contains(&last_year)
            || first_year > last_year
        {
            return Err(CalendarError::InvalidRange {
                first: first_year,
                last: last_year,
            });
        }
        Ok(Self {
            first_year,
            last_year,
        })
    }

    /// First supported year.
    #[must_use]
    pub const fn first_year(&self) -> i32 {
        self.first_year
    }

    /// Last supported year.
    #[must_use]
    pub const fn last_year(&self) -> i32 {
        self.last_year
    }

    /// Returns `true` if `year` is within the supported range.
    #[must_use]
    pub const fn supports(&self, year: i32) -> bool {
        year >= self.first_year && year <= self.last_year
    }

    /// Returns the holidays of `year`, ordered by date.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::UnsupportedYear`] if `year` is out of range,
    /// or [`CalendarError::DuplicateDate`] if two holidays collide.
    pub fn holidays_for(&self, year: i32) -> Result<Vec<HolidayEntry>, CalendarError> {
        if !self.supports(year) {
            return Err(CalendarError::UnsupportedYear {
                year,
                first: self.first_year,
                last: self.last_year,
            });
        }

        let mut entries: Vec<HolidayEntry> = Holiday::all()
            .iter()
            .filter_map(|&holiday| {
                resolve(holiday.rule(), year).map(|date| HolidayEntry { date, holiday })
            })
            .collect();
        entries.sort();

        if let Some(pair) = entries.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(CalendarError::DuplicateDate {
                date: pair[0].date,
                first: pair[0].holiday,
                second: pair[1].holiday,
            });
        }

        log::debug!("Resolved {} holidays for {year}", entries.len());
        Ok(entries)
    }

    /// Returns the holidays of every year in `first..=last`, ordered by date.
    ///
    /// # Errors
    ///
    /// Fails on the first unsupported year.
    pub fn holidays_between(
        &self,
        first: i32,
        last: i32,
    ) -> Result<Vec<HolidayEntry>, CalendarError> {
        let mut all = Vec::new();
        for year in first..=last {
            all.extend(self.holidays_for(year)?);
        }
        Ok(all)
    }
}

/// Places a holiday rule on a date in `year`.
fn resolve(rule: HolidayRule, year: i32) -> Option<NaiveDate> {
    match rule {
        HolidayRule::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day),
        HolidayRule::NthWeekday { month, weekday, n } => {
            NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
        }
        HolidayRule::LastWeekday { month, weekday } => {
            NaiveDate::from_weekday_of_month_opt(year, month, weekday, 5)
                .or_else(|| NaiveDate::from_weekday_of_month_opt(year, month, weekday, 4))
        }
    }
}

fn holidays_in_month(year: i32, month: u32) -> impl Iterator<Item = HolidayEntry> {
    Holiday::all().iter().filter_map(move |&holiday| {
        resolve(holiday.rule(), year)
            .filter(|date| date.month() == month)
            .map(|date| HolidayEntry { date, holiday })
    })
}

/// Every date within `radius_days` of a holiday, mapped to its nearest
/// holiday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayWindow {
    radius_days: u32,
    days: BTreeMap<NaiveDate, (Holiday, i64)>,
}

impl HolidayWindow {
    /// Builds the window around `entries`.
    ///
    /// Where two windows overlap (Christmas and New Year's Day with a large
    /// radius) a date belongs to the closer holiday; on a tie, the earlier
    /// one.
    #[must_use]
    pub fn new(entries: &[HolidayEntry], radius_days: u32) -> Self {
        let mut days: BTreeMap<NaiveDate, (Holiday, i64)> = BTreeMap::new();
        let radius = Days::new(u64::from(radius_days));

        let mut sorted = entries.to_vec();
        sorted.sort();

        for entry in sorted {
            let (Some(start), Some(end)) = (
                entry.date.checked_sub_days(radius),
                entry.date.checked_add_days(radius),
            ) else {
                continue;
            };

            for day in start.iter_days().take_while(|d| *d <= end) {
                let offset = (day - entry.date).num_days();
                days.entry(day)
                    .and_modify(|current| {
                        if offset.abs() < current.1.abs() {
                            *current = (entry.holiday, offset);
                        }
                    })
                    .or_insert((entry.holiday, offset));
            }
        }

        Self { radius_days, days }
    }

    /// Builds the window around every holiday of `first..=last`, including
    /// the days pulled in by the neighbouring years' December and January
    /// holidays.
    ///
    /// # Errors
    ///
    /// Fails if any year in the range is unsupported by `calendar`.
    pub fn for_years(
        calendar: &HolidayCalendar,
        first: i32,
        last: i32,
        radius_days: u32,
    ) -> Result<Self, CalendarError> {
        let mut entries = calendar.holidays_between(first, last)?;
        // Holidays just outside the range pull in days at its edges, even
        // when their own year is unsupported.
        entries.extend(holidays_in_month(first - 1, 12));
        entries.extend(holidays_in_month(last + 1, 1));
        Ok(Self::new(&entries, radius_days))
    }

    /// The radius the window was built with.
    #[must_use]
    pub const fn radius_days(&self) -> u32 {
        self.radius_days
    }

    /// Number of distinct dates inside the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Returns `true` if no date is inside the window.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Classifies `date` as near a holiday or baseline.
    #[must_use]
    pub fn classify(&self, date: NaiveDate) -> DayClass {
        self.days
            .get(&date)
            .map_or(DayClass::Baseline, |&(holiday, offset_days)| {
                DayClass::NearHoliday {
                    holiday,
                    offset_days,
                }
            })
    }
}
