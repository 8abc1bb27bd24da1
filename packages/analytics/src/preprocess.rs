//! Joins between crime counts and the explanatory datasets.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use crime_analysis_analytics_models::joined::{
    AreaIncomeCrime, DailyCount, DailyWeatherCrime, HolidayLift, HolidayWindowSummary,
    IncomeBracket,
};
use crime_analysis_calendar::HolidayWindow;
use crime_analysis_calendar_models::{DayClass, HolidayEntry};
use crime_analysis_crime_models::CrimeRecord;
use crime_analysis_source_models::{IncomeArea, WeatherObservation};

/// Pairs each day's incident count with that day's weather.
///
/// Only dates present in both inputs are kept. Days without a usable
/// temperature are dropped; blank precipitation or snowfall reads as none.
#[must_use]
pub fn combine_weather(
    daily: &[DailyCount],
    weather: &[WeatherObservation],
) -> Vec<DailyWeatherCrime> {
    let by_date: BTreeMap<NaiveDate, &WeatherObservation> =
        weather.iter().map(|w| (w.date, w)).collect();

    let mut skipped = 0_usize;
    let combined: Vec<DailyWeatherCrime> = daily
        .iter()
        .filter_map(|day| {
            let observation = by_date.get(&day.date)?;
            let Some(avg_temperature) = observation.avg_temperature else {
                skipped += 1;
                return None;
            };
            Some(DailyWeatherCrime {
                date: day.date,
                crimes: day.count,
                precipitation: observation.precipitation.unwrap_or(0.0),
                snowfall: observation.snowfall.unwrap_or(0.0),
                avg_temperature,
            })
        })
        .collect();

    if skipped > 0 {
        log::warn!("Dropped {skipped} days with no temperature reading");
    }
    log::info!(
        "Joined {} of {} crime days with weather",
        combined.len(),
        daily.len()
    );
    combined
}

/// Normalized key for matching district codes across datasets.
fn area_key(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

/// Counts incidents per income area and attaches the area's income.
///
/// Records match an area through their district, compared
/// case-insensitively. Areas without any incidents are kept with a zero
/// count; incidents in districts missing from `areas` are logged and left
/// out.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn join_income<'a>(
    records: impl IntoIterator<Item = &'a CrimeRecord>,
    areas: &[IncomeArea],
) -> Vec<AreaIncomeCrime> {
    let mut counts: BTreeMap<String, u64> = areas.iter().map(|a| (area_key(&a.area), 0)).collect();
    let mut unmatched: BTreeMap<String, u64> = BTreeMap::new();

    for record in records {
        let Some(district) = record.district.as_deref() else {
            continue;
        };
        let key = area_key(district);
        match counts.get_mut(&key) {
            Some(n) => *n += 1,
            None => *unmatched.entry(key).or_insert(0) += 1,
        }
    }

    for (district, n) in &unmatched {
        log::warn!("No income data for district '{district}' ({n} incidents)");
    }

    areas
        .iter()
        .map(|area| {
            let crimes = counts.get(&area_key(&area.area)).copied().unwrap_or(0);
            AreaIncomeCrime {
                area: area.area.clone(),
                median_income: area.median_income,
                bracket: IncomeBracket::of(area.median_income),
                crimes,
                population: area.population,
                crimes_per_thousand: area
                    .population
                    .filter(|p| *p > 0)
                    .map(|p| crimes as f64 * 1000.0 / p as f64),
            }
        })
        .collect()
}

/// Mean incidents per area in each income bracket.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn bracket_means(rows: &[AreaIncomeCrime]) -> BTreeMap<IncomeBracket, f64> {
    let mut sums: BTreeMap<IncomeBracket, (u64, usize)> = BTreeMap::new();
    for row in rows {
        let entry = sums.entry(row.bracket).or_insert((0, 0));
        entry.0 += row.crimes;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(bracket, (total, n))| (bracket, total as f64 / n as f64))
        .collect()
}

/// Compares daily counts near holidays with the remaining days.
///
/// `holidays` selects which holidays get an individual [`HolidayLift`];
/// typically the entries of the year `daily` covers.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn holiday_window_summary(
    daily: &[DailyCount],
    window: &HolidayWindow,
    holidays: &[HolidayEntry],
) -> HolidayWindowSummary {
    let radius = i64::from(window.radius_days());

    let mut near: Vec<f64> = Vec::new();
    let mut baseline: Vec<f64> = Vec::new();
    for day in daily {
        if window.classify(day.date).is_near_holiday() {
            near.push(day.count as f64);
        } else {
            baseline.push(day.count as f64);
        }
    }
    let baseline_mean = mean_or_zero(&baseline);

    let lifts = holidays
        .iter()
        .filter_map(|entry| {
            let in_window: Vec<f64> = daily
                .iter()
                .filter(|day| (day.date - entry.date).num_days().abs() <= radius)
                .filter(|day| {
                    matches!(
                        window.classify(day.date),
                        DayClass::NearHoliday { holiday, .. } if holiday == entry.holiday
                    )
                })
                .map(|day| day.count as f64)
                .collect();
            if in_window.is_empty() {
                return None;
            }
            let window_mean = mean_or_zero(&in_window);
            Some(HolidayLift {
                holiday: entry.holiday,
                date: entry.date,
                window_days: in_window.len(),
                window_mean,
                lift_pct: (baseline_mean > 0.0)
                    .then(|| (window_mean - baseline_mean) / baseline_mean * 100.0),
            })
        })
        .collect();

    HolidayWindowSummary {
        radius_days: window.radius_days(),
        near_holiday_days: near.len(),
        baseline_days: baseline.len(),
        near_holiday_mean: mean_or_zero(&near),
        baseline_mean,
        lifts,
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use crime_analysis_calendar::HolidayCalendar;
    use crime_analysis_calendar_models::Holiday;
    use crime_analysis_crime_models::CrimeSubcategory;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn in_district(district: Option<&str>) -> CrimeRecord {
        CrimeRecord {
            incident_id: "I1".to_string(),
            occurred_on: date(2021, 6, 1),
            hour: 12,
            offense_code: "00619".to_string(),
            crime_type: "Larceny".to_string(),
            subcategory: CrimeSubcategory::LarcenyTheft,
            district: district.map(ToString::to_string),
            latitude: None,
            longitude: None,
            typology: None,
        }
    }

    #[test]
    fn weather_join_is_inner_and_fills_blank_precipitation() {
        let daily = vec![
            DailyCount { date: date(2021, 1, 1), count: 10 },
            DailyCount { date: date(2021, 1, 2), count: 12 },
            DailyCount { date: date(2021, 1, 3), count: 8 },
        ];
        let weather = vec![
            WeatherObservation {
                date: date(2021, 1, 1),
                precipitation: Some(0.2),
                snowfall: None,
                avg_temperature: Some(31.0),
            },
            WeatherObservation {
                date: date(2021, 1, 3),
                precipitation: None,
                snowfall: Some(1.5),
                avg_temperature: None,
            },
            WeatherObservation {
                date: date(2021, 1, 4),
                precipitation: None,
                snowfall: None,
                avg_temperature: Some(20.0),
            },
        ];

        let joined = combine_weather(&daily, &weather);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].crimes, 10);
        assert!((joined[0].snowfall).abs() < f64::EPSILON);
    }

    #[test]
    fn income_join_counts_per_district() {
        let records = vec![
            in_district(Some("B2")),
            in_district(Some("b2 ")),
            in_district(Some("D4")),
            in_district(Some("Z9")),
            in_district(None),
        ];
        let areas = vec![
            IncomeArea {
                area: "B2".to_string(),
                median_income: 42_000.0,
                population: Some(2_000),
            },
            IncomeArea {
                area: "D4".to_string(),
                median_income: 105_000.0,
                population: None,
            },
            IncomeArea {
                area: "A1".to_string(),
                median_income: 75_000.0,
                population: Some(0),
            },
        ];

        let rows = join_income(&records, &areas);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].crimes, 2);
        assert_eq!(rows[0].bracket, IncomeBracket::Low);
        assert_eq!(rows[0].crimes_per_thousand, Some(1.0));
        assert_eq!(rows[1].crimes, 1);
        assert_eq!(rows[1].bracket, IncomeBracket::High);
        assert_eq!(rows[2].crimes, 0);
        assert_eq!(rows[2].bracket, IncomeBracket::Middle);
        assert_eq!(rows[2].crimes_per_thousand, None);

        let means = bracket_means(&rows);
        assert!((means[&IncomeBracket::Low] - 2.0).abs() < f64::EPSILON);
        assert!((means[&IncomeBracket::Middle]).abs() < f64::EPSILON);
    }

    #[test]
    fn holiday_summary_splits_days() {
        let calendar = HolidayCalendar::default();
        let holidays = calendar.holidays_for(2020).unwrap();
        let window = HolidayWindow::new(&holidays, 1);

        // Three days around July 4th at 20 incidents, two baseline days at 10.
        let daily = vec![
            DailyCount { date: date(2020, 7, 3), count: 20 },
            DailyCount { date: date(2020, 7, 4), count: 20 },
            DailyCount { date: date(2020, 7, 5), count: 20 },
            DailyCount { date: date(2020, 7, 10), count: 10 },
            DailyCount { date: date(2020, 7, 11), count: 10 },
        ];

        let summary = holiday_window_summary(&daily, &window, &holidays);
        assert_eq!(summary.near_holiday_days, 3);
        assert_eq!(summary.baseline_days, 2);
        assert!((summary.near_holiday_mean - 20.0).abs() < f64::EPSILON);
        assert!((summary.baseline_mean - 10.0).abs() < f64::EPSILON);

        assert_eq!(summary.lifts.len(), 1);
        let lift = &summary.lifts[0];
        assert_eq!(lift.holiday, Holiday::IndependenceDay);
        assert_eq!(lift.window_days, 3);
        assert_eq!(lift.lift_pct, Some(100.0));
    }
}
