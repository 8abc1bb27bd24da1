//! Counting incidents per crime type and bucket.

use std::fmt::Debug;

use chrono::NaiveDate;
use crime_analysis_analytics_models::joined::DailyCount;
use crime_analysis_analytics_models::{BucketedSeries, TimeBucket, TimeGranularity};
use crime_analysis_crime_models::CrimeRecord;

use crate::AnalyticsError;

/// Which name a record is counted under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CrimeLabel {
    /// The dataset's own crime type label.
    #[default]
    Reported,
    /// The shared subcategory, comparable across cities.
    Subcategory,
    /// The shared top-level category.
    Category,
}

impl CrimeLabel {
    /// The row label of `record` under this labelling.
    #[must_use]
    pub fn of(self, record: &CrimeRecord) -> String {
        match self {
            Self::Reported => record.crime_type.clone(),
            Self::Subcategory => record.subcategory.to_string(),
            Self::Category => record.category().to_string(),
        }
    }
}

/// The bucket one record falls in at `granularity`.
///
/// # Errors
///
/// Returns [`AnalyticsError::BucketOutOfDomain`] if the record's hour is
/// not in 0-23.
pub fn bucket_key(
    record: &CrimeRecord,
    granularity: TimeGranularity,
) -> Result<TimeBucket, AnalyticsError> {
    match granularity {
        TimeGranularity::Hour if record.hour > 23 => Err(AnalyticsError::out_of_domain(
            record.crime_type.clone(),
            &record.hour,
            granularity.to_string(),
        )),
        TimeGranularity::Hour => Ok(TimeBucket::Hour(record.hour)),
        TimeGranularity::DayOfWeek => Ok(TimeBucket::DayOfWeek(record.weekday())),
        TimeGranularity::Year => Ok(TimeBucket::Year(record.year())),
    }
}

/// Counts `records` per crime type and time bucket.
///
/// Hour and day-of-week series cover their full fixed domain. A year series
/// covers every year from the earliest to the latest record, so years with
/// no incidents still appear as zero columns.
///
/// # Errors
///
/// Returns [`AnalyticsError::BucketOutOfDomain`] if a record cannot be
/// bucketed.
pub fn bucket_by_time<'a>(
    records: impl IntoIterator<Item = &'a CrimeRecord>,
    granularity: TimeGranularity,
) -> Result<BucketedSeries<TimeBucket>, AnalyticsError> {
    bucket_by_time_as(records, granularity, CrimeLabel::Reported)
}

/// [`bucket_by_time`] with rows named by `label` instead of the reported
/// crime type.
///
/// # Errors
///
/// Returns [`AnalyticsError::BucketOutOfDomain`] if a record cannot be
/// bucketed.
pub fn bucket_by_time_as<'a>(
    records: impl IntoIterator<Item = &'a CrimeRecord>,
    granularity: TimeGranularity,
    label: CrimeLabel,
) -> Result<BucketedSeries<TimeBucket>, AnalyticsError> {
    let records: Vec<&CrimeRecord> = records.into_iter().collect();

    let domain = TimeBucket::fixed_domain(granularity).unwrap_or_else(|| {
        let years = records.iter().map(|r| r.year());
        match (years.clone().min(), years.max()) {
            (Some(first), Some(last)) => TimeBucket::years(first, last),
            _ => Vec::new(),
        }
    });

    let mut series = BucketedSeries::new(domain);
    for record in records {
        let bucket = bucket_key(record, granularity)?;
        series.try_add(&label.of(record), bucket, 1).map_err(|e| {
            AnalyticsError::out_of_domain(e.crime_type, &e.bucket, granularity.to_string())
        })?;
    }

    log::debug!(
        "Bucketed {} incidents by {granularity} into {} crime types",
        series.total(),
        series.crime_types().count()
    );
    Ok(series)
}

/// Counts `records` per crime type under an arbitrary key.
///
/// Used for district and building-typology breakdowns. Rows are named by
/// `label`; `domain_name` only labels errors.
///
/// # Errors
///
/// Returns [`AnalyticsError::BucketOutOfDomain`] if `key` yields a value
/// outside `domain`.
pub fn aggregate_by<'a, K, F>(
    records: impl IntoIterator<Item = &'a CrimeRecord>,
    domain: impl IntoIterator<Item = K>,
    domain_name: &str,
    label: CrimeLabel,
    key: F,
) -> Result<BucketedSeries<K>, AnalyticsError>
where
    K: Ord + Clone + Debug,
    F: Fn(&CrimeRecord) -> K,
{
    let mut series = BucketedSeries::new(domain);
    for record in records {
        series
            .try_add(&label.of(record), key(record), 1)
            .map_err(|e| AnalyticsError::out_of_domain(e.crime_type, &e.bucket, domain_name))?;
    }
    Ok(series)
}

/// Incidents per day over `first..=last`, zero-filled.
///
/// Records outside the range are ignored.
#[must_use]
pub fn daily_counts<'a>(
    records: impl IntoIterator<Item = &'a CrimeRecord>,
    first: NaiveDate,
    last: NaiveDate,
) -> Vec<DailyCount> {
    let mut counts: Vec<DailyCount> = first
        .iter_days()
        .take_while(|d| *d <= last)
        .map(|date| DailyCount { date, count: 0 })
        .collect();

    for record in records {
        if record.occurred_on < first || record.occurred_on > last {
            continue;
        }
        let Ok(index) = usize::try_from((record.occurred_on - first).num_days()) else {
            continue;
        };
        if let Some(day) = counts.get_mut(index) {
            day.count += 1;
        }
    }

    counts
}

/// Incidents per day over one calendar year, zero-filled.
#[must_use]
pub fn daily_counts_for_year<'a>(
    records: impl IntoIterator<Item = &'a CrimeRecord>,
    year: i32,
) -> Vec<DailyCount> {
    match (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) {
        (Some(first), Some(last)) => daily_counts(records, first, last),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;
    use crime_analysis_crime_models::{CrimeSubcategory, Typology};

    use super::*;

    fn record(id: &str, date: &str, hour: u8, crime_type: &str) -> CrimeRecord {
        CrimeRecord {
            incident_id: id.to_string(),
            occurred_on: date.parse().unwrap(),
            hour,
            offense_code: "00000".to_string(),
            crime_type: crime_type.to_string(),
            subcategory: CrimeSubcategory::Unknown,
            district: None,
            latitude: None,
            longitude: None,
            typology: None,
        }
    }

    fn fixture() -> Vec<CrimeRecord> {
        vec![
            record("1", "2020-11-26", 23, "Larceny"),
            record("2", "2020-11-27", 0, "Larceny"),
            record("3", "2020-12-25", 14, "Larceny"),
            record("4", "2018-03-05", 9, "Fraud"),
            record("5", "2020-03-09", 9, "Fraud"),
        ]
    }

    #[test]
    fn day_of_week_scenario() {
        let records: Vec<CrimeRecord> = fixture().into_iter().take(3).collect();
        let series = bucket_by_time(&records, TimeGranularity::DayOfWeek).unwrap();
        assert_eq!(series.count("Larceny", &TimeBucket::DayOfWeek(Weekday::Thu)), 1);
        assert_eq!(series.count("Larceny", &TimeBucket::DayOfWeek(Weekday::Fri)), 2);
        assert_eq!(series.count("Larceny", &TimeBucket::DayOfWeek(Weekday::Mon)), 0);
    }

    #[test]
    fn counts_are_conserved_at_every_granularity() {
        let records = fixture();
        for granularity in TimeGranularity::all() {
            let series = bucket_by_time(&records, *granularity).unwrap();
            assert_eq!(series.total(), records.len() as u64, "{granularity}");
        }
    }

    #[test]
    fn order_does_not_matter() {
        let records = fixture();
        let mut reversed = records.clone();
        reversed.reverse();
        for granularity in TimeGranularity::all() {
            assert_eq!(
                bucket_by_time(&records, *granularity).unwrap(),
                bucket_by_time(&reversed, *granularity).unwrap()
            );
        }
    }

    #[test]
    fn year_domain_is_contiguous() {
        let series = bucket_by_time(&fixture(), TimeGranularity::Year).unwrap();
        let years: Vec<String> = series.buckets().map(ToString::to_string).collect();
        assert_eq!(years, vec!["2018", "2019", "2020"]);
        assert_eq!(series.bucket_total(&TimeBucket::Year(2019)), 0);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let series = bucket_by_time(&Vec::<CrimeRecord>::new(), TimeGranularity::Year).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.buckets().count(), 0);
    }

    #[test]
    fn hour_out_of_range_is_rejected() {
        let records = vec![record("1", "2020-01-01", 24, "Larceny")];
        let err = bucket_by_time(&records, TimeGranularity::Hour).unwrap_err();
        assert!(matches!(err, AnalyticsError::BucketOutOfDomain { .. }), "{err}");
    }

    #[test]
    fn aggregate_by_custom_key() {
        let mut records = fixture();
        records[0] = records[0].with_typology(Typology::Retail);
        let series = aggregate_by(
            &records,
            Typology::all().iter().copied(),
            "typology",
            CrimeLabel::Reported,
            |r| r.typology.unwrap_or(Typology::Other),
        )
        .unwrap();
        assert_eq!(series.count("Larceny", &Typology::Retail), 1);
        assert_eq!(series.count("Larceny", &Typology::Other), 2);
        assert_eq!(series.total(), 5);
    }

    #[test]
    fn aggregate_by_rejects_undeclared_key() {
        let err = aggregate_by(
            &fixture(),
            ["A1".to_string()],
            "district",
            CrimeLabel::Reported,
            |_| "B2".to_string(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("district"), "{err}");
    }

    #[test]
    fn relabels_by_category() {
        let mut records = fixture();
        records[0].subcategory = CrimeSubcategory::LarcenyTheft;
        records[1].subcategory = CrimeSubcategory::Fraud;
        let series =
            bucket_by_time_as(&records, TimeGranularity::Year, CrimeLabel::Category).unwrap();
        let types: Vec<&str> = series.crime_types().collect();
        assert_eq!(types, vec!["FRAUD_FINANCIAL", "OTHER", "PROPERTY"]);
        assert_eq!(series.total(), 5);
    }

    #[test]
    fn daily_counts_zero_fill() {
        let days = daily_counts_for_year(&fixture(), 2020);
        assert_eq!(days.len(), 366);
        let total: u64 = days.iter().map(|d| d.count).sum();
        assert_eq!(total, 4);
        let thanksgiving = days
            .iter()
            .find(|d| d.date == NaiveDate::from_ymd_opt(2020, 11, 26).unwrap())
            .unwrap();
        assert_eq!(thanksgiving.count, 1);
    }
}
