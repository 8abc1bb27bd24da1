//! Cell-by-cell comparison of two bucketed series.

use std::collections::BTreeSet;

use crime_analysis_analytics_models::{BucketedSeries, ComparisonRow, ComparisonTable};

/// Compares `after` against `before`.
///
/// Rows cover every crime type counted in either series crossed with the
/// union of both bucket domains. A pair missing on one side counts as zero
/// there, so buckets without incidents still get a row.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compare<K: Ord + Clone>(
    before: &BucketedSeries<K>,
    after: &BucketedSeries<K>,
    before_label: &str,
    after_label: &str,
) -> ComparisonTable<K> {
    let crime_types: BTreeSet<&str> = before.crime_types().chain(after.crime_types()).collect();
    let buckets: BTreeSet<&K> = before.buckets().chain(after.buckets()).collect();

    let before_total = before.total();
    let after_total = after.total();

    let mut rows = Vec::new();
    for crime_type in &crime_types {
        for bucket in &buckets {
            let b = before.count(crime_type, bucket);
            let a = after.count(crime_type, bucket);

            let share_before_pct = share(b, before_total);
            let share_after_pct = share(a, after_total);
            rows.push(ComparisonRow {
                crime_type: (*crime_type).to_string(),
                bucket: (*bucket).clone(),
                before: b,
                after: a,
                delta: signed(a) - signed(b),
                percent_change: (b > 0).then(|| (signed(a) - signed(b)) as f64 / b as f64 * 100.0),
                share_before_pct,
                share_after_pct,
                share_delta_pp: share_after_pct - share_before_pct,
            });
        }
    }

    log::debug!(
        "Compared {before_label} ({before_total}) with {after_label} ({after_total}): {} rows",
        rows.len()
    );

    ComparisonTable {
        before_label: before_label.to_string(),
        after_label: after_label.to_string(),
        before_total,
        after_total,
        buckets: buckets.into_iter().cloned().collect(),
        rows,
    }
}

#[allow(clippy::cast_precision_loss)]
fn share(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn signed(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;
    use crime_analysis_analytics_models::{TimeBucket, TimeGranularity};

    use super::*;

    fn days() -> Vec<TimeBucket> {
        TimeBucket::fixed_domain(TimeGranularity::DayOfWeek).unwrap()
    }

    const MON: TimeBucket = TimeBucket::DayOfWeek(Weekday::Mon);

    #[test]
    fn zero_fills_both_sides() {
        let mut a = BucketedSeries::new(days());
        a.try_add("Larceny", MON, 5).unwrap();
        let mut b = BucketedSeries::new(days());
        b.try_add("Fraud", MON, 3).unwrap();

        let table = compare(&a, &b, "A", "B");
        assert_eq!(table.rows.len(), 2 * 7);

        let larceny = table.row("Larceny", &MON).unwrap();
        assert_eq!((larceny.before, larceny.after, larceny.delta), (5, 0, -5));
        assert_eq!(larceny.percent_change, Some(-100.0));

        let fraud = table.row("Fraud", &MON).unwrap();
        assert_eq!((fraud.before, fraud.after, fraud.delta), (0, 3, 3));
        assert_eq!(fraud.percent_change, None);
    }

    #[test]
    fn share_shift_is_in_percentage_points() {
        let mut before = BucketedSeries::new(days());
        before.try_add("Larceny", MON, 3).unwrap();
        before.try_add("Fraud", MON, 1).unwrap();
        let mut after = BucketedSeries::new(days());
        after.try_add("Larceny", MON, 1).unwrap();
        after.try_add("Fraud", MON, 1).unwrap();

        let table = compare(&before, &after, "2019", "2020");
        let larceny = table.row("Larceny", &MON).unwrap();
        assert!((larceny.share_before_pct - 75.0).abs() < 1e-9);
        assert!((larceny.share_after_pct - 50.0).abs() < 1e-9);
        assert!((larceny.share_delta_pp + 25.0).abs() < 1e-9);

        let top = table.largest_shifts(1);
        assert_eq!(top[0].share_delta_pp.abs(), 25.0);
    }

    #[test]
    fn different_year_domains_are_unioned() {
        let mut before = BucketedSeries::new(TimeBucket::years(2019, 2019));
        before.try_add("Larceny", TimeBucket::Year(2019), 4).unwrap();
        let mut after = BucketedSeries::new(TimeBucket::years(2020, 2020));
        after.try_add("Larceny", TimeBucket::Year(2020), 2).unwrap();

        let table = compare(&before, &after, "2019", "2020");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.row("Larceny", &TimeBucket::Year(2020)).unwrap().before, 0);
    }

    #[test]
    fn quiet_hours_keep_their_rows() {
        let hours = TimeBucket::fixed_domain(TimeGranularity::Hour).unwrap();
        let mut before = BucketedSeries::new(hours.clone());
        before.try_add("Larceny", TimeBucket::Hour(1), 2).unwrap();
        let mut after = BucketedSeries::new(hours);
        after.try_add("Larceny", TimeBucket::Hour(2), 1).unwrap();

        let table = compare(&before, &after, "2019", "2020");
        assert_eq!(table.buckets.len(), 24);
        assert_eq!(table.rows.len(), 24);

        let quiet = table.row("Larceny", &TimeBucket::Hour(5)).unwrap();
        assert_eq!((quiet.before, quiet.after, quiet.delta), (0, 0, 0));
        assert_eq!(quiet.percent_change, None);
        assert!(quiet.share_delta_pp.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_series_compare_to_empty_table() {
        let empty: BucketedSeries<TimeBucket> = BucketedSeries::new(days());
        let table = compare(&empty, &empty, "a", "b");
        assert!(table.rows.is_empty());
        assert_eq!(table.buckets.len(), 7);
        assert_eq!(table.before_total, 0);
    }
}
