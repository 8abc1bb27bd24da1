//! Boston against Denver: do the two cities share their time patterns?

use std::collections::BTreeSet;

use crime_analysis_analytics::bucketing::bucket_by_time_as;
use crime_analysis_analytics::comparison::compare;
use crime_analysis_analytics::stats::correlate;
use crime_analysis_analytics_models::stats::Correlation;
use crime_analysis_analytics_models::{BucketedSeries, ComparisonTable, TimeBucket, TimeGranularity};
use crime_analysis_chart::heatmap::write_shift_heatmap;
use serde::Serialize;

use super::{Context, Label};
use crate::data::{self, City};
use crate::report;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareCitiesSummary {
    granularity: TimeGranularity,
    /// Correlation of the two cities' per-bucket totals.
    pattern_correlation: Option<Correlation>,
    table: ComparisonTable<TimeBucket>,
}

/// Compares each city's share of incidents per crime type and bucket.
///
/// Rows are labelled with the shared taxonomy by default, since the two
/// cities name their offenses differently.
///
/// # Errors
///
/// Returns an error if either dataset cannot be loaded or bucketed, or an
/// output cannot be written.
pub fn run(
    ctx: &Context,
    granularity: TimeGranularity,
    label: Label,
) -> Result<(), Box<dyn std::error::Error>> {
    let alpha = ctx.config.stats.alpha;
    let boston = data::crimes(&ctx.config, &ctx.multi, City::Boston)?;
    let denver = data::crimes(&ctx.config, &ctx.multi, City::Denver)?;

    let boston = bucket_by_time_as(&boston, granularity, label.into())?;
    let denver = bucket_by_time_as(&denver, granularity, label.into())?;

    let table = compare(&boston, &denver, City::Boston.label(), City::Denver.label());

    println!(
        "Boston ({} incidents) vs Denver ({} incidents) by {granularity}",
        table.before_total, table.after_total
    );

    let (boston_totals, denver_totals) = bucket_totals(&boston, &denver);
    let pattern_correlation = match correlate(&boston_totals, &denver_totals, alpha) {
        Ok(correlation) => {
            println!(
                "Per-{granularity} totals: {}",
                report::describe_correlation(&correlation, alpha)
            );
            Some(correlation)
        }
        Err(e) => {
            log::warn!("Skipping pattern correlation: {e}");
            None
        }
    };

    println!();
    println!("Largest share differences (Denver minus Boston, percentage points):");
    for row in table.largest_shifts(ctx.config.report.top_shifts) {
        println!(
            "  {:<28} {:>5}  {:>6.2}% -> {:>6.2}%  ({:+.2} pp)",
            row.crime_type,
            row.bucket.to_string(),
            row.share_before_pct,
            row.share_after_pct,
            row.share_delta_pp,
        );
    }

    let top: Vec<String> = {
        let mut merged = boston.clone();
        merged.merge(&denver);
        merged.top_crime_types(ctx.config.report.top_crime_types)
    };
    let shown = compare(
        &boston.restricted_to(&top),
        &denver.restricted_to(&top),
        City::Boston.label(),
        City::Denver.label(),
    );
    let stem = format!("compare_cities_{granularity}");
    write_shift_heatmap(
        &ctx.output_path(&format!("{stem}.svg")),
        &format!("Share of incidents by {granularity}: Denver vs Boston (pp)"),
        &shown,
    )?;

    report::write_summary(
        ctx.output_dir(),
        &stem,
        &CompareCitiesSummary {
            granularity,
            pattern_correlation,
            table,
        },
    )?;
    Ok(())
}

/// Per-bucket totals of both series over the union of their buckets.
#[allow(clippy::cast_precision_loss)]
fn bucket_totals(
    a: &BucketedSeries<TimeBucket>,
    b: &BucketedSeries<TimeBucket>,
) -> (Vec<f64>, Vec<f64>) {
    let buckets: BTreeSet<&TimeBucket> = a.buckets().chain(b.buckets()).collect();
    buckets
        .into_iter()
        .map(|bucket| (a.bucket_total(bucket) as f64, b.bucket_total(bucket) as f64))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_cover_both_year_ranges() {
        let mut a = BucketedSeries::new(TimeBucket::years(2018, 2019));
        a.try_add("Larceny", TimeBucket::Year(2018), 4).unwrap();
        let mut b = BucketedSeries::new(TimeBucket::years(2019, 2020));
        b.try_add("Larceny", TimeBucket::Year(2020), 6).unwrap();

        let (left, right) = bucket_totals(&a, &b);
        assert_eq!(left, vec![4.0, 0.0, 0.0]);
        assert_eq!(right, vec![0.0, 0.0, 6.0]);
    }
}
