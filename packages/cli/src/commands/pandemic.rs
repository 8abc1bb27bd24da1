//! Year-over-year shift in when and what crime happens.

use crime_analysis_analytics::bucketing::bucket_by_time_as;
use crime_analysis_analytics::comparison::compare;
use crime_analysis_analytics_models::{ComparisonTable, TimeBucket, TimeGranularity};
use crime_analysis_chart::heatmap::write_shift_heatmap;
use crime_analysis_crime_models::CrimeRecord;
use serde::Serialize;

use super::{Context, Label};
use crate::data::{self, City};
use crate::report;

/// Options for [`run`].
#[derive(Debug, Clone, Copy)]
pub struct PandemicOptions {
    pub before_year: i32,
    pub after_year: i32,
    pub granularity: TimeGranularity,
    pub label: Label,
}

impl PandemicOptions {
    /// Rejects option combinations that cannot produce a comparison.
    ///
    /// Yearly buckets put each side in its own bucket, so every cell would
    /// be compared against an empty column.
    ///
    /// # Errors
    ///
    /// Returns a message naming the rejected option.
    pub fn check(&self) -> Result<(), String> {
        if self.before_year == self.after_year {
            return Err(format!("before and after year are both {}", self.before_year));
        }
        if self.granularity == TimeGranularity::Year {
            return Err(
                "year-over-year comparison needs hour or day buckets, not year".to_string(),
            );
        }
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PandemicSummary {
    before_year: i32,
    after_year: i32,
    granularity: TimeGranularity,
    /// Change in total incidents, percent.
    total_change_pct: Option<f64>,
    table: ComparisonTable<TimeBucket>,
}

/// Compares Boston's crime mix between two years.
///
/// # Errors
///
/// Returns an error if the options are rejected by [`PandemicOptions::check`],
/// the dataset cannot be loaded or bucketed, or an output cannot be written.
#[allow(clippy::cast_precision_loss)]
pub fn run(ctx: &Context, options: PandemicOptions) -> Result<(), Box<dyn std::error::Error>> {
    let PandemicOptions {
        before_year,
        after_year,
        granularity,
        label,
    } = options;
    options.check()?;

    let crimes = data::crimes(&ctx.config, &ctx.multi, City::Boston)?;
    let in_year = |year: i32| crimes.iter().filter(move |r: &&CrimeRecord| r.year() == year);

    let before = bucket_by_time_as(in_year(before_year), granularity, label.into())?;
    let after = bucket_by_time_as(in_year(after_year), granularity, label.into())?;
    if before.is_empty() || after.is_empty() {
        log::warn!(
            "No incidents in {}",
            if before.is_empty() { before_year } else { after_year }
        );
    }

    let (before_label, after_label) = (before_year.to_string(), after_year.to_string());
    let table = compare(&before, &after, &before_label, &after_label);
    let total_change_pct = (table.before_total > 0).then(|| {
        (table.after_total as f64 - table.before_total as f64) / table.before_total as f64 * 100.0
    });

    println!(
        "Boston {before_year}: {} incidents, {after_year}: {} incidents ({})",
        table.before_total,
        table.after_total,
        report::percent(total_change_pct),
    );
    println!();
    println!("Largest share shifts by {granularity} (percentage points):");
    for row in table.largest_shifts(ctx.config.report.top_shifts) {
        println!(
            "  {:<28} {:>5}  {:>6} -> {:>6}  {:+.2} pp  ({})",
            row.crime_type,
            row.bucket.to_string(),
            row.before,
            row.after,
            row.share_delta_pp,
            report::percent(row.percent_change),
        );
    }

    let top: Vec<String> = {
        let mut merged = before.clone();
        merged.merge(&after);
        merged.top_crime_types(ctx.config.report.top_crime_types)
    };
    let shown = compare(
        &before.restricted_to(&top),
        &after.restricted_to(&top),
        &before_label,
        &after_label,
    );
    let stem = format!("pandemic_{before_year}_{after_year}_{granularity}");
    write_shift_heatmap(
        &ctx.output_path(&format!("{stem}.svg")),
        &format!("Share shift by {granularity}, {before_year} to {after_year} (pp)"),
        &shown,
    )?;

    report::write_summary(
        ctx.output_dir(),
        &stem,
        &PandemicSummary {
            before_year,
            after_year,
            granularity,
            total_change_pct,
            table,
        },
    )?;
    Ok(())
}
