//! Crime type × time bucket heatmap for one city.

use crime_analysis_analytics::bucketing::bucket_by_time_as;
use crime_analysis_analytics_models::{SeriesCell, TimeBucket, TimeGranularity};
use crime_analysis_chart::heatmap::write_count_heatmap;
use serde::Serialize;

use super::{Context, Label};
use crate::data::{self, City};
use crate::report;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HeatmapSummary {
    city: &'static str,
    granularity: TimeGranularity,
    total_incidents: u64,
    /// Crime types shown, most frequent first.
    crime_types: Vec<String>,
    cells: Vec<SeriesCell<TimeBucket>>,
}

/// Draws incident counts per crime type and bucket.
///
/// # Errors
///
/// Returns an error if the crime dataset cannot be loaded or bucketed, or
/// an output cannot be written.
pub fn run(
    ctx: &Context,
    city: City,
    granularity: TimeGranularity,
    label: Label,
) -> Result<(), Box<dyn std::error::Error>> {
    let crimes = data::crimes(&ctx.config, &ctx.multi, city)?;
    let series = bucket_by_time_as(&crimes, granularity, label.into())?;

    let top = series.top_crime_types(ctx.config.report.top_crime_types);
    let shown = series.restricted_to(&top);

    println!(
        "{}: {} incidents across {} crime types; showing the top {}",
        city.label(),
        series.total(),
        series.crime_types().count(),
        top.len(),
    );
    let peak = shown
        .buckets()
        .max_by_key(|bucket| shown.bucket_total(bucket));
    if let Some(peak) = peak {
        println!(
            "Busiest {granularity}: {peak} ({} incidents)",
            shown.bucket_total(peak)
        );
    }

    let stem = format!("heatmap_{}_{granularity}", city.as_str());
    write_count_heatmap(
        &ctx.output_path(&format!("{stem}.svg")),
        &format!("{} incidents by {granularity}", city.label()),
        &shown,
    )?;

    report::write_summary(
        ctx.output_dir(),
        &stem,
        &HeatmapSummary {
            city: city.as_str(),
            granularity,
            total_incidents: series.total(),
            crime_types: top,
            cells: shown.cells(),
        },
    )?;
    Ok(())
}
