//! Daily counts around holidays for one year.

use crime_analysis_analytics::bucketing::daily_counts_for_year;
use crime_analysis_analytics::preprocess::holiday_window_summary;
use crime_analysis_analytics_models::joined::HolidayWindowSummary;
use crime_analysis_calendar::HolidayWindow;
use crime_analysis_chart::timeline::{HolidayTimeline, write_holiday_timeline};
use serde::Serialize;

use super::Context;
use crate::data::{self, City};
use crate::report;

/// Options for [`run`].
#[derive(Debug, Clone, Copy)]
pub struct HolidayChartOptions {
    pub year: i32,
    /// Fixed y-axis bounds; both must be given to take effect.
    pub low: Option<f64>,
    pub high: Option<f64>,
    /// Overrides the configured holiday window radius.
    pub window_days: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HolidayChartSummary {
    year: i32,
    total_incidents: u64,
    #[serde(flatten)]
    window: HolidayWindowSummary,
}

/// Plots Boston's daily counts for one year with holiday markers and
/// compares days near holidays with the rest.
///
/// # Errors
///
/// Returns an error if the year is outside the calendar range, the crime
/// dataset cannot be loaded, or an output cannot be written.
pub fn run(ctx: &Context, options: HolidayChartOptions) -> Result<(), Box<dyn std::error::Error>> {
    let year = options.year;
    let radius = options
        .window_days
        .unwrap_or(ctx.config.holidays.window_days);

    let calendar = ctx.calendar()?;
    let holidays = calendar.holidays_for(year)?;
    let window = HolidayWindow::for_years(&calendar, year, year, radius)?;

    let crimes = data::crimes(&ctx.config, &ctx.multi, City::Boston)?;
    let daily = daily_counts_for_year(&crimes, year);
    let total_incidents: u64 = daily.iter().map(|d| d.count).sum();
    if total_incidents == 0 {
        log::warn!("No Boston incidents recorded in {year}");
    }

    let y_range = match (options.low, options.high) {
        (Some(low), Some(high)) if low < high => Some((low, high)),
        (None, None) => None,
        (low, high) => {
            log::warn!("Ignoring y-axis bounds {low:?}..{high:?}; need both, low < high");
            None
        }
    };

    write_holiday_timeline(
        &ctx.output_path(&format!("holidays_{year}.svg")),
        &HolidayTimeline {
            title: &format!("Boston daily incidents, {year}"),
            daily: &daily,
            holidays: &holidays,
            y_range,
        },
    )?;

    let summary = holiday_window_summary(&daily, &window, &holidays);

    println!(
        "Boston {year}: {total_incidents} incidents; window of ±{} days",
        summary.radius_days
    );
    println!(
        "  near holidays: {:>4} days, mean {:.1} per day",
        summary.near_holiday_days, summary.near_holiday_mean
    );
    println!(
        "  baseline:      {:>4} days, mean {:.1} per day",
        summary.baseline_days, summary.baseline_mean
    );
    println!();
    println!("{:<12} {:<32} {:>10} {:>8}", "DATE", "HOLIDAY", "MEAN/DAY", "LIFT");
    for lift in &summary.lifts {
        println!(
            "{:<12} {:<32} {:>10.1} {:>8}",
            lift.date.format("%Y-%m-%d"),
            lift.holiday.name(),
            lift.window_mean,
            report::percent(lift.lift_pct),
        );
    }

    report::write_summary(
        ctx.output_dir(),
        &format!("holiday_chart_{year}"),
        &HolidayChartSummary {
            year,
            total_incidents,
            window: summary,
        },
    )?;
    Ok(())
}
