//! Holiday table for one year.

use crime_analysis_calendar_models::HolidayEntry;
use serde::Serialize;

use super::Context;
use crate::report;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HolidaysSummary<'a> {
    year: i32,
    holidays: &'a [HolidayEntry],
}

/// Prints the holidays observed in `year`.
///
/// # Errors
///
/// Returns an error if `year` is outside the configured calendar range or
/// the summary cannot be written.
pub fn run(ctx: &Context, year: i32) -> Result<(), Box<dyn std::error::Error>> {
    let entries = ctx.calendar()?.holidays_for(year)?;

    println!("{:<12} {:<4} {:<9} NAME", "DATE", "DAY", "LABEL");
    println!("{}", "-".repeat(60));
    for entry in &entries {
        println!(
            "{:<12} {:<4} {:<9} {}",
            entry.date.format("%Y-%m-%d"),
            entry.date.format("%a"),
            entry.holiday.short_label(),
            entry.holiday.name(),
        );
    }

    report::write_summary(
        ctx.output_dir(),
        &format!("holidays_{year}"),
        &HolidaysSummary {
            year,
            holidays: &entries,
        },
    )?;
    Ok(())
}
