//! Daily incident line chart with holiday markers.

use std::path::Path;

use chrono::Days;
use crime_analysis_analytics_models::joined::DailyCount;
use crime_analysis_calendar_models::HolidayEntry;
use plotters::prelude::*;

use crate::{ChartError, DEFAULT_SIZE, drawing, padded, write_svg};

/// Inputs for [`render_holiday_timeline`].
#[derive(Debug, Clone, Copy)]
pub struct HolidayTimeline<'a> {
    pub title: &'a str,
    pub daily: &'a [DailyCount],
    pub holidays: &'a [HolidayEntry],
    /// Fixed y-axis range; derived from the counts when `None`.
    pub y_range: Option<(f64, f64)>,
}

/// Renders daily counts as a line with a vertical marker and short label at
/// every holiday inside the plotted range.
///
/// # Errors
///
/// Returns [`ChartError::EmptyData`] without daily counts, or
/// [`ChartError::Drawing`] if plotting fails.
#[allow(clippy::cast_precision_loss)]
pub fn render_holiday_timeline(chart: &HolidayTimeline<'_>) -> Result<String, ChartError> {
    let (Some(first), Some(last)) = (chart.daily.first(), chart.daily.last()) else {
        return Err(ChartError::EmptyData("holiday timeline"));
    };
    let start = first.date;
    let x_max = (last.date - start).num_days().max(1) as f64;
    let offset = |date: chrono::NaiveDate| (date - start).num_days() as f64;

    let (low, high) = chart.y_range.unwrap_or_else(|| {
        let max = chart.daily.iter().map(|d| d.count).max().unwrap_or(0) as f64;
        let min = chart.daily.iter().map(|d| d.count).min().unwrap_or(0) as f64;
        padded(min, max)
    });

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, DEFAULT_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(drawing("fill background"))?;

        let mut plot = ChartBuilder::on(&root)
            .caption(chart.title, ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..x_max, low..high)
            .map_err(drawing("build chart"))?;

        let date_label = |x: &f64| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let days = x.round().max(0.0) as u64;
            start
                .checked_add_days(Days::new(days))
                .map_or_else(String::new, |d| d.format("%b %d").to_string())
        };

        plot.configure_mesh()
            .x_labels(12)
            .x_label_formatter(&date_label)
            .x_desc("Date")
            .y_desc("Incidents per day")
            .draw()
            .map_err(drawing("draw axes"))?;

        plot.draw_series(LineSeries::new(
            chart.daily.iter().map(|d| (offset(d.date), d.count as f64)),
            BLUE,
        ))
        .map_err(drawing("draw daily counts"))?;

        let visible = chart
            .holidays
            .iter()
            .filter(|h| h.date >= first.date && h.date <= last.date);
        for holiday in visible {
            let x = offset(holiday.date);
            plot.draw_series(std::iter::once(PathElement::new(
                vec![(x, low), (x, high)],
                RED.mix(0.6),
            )))
            .map_err(drawing("draw holiday marker"))?;
            plot.draw_series(std::iter::once(Text::new(
                holiday.holiday.short_label(),
                (x, (high - low).mul_add(0.97, low)),
                ("sans-serif", 12).into_font().color(&RED),
            )))
            .map_err(drawing("draw holiday label"))?;
        }

        root.present().map_err(drawing("present chart"))?;
    }
    Ok(svg)
}

/// Renders the timeline and writes it to `path`.
///
/// # Errors
///
/// Returns [`ChartError`] if rendering or writing fails.
pub fn write_holiday_timeline(path: &Path, chart: &HolidayTimeline<'_>) -> Result<(), ChartError> {
    write_svg(path, &render_holiday_timeline(chart)?)
}
