//! Crime type × bucket heatmaps.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::path::Path;

use crime_analysis_analytics_models::{BucketedSeries, ComparisonTable};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::{ChartError, drawing, write_svg};

const CELL_WIDTH: u32 = 48;
const CELL_HEIGHT: u32 = 28;
const LEFT_MARGIN: u32 = 220;
const BOTTOM_MARGIN: u32 = 70;

/// A labelled matrix of values with a colour rule.
struct Grid {
    columns: Vec<String>,
    rows: Vec<String>,
    /// `values[row][column]`.
    values: Vec<Vec<f64>>,
    decimals: usize,
}

/// Renders incident counts per crime type and bucket.
///
/// Darker cells hold more incidents; every cell shows its count.
///
/// # Errors
///
/// Returns [`ChartError::EmptyData`] for an empty series, or
/// [`ChartError::Drawing`] if plotting fails.
#[allow(clippy::cast_precision_loss)]
pub fn render_count_heatmap<K>(
    title: &str,
    series: &BucketedSeries<K>,
) -> Result<String, ChartError>
where
    K: Ord + Clone + Display,
{
    if series.is_empty() {
        return Err(ChartError::EmptyData("count heatmap"));
    }

    let (rows, values): (Vec<String>, Vec<Vec<f64>>) = series
        .grid()
        .into_iter()
        .map(|(crime_type, row)| (crime_type, row.into_iter().map(|n| n as f64).collect()))
        .unzip();
    let grid = Grid {
        columns: series.buckets().map(ToString::to_string).collect(),
        rows,
        values,
        decimals: 0,
    };
    let max = grid.values.iter().flatten().copied().fold(0.0_f64, f64::max);

    render_grid(title, &grid, |v| sequential(v, max))
}

/// Renders the percentage-point share shift of each cell of a comparison.
///
/// Cells that gained share are red, cells that lost share are blue.
///
/// # Errors
///
/// Returns [`ChartError::EmptyData`] for a table without rows, or
/// [`ChartError::Drawing`] if plotting fails.
pub fn render_shift_heatmap<K>(
    title: &str,
    table: &ComparisonTable<K>,
) -> Result<String, ChartError>
where
    K: Ord + Clone + Display,
{
    if table.rows.is_empty() {
        return Err(ChartError::EmptyData("comparison heatmap"));
    }

    let grid = shift_grid(table);
    let extent = grid
        .values
        .iter()
        .flatten()
        .map(|v| v.abs())
        .fold(0.0_f64, f64::max);

    render_grid(title, &grid, |v| diverging(v, extent))
}

/// Share shifts laid out with one column per bucket of the table's domain,
/// including buckets no crime type has a row for.
fn shift_grid<K: PartialEq + Display>(table: &ComparisonTable<K>) -> Grid {
    let crime_types: Vec<&str> = table
        .rows
        .iter()
        .map(|r| r.crime_type.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let values = crime_types
        .iter()
        .map(|t| {
            table
                .buckets
                .iter()
                .map(|b| table.row(t, b).map_or(0.0, |r| r.share_delta_pp))
                .collect()
        })
        .collect();

    Grid {
        columns: table.buckets.iter().map(ToString::to_string).collect(),
        rows: crime_types.iter().map(ToString::to_string).collect(),
        values,
        decimals: 2,
    }
}

/// Renders a count heatmap and writes it to `path`.
///
/// # Errors
///
/// Returns [`ChartError`] if rendering or writing fails.
pub fn write_count_heatmap<K>(
    path: &Path,
    title: &str,
    series: &BucketedSeries<K>,
) -> Result<(), ChartError>
where
    K: Ord + Clone + Display,
{
    write_svg(path, &render_count_heatmap(title, series)?)
}

/// Renders a share-shift heatmap and writes it to `path`.
///
/// # Errors
///
/// Returns [`ChartError`] if rendering or writing fails.
pub fn write_shift_heatmap<K>(
    path: &Path,
    title: &str,
    table: &ComparisonTable<K>,
) -> Result<(), ChartError>
where
    K: Ord + Clone + Display,
{
    write_svg(path, &render_shift_heatmap(title, table)?)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_lossless
)]
fn render_grid(
    title: &str,
    grid: &Grid,
    color: impl Fn(f64) -> RGBColor,
) -> Result<String, ChartError> {
    let (cell_w, cell_h) = (CELL_WIDTH as i32, CELL_HEIGHT as i32);
    let left = LEFT_MARGIN as i32;
    let top = 10;
    let size = (
        LEFT_MARGIN + CELL_WIDTH * grid.columns.len() as u32 + 40,
        BOTTOM_MARGIN + CELL_HEIGHT * grid.rows.len() as u32 + 60,
    );

    let centred = Pos::new(HPos::Center, VPos::Center);
    let value_style = TextStyle::from(("sans-serif", 11).into_font()).pos(centred);
    let row_style = TextStyle::from(("sans-serif", 13).into_font())
        .pos(Pos::new(HPos::Right, VPos::Center));
    let column_style = TextStyle::from(("sans-serif", 13).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing("fill background"))?;
        let area = root
            .titled(title, ("sans-serif", 22))
            .map_err(drawing("draw title"))?;

        for (r, (label, row)) in grid.rows.iter().zip(&grid.values).enumerate() {
            let y0 = top + r as i32 * cell_h;
            area.draw(&Text::new(
                label.as_str(),
                (left - 8, y0 + cell_h / 2),
                row_style.clone(),
            ))
            .map_err(drawing("draw row label"))?;

            for (c, value) in row.iter().enumerate() {
                let x0 = left + c as i32 * cell_w;
                area.draw(&Rectangle::new(
                    [(x0, y0), (x0 + cell_w, y0 + cell_h)],
                    color(*value).filled(),
                ))
                .map_err(drawing("draw cell"))?;
                area.draw(&Text::new(
                    format!("{value:.prec$}", prec = grid.decimals),
                    (x0 + cell_w / 2, y0 + cell_h / 2),
                    value_style.clone(),
                ))
                .map_err(drawing("draw cell value"))?;
            }
        }

        let bottom = top + grid.rows.len() as i32 * cell_h;
        for (c, label) in grid.columns.iter().enumerate() {
            area.draw(&Text::new(
                label.as_str(),
                (left + c as i32 * cell_w + cell_w / 2, bottom + 8),
                column_style.clone(),
            ))
            .map_err(drawing("draw column label"))?;
        }

        root.present().map_err(drawing("present chart"))?;
    }
    Ok(svg)
}

/// White to dark red by `value / max`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sequential(value: f64, max: f64) -> RGBColor {
    let t = if max > 0.0 { (value / max).clamp(0.0, 1.0) } else { 0.0 };
    let fade = (255.0 - 200.0 * t) as u8;
    RGBColor(255, fade, fade)
}

/// Blue for negative, white at zero, red for positive.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn diverging(value: f64, extent: f64) -> RGBColor {
    let t = if extent > 0.0 { (value / extent).clamp(-1.0, 1.0) } else { 0.0 };
    let fade = (255.0 - 200.0 * t.abs()) as u8;
    if t >= 0.0 {
        RGBColor(255, fade, fade)
    } else {
        RGBColor(fade, fade, 255)
    }
}
