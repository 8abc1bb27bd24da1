//! Scatter plot with an optional least-squares line.

use std::path::Path;

use crime_analysis_analytics_models::stats::LinearRegression;
use plotters::prelude::*;

use crate::{ChartError, DEFAULT_SIZE, drawing, padded, write_svg};

/// Inputs for [`render_scatter`].
#[derive(Debug, Clone, Copy)]
pub struct ScatterChart<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub points: &'a [(f64, f64)],
    pub fit: Option<&'a LinearRegression>,
}

/// Renders the scatter plot as an SVG document.
///
/// # Errors
///
/// Returns [`ChartError::EmptyData`] without points, or
/// [`ChartError::Drawing`] if plotting fails.
pub fn render_scatter(chart: &ScatterChart<'_>) -> Result<String, ChartError> {
    if chart.points.is_empty() {
        return Err(ChartError::EmptyData("scatter plot"));
    }

    let (x_min, x_max) = bounds(chart.points.iter().map(|p| p.0));
    let (y_min, y_max) = bounds(chart.points.iter().map(|p| p.1));
    let (x_min, x_max) = padded(x_min, x_max);
    let (y_min, y_max) = padded(y_min, y_max);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, DEFAULT_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(drawing("fill background"))?;

        let mut plot = ChartBuilder::on(&root)
            .caption(chart.title, ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(drawing("build chart"))?;

        plot.configure_mesh()
            .x_desc(chart.x_label)
            .y_desc(chart.y_label)
            .draw()
            .map_err(drawing("draw axes"))?;

        plot.draw_series(
            chart
                .points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, BLUE.mix(0.5).filled())),
        )
        .map_err(drawing("draw points"))?
        .label("Observations")
        .legend(|(x, y)| Circle::new((x + 5, y), 3, BLUE.filled()));

        if let Some(fit) = chart.fit {
            plot.draw_series(LineSeries::new(
                [(x_min, fit.predict(x_min)), (x_max, fit.predict(x_max))],
                RED.stroke_width(2),
            ))
            .map_err(drawing("draw fit"))?
            .label(format!(
                "y = {:.3}x + {:.3} (R² = {:.3})",
                fit.slope, fit.intercept, fit.r_squared
            ))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
        }

        plot.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(drawing("draw legend"))?;

        root.present().map_err(drawing("present chart"))?;
    }
    Ok(svg)
}

/// Renders the scatter plot and writes it to `path`.
///
/// # Errors
///
/// Returns [`ChartError`] if rendering or writing fails.
pub fn write_scatter(path: &Path, chart: &ScatterChart<'_>) -> Result<(), ChartError> {
    write_svg(path, &render_scatter(chart)?)
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_points_and_fit() {
        let points = [(30.0, 210.0), (55.0, 250.0), (80.0, 290.0)];
        let fit = LinearRegression {
            slope: 1.6,
            intercept: 162.0,
            r_squared: 1.0,
            std_err: 0.0,
            p_value: 0.0,
            n: 3,
        };
        let svg = render_scatter(&ScatterChart {
            title: "Crimes vs temperature",
            x_label: "Average temperature (F)",
            y_label: "Crimes per day",
            points: &points,
            fit: Some(&fit),
        })
        .unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Crimes vs temperature"));
        assert!(svg.contains("<circle"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn empty_points_are_rejected() {
        let err = render_scatter(&ScatterChart {
            title: "t",
            x_label: "x",
            y_label: "y",
            points: &[],
            fit: None,
        })
        .unwrap_err();
        assert!(matches!(err, ChartError::EmptyData(_)));
    }
}
