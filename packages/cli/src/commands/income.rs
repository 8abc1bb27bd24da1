//! Crime totals per district against district income.

use std::collections::BTreeMap;

use crime_analysis_analytics::preprocess::{bracket_means, join_income};
use crime_analysis_analytics::stats::{correlate, linear_regression};
use crime_analysis_analytics_models::joined::{AreaIncomeCrime, IncomeBracket};
use crime_analysis_analytics_models::stats::{Correlation, LinearRegression};
use crime_analysis_chart::scatter::{ScatterChart, write_scatter};
use serde::Serialize;

use super::Context;
use crate::data::{self, City};
use crate::report;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IncomeSummary {
    /// What the crime axis measures.
    measure: &'static str,
    areas: Vec<AreaIncomeCrime>,
    bracket_means: BTreeMap<IncomeBracket, f64>,
    correlation: Correlation,
    regression: LinearRegression,
}

/// Tests whether lower-income districts see more crime.
///
/// Uses incidents per 1,000 residents when every district has a
/// population, raw incident counts otherwise.
///
/// # Errors
///
/// Returns an error if a dataset cannot be loaded, fewer than three
/// districts join, or an output cannot be written.
pub fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let alpha = ctx.config.stats.alpha;
    let crimes = data::crimes(&ctx.config, &ctx.multi, City::Boston)?;
    let areas = data::income(&ctx.config, &ctx.multi)?;

    let rows = join_income(&crimes, &areas);
    let (measure, y) = crime_measure(&rows);
    let x: Vec<f64> = rows.iter().map(|r| r.median_income).collect();

    let correlation = correlate(&x, &y, alpha)?;
    let regression = linear_regression(&x, &y)?;
    let means = bracket_means(&rows);

    println!("{:<10} {:>12} {:<8} {:>8} {:>10}", "AREA", "INCOME", "BRACKET", "CRIMES", "PER 1K");
    for row in &rows {
        println!(
            "{:<10} {:>12.0} {:<8} {:>8} {:>10}",
            row.area,
            row.median_income,
            row.bracket.to_string(),
            row.crimes,
            row.crimes_per_thousand
                .map_or_else(|| "-".to_string(), |v| format!("{v:.1}")),
        );
    }
    println!();
    for (bracket, mean) in &means {
        println!("Mean incidents per {bracket}-income area: {mean:.1}");
    }
    println!();
    println!("Median income vs {measure}:");
    println!("  {}", report::describe_correlation(&correlation, alpha));
    println!("  {}", report::describe_regression(&regression));

    let points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    write_scatter(
        &ctx.output_path("income.svg"),
        &ScatterChart {
            title: "Crime vs median household income by district",
            x_label: "Median household income ($)",
            y_label: measure,
            points: &points,
            fit: Some(&regression),
        },
    )?;

    report::write_summary(
        ctx.output_dir(),
        "income",
        &IncomeSummary {
            measure,
            areas: rows,
            bracket_means: means,
            correlation,
            regression,
        },
    )?;
    Ok(())
}

/// Incidents per 1,000 residents if known for every area, else counts.
#[allow(clippy::cast_precision_loss)]
fn crime_measure(rows: &[AreaIncomeCrime]) -> (&'static str, Vec<f64>) {
    let rates: Option<Vec<f64>> = rows.iter().map(|r| r.crimes_per_thousand).collect();
    match rates {
        Some(rates) if !rates.is_empty() => ("incidents per 1,000 residents", rates),
        _ => (
            "incidents",
            rows.iter().map(|r| r.crimes as f64).collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::cast_precision_loss)]
    fn row(area: &str, crimes: u64, population: Option<u64>) -> AreaIncomeCrime {
        AreaIncomeCrime {
            area: area.to_string(),
            median_income: 60_000.0,
            bracket: IncomeBracket::Middle,
            crimes,
            population,
            crimes_per_thousand: population.map(|p| crimes as f64 * 1000.0 / p as f64),
        }
    }

    #[test]
    fn prefers_rates_when_complete() {
        let (measure, y) = crime_measure(&[row("A1", 20, Some(10_000)), row("B2", 5, Some(1_000))]);
        assert_eq!(measure, "incidents per 1,000 residents");
        assert_eq!(y, vec![2.0, 5.0]);
    }

    #[test]
    fn falls_back_to_counts() {
        let (measure, y) = crime_measure(&[row("A1", 20, Some(10_000)), row("B2", 5, None)]);
        assert_eq!(measure, "incidents");
        assert_eq!(y, vec![20.0, 5.0]);
    }
}
