//! Daily crime counts against the weather.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use crime_analysis_analytics::bucketing::daily_counts;
use crime_analysis_analytics::preprocess::combine_weather;
use crime_analysis_analytics::stats::{correlate, describe, ks_normality, linear_regression};
use crime_analysis_analytics_models::joined::DailyWeatherCrime;
use crime_analysis_analytics_models::stats::{
    Correlation, DescriptiveStats, LinearRegression, NormalityTest,
};
use crime_analysis_chart::scatter::{ScatterChart, write_scatter};
use serde::Serialize;

use super::Context;
use crate::data::{self, City};
use crate::report;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VariableSummary {
    stats: DescriptiveStats,
    normality: Option<NormalityTest>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Relationship {
    correlation: Correlation,
    regression: LinearRegression,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WeatherSummary {
    days: usize,
    alpha: f64,
    variables: BTreeMap<&'static str, VariableSummary>,
    temperature: Relationship,
    precipitation: Relationship,
}

/// Tests whether daily crime counts move with temperature and
/// precipitation.
///
/// # Errors
///
/// Returns an error if a dataset cannot be loaded, the two datasets share
/// too few days, or an output cannot be written.
#[allow(clippy::cast_precision_loss)]
pub fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let alpha = ctx.config.stats.alpha;
    let crimes = data::crimes(&ctx.config, &ctx.multi, City::Boston)?;
    let weather = data::weather(&ctx.config, &ctx.multi)?;

    let (Some(crime_span), Some(weather_span)) = (
        date_span(crimes.iter().map(|r| r.occurred_on)),
        date_span(weather.iter().map(|w| w.date)),
    ) else {
        return Err("crime or weather dataset is empty".into());
    };
    let first = crime_span.0.max(weather_span.0);
    let last = crime_span.1.min(weather_span.1);
    if first > last {
        return Err(format!("crime and weather datasets do not overlap ({first} > {last})").into());
    }

    let daily = daily_counts(&crimes, first, last);
    let joined = combine_weather(&daily, &weather);

    let column = |f: fn(&DailyWeatherCrime) -> f64| -> Vec<f64> { joined.iter().map(f).collect() };
    let counts = column(|d| d.crimes as f64);
    let temperature = column(|d| d.avg_temperature);
    let precipitation = column(|d| d.precipitation);
    let snowfall = column(|d| d.snowfall);

    println!("Boston daily crimes vs weather, {first} to {last} ({} days)", joined.len());
    println!();

    let mut variables = BTreeMap::new();
    for (name, values) in [
        ("crimes", &counts),
        ("avgTemperature", &temperature),
        ("precipitation", &precipitation),
        ("snowfall", &snowfall),
    ] {
        let stats = describe(values)?;
        let normality = ks_normality(values);
        println!(
            "{name:<16} mean={:>8.2} sd={:>7.2} median={:>8.2}  {}",
            stats.mean,
            stats.std_dev,
            stats.median,
            report::describe_normality(normality.as_ref(), alpha),
        );
        variables.insert(name, VariableSummary { stats, normality });
    }
    println!();

    let temperature_rel = relationship(&temperature, &counts, alpha)?;
    let precipitation_rel = relationship(&precipitation, &counts, alpha)?;

    for (name, rel) in [
        ("Temperature", &temperature_rel),
        ("Precipitation", &precipitation_rel),
    ] {
        println!("{name} vs daily crimes:");
        println!("  {}", report::describe_correlation(&rel.correlation, alpha));
        println!("  {}", report::describe_regression(&rel.regression));
    }

    let points = |xs: &[f64]| -> Vec<(f64, f64)> {
        xs.iter().copied().zip(counts.iter().copied()).collect()
    };
    write_scatter(
        &ctx.output_path("weather_temperature.svg"),
        &ScatterChart {
            title: "Daily crimes vs average temperature",
            x_label: "Average temperature (F)",
            y_label: "Crimes per day",
            points: &points(&temperature),
            fit: Some(&temperature_rel.regression),
        },
    )?;
    write_scatter(
        &ctx.output_path("weather_precipitation.svg"),
        &ScatterChart {
            title: "Daily crimes vs precipitation",
            x_label: "Precipitation (in)",
            y_label: "Crimes per day",
            points: &points(&precipitation),
            fit: Some(&precipitation_rel.regression),
        },
    )?;

    report::write_summary(
        ctx.output_dir(),
        "weather",
        &WeatherSummary {
            days: joined.len(),
            alpha,
            variables,
            temperature: temperature_rel,
            precipitation: precipitation_rel,
        },
    )?;
    Ok(())
}

fn relationship(
    x: &[f64],
    y: &[f64],
    alpha: f64,
) -> Result<Relationship, crime_analysis_analytics::AnalyticsError> {
    Ok(Relationship {
        correlation: correlate(x, y, alpha)?,
        regression: linear_regression(x, y)?,
    })
}

/// Earliest and latest date.
fn date_span(dates: impl Iterator<Item = NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
    dates.fold(None, |span, date| {
        Some(span.map_or((date, date), |(lo, hi): (NaiveDate, NaiveDate)| {
            (lo.min(date), hi.max(date))
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_dates_in_any_order() {
        let d = |s: &str| s.parse::<NaiveDate>().unwrap();
        let span = date_span([d("2020-03-01"), d("2019-12-31"), d("2020-01-15")].into_iter());
        assert_eq!(span, Some((d("2019-12-31"), d("2020-03-01"))));
        assert_eq!(date_span(std::iter::empty()), None);
    }
}
