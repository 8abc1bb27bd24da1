#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boston crime correlation analyses.
//!
//! ```text
//! crime_analysis weather
//! crime_analysis holiday-chart --year 2020 [--low 150 --high 350]
//! crime_analysis heatmap --granularity hour [--city denver]
//! crime_analysis compare-cities --granularity day
//! crime_analysis income
//! crime_analysis pandemic --before-year 2019 --after-year 2020 --granularity hour
//! crime_analysis typology --before-year 2019 --after-year 2020
//! crime_analysis holidays --year 2020
//! ```
//!
//! Running without a subcommand enters interactive mode. Every run writes
//! its charts and a JSON summary to the output directory.

mod commands;
mod config;
mod data;
mod interactive;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use crime_analysis_analytics_models::TimeGranularity;

use crate::commands::holiday_chart::HolidayChartOptions;
use crate::commands::pandemic::PandemicOptions;
use crate::commands::typology::TypologyOptions;
use crate::commands::{Context, Label};
use crate::config::AnalysisConfig;
use crate::data::City;

#[derive(Parser)]
#[command(
    name = "crime_analysis",
    about = "Correlate Boston crime with weather, holidays, income, and building use"
)]
struct Cli {
    /// Path to an analysis.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for charts and summaries (overrides the config file)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the holidays observed in a year
    Holidays {
        #[arg(long, default_value_t = 2020)]
        year: i32,
    },
    /// Correlate daily crime counts with temperature and precipitation
    Weather,
    /// Plot a year of daily counts with holiday markers
    HolidayChart {
        #[arg(long, default_value_t = 2020)]
        year: i32,
        /// Lower y-axis bound
        #[arg(long, requires = "high")]
        low: Option<f64>,
        /// Upper y-axis bound
        #[arg(long, requires = "low")]
        high: Option<f64>,
        /// Days either side of a holiday (default from config)
        #[arg(long)]
        window_days: Option<u32>,
    },
    /// Crime type by time bucket heatmap
    Heatmap {
        /// year, day or hour
        #[arg(long, default_value = "hour")]
        granularity: TimeGranularity,
        #[arg(long, value_enum, default_value_t = City::Boston)]
        city: City,
        #[arg(long, value_enum, default_value_t = Label::Reported)]
        label: Label,
    },
    /// Compare Boston's and Denver's shares per crime type and bucket
    CompareCities {
        /// year, day or hour
        #[arg(long, default_value = "hour")]
        granularity: TimeGranularity,
        #[arg(long, value_enum, default_value_t = Label::Category)]
        label: Label,
    },
    /// Correlate district crime with median household income
    Income,
    /// Compare the crime mix of two years
    Pandemic {
        #[arg(long, default_value_t = 2019)]
        before_year: i32,
        #[arg(long, default_value_t = 2020)]
        after_year: i32,
        /// hour or day
        #[arg(long, default_value = "hour")]
        granularity: TimeGranularity,
        #[arg(long, value_enum, default_value_t = Label::Reported)]
        label: Label,
    },
    /// Compare the building typologies crimes occurred at in two years
    Typology {
        #[arg(long, default_value_t = 2019)]
        before_year: i32,
        #[arg(long, default_value_t = 2020)]
        after_year: i32,
        #[arg(long, value_enum, default_value_t = Label::Category)]
        label: Label,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_analysis_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = AnalysisConfig::load(cli.config.as_deref())?;
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    let ctx = Context { config, multi };

    let Some(command) = cli.command else {
        return interactive::run(&ctx);
    };

    match command {
        Commands::Holidays { year } => commands::holidays::run(&ctx, year),
        Commands::Weather => commands::weather::run(&ctx),
        Commands::HolidayChart {
            year,
            low,
            high,
            window_days,
        } => commands::holiday_chart::run(
            &ctx,
            HolidayChartOptions {
                year,
                low,
                high,
                window_days,
            },
        ),
        Commands::Heatmap {
            granularity,
            city,
            label,
        } => commands::heatmap::run(&ctx, city, granularity, label),
        Commands::CompareCities { granularity, label } => {
            commands::compare_cities::run(&ctx, granularity, label)
        }
        Commands::Income => commands::income::run(&ctx),
        Commands::Pandemic {
            before_year,
            after_year,
            granularity,
            label,
        } => commands::pandemic::run(
            &ctx,
            PandemicOptions {
                before_year,
                after_year,
                granularity,
                label,
            },
        ),
        Commands::Typology {
            before_year,
            after_year,
            label,
        } => commands::typology::run(
            &ctx,
            TypologyOptions {
                before_year,
                after_year,
                label,
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_granularity_and_globals() {
        let cli = Cli::try_parse_from([
            "crime_analysis",
            "pandemic",
            "--granularity",
            "day",
            "--output-dir",
            "out",
        ])
        .unwrap();
        assert_eq!(cli.output_dir, Some(PathBuf::from("out")));
        match cli.command {
            Some(Commands::Pandemic {
                before_year,
                after_year,
                granularity,
                label,
            }) => {
                assert_eq!((before_year, after_year), (2019, 2020));
                assert_eq!(granularity, TimeGranularity::DayOfWeek);
                assert_eq!(label, Label::Reported);
            }
            _ => panic!("expected pandemic"),
        }
    }

    #[test]
    fn rejects_unknown_granularity() {
        let err = Cli::try_parse_from(["crime_analysis", "heatmap", "--granularity", "minute"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn holiday_chart_bounds_come_in_pairs() {
        assert!(
            Cli::try_parse_from(["crime_analysis", "holiday-chart", "--low", "100"]).is_err()
        );
        assert!(
            Cli::try_parse_from([
                "crime_analysis",
                "holiday-chart",
                "--low",
                "100",
                "--high",
                "300"
            ])
            .is_ok()
        );
    }
}
