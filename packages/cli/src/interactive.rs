//! Menu-driven mode for running an analysis without memorizing flags.

use crime_analysis_analytics_models::TimeGranularity;
use dialoguer::{Input, Select};

use crate::commands::holiday_chart::HolidayChartOptions;
use crate::commands::pandemic::PandemicOptions;
use crate::commands::typology::TypologyOptions;
use crate::commands::{self, Context, Label};
use crate::data::City;

/// Analyses available from the menu.
enum Analysis {
    Weather,
    HolidayChart,
    Heatmap,
    CompareCities,
    Income,
    Pandemic,
    Typology,
    Holidays,
}

impl Analysis {
    const ALL: &[Self] = &[
        Self::Weather,
        Self::HolidayChart,
        Self::Heatmap,
        Self::CompareCities,
        Self::Income,
        Self::Pandemic,
        Self::Typology,
        Self::Holidays,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Weather => "Weather vs daily crime",
            Self::HolidayChart => "Holiday timeline",
            Self::Heatmap => "Crime type heatmap",
            Self::CompareCities => "Compare Boston with Denver",
            Self::Income => "Income vs crime by district",
            Self::Pandemic => "Year-over-year comparison",
            Self::Typology => "Building typology comparison",
            Self::Holidays => "List holidays",
        }
    }
}

/// Prompts for an analysis and its parameters, then runs it.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected analysis fails.
pub fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Analysis::ALL.iter().map(Analysis::label).collect();

    let idx = Select::new()
        .with_prompt("Which analysis would you like to run?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Analysis::ALL[idx] {
        Analysis::Weather => commands::weather::run(ctx),
        Analysis::HolidayChart => {
            let year = prompt_year("Year", 2020)?;
            let window_days: u32 = Input::new()
                .with_prompt("Days either side of a holiday")
                .default(ctx.config.holidays.window_days)
                .interact_text()?;
            commands::holiday_chart::run(
                ctx,
                HolidayChartOptions {
                    year,
                    low: None,
                    high: None,
                    window_days: Some(window_days),
                },
            )
        }
        Analysis::Heatmap => {
            let city = select_city()?;
            let granularity = select_granularity(TimeGranularity::all())?;
            commands::heatmap::run(ctx, city, granularity, select_label(Label::Reported)?)
        }
        Analysis::CompareCities => {
            let granularity = select_granularity(TimeGranularity::all())?;
            commands::compare_cities::run(ctx, granularity, select_label(Label::Category)?)
        }
        Analysis::Income => commands::income::run(ctx),
        Analysis::Pandemic => {
            let before_year = prompt_year("Before year", 2019)?;
            let after_year = prompt_year("After year", 2020)?;
            let granularity =
                select_granularity(&[TimeGranularity::Hour, TimeGranularity::DayOfWeek])?;
            commands::pandemic::run(
                ctx,
                PandemicOptions {
                    before_year,
                    after_year,
                    granularity,
                    label: select_label(Label::Reported)?,
                },
            )
        }
        Analysis::Typology => {
            let before_year = prompt_year("Before year", 2019)?;
            let after_year = prompt_year("After year", 2020)?;
            commands::typology::run(
                ctx,
                TypologyOptions {
                    before_year,
                    after_year,
                    label: select_label(Label::Category)?,
                },
            )
        }
        Analysis::Holidays => {
            let year = prompt_year("Year", 2020)?;
            commands::holidays::run(ctx, year)
        }
    }
}

fn prompt_year(prompt: &str, default: i32) -> Result<i32, dialoguer::Error> {
    Input::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()
}

fn select_city() -> Result<City, dialoguer::Error> {
    let cities = [City::Boston, City::Denver];
    let labels: Vec<&str> = cities.iter().map(|c| c.label()).collect();
    let idx = Select::new()
        .with_prompt("City")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(cities[idx])
}

fn select_granularity(
    choices: &[TimeGranularity],
) -> Result<TimeGranularity, dialoguer::Error> {
    let labels: Vec<String> = choices.iter().map(ToString::to_string).collect();
    let idx = Select::new()
        .with_prompt("Time unit")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(choices[idx])
}

fn select_label(default: Label) -> Result<Label, dialoguer::Error> {
    let labels = [Label::Reported, Label::Subcategory, Label::Category];
    let names = ["Reported offense", "Shared subcategory", "Shared category"];
    let idx = Select::new()
        .with_prompt("Group crimes by")
        .items(&names)
        .default(labels.iter().position(|l| *l == default).unwrap_or(0))
        .interact()?;
    Ok(labels[idx])
}
