//! Dataset loading with progress bars.

use clap::ValueEnum;
use crime_analysis_cli_utils::{IndicatifProgress, MultiProgress};
use crime_analysis_crime_models::CrimeRecord;
use crime_analysis_source_models::{BuildingParcel, IncomeArea, WeatherObservation};

use crate::config::AnalysisConfig;

/// Cities with a crime dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum City {
    Boston,
    Denver,
}

impl City {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boston => "boston",
            Self::Denver => "denver",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Boston => "Boston",
            Self::Denver => "Denver",
        }
    }
}

/// Loads one city's crime incidents with that city's configured schema.
///
/// # Errors
///
/// Returns an error if the schema cannot be resolved or the CSV cannot be
/// read.
pub fn crimes(
    config: &AnalysisConfig,
    multi: &MultiProgress,
    city: City,
) -> Result<Vec<CrimeRecord>, Box<dyn std::error::Error>> {
    let (schema_id, path) = match city {
        City::Boston => (&config.schemas.boston, &config.data.boston_crimes),
        City::Denver => (&config.schemas.denver, &config.data.denver_crimes),
    };
    let schema = config.crime_schema(schema_id)?;
    let progress = IndicatifProgress::file_bar(multi, &format!("{} crimes", city.label()));
    Ok(crime_analysis_source::crime::load_crimes(path, &schema, &progress)?)
}

/// Loads daily weather observations.
///
/// # Errors
///
/// Returns an error if the CSV cannot be read.
pub fn weather(
    config: &AnalysisConfig,
    multi: &MultiProgress,
) -> Result<Vec<WeatherObservation>, Box<dyn std::error::Error>> {
    let progress = IndicatifProgress::file_bar(multi, "Weather");
    Ok(crime_analysis_source::weather::load_weather(
        &config.data.weather,
        &config.columns.weather,
        &progress,
    )?)
}

/// Loads income by area.
///
/// # Errors
///
/// Returns an error if the CSV cannot be read.
pub fn income(
    config: &AnalysisConfig,
    multi: &MultiProgress,
) -> Result<Vec<IncomeArea>, Box<dyn std::error::Error>> {
    let progress = IndicatifProgress::file_bar(multi, "Income");
    Ok(crime_analysis_source::income::load_income(
        &config.data.income,
        &config.columns.income,
        &progress,
    )?)
}

/// Loads building parcels.
///
/// # Errors
///
/// Returns an error if the CSV cannot be read.
pub fn buildings(
    config: &AnalysisConfig,
    multi: &MultiProgress,
) -> Result<Vec<BuildingParcel>, Box<dyn std::error::Error>> {
    let progress = IndicatifProgress::file_bar(multi, "Building parcels");
    Ok(crime_analysis_source::buildings::load_buildings(
        &config.data.buildings,
        &config.columns.buildings,
        &progress,
    )?)
}
