#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset column schemas and auxiliary record types.
//!
//! Crime datasets are described by a [`CrimeSchema`] (one TOML file per
//! city). The explanatory datasets (daily weather, area income, building
//! parcels) each get a column mapping with defaults matching the files the
//! analyses were built against.

use chrono::NaiveDate;
use crime_analysis_crime_models::Typology;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The kind of dataset a file holds.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatasetKind {
    Crime,
    Weather,
    Income,
    Buildings,
}

/// Column names for a city's crime incident CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrimeSchema {
    /// Unique identifier (e.g., `"boston"`).
    pub id: String,
    /// City the dataset covers.
    pub city: String,
    /// Incident identifier column.
    pub incident_id: String,
    /// Offense code column.
    pub offense_code: String,
    /// Crime type label columns, tried in order; the first non-empty value
    /// wins. Boston left `OFFENSE_CODE_GROUP` blank from mid-2019 on, so its
    /// schema falls back to `OFFENSE_DESCRIPTION`.
    pub crime_type: Vec<String>,
    /// Occurrence timestamp column.
    pub occurred_on: String,
    /// Hour-of-day column. When absent the hour comes from the timestamp.
    #[serde(default)]
    pub hour: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    /// Building typology column, present in pre-joined extracts.
    #[serde(default)]
    pub typology: Option<String>,
}

/// Column names for a daily weather observation CSV (NOAA GHCN-Daily).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherColumns {
    pub date: String,
    pub precipitation: String,
    pub snowfall: String,
    pub avg_temperature: String,
    pub max_temperature: String,
    pub min_temperature: String,
}

impl Default for WeatherColumns {
    fn default() -> Self {
        Self {
            date: "DATE".to_string(),
            precipitation: "PRCP".to_string(),
            snowfall: "SNOW".to_string(),
            avg_temperature: "TAVG".to_string(),
            max_temperature: "TMAX".to_string(),
            min_temperature: "TMIN".to_string(),
        }
    }
}

/// Column names for an income-by-area CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeColumns {
    /// Area key; must match the crime dataset's district values.
    pub area: String,
    pub median_income: String,
    pub population: Option<String>,
}

impl Default for IncomeColumns {
    fn default() -> Self {
        Self {
            area: "DISTRICT".to_string(),
            median_income: "MEDIAN_HOUSEHOLD_INCOME".to_string(),
            population: Some("POPULATION".to_string()),
        }
    }
}

/// Column names for a building parcel CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingColumns {
    pub parcel_id: String,
    pub latitude: String,
    pub longitude: String,
    pub typology: String,
}

impl Default for BuildingColumns {
    fn default() -> Self {
        Self {
            parcel_id: "PID".to_string(),
            latitude: "LATITUDE".to_string(),
            longitude: "LONGITUDE".to_string(),
            typology: "TYPOLOGY".to_string(),
        }
    }
}

/// One day of weather observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherObservation {
    pub date: NaiveDate,
    /// Precipitation in inches.
    pub precipitation: Option<f64>,
    /// Snowfall in inches.
    pub snowfall: Option<f64>,
    /// Average temperature in °F.
    pub avg_temperature: Option<f64>,
}

/// Income statistics for one area (police district or neighborhood).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeArea {
    pub area: String,
    pub median_income: f64,
    pub population: Option<u64>,
}

/// A building parcel with its location and usage typology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingParcel {
    pub parcel_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub typology: Typology,
}
