//! `analysis.toml` run configuration.
//!
//! Every section is optional; anything left out takes the default shown in
//! [`AnalysisConfig::default`]. Relative paths resolve against the working
//! directory.
//!
//! ```toml
//! output_dir = "output"
//!
//! [data]
//! boston_crimes = "data/boston_crimes.csv"
//! weather = "data/boston_weather.csv"
//!
//! [holidays]
//! window_days = 3
//!
//! [columns.income]
//! area = "DISTRICT"
//! median_income = "MEDIAN_HOUSEHOLD_INCOME"
//! ```

use std::path::{Path, PathBuf};

use crime_analysis_calendar::{DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR};
use crime_analysis_source::SourceError;
use crime_analysis_source::registry;
use crime_analysis_source_models::{BuildingColumns, CrimeSchema, IncomeColumns, WeatherColumns};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Schema(#[from] SourceError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Where charts and summaries are written.
    pub output_dir: PathBuf,
    pub data: DataPaths,
    pub schemas: SchemaConfig,
    pub holidays: HolidayConfig,
    pub stats: StatsConfig,
    pub typology: TypologyConfig,
    pub report: ReportConfig,
    pub columns: ColumnConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            data: DataPaths::default(),
            schemas: SchemaConfig::default(),
            holidays: HolidayConfig::default(),
            stats: StatsConfig::default(),
            typology: TypologyConfig::default(),
            report: ReportConfig::default(),
            columns: ColumnConfig::default(),
        }
    }
}

/// Input dataset locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub boston_crimes: PathBuf,
    pub denver_crimes: PathBuf,
    pub weather: PathBuf,
    pub income: PathBuf,
    pub buildings: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            boston_crimes: PathBuf::from("data/boston_crimes.csv"),
            denver_crimes: PathBuf::from("data/denver_crimes.csv"),
            weather: PathBuf::from("data/boston_weather.csv"),
            income: PathBuf::from("data/boston_income.csv"),
            buildings: PathBuf::from("data/boston_buildings.csv"),
        }
    }
}

/// Which crime schema each city's CSV is read with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub boston: String,
    pub denver: String,
    /// A schema TOML file that overrides the built-in schema of the same id.
    pub file: Option<PathBuf>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            boston: "boston".to_string(),
            denver: "denver".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolidayConfig {
    pub first_year: i32,
    pub last_year: i32,
    /// Days either side of a holiday that count as "near" it.
    pub window_days: u32,
}

impl Default for HolidayConfig {
    fn default() -> Self {
        Self {
            first_year: DEFAULT_FIRST_YEAR,
            last_year: DEFAULT_LAST_YEAR,
            window_days: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Significance level for normality and correlation tests.
    pub alpha: f64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self { alpha: 0.05 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypologyConfig {
    /// Furthest a crime may be from a parcel centroid and still take its
    /// typology.
    pub max_distance_m: f64,
}

impl Default for TypologyConfig {
    fn default() -> Self {
        Self {
            max_distance_m: 150.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Heatmap rows are limited to this many of the most frequent types.
    pub top_crime_types: usize,
    /// How many of the largest share shifts are printed.
    pub top_shifts: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_crime_types: 15,
            top_shifts: 10,
        }
    }
}

/// Column mappings for the non-crime datasets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub weather: WeatherColumns,
    pub income: IncomeColumns,
    pub buildings: BuildingColumns,
}

impl AnalysisConfig {
    /// Loads the configuration from `path`, or the defaults when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid TOML,
    /// or holds out-of-range values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            log::debug!("No config file given; using defaults");
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Checks value ranges the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };

        if self.holidays.first_year > self.holidays.last_year {
            return invalid(format!(
                "holidays.first_year {} is after holidays.last_year {}",
                self.holidays.first_year, self.holidays.last_year
            ));
        }
        let alpha = self.stats.alpha;
        if alpha.is_nan() || alpha <= 0.0 || alpha >= 1.0 {
            return invalid(format!(
                "stats.alpha must be between 0 and 1, got {}",
                self.stats.alpha
            ));
        }
        let max_distance = self.typology.max_distance_m;
        if max_distance.is_nan() || max_distance <= 0.0 {
            return invalid(format!(
                "typology.max_distance_m must be positive, got {}",
                self.typology.max_distance_m
            ));
        }
        if self.report.top_crime_types == 0 {
            return invalid("report.top_crime_types must be at least 1".to_string());
        }
        if self.schemas.file.is_none() {
            let known: Vec<String> = registry::all_schemas().into_iter().map(|s| s.id).collect();
            for id in [&self.schemas.boston, &self.schemas.denver] {
                if !known.contains(id) {
                    return invalid(format!(
                        "unknown crime schema '{id}' (built-in: {})",
                        known.join(", ")
                    ));
                }
            }
        }
        Ok(())
    }

    /// Resolves a crime schema id, preferring the configured schema file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the schema file cannot be read or parsed,
    /// or `id` names no known schema.
    pub fn crime_schema(&self, id: &str) -> Result<CrimeSchema, ConfigError> {
        if let Some(path) = &self.schemas.file {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
            let custom = registry::parse_schema_toml(&text)?;
            if custom.id == id {
                return Ok(custom);
            }
        }
        Ok(registry::schema(id)?)
    }
}
