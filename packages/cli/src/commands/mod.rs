//! One module per analysis. Each command loads what it needs, prints its
//! conclusions, and writes its charts and a JSON summary to the output
//! directory.

pub mod compare_cities;
pub mod heatmap;
pub mod holiday_chart;
pub mod holidays;
pub mod income;
pub mod pandemic;
pub mod typology;
pub mod weather;

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use crime_analysis_analytics::bucketing::CrimeLabel;
use crime_analysis_calendar::{CalendarError, HolidayCalendar};
use crime_analysis_cli_utils::MultiProgress;

use crate::config::AnalysisConfig;

/// Shared state for a run.
pub struct Context {
    pub config: AnalysisConfig,
    pub multi: MultiProgress,
}

impl Context {
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Path of an output artefact.
    #[must_use]
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.config.output_dir.join(file_name)
    }

    /// The holiday calendar over the configured year range.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] if the configured range is unsupported.
    pub fn calendar(&self) -> Result<HolidayCalendar, CalendarError> {
        HolidayCalendar::new(
            self.config.holidays.first_year,
            self.config.holidays.last_year,
        )
    }
}

/// Which crime name heatmap and comparison rows use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Label {
    /// The city's own offense label
    #[default]
    Reported,
    /// Shared subcategory
    Subcategory,
    /// Shared top-level category
    Category,
}

impl From<Label> for CrimeLabel {
    fn from(label: Label) -> Self {
        match label {
            Label::Reported => Self::Reported,
            Label::Subcategory => Self::Subcategory,
            Label::Category => Self::Category,
        }
    }
}
