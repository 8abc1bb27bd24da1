#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CSV dataset loaders for the crime analyses.
//!
//! Every loader comes in two flavours: a `read_*` function that accepts any
//! [`std::io::Read`] and a `load_*` function that opens a file and reports
//! byte progress through a [`progress::ProgressCallback`]. Loaders validate
//! the header up front and fail on the first malformed row; the datasets are
//! static files, so there is nothing to retry.

pub mod buildings;
pub mod crime;
pub mod income;
pub mod parsing;
pub mod progress;
pub mod registry;
pub mod type_mapping;
pub mod weather;

mod table;

use std::fs::File;
use std::path::{Path, PathBuf};

use crime_analysis_source_models::DatasetKind;

/// Errors that can occur while loading datasets.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Opening or reading a file failed.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The CSV reader rejected the input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A column named by the schema is not in the header.
    #[error("{dataset} dataset is missing required column '{column}'")]
    MissingColumn {
        /// Dataset being loaded.
        dataset: DatasetKind,
        /// Column the schema expected.
        column: String,
    },

    /// A field could not be coerced to its expected type.
    #[error("{dataset} line {line}: invalid {column} value '{value}': {reason}")]
    InvalidField {
        /// Dataset being loaded.
        dataset: DatasetKind,
        /// 1-based line number in the file.
        line: u64,
        /// Column holding the bad value.
        column: String,
        /// The raw value.
        value: String,
        /// What was expected.
        reason: String,
    },

    /// No built-in crime schema has the requested id.
    #[error("Unknown crime schema '{id}'")]
    UnknownSchema {
        /// The requested schema id.
        id: String,
    },

    /// A schema TOML document could not be parsed.
    #[error("Schema parse error: {0}")]
    Schema(#[from] toml::de::Error),
}

/// Opens `path` for reading, returning the file and its length in bytes.
///
/// # Errors
///
/// Returns [`SourceError::Io`] if the file cannot be opened or stat'ed.
pub(crate) fn open(path: &Path) -> Result<(File, u64), SourceError> {
    let io_err = |source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let len = file.metadata().map_err(io_err)?.len();
    log::debug!("Opened {} ({len} bytes)", path.display());
    Ok((file, len))
}
