#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! SVG charts for the crime analyses.
//!
//! Every chart is rendered into an in-memory SVG string by a `render_*`
//! function and written to disk by the matching `write_*` wrapper.

pub mod heatmap;
pub mod scatter;
pub mod timeline;

use std::fmt::Display;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default canvas size in pixels.
pub const DEFAULT_SIZE: (u32, u32) = (1024, 640);

/// Errors that can occur while rendering a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The plotting backend rejected a drawing operation.
    #[error("Failed to {step}: {message}")]
    Drawing {
        /// What was being drawn.
        step: &'static str,
        /// Backend error text.
        message: String,
    },

    /// The SVG file could not be written.
    #[error("Failed to write chart {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Nothing to plot.
    #[error("No data to plot for {0}")]
    EmptyData(&'static str),
}

/// Adapts a plotters error into [`ChartError::Drawing`].
pub(crate) fn drawing<E: Display>(step: &'static str) -> impl FnOnce(E) -> ChartError {
    move |e| ChartError::Drawing {
        step,
        message: e.to_string(),
    }
}

/// Writes a rendered SVG document, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ChartError::Io`] if a directory or the file cannot be written.
pub fn write_svg(path: &Path, svg: &str) -> Result<(), ChartError> {
    let io_error = |source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, svg).map_err(io_error)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Pads a value range by 5% on each side, widening a flat range.
pub(crate) fn padded(min: f64, max: f64) -> (f64, f64) {
    let span = max - min;
    let margin = if span.abs() < 1e-10 {
        max.abs().mul_add(0.05, 0.5)
    } else {
        span * 0.05
    };
    (min - margin, max + margin)
}
