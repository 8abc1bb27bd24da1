//! Progress reporting for dataset loading.
//!
//! Loaders report how many bytes of their input they have consumed. The
//! rendering backend lives upstream (`crime_analysis_cli_utils` drives an
//! `indicatif` bar); tests and library callers use [`NullProgress`].

use std::sync::Arc;

/// Receives progress updates from a loader.
pub trait ProgressCallback: Send + Sync {
    /// Set the total expected units of work (bytes for file loaders).
    fn set_total(&self, total: u64);

    /// Set the current position (absolute, not delta).
    fn set_position(&self, pos: u64);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// Discards all progress updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn set_position(&self, _pos: u64) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}

/// Byte-position updates are throttled to one per this many records.
pub(crate) const REPORT_EVERY: u64 = 4096;
