#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation and statistics over loaded crime records.
//!
//! [`bucketing`] counts incidents per crime type and time bucket,
//! [`comparison`] lines two such series up, [`stats`] holds the normality
//! tests, correlations and regressions, and [`preprocess`] joins daily
//! counts with the weather, income and holiday datasets.

pub mod bucketing;
pub mod comparison;
pub mod preprocess;
pub mod stats;

use std::fmt::Debug;

use crime_analysis_calendar::CalendarError;
use thiserror::Error;

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A key extractor produced a bucket outside the declared domain.
    #[error("Bucket {bucket} for crime type '{crime_type}' is outside the {granularity} domain")]
    BucketOutOfDomain {
        /// Crime type of the offending record.
        crime_type: String,
        /// Debug rendering of the rejected key.
        bucket: String,
        /// Name of the domain (e.g. "hour").
        granularity: String,
    },

    /// Not enough (or mismatched) data points for a statistic.
    #[error("Insufficient data for {operation}: {reason}")]
    InsufficientData {
        /// The statistic being computed.
        operation: &'static str,
        /// What was wrong with the input.
        reason: String,
    },

    /// Holiday table lookup failed.
    #[error(transparent)]
    Calendar(#[from] CalendarError),
}

impl AnalyticsError {
    pub(crate) fn out_of_domain<K: Debug>(
        crime_type: String,
        bucket: &K,
        granularity: impl Into<String>,
    ) -> Self {
        Self::BucketOutOfDomain {
            crime_type,
            bucket: format!("{bucket:?}"),
            granularity: granularity.into(),
        }
    }

    pub(crate) fn insufficient(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            operation,
            reason: reason.into(),
        }
    }
}
