//! Statistics result types.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Summary statistics of one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); zero for one value.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

/// Result of a one-sample Kolmogorov-Smirnov test against a normal
/// distribution fitted to the sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalityTest {
    /// The KS statistic `D`.
    pub statistic: f64,
    pub p_value: f64,
    pub n: usize,
}

impl NormalityTest {
    /// Normality is not rejected at significance `alpha`.
    #[must_use]
    pub fn is_normal(&self, alpha: f64) -> bool {
        self.p_value >= alpha
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CorrelationMethod {
    Pearson,
    Spearman,
}

/// A correlation coefficient with its two-sided p-value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correlation {
    pub method: CorrelationMethod,
    pub coefficient: f64,
    pub p_value: f64,
    pub n: usize,
}

impl Correlation {
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }

    /// Conventional strength label for the absolute coefficient.
    #[must_use]
    pub fn strength(&self) -> &'static str {
        match self.coefficient.abs() {
            r if r >= 0.7 => "strong",
            r if r >= 0.4 => "moderate",
            r if r >= 0.2 => "weak",
            _ => "negligible",
        }
    }
}

/// Ordinary least-squares fit of `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    /// Standard error of the slope.
    pub std_err: f64,
    /// Two-sided p-value for a zero slope.
    pub p_value: f64,
    pub n: usize,
}

impl LinearRegression {
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}
