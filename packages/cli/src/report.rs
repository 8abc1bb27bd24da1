//! JSON run summaries and printed conclusions.

use std::path::{Path, PathBuf};

use crime_analysis_analytics_models::stats::{Correlation, LinearRegression, NormalityTest};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write summary {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes `summary` as pretty-printed JSON to `<dir>/<name>.json`.
///
/// # Errors
///
/// Returns [`ReportError`] if serialization fails or the file cannot be
/// written.
pub fn write_summary<T: Serialize>(
    dir: &Path,
    name: &str,
    summary: &T,
) -> Result<PathBuf, ReportError> {
    let path = dir.join(format!("{name}.json"));
    let json = serde_json::to_string_pretty(summary)?;

    let io_error = |source| ReportError::Io {
        path: path.clone(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(io_error)?;
    std::fs::write(&path, json).map_err(io_error)?;

    log::info!("Wrote {}", path.display());
    Ok(path)
}

/// One-line verdict on a normality test.
#[must_use]
pub fn describe_normality(test: Option<&NormalityTest>, alpha: f64) -> String {
    match test {
        Some(t) if t.is_normal(alpha) => format!(
            "normal (KS D={:.3}, p={:.3}, n={})",
            t.statistic, t.p_value, t.n
        ),
        Some(t) => format!(
            "not normal (KS D={:.3}, p={:.3}, n={})",
            t.statistic, t.p_value, t.n
        ),
        None => "untestable (constant or too few values)".to_string(),
    }
}

/// One-line verdict on a correlation.
#[must_use]
pub fn describe_correlation(correlation: &Correlation, alpha: f64) -> String {
    let direction = if correlation.coefficient >= 0.0 {
        "positive"
    } else {
        "negative"
    };
    let verdict = if correlation.is_significant(alpha) {
        "significant"
    } else {
        "not significant"
    };
    format!(
        "{} r={:.3} ({} {direction}, p={:.4}, {verdict} at alpha={alpha})",
        correlation.method,
        correlation.coefficient,
        correlation.strength(),
        correlation.p_value,
    )
}

#[must_use]
pub fn describe_regression(fit: &LinearRegression) -> String {
    format!(
        "y = {:.4}x + {:.2} (R²={:.3}, slope p={:.4}, n={})",
        fit.slope, fit.intercept, fit.r_squared, fit.p_value, fit.n
    )
}

/// Formats an optional percentage, `n/a` when absent.
#[must_use]
pub fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:+.1}%"))
}

#[cfg(test)]
mod tests {
    use crime_analysis_analytics_models::stats::CorrelationMethod;

    use super::*;

    #[test]
    fn correlation_verdicts() {
        let c = Correlation {
            method: CorrelationMethod::Spearman,
            coefficient: -0.52,
            p_value: 0.001,
            n: 365,
        };
        let text = describe_correlation(&c, 0.05);
        assert!(text.starts_with("spearman r=-0.520"), "{text}");
        assert!(text.contains("moderate negative"), "{text}");
        assert!(text.contains(" significant"), "{text}");

        let weak = Correlation {
            p_value: 0.2,
            coefficient: 0.1,
            ..c
        };
        assert!(describe_correlation(&weak, 0.05).contains("not significant"));
    }

    #[test]
    fn normality_verdicts() {
        let test = NormalityTest {
            statistic: 0.2,
            p_value: 0.01,
            n: 50,
        };
        assert!(describe_normality(Some(&test), 0.05).starts_with("not normal"));
        assert!(describe_normality(Some(&test), 0.005).starts_with("normal"));
        assert!(describe_normality(None, 0.05).starts_with("untestable"));
    }

    #[test]
    fn percent_formatting() {
        assert_eq!(percent(Some(12.345)), "+12.3%");
        assert_eq!(percent(Some(-100.0)), "-100.0%");
        assert_eq!(percent(None), "n/a");
    }

    #[test]
    fn writes_pretty_json() {
        #[derive(Serialize)]
        struct Summary {
            total: u64,
        }

        let dir = std::env::temp_dir().join(format!("crime_analysis_report_{}", std::process::id()));
        let path = write_summary(&dir, "pandemic", &Summary { total: 7 }).unwrap();
        assert_eq!(path, dir.join("pandemic.json"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\n  \"total\": 7\n}"
        );
        std::fs::remove_dir_all(dir).unwrap();
    }
}
