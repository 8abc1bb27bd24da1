//! Descriptive statistics, normality tests, correlation and regression.
//!
//! Distribution functions come from `statrs`; the estimators themselves are
//! computed here so that edge cases (ties, zero variance, tiny samples)
//! surface as [`AnalyticsError::InsufficientData`] or `None` instead of
//! `NaN`.

use crime_analysis_analytics_models::stats::{
    Correlation, CorrelationMethod, DescriptiveStats, LinearRegression, NormalityTest,
};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

use crate::AnalyticsError;

/// Smallest sample the tests below accept.
pub const MIN_SAMPLE: usize = 3;

/// Count, mean, sample standard deviation, range and median.
///
/// # Errors
///
/// Returns [`AnalyticsError::InsufficientData`] for an empty input.
pub fn describe(values: &[f64]) -> Result<DescriptiveStats, AnalyticsError> {
    if values.is_empty() {
        return Err(AnalyticsError::insufficient("describe", "no values"));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    Ok(DescriptiveStats {
        count: n,
        mean: mean(values),
        std_dev: sample_variance(values).sqrt(),
        min: sorted[0],
        max: sorted[n - 1],
        median,
    })
}

/// One-sample Kolmogorov-Smirnov test against a normal distribution with
/// the sample's own mean and standard deviation.
///
/// Returns `None` when there are fewer than [`MIN_SAMPLE`] values or the
/// values have no spread, since no normal distribution can be fitted.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ks_normality(values: &[f64]) -> Option<NormalityTest> {
    if values.len() < MIN_SAMPLE {
        return None;
    }
    let sd = sample_variance(values).sqrt();
    if !sd.is_finite() || sd <= 0.0 {
        return None;
    }
    let normal = Normal::new(mean(values), sd).ok()?;

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;

    let statistic = sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let cdf = normal.cdf(x);
            let above = (i as f64 + 1.0) / n - cdf;
            let below = cdf - i as f64 / n;
            above.max(below)
        })
        .fold(0.0_f64, f64::max);

    Some(NormalityTest {
        statistic,
        p_value: kolmogorov_p_value(statistic, sorted.len()),
        n: sorted.len(),
    })
}

/// Scale applied while raising the Kolmogorov matrix to the `n`th power.
const SCALE: f64 = 1e140;
const SCALE_EXP: i32 = 140;

/// Two-sided p-value of a one-sample Kolmogorov-Smirnov statistic.
///
/// Exact (Marsaglia, Tsang and Wang's matrix method) unless `n * d²` puts
/// the p-value below about 1e-3, where their closed-form tail
/// approximation is used instead.
#[allow(clippy::cast_precision_loss)]
fn kolmogorov_p_value(d: f64, n: usize) -> f64 {
    let nf = n as f64;
    if d >= 1.0 {
        return 0.0;
    }
    if d * nf <= 0.5 {
        return 1.0;
    }

    let s = d * d * nf;
    if s > 7.24 || (s > 3.76 && n > 99) {
        let tail = 2.0 * (-(2.000_071 + 0.331 / nf.sqrt() + 1.409 / nf) * s).exp();
        return tail.clamp(0.0, 1.0);
    }
    (1.0 - kolmogorov_cdf(d, n)).clamp(0.0, 1.0)
}

/// `P(D_n < d)`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
fn kolmogorov_cdf(d: f64, n: usize) -> f64 {
    let nf = n as f64;
    let k = (nf * d) as usize + 1;
    let m = 2 * k - 1;
    let h = k as f64 - nf * d;

    let mut matrix = vec![0.0; m * m];
    for i in 0..m {
        for j in 0..m {
            if j <= i + 1 {
                matrix[i * m + j] = 1.0;
            }
        }
    }
    for i in 0..m {
        matrix[i * m] -= h.powi(i as i32 + 1);
        matrix[(m - 1) * m + i] -= h.powi((m - i) as i32);
    }
    if 2.0 * h - 1.0 > 0.0 {
        matrix[(m - 1) * m] += (2.0 * h - 1.0).powi(m as i32);
    }
    for i in 0..m {
        for j in 0..=i {
            let factorial: f64 = (1..=i - j + 1).map(|v| v as f64).product();
            matrix[i * m + j] /= factorial;
        }
    }

    let (power, mut exp) = matrix_power(&matrix, m, n);
    let mut p = power[(k - 1) * m + (k - 1)];
    for i in 1..=n {
        p = p * i as f64 / nf;
        if p < 1.0 / SCALE {
            p *= SCALE;
            exp -= SCALE_EXP;
        }
    }

    if p <= 0.0 {
        0.0
    } else {
        10.0_f64.powf(p.log10() + f64::from(exp))
    }
}

/// `base^n` for an `m × m` row-major matrix, as a matrix and a power-of-ten
/// exponent.
fn matrix_power(base: &[f64], m: usize, mut n: usize) -> (Vec<f64>, i32) {
    let centre = (m / 2) * m + m / 2;
    let mut result: (Vec<f64>, i32) = (
        (0..m * m)
            .map(|i| if i % (m + 1) == 0 { 1.0 } else { 0.0 })
            .collect(),
        0,
    );
    let mut base: (Vec<f64>, i32) = (base.to_vec(), 0);

    loop {
        if n & 1 == 1 {
            result = rescaled(
                multiply(&result.0, &base.0, m),
                result.1 + base.1,
                centre,
            );
        }
        n >>= 1;
        if n == 0 {
            return result;
        }
        base = rescaled(multiply(&base.0, &base.0, m), 2 * base.1, centre);
    }
}

fn multiply(a: &[f64], b: &[f64], m: usize) -> Vec<f64> {
    let mut out = vec![0.0; m * m];
    for i in 0..m {
        for k in 0..m {
            let x = a[i * m + k];
            for j in 0..m {
                out[i * m + j] += x * b[k * m + j];
            }
        }
    }
    out
}

fn rescaled(mut values: Vec<f64>, exp: i32, centre: usize) -> (Vec<f64>, i32) {
    if values[centre] > SCALE {
        for v in &mut values {
            *v /= SCALE;
        }
        (values, exp + SCALE_EXP)
    } else {
        (values, exp)
    }
}

/// Pearson product-moment correlation.
///
/// # Errors
///
/// Returns [`AnalyticsError::InsufficientData`] on mismatched lengths,
/// fewer than [`MIN_SAMPLE`] pairs, or a constant variable.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<Correlation, AnalyticsError> {
    check_pairs("pearson", x, y)?;
    let coefficient = coefficient("pearson", x, y)?;
    Ok(Correlation {
        method: CorrelationMethod::Pearson,
        coefficient,
        p_value: correlation_p_value(coefficient, x.len()),
        n: x.len(),
    })
}

/// Spearman rank correlation; tied values share their average rank.
///
/// # Errors
///
/// Same conditions as [`pearson`], applied to the ranks.
pub fn spearman(x: &[f64], y: &[f64]) -> Result<Correlation, AnalyticsError> {
    check_pairs("spearman", x, y)?;
    let coefficient = coefficient("spearman", &average_ranks(x), &average_ranks(y))?;
    Ok(Correlation {
        method: CorrelationMethod::Spearman,
        coefficient,
        p_value: correlation_p_value(coefficient, x.len()),
        n: x.len(),
    })
}

/// Correlates `x` and `y`, choosing the method from a normality check.
///
/// If either variable fails the Kolmogorov-Smirnov test at `alpha` (or
/// cannot be tested) the rank-based Spearman coefficient is used, otherwise
/// Pearson.
///
/// # Errors
///
/// Returns [`AnalyticsError::InsufficientData`] as [`pearson`] does.
pub fn correlate(x: &[f64], y: &[f64], alpha: f64) -> Result<Correlation, AnalyticsError> {
    let non_normal = |values: &[f64]| ks_normality(values).is_none_or(|t| !t.is_normal(alpha));

    if non_normal(x) || non_normal(y) {
        log::debug!("Non-normal input at alpha={alpha}; using Spearman");
        spearman(x, y)
    } else {
        pearson(x, y)
    }
}

/// Least-squares line through `(x, y)`.
///
/// # Errors
///
/// Returns [`AnalyticsError::InsufficientData`] on mismatched lengths,
/// fewer than [`MIN_SAMPLE`] points, or a constant `x`.
#[allow(clippy::cast_precision_loss)]
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<LinearRegression, AnalyticsError> {
    check_pairs("linear regression", x, y)?;
    let n = x.len();
    let (sxx, syy, sxy) = sums_of_squares(x, y);
    if sxx <= 0.0 {
        return Err(AnalyticsError::insufficient(
            "linear regression",
            "x has no variance",
        ));
    }

    let slope = sxy / sxx;
    let intercept = slope.mul_add(-mean(x), mean(y));
    let r_squared = if syy > 0.0 {
        (sxy * sxy) / (sxx * syy)
    } else {
        0.0
    };

    let residual = slope.mul_add(-sxy, syy).max(0.0);
    let dof = (n - 2) as f64;
    let std_err = (residual / dof / sxx).sqrt();
    let p_value = if std_err > 0.0 {
        t_two_sided(slope / std_err, dof)
    } else if slope == 0.0 {
        1.0
    } else {
        0.0
    };

    Ok(LinearRegression {
        slope,
        intercept,
        r_squared,
        std_err,
        p_value,
        n,
    })
}

/// Ranks starting at 1; ties get the mean of the ranks they span.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]].total_cmp(&values[order[start]]).is_eq() {
            end += 1;
        }
        // Positions start..end hold ranks start+1..=end.
        let rank = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = rank;
        }
        start = end;
    }
    ranks
}

fn check_pairs(operation: &'static str, x: &[f64], y: &[f64]) -> Result<(), AnalyticsError> {
    if x.len() != y.len() {
        return Err(AnalyticsError::insufficient(
            operation,
            format!("{} x values but {} y values", x.len(), y.len()),
        ));
    }
    if x.len() < MIN_SAMPLE {
        return Err(AnalyticsError::insufficient(
            operation,
            format!("{} points, need at least {MIN_SAMPLE}", x.len()),
        ));
    }
    Ok(())
}

fn coefficient(operation: &'static str, x: &[f64], y: &[f64]) -> Result<f64, AnalyticsError> {
    let (sxx, syy, sxy) = sums_of_squares(x, y);
    if sxx <= 0.0 || syy <= 0.0 {
        return Err(AnalyticsError::insufficient(
            operation,
            "a variable has no variance",
        ));
    }
    Ok((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

#[allow(clippy::cast_precision_loss)]
fn correlation_p_value(r: f64, n: usize) -> f64 {
    let dof = (n - 2) as f64;
    let remaining = r.mul_add(-r, 1.0);
    if remaining <= f64::EPSILON {
        return 0.0;
    }
    t_two_sided(r * (dof / remaining).sqrt(), dof)
}

fn t_two_sided(t: f64, dof: f64) -> f64 {
    StudentsT::new(0.0, 1.0, dof).map_or(f64::NAN, |dist| 2.0 * (1.0 - dist.cdf(t.abs())))
}

fn sums_of_squares(x: &[f64], y: &[f64]) -> (f64, f64, f64) {
    let (mx, my) = (mean(x), mean(y));
    x.iter()
        .zip(y)
        .fold((0.0, 0.0, 0.0), |(sxx, syy, sxy), (&xi, &yi)| {
            let (dx, dy) = (xi - mx, yi - my);
            (dx.mul_add(dx, sxx), dy.mul_add(dy, syy), dx.mul_add(dy, sxy))
        })
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[allow(clippy::cast_precision_loss)]
fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[allow(clippy::cast_precision_loss)]
    fn normal_quantiles(n: usize) -> Vec<f64> {
        let standard = Normal::new(0.0, 1.0).unwrap();
        (0..n)
            .map(|i| standard.inverse_cdf((i as f64 + 0.5) / n as f64))
            .collect()
    }

    #[allow(clippy::cast_precision_loss)]
    fn exponential_quantiles(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| -(1.0 - (i as f64 + 0.5) / n as f64).ln())
            .collect()
    }

    #[test]
    fn describes_sample() {
        let stats = describe(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.count, 8);
        assert!(close(stats.mean, 5.0, 1e-12));
        assert!(close(stats.std_dev, (32.0_f64 / 7.0).sqrt(), 1e-12));
        assert!(close(stats.median, 4.5, 1e-12));
        assert!(close(stats.min, 2.0, 1e-12));
        assert!(close(stats.max, 9.0, 1e-12));
    }

    #[test]
    fn describe_rejects_empty() {
        assert!(matches!(
            describe(&[]),
            Err(AnalyticsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn normal_sample_passes_ks() {
        let test = ks_normality(&normal_quantiles(60)).unwrap();
        assert!(test.statistic < 0.1, "{test:?}");
        assert!(test.is_normal(0.05), "{test:?}");
    }

    #[test]
    fn skewed_sample_fails_ks() {
        let test = ks_normality(&exponential_quantiles(200)).unwrap();
        assert!(test.statistic > 0.1, "{test:?}");
        assert!(test.p_value < 0.01, "{test:?}");
    }

    #[test]
    fn ks_p_values_match_the_exact_distribution() {
        let rainfall = ks_normality(&[0.4, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert!((rainfall.statistic - 0.472_639_577).abs() < 1e-6, "{rainfall:?}");
        assert!((rainfall.p_value - 0.152_896_998).abs() < 1e-6, "{rainfall:?}");

        let temperature = ks_normality(&[58.0, 59.0, 66.0, 65.0, 69.0]).unwrap();
        assert!((temperature.statistic - 0.232_626_896).abs() < 1e-6, "{temperature:?}");
        assert!((temperature.p_value - 0.894_105_147).abs() < 1e-6, "{temperature:?}");
    }

    #[test]
    fn kolmogorov_p_value_covers_every_regime() {
        assert!((kolmogorov_p_value(0.03, 2000) - 0.053_546_945).abs() < 1e-6);
        assert!((kolmogorov_p_value(0.14, 200) - 0.000_698_555).abs() < 1e-7);
        assert!(kolmogorov_p_value(1.0, 5).abs() < f64::EPSILON);
        assert!((kolmogorov_p_value(0.05, 5) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ks_is_undefined_without_spread() {
        assert!(ks_normality(&[3.0, 3.0, 3.0, 3.0]).is_none());
        assert!(ks_normality(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn pearson_matches_hand_computation() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let r = pearson(&x, &y).unwrap();
        assert!(close(r.coefficient, 6.0 / 60.0_f64.sqrt(), 1e-12));
        assert!(r.p_value > 0.1 && r.p_value < 0.15, "{r:?}");
        assert_eq!(r.n, 5);
    }

    #[test]
    fn perfect_line_is_significant() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [3.0, 5.0, 7.0, 9.0];
        let r = pearson(&x, &y).unwrap();
        assert!(close(r.coefficient, 1.0, 1e-12));
        assert!(r.p_value < 1e-6);
    }

    #[test]
    fn averages_tied_ranks() {
        assert_eq!(average_ranks(&[10.0, 20.0, 20.0, 30.0]), vec![1.0, 2.5, 2.5, 4.0]);
        assert_eq!(average_ranks(&[5.0, 1.0, 5.0]), vec![2.5, 1.0, 2.5]);
    }

    #[test]
    fn spearman_sees_monotone_relation() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y: Vec<f64> = x.iter().map(|v: &f64| v.powi(3)).collect();
        let r = spearman(&x, &y).unwrap();
        assert_eq!(r.method, CorrelationMethod::Spearman);
        assert!(close(r.coefficient, 1.0, 1e-12));
    }

    #[test]
    fn correlate_picks_method_by_normality() {
        let normal = normal_quantiles(60);
        let shifted: Vec<f64> = normal.iter().map(|v| 3.0_f64.mul_add(*v, 1.0)).collect();
        assert_eq!(
            correlate(&normal, &shifted, 0.05).unwrap().method,
            CorrelationMethod::Pearson
        );

        let skewed = exponential_quantiles(200);
        let doubled: Vec<f64> = skewed.iter().map(|v| v * 2.0).collect();
        let r = correlate(&skewed, &doubled, 0.05).unwrap();
        assert_eq!(r.method, CorrelationMethod::Spearman);
        assert!(close(r.coefficient, 1.0, 1e-12));
    }

    #[test]
    fn mismatched_or_short_input_is_rejected() {
        assert!(pearson(&[1.0, 2.0, 3.0], &[1.0, 2.0]).is_err());
        assert!(spearman(&[1.0, 2.0], &[1.0, 2.0]).is_err());
        assert!(linear_regression(&[1.0], &[1.0]).is_err());
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn regression_fits_noisy_points() {
        let fit = linear_regression(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 5.0, 4.0, 5.0]).unwrap();
        assert!(close(fit.slope, 0.6, 1e-12));
        assert!(close(fit.intercept, 2.2, 1e-12));
        assert!(close(fit.r_squared, 0.6, 1e-12));
        assert!(close(fit.std_err, 0.08_f64.sqrt(), 1e-12));
        assert!(fit.p_value > 0.1 && fit.p_value < 0.15, "{fit:?}");
        assert!(close(fit.predict(10.0), 8.2, 1e-12));
    }

    #[test]
    fn regression_on_exact_line() {
        let fit = linear_regression(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]).unwrap();
        assert!(close(fit.slope, 2.0, 1e-12));
        assert!(close(fit.intercept, 1.0, 1e-12));
        assert!(close(fit.r_squared, 1.0, 1e-12));
        assert!(fit.p_value < 1e-6);
    }
}
