//! Statistics for checking synthesized noise fields.
//!
//! Generated noise should be Gaussian with the model's variance and
//! neighbour correlations; these helpers measure exactly that.

use ndarray::ArrayView2;
use scilib::math::basic::erf;
use std::f64::consts::SQRT_2;

/// Standard normal CDF, the reference distribution for noise residuals.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// KS distance between noise pixel values and a normal distribution.
///
/// The pixels are standardized by their own mean and standard deviation
/// first, so a correlated field of any variance can be checked for
/// Gaussianity. Empty or constant input returns 1.0, the worst distance.
///
/// Pixels of a correlated field are not independent; pass a subset that
/// excludes mirror-image pixel pairs before comparing against
/// [`ks_critical_value`].
pub fn ks_test_normal(residuals: &[f64]) -> f64 {
    let n = residuals.len();
    if n == 0 {
        return 1.0;
    }

    let mut sorted = residuals.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mean: f64 = sorted.iter().sum::<f64>() / n as f64;
    let variance: f64 = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
    let std_dev = variance.sqrt();

    if std_dev < 1e-10 {
        return 1.0;
    }

    let mut max_diff: f64 = 0.0;

    for (i, value) in sorted.iter().enumerate() {
        let theoretical_cdf = normal_cdf((value - mean) / std_dev);

        let empirical_cdf_before = i as f64 / n as f64;
        let empirical_cdf_after = (i + 1) as f64 / n as f64;

        let diff1 = (empirical_cdf_before - theoretical_cdf).abs();
        let diff2 = (empirical_cdf_after - theoretical_cdf).abs();

        max_diff = max_diff.max(diff1).max(diff2);
    }

    max_diff
}

/// Asymptotic KS critical value for `n` pixels at level `alpha`.
///
/// Only 0.10, 0.05 and 0.01 are tabulated; anything else uses 0.05.
pub fn ks_critical_value(n: usize, alpha: f64) -> f64 {
    let c_alpha = match alpha {
        a if (a - 0.10).abs() < 1e-6 => 1.22,
        a if (a - 0.05).abs() < 1e-6 => 1.36,
        a if (a - 0.01).abs() < 1e-6 => 1.63,
        _ => 1.36,
    };

    c_alpha / (n as f64).sqrt()
}

/// Sample mean and population variance of a 2D field.
///
/// Returns `(NaN, NaN)` for an empty view.
pub fn mean_and_variance(data: ArrayView2<f64>) -> (f64, f64) {
    let n = data.len();
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }

    let mean = data.sum() / n as f64;
    let variance = data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    (mean, variance)
}

/// Pearson correlation between paired pixel samples, e.g. each pixel and
/// its +x neighbour, to compare against the model's normalized correlation
/// function at one pixel separation.
///
/// NaN for mismatched lengths, empty input, or a constant sample.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return f64::NAN;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x < 1e-10 || var_y < 1e-10 {
        return f64::NAN;
    }

    cov / (var_x.sqrt() * var_y.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_normal_cdf() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-6);
        assert!((normal_cdf(1.0) - 0.8413447461).abs() < 1e-6);
        assert!((normal_cdf(-1.0) - 0.1586552539).abs() < 1e-6);
        assert!((normal_cdf(1.96) - 0.975).abs() < 0.001);
    }

    #[test]
    fn test_ks_test_perfect_normal() {
        let n = 1000;
        let mut samples = Vec::with_capacity(n);

        // Approximate inverse normal CDF on evenly spaced quantiles
        for i in 1..=n {
            let p = (i as f64 - 0.5) / n as f64;
            let z = if p < 0.5 {
                -(-2.0 * (2.0 * p).ln()).sqrt()
            } else {
                (-2.0 * (2.0 * (1.0 - p)).ln()).sqrt()
            };
            samples.push(z);
        }

        let ks_stat = ks_test_normal(&samples);
        let critical = ks_critical_value(n, 0.05);

        assert!(
            ks_stat < critical * 2.0,
            "KS statistic {ks_stat} should be small for normal data (critical: {critical})"
        );
    }

    #[test]
    fn test_ks_test_bimodal() {
        let n = 100;
        let mut samples = Vec::with_capacity(n);
        for i in 0..n / 2 {
            samples.push(-2.0 + 0.1 * (i as f64 / (n as f64 / 2.0)));
        }
        for i in 0..n / 2 {
            samples.push(2.0 + 0.1 * (i as f64 / (n as f64 / 2.0)));
        }

        let ks_stat = ks_test_normal(&samples);
        assert!(
            ks_stat > 0.05,
            "KS statistic {ks_stat} should detect bimodal distribution"
        );
    }

    #[test]
    fn test_ks_test_degenerate_inputs() {
        assert_eq!(ks_test_normal(&[5.0; 100]), 1.0);
        assert_eq!(ks_test_normal(&[]), 1.0);
    }

    #[test]
    fn test_ks_critical_values() {
        assert!((ks_critical_value(100, 0.05) - 0.136).abs() < 0.001);
        assert!((ks_critical_value(100, 0.01) - 0.163).abs() < 0.001);
        assert!((ks_critical_value(1000, 0.05) - 0.043).abs() < 0.001);
    }

    #[test]
    fn test_mean_and_variance() {
        let data = array![[1.0, 2.0], [3.0, 4.0]];
        let (mean, variance) = mean_and_variance(data.view());
        assert_relative_eq!(mean, 2.5);
        assert_relative_eq!(variance, 1.25);

        let empty = ndarray::Array2::<f64>::zeros((0, 3));
        let (mean, _) = mean_and_variance(empty.view());
        assert!(mean.is_nan());
    }

    #[test]
    fn test_pearson_correlation_perfect() {
        let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = vec![2.0, 4.0, 6.0, 8.0, 10.0];
        assert!((pearson_correlation(&x, &y) - 1.0).abs() < 1e-10);

        let y_neg = vec![10.0, 8.0, 6.0, 4.0, 2.0];
        assert!((pearson_correlation(&x, &y_neg) + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_pearson_correlation_edge_cases() {
        let empty: Vec<f64> = vec![];
        assert!(pearson_correlation(&empty, &empty).is_nan());
        assert!(pearson_correlation(&[1.0, 2.0, 3.0], &[1.0, 2.0]).is_nan());
        assert!(pearson_correlation(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]).is_nan());
    }
}
