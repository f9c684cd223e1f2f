//! Shared numerical utilities for the DFA pipeline.

use crate::errors::{DfaError, DfaResult};

/// Spread below which a predictor is treated as constant in regression.
const MIN_PREDICTOR_SPREAD: f64 = 1e-12;

/// Total ordering comparator for f64 suitable for reproducible sorting.
///
/// NaN values sort greater than every finite value; the normalizer rejects
/// or filters them before sorting, so this only matters for defensiveness in
/// helper routines that sort scratch copies.
#[inline]
pub fn float_total_cmp(a: &f64, b: &f64) -> std::cmp::Ordering {
    a.total_cmp(b)
}

/// Calculate a percentile from sorted data using linear interpolation.
///
/// Standard linear-interpolation convention: `p` in [0, 1] maps to the
/// fractional index `p * (n - 1)`, interpolating between the two nearest
/// order statistics.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return sorted_data[0];
    }
    if p >= 1.0 {
        return sorted_data[sorted_data.len() - 1];
    }

    let index = p * (sorted_data.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted_data[lower]
    } else {
        let weight = index - lower as f64;
        sorted_data[lower] * (1.0 - weight) + sorted_data[upper] * weight
    }
}

/// Interquartile range of a (not necessarily sorted) sample.
pub fn iqr(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(float_total_cmp);
    percentile(&sorted, 0.75) - percentile(&sorted, 0.25)
}

/// Generate `count` logarithmically spaced values: `10^linspace(lower, upper, count)`.
///
/// `lower` and `upper` are base-10 exponents. The endpoints are included.
pub fn log10_spaced(lower: f64, upper: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![10f64.powf(lower)],
        _ => {
            let step = (upper - lower) / (count - 1) as f64;
            (0..count)
                .map(|i| 10f64.powf(lower + step * i as f64))
                .collect()
        }
    }
}

/// Ordinary least-squares line fit returning (slope, intercept).
///
/// Sums are computed over mean-centered data to avoid catastrophic
/// cancellation when x values are large but have small variance.
///
/// # Errors
/// Fails when fewer than two points are given, any entry is non-finite, or
/// the predictor has (near-)zero spread.
pub fn ols_line(x: &[f64], y: &[f64]) -> DfaResult<(f64, f64)> {
    if x.len() != y.len() || x.len() < 2 {
        return Err(DfaError::NumericalError {
            reason: format!(
                "Line fit needs at least 2 paired points, got {} x and {} y",
                x.len(),
                y.len()
            ),
        });
    }

    if !x.iter().all(|v| v.is_finite()) || !y.iter().all(|v| v.is_finite()) {
        return Err(DfaError::NumericalError {
            reason: "Non-finite values in regression data".to_string(),
        });
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let sxx: f64 = x
        .iter()
        .map(|xi| {
            let c = xi - mean_x;
            c * c
        })
        .sum();

    if sxx <= MIN_PREDICTOR_SPREAD {
        return Err(DfaError::NumericalError {
            reason: format!(
                "Predictor has near-zero spread in regression (sum of squares {:.2e})",
                sxx
            ),
        });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    if !slope.is_finite() || !intercept.is_finite() {
        return Err(DfaError::NumericalError {
            reason: "Non-finite regression coefficients computed".to_string(),
        });
    }

    Ok((slope, intercept))
}
