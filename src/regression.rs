//! Log-log scaling regression across box sizes.

use crate::errors::{DfaError, DfaResult};
use crate::fluctuation::FluctuationPoint;
use crate::math::ols_line;

/// The fitted scaling law: fluctuation ≈ slope · log10(size) + intercept.
///
/// The slope is the Hurst exponent estimate; the intercept is consumed only
/// by external plotting collaborators.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegressionResult {
    /// Scaling slope, the Hurst exponent H.
    pub slope: f64,
    /// Intercept of the log-log line.
    pub intercept: f64,
}

/// Fit the scaling line over the finite fluctuation points.
///
/// Points whose fluctuation is undefined (NaN) are dropped first.
///
/// # Errors
/// [`DfaError::DegenerateScaling`] when fewer than two finite points remain.
pub fn fit_scaling_law(points: &[FluctuationPoint]) -> DfaResult<RegressionResult> {
    let (log_sizes, log_fluctuations): (Vec<f64>, Vec<f64>) = points
        .iter()
        .filter(|p| p.is_defined() && p.log_box_size.is_finite())
        .map(|p| (p.log_box_size, p.log_fluctuation))
        .unzip();

    if log_sizes.len() < 2 {
        return Err(DfaError::DegenerateScaling {
            finite_points: log_sizes.len(),
        });
    }

    let (slope, intercept) = ols_line(&log_sizes, &log_fluctuations)?;
    Ok(RegressionResult { slope, intercept })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn point(log_s: f64, log_f: f64) -> FluctuationPoint {
        FluctuationPoint {
            log_box_size: log_s,
            log_fluctuation: log_f,
        }
    }

    #[test]
    fn test_exact_scaling_slope() {
        // log F = 0.7 log s - 0.2
        let points: Vec<FluctuationPoint> = (1..=6)
            .map(|i| {
                let log_s = i as f64 * 0.3;
                point(log_s, 0.7 * log_s - 0.2)
            })
            .collect();
        let result = fit_scaling_law(&points).unwrap();
        assert_approx_eq!(result.slope, 0.7, 1e-10);
        assert_approx_eq!(result.intercept, -0.2, 1e-10);
    }

    #[test]
    fn test_undefined_points_are_dropped() {
        let points = vec![
            point(0.5, 0.25),
            point(1.0, f64::NAN),
            point(1.5, 0.75),
            point(2.0, 1.0),
        ];
        let result = fit_scaling_law(&points).unwrap();
        assert_approx_eq!(result.slope, 0.5, 1e-10);
    }

    #[test]
    fn test_degenerate_with_single_finite_point() {
        let points = vec![point(0.5, 0.25), point(1.0, f64::NAN)];
        match fit_scaling_law(&points) {
            Err(DfaError::DegenerateScaling { finite_points }) => assert_eq!(finite_points, 1),
            _ => panic!("Expected DegenerateScaling error"),
        }
    }

    #[test]
    fn test_degenerate_with_no_points() {
        match fit_scaling_law(&[]) {
            Err(DfaError::DegenerateScaling { finite_points }) => assert_eq!(finite_points, 0),
            _ => panic!("Expected DegenerateScaling error"),
        }
    }
}
