//! Local polynomial detrending within a single box.
//!
//! Each box is detrended in place over its own (coordinate, value) pairs; no
//! interpolation or stitching across gaps ever happens. The output is the
//! full vector of squared residuals so aggregation can pool at the sample
//! level rather than averaging per box.

use crate::poly::PolynomialFit;
use crate::sample::Sample;

/// Detrend one box and return its squared residuals.
///
/// Returns `None` when the box must be skipped: too few points for the fit
/// (count ≤ order + 1) or a degenerate fit (coordinates with zero spread at
/// degree ≥ 1). A skipped box contributes nothing to the pooled fluctuation,
/// not even a zero.
pub fn box_squared_residuals(samples: &[Sample], order: usize) -> Option<Vec<f64>> {
    if samples.len() <= order + 1 {
        log::debug!(
            "Skipping box with {} samples at detrend order {}",
            samples.len(),
            order
        );
        return None;
    }

    let coordinates: Vec<f64> = samples.iter().map(|s| s.coordinate).collect();
    let values: Vec<f64> = samples.iter().map(|s| s.value).collect();

    let fit = match PolynomialFit::fit(&coordinates, &values, order) {
        Ok(fit) => fit,
        Err(err) => {
            // Duplicate-only coordinates make the design matrix rank
            // deficient; treat the box like a too-small one.
            log::debug!("Skipping degenerate box: {}", err);
            return None;
        }
    };

    Some(
        samples
            .iter()
            .map(|s| {
                let residual = s.value - fit.evaluate(s.coordinate);
                residual * residual
            })
            .collect(),
    )
}
