//! The end-to-end estimation pipeline.
//!
//! [`run_dfa`] is the fallible pipeline for callers who want a `Result`;
//! [`estimate_hurst`] is the recovery boundary over it, always returning a
//! [`HurstAnalysis`] whose `hurst` field is a NaN sentinel on failure. No
//! condition inside the pipeline ever panics or escapes to the caller.
//!
//! The loop over box sizes is embarrassingly parallel: each size depends
//! only on the masked series and the size itself, and results are collected
//! positionally, so the `parallel` feature changes throughput but not output.

use crate::config::DfaConfig;
use crate::boxes::{generate_box_sizes, validate_box_sizes};
use crate::errors::{Diagnostic, DfaError, DfaResult};
use crate::fluctuation::{fluctuation_for_size, FluctuationPoint};
use crate::range::{resolve_detrend_order, select_range, AnalysisRange, RangeSelection};
use crate::regression::{fit_scaling_law, RegressionResult};
use crate::sample::SampleSeries;

/// Successful pipeline output.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DfaOutput {
    /// Fitted scaling law; `regression.slope` is the Hurst exponent.
    pub regression: RegressionResult,
    /// One point per evaluated box size, in box-size order, including the
    /// undefined (NaN) ones.
    pub points: Vec<FluctuationPoint>,
    /// Resolved detrending order.
    pub order: usize,
    /// Resolved analysis interval.
    pub range: AnalysisRange,
}

/// Result of [`estimate_hurst`]: sentinel-style output that never aborts the
/// caller.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HurstAnalysis {
    /// The Hurst exponent estimate, or NaN on any recoverable failure.
    pub hurst: f64,
    /// Intercept of the log-log scaling line, or NaN on failure. Consumed
    /// only by external plotting collaborators.
    pub intercept: f64,
    /// Per-size scaling points; populated only when
    /// [`DfaConfig::capture_scaling_points`] is set and the pipeline reached
    /// the fluctuation stage.
    pub scaling_points: Vec<FluctuationPoint>,
    /// Auto-resolved, non-fatal conditions encountered along the way.
    pub diagnostics: Vec<Diagnostic>,
    /// The check that failed, when `hurst` is the NaN sentinel.
    pub failure: Option<DfaError>,
}

impl HurstAnalysis {
    /// Whether the estimate is valid.
    pub fn is_ok(&self) -> bool {
        self.failure.is_none() && self.hurst.is_finite()
    }
}

/// Run the full DFA pipeline, propagating failures as errors.
///
/// Stages run strictly downward: normalization, order and range resolution,
/// box-size selection, per-size fluctuation evaluation, scaling regression.
/// Auto-resolved ambiguities are appended to `diagnostics`.
pub fn run_dfa(
    values: &[f64],
    coordinates: Option<&[f64]>,
    config: &DfaConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> DfaResult<DfaOutput> {
    let series = SampleSeries::from_observations(values, coordinates)?;

    let order = resolve_detrend_order(&config.detrend_orders, diagnostics);
    let RangeSelection {
        series: masked,
        range,
        order,
    } = select_range(&series, &config.range, order, diagnostics)?;

    let sizes = if config.box_sizes.is_empty() {
        let coords: Vec<f64> = masked.coordinates().collect();
        generate_box_sizes(&coords, range.total_span())
    } else {
        validate_box_sizes(&config.box_sizes)?
    };

    let points = evaluate_sizes(&masked, &range, &sizes, order);
    let regression = fit_scaling_law(&points)?;

    Ok(DfaOutput {
        regression,
        points,
        order,
        range,
    })
}

/// Estimate the Hurst exponent, recovering every failure at this boundary.
///
/// On success `hurst` holds the scaling slope; on failure it is NaN and
/// `failure` names the check that tripped. Either way the caller gets a
/// value back, never an error or a panic.
pub fn estimate_hurst(
    values: &[f64],
    coordinates: Option<&[f64]>,
    config: &DfaConfig,
) -> HurstAnalysis {
    let mut diagnostics = Vec::new();
    match run_dfa(values, coordinates, config, &mut diagnostics) {
        Ok(output) => HurstAnalysis {
            hurst: output.regression.slope,
            intercept: output.regression.intercept,
            scaling_points: if config.capture_scaling_points {
                output.points
            } else {
                Vec::new()
            },
            diagnostics,
            failure: None,
        },
        Err(err) => {
            log::warn!("Hurst estimation failed: {}", err);
            HurstAnalysis {
                hurst: f64::NAN,
                intercept: f64::NAN,
                scaling_points: Vec::new(),
                diagnostics,
                failure: Some(err),
            }
        }
    }
}

/// Evaluate the fluctuation point for every box size, preserving the order
/// of `sizes` in the output.
fn evaluate_sizes(
    series: &SampleSeries,
    range: &AnalysisRange,
    sizes: &[f64],
    order: usize,
) -> Vec<FluctuationPoint> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        sizes
            .par_iter()
            .map(|&size| fluctuation_for_size(series, range, size, order))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        sizes
            .iter()
            .map(|&size| fluctuation_for_size(series, range, size, order))
            .collect()
    }
}
