//! Per-box-size fluctuation aggregation.
//!
//! For one box size the squared residuals of every valid box are pooled at
//! the sample level and reduced to a single RMS fluctuation. Pooling walks
//! boxes in ascending index order and samples in ascending coordinate order,
//! a fixed reduction order, so the result is bit-for-bit reproducible no
//! matter how the outer box-size loop is scheduled.

use crate::boxes::partition_boxes;
use crate::detrend::box_squared_residuals;
use crate::range::AnalysisRange;
use crate::sample::SampleSeries;

/// RMS fluctuations this far below the series' own magnitude are treated
/// as zero. A perfect local fit leaves rounding-level residuals rather
/// than exact zeros in floating point; those must still produce the
/// undefined (log of zero) outcome. The cutoff scales with the largest
/// absolute value so genuinely tiny-amplitude series stay measurable.
const FLUCTUATION_FLOOR: f64 = 1e-12;

/// One point of the scaling relation: log10 of the box size paired with
/// log10 of the RMS fluctuation, or NaN when the fluctuation is undefined
/// for that size.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FluctuationPoint {
    /// log10 of the box size.
    pub log_box_size: f64,
    /// log10 of the RMS fluctuation; NaN when no box produced residuals.
    pub log_fluctuation: f64,
}

impl FluctuationPoint {
    /// Whether this point can enter the scaling regression.
    pub fn is_defined(&self) -> bool {
        self.log_fluctuation.is_finite()
    }
}

/// Compute the fluctuation point for one box size.
///
/// Partitions the masked series, detrends every box that holds enough
/// points, pools the squared residuals, and reduces them to
/// `sqrt(mean(pooled))`. Sizes that do not fit the span, or whose every box
/// is empty or skipped, yield a NaN point rather than an error; whether the
/// whole analysis still succeeds is decided by the scaling regression.
pub fn fluctuation_for_size(
    series: &SampleSeries,
    range: &AnalysisRange,
    size: f64,
    order: usize,
) -> FluctuationPoint {
    let log_box_size = size.log10();
    let undefined = FluctuationPoint {
        log_box_size,
        log_fluctuation: f64::NAN,
    };

    let coordinates: Vec<f64> = series.coordinates().collect();
    let boxes = match partition_boxes(&coordinates, range, size) {
        Some(boxes) => boxes,
        None => {
            log::debug!("Box size {} does not fit span {}", size, range.total_span());
            return undefined;
        }
    };

    // Fixed reduction order: boxes ascending, samples within a box ascending.
    let mut pooled_sum = 0.0;
    let mut pooled_count = 0usize;
    for span in &boxes {
        if let Some(squared) = box_squared_residuals(&series.samples()[span.start..span.end], order)
        {
            for r in squared {
                pooled_sum += r;
                pooled_count += 1;
            }
        }
    }

    if pooled_count == 0 {
        return undefined;
    }

    let value_scale = series
        .samples()
        .iter()
        .map(|s| s.value.abs())
        .fold(0.0, f64::max);
    let rms = (pooled_sum / pooled_count as f64).sqrt();
    if !rms.is_finite() || rms <= FLUCTUATION_FLOOR * value_scale {
        // log of (effectively) zero is undefined for this size.
        return undefined;
    }

    FluctuationPoint {
        log_box_size,
        log_fluctuation: rms.log10(),
    }
}
