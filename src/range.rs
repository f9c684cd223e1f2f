//! Range and detrend-order resolution.
//!
//! The analysis interval is half-open-adjusted: the mask keeps coordinates in
//! `(xbeg, xend]`, the same lower-exclusive, upper-inclusive convention box
//! membership uses later. When a sample sits exactly at the requested start
//! point, the lower bound is pulled back by one spacing unit so that sample
//! stays in; otherwise boundary samples would silently drop out of the first
//! box. This convention is load-bearing for edge samples and must not be
//! flipped.

use crate::errors::{validate_sufficient_samples, Diagnostic, DfaResult};
use crate::sample::SampleSeries;

/// Detrending order used when none is supplied.
pub const DEFAULT_DETREND_ORDER: usize = 2;

/// The resolved analysis interval.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisRange {
    /// Exclusive lower bound of the coordinate mask.
    pub xbeg: f64,
    /// Inclusive upper bound of the coordinate mask.
    pub xend: f64,
}

impl AnalysisRange {
    /// Width of the interval.
    pub fn total_span(&self) -> f64 {
        self.xend - self.xbeg
    }
}

/// Masked series together with the interval and detrending order that
/// produced it.
#[derive(Debug, Clone)]
pub struct RangeSelection {
    /// Samples restricted to the analysis interval (a fresh copy, the
    /// normalized series itself is untouched).
    pub series: SampleSeries,
    /// Resolved interval.
    pub range: AnalysisRange,
    /// Resolved detrending order.
    pub order: usize,
}

/// Resolve the detrending order from a candidate list.
///
/// Empty means "use the default". A multi-valued candidate set resolves to
/// its maximum with an [`Diagnostic::AmbiguousDetrendOrder`] entry.
pub fn resolve_detrend_order(candidates: &[usize], diagnostics: &mut Vec<Diagnostic>) -> usize {
    match candidates {
        [] => DEFAULT_DETREND_ORDER,
        [order] => *order,
        _ => {
            let resolved = *candidates.iter().max().unwrap_or(&DEFAULT_DETREND_ORDER);
            let diag = Diagnostic::AmbiguousDetrendOrder {
                supplied: candidates.to_vec(),
                resolved,
            };
            log::warn!("{}", diag);
            diagnostics.push(diag);
            resolved
        }
    }
}

/// Resolve the analysis interval and mask the series to it.
///
/// `requested` is the caller's range: empty means the full default span
/// (xend = max coordinate, xbeg = min coordinate − spacing). Exactly two
/// finite ascending values are used as given, subject to the boundary
/// policy; anything else resolves to (min, max) of the usable entries with
/// an [`Diagnostic::AmbiguousRange`] entry, falling back to the default span
/// when fewer than two distinct finite entries remain.
///
/// # Errors
/// [`DfaError::InsufficientData`] when fewer than `3 * (order + 2)` samples
/// fall inside the interval.
///
/// [`DfaError::InsufficientData`]: crate::errors::DfaError::InsufficientData
pub fn select_range(
    series: &SampleSeries,
    requested: &[f64],
    order: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> DfaResult<RangeSelection> {
    // Without at least one sample there is no default span to resolve.
    validate_sufficient_samples(series.len(), order)?;

    let (xstart, xend) = resolve_interval(series, requested, diagnostics);

    // Boundary policy: the requested start point is always excluded by the
    // half-open test. If a sample sits exactly at xstart, pull the bound
    // back one spacing unit so that sample is kept.
    let xbeg = if series.contains_coordinate(xstart) {
        xstart - series.spacing()
    } else {
        xstart
    };

    let masked: Vec<_> = series
        .samples()
        .iter()
        .filter(|s| s.coordinate > xbeg && s.coordinate <= xend)
        .copied()
        .collect();

    validate_sufficient_samples(masked.len(), order)?;

    Ok(RangeSelection {
        series: SampleSeries::from_sorted_samples(masked, series.spacing()),
        range: AnalysisRange { xbeg, xend },
        order,
    })
}

/// Resolve the requested range entries to an (xstart, xend) pair, before the
/// boundary policy is applied.
fn resolve_interval(
    series: &SampleSeries,
    requested: &[f64],
    diagnostics: &mut Vec<Diagnostic>,
) -> (f64, f64) {
    // Normalizer guarantees at least one sample here.
    let default_start = series.min_coordinate().unwrap_or(0.0);
    let default_end = series.max_coordinate().unwrap_or(0.0);

    if requested.is_empty() {
        return (default_start, default_end);
    }

    if let [lo, hi] = requested {
        if lo.is_finite() && hi.is_finite() && lo < hi {
            return (*lo, *hi);
        }
    }

    let finite: Vec<f64> = requested.iter().copied().filter(|v| v.is_finite()).collect();
    let lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let resolved = if lo < hi {
        (lo, hi)
    } else {
        (default_start, default_end)
    };

    let diag = Diagnostic::AmbiguousRange {
        supplied: requested.to_vec(),
        resolved,
    };
    log::warn!("{}", diag);
    diagnostics.push(diag);
    resolved
}
