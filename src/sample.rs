//! Input normalization: building a clean, sorted sample series.
//!
//! Raw observations arrive as a value sequence with an optional coordinate
//! sequence. Normalization pairs them up, rejects non-finite coordinates,
//! drops samples whose value is non-finite (missing observations), sorts by
//! coordinate with a stable tie-break, and measures the minimum positive
//! coordinate spacing used as the boundary-epsilon unit downstream.

use crate::errors::{validate_equal_lengths, validate_finite_coordinates, DfaResult};
use crate::math::float_total_cmp;

/// One observation: a (coordinate, value) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sample {
    /// Sample position along the analysis axis.
    pub coordinate: f64,
    /// Observed value at that position.
    pub value: f64,
}

/// A normalized series: samples sorted ascending by coordinate, all values
/// finite. Built once and treated as immutable for the rest of the pipeline;
/// range selection copies a restricted view rather than editing in place.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleSeries {
    samples: Vec<Sample>,
    spacing: f64,
}

impl SampleSeries {
    /// Build a normalized series from raw observations.
    ///
    /// When `coordinates` is omitted, regular integer coordinates 1..N are
    /// synthesized. Samples with a non-finite value are discarded as missing
    /// observations. Duplicate coordinates are permitted; the stable sort
    /// keeps their input order, so normalization is reproducible within a
    /// run regardless of input permutation.
    ///
    /// # Errors
    /// - [`DfaError::LengthMismatch`] when coordinate and value lengths differ.
    /// - [`DfaError::NonNumericInput`] when a coordinate is NaN or infinite.
    ///
    /// [`DfaError::LengthMismatch`]: crate::errors::DfaError::LengthMismatch
    /// [`DfaError::NonNumericInput`]: crate::errors::DfaError::NonNumericInput
    pub fn from_observations(values: &[f64], coordinates: Option<&[f64]>) -> DfaResult<Self> {
        let mut samples = match coordinates {
            Some(coords) => {
                validate_equal_lengths(values.len(), coords.len())?;
                validate_finite_coordinates(coords)?;
                coords
                    .iter()
                    .zip(values)
                    .filter(|(_, v)| v.is_finite())
                    .map(|(&coordinate, &value)| Sample { coordinate, value })
                    .collect::<Vec<_>>()
            }
            None => values
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .map(|(i, &value)| Sample {
                    coordinate: (i + 1) as f64,
                    value,
                })
                .collect(),
        };

        samples.sort_by(|a, b| float_total_cmp(&a.coordinate, &b.coordinate));
        let spacing = minimum_positive_spacing(&samples);

        Ok(Self { samples, spacing })
    }

    /// Construct directly from already-normalized samples.
    ///
    /// Used by range selection to materialize a masked view. Callers must
    /// hand over samples sorted ascending with finite values.
    pub(crate) fn from_sorted_samples(samples: Vec<Sample>, spacing: f64) -> Self {
        Self { samples, spacing }
    }

    /// Number of samples remaining after filtering.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples survived filtering.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The sorted samples.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Coordinates in sorted order.
    pub fn coordinates(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.coordinate)
    }

    /// Smallest coordinate, if any samples remain.
    pub fn min_coordinate(&self) -> Option<f64> {
        self.samples.first().map(|s| s.coordinate)
    }

    /// Largest coordinate, if any samples remain.
    pub fn max_coordinate(&self) -> Option<f64> {
        self.samples.last().map(|s| s.coordinate)
    }

    /// Minimum strictly positive gap between consecutive distinct
    /// coordinates; 0.0 when fewer than two distinct coordinates remain
    /// (later stages then fail through their own sufficiency checks).
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Whether any sample sits exactly at the given coordinate.
    pub fn contains_coordinate(&self, x: f64) -> bool {
        self.samples
            .binary_search_by(|s| float_total_cmp(&s.coordinate, &x))
            .is_ok()
    }
}

fn minimum_positive_spacing(sorted: &[Sample]) -> f64 {
    let mut spacing = f64::INFINITY;
    for pair in sorted.windows(2) {
        let gap = pair[1].coordinate - pair[0].coordinate;
        if gap > 0.0 && gap < spacing {
            spacing = gap;
        }
    }
    if spacing.is_finite() {
        spacing
    } else {
        0.0
    }
}
