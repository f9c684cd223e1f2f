//! Error types, diagnostics, and validation functions for DFA estimation.
//!
//! Every recoverable failure in the pipeline is described by [`DfaError`],
//! with variants carrying the numeric thresholds involved so callers can see
//! exactly which check failed. Conditions that are auto-resolved rather than
//! fatal (ambiguous detrending order, ambiguous range) are reported through
//! [`Diagnostic`] values attached to the analysis result instead of a global
//! logging side channel.

use thiserror::Error;

/// Errors produced by the DFA estimation pipeline.
#[derive(Error, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum DfaError {
    /// A coordinate entry was NaN or infinite.
    ///
    /// Values with non-finite entries are treated as missing observations and
    /// filtered, but the coordinate grid itself must be real for box
    /// partitioning to be meaningful.
    #[error("Non-numeric input: coordinate at position {index} is {value} (must be finite)")]
    NonNumericInput {
        /// Position of the offending coordinate in the input order.
        index: usize,
        /// The non-finite value encountered.
        value: f64,
    },

    /// Value and coordinate sequences have different lengths.
    #[error("Length mismatch: {values} values but {coordinates} coordinates")]
    LengthMismatch {
        /// Number of value entries supplied.
        values: usize,
        /// Number of coordinate entries supplied.
        coordinates: usize,
    },

    /// Too few samples remain in the analysis range for the requested
    /// detrending order.
    #[error("Insufficient data: need at least {required} samples in range, got {actual}")]
    InsufficientData {
        /// Minimum required sample count, 3 * (detrend order + 2).
        required: usize,
        /// Samples actually present after masking.
        actual: usize,
    },

    /// Fewer than two distinct, finite, positive box sizes were supplied.
    #[error("Invalid box sizes: {valid} distinct positive finite sizes remain, need at least 2")]
    InvalidBoxSizes {
        /// Distinct usable sizes after filtering.
        valid: usize,
    },

    /// Fewer than two box sizes produced a finite fluctuation value, so no
    /// scaling slope can be fit.
    #[error("Degenerate scaling: only {finite_points} finite fluctuation points, need at least 2")]
    DegenerateScaling {
        /// Number of (log size, log fluctuation) pairs with a finite value.
        finite_points: usize,
    },

    /// Numerical computation failed inside a linear-algebra routine.
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for the failure.
        reason: String,
    },
}

/// Result type for all fallible DFA operations.
pub type DfaResult<T> = Result<T, DfaError>;

/// Non-fatal conditions that were auto-resolved during estimation.
///
/// These accompany a valid numeric result; they never cause the sentinel
/// outcome on their own.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// Multiple detrending orders were supplied; the maximum was used.
    AmbiguousDetrendOrder {
        /// Candidate orders as supplied.
        supplied: Vec<usize>,
        /// Order actually used.
        resolved: usize,
    },
    /// The supplied range was not exactly two finite ascending values; it was
    /// resolved to the (min, max) of its usable entries, or to the full
    /// default span when fewer than two usable entries remained.
    AmbiguousRange {
        /// Range entries as supplied.
        supplied: Vec<f64>,
        /// Interval actually used, as (xstart, xend).
        resolved: (f64, f64),
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::AmbiguousDetrendOrder { supplied, resolved } => write!(
                f,
                "Ambiguous detrend order {:?} resolved to maximum {}",
                supplied, resolved
            ),
            Diagnostic::AmbiguousRange { supplied, resolved } => write!(
                f,
                "Ambiguous range {:?} resolved to ({}, {})",
                supplied, resolved.0, resolved.1
            ),
        }
    }
}

/// Validate that the value and coordinate sequences pair up one-to-one.
pub fn validate_equal_lengths(values: usize, coordinates: usize) -> DfaResult<()> {
    if values != coordinates {
        return Err(DfaError::LengthMismatch {
            values,
            coordinates,
        });
    }
    Ok(())
}

/// Validate that every coordinate is finite.
///
/// # Example
/// ```rust
/// use hurst_dfa::errors::validate_finite_coordinates;
///
/// assert!(validate_finite_coordinates(&[1.0, 2.5, 3.0]).is_ok());
/// assert!(validate_finite_coordinates(&[1.0, f64::NAN]).is_err());
/// ```
pub fn validate_finite_coordinates(coordinates: &[f64]) -> DfaResult<()> {
    for (index, &value) in coordinates.iter().enumerate() {
        if !value.is_finite() {
            return Err(DfaError::NonNumericInput { index, value });
        }
    }
    Ok(())
}

/// Validate that enough samples remain for the requested detrending order.
///
/// The minimum is `3 * (order + 2)`: at least order + 2 points per box to
/// leave a residual degree of freedom, and at least three usable boxes.
pub fn validate_sufficient_samples(actual: usize, order: usize) -> DfaResult<()> {
    let required = 3 * (order + 2);
    if actual < required {
        return Err(DfaError::InsufficientData { required, actual });
    }
    Ok(())
}
