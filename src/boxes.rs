//! Box-size generation and box partitioning over irregular coordinates.
//!
//! Boxes are transient per-size scratch: for each size the span is cut into
//! `floor(total_span / s)` intervals, centered so edge slack splits evenly at
//! both ends, and each box is the half-open interval `(lower, upper]` over
//! coordinates. Membership is resolved with a single ordered sweep over the
//! sorted coordinates, O(n) per size and fully deterministic.

use crate::errors::{DfaError, DfaResult};
use crate::math::{iqr, log10_spaced};
use crate::range::AnalysisRange;

/// Maximum number of generated box sizes.
const MAX_GENERATED_SIZES: usize = 50;

/// Cap on the per-size box count, within f64's exact-integer range.
const MAX_BOXES: u64 = 1 << 52;

/// Decade offset above the typical coordinate spacing for the smallest
/// generated size. Reproducibility-critical constant with no documented
/// derivation; preserved exactly.
const LOWER_DECADE_OFFSET: f64 = 1.001;

/// Decade offset below the total span for the largest generated size.
/// Reproducibility-critical constant; preserved exactly.
const UPPER_DECADE_OFFSET: f64 = 0.5;

/// Generate the default box-size set for a masked coordinate sequence.
///
/// Sizes are logarithmically spaced from one decade plus a fixed offset
/// above the typical coordinate spacing up to half a decade below the
/// total span: `10^linspace(log10(spacing) + 1.001,
/// log10(total_span) - 0.5, min(50, n))`. The smallest size therefore
/// holds roughly ten samples per box, enough to support a low-order local
/// fit, while the largest stays well inside the span.
pub fn generate_box_sizes(coordinates: &[f64], total_span: f64) -> Vec<f64> {
    let count = MAX_GENERATED_SIZES.min(coordinates.len());
    let lower = typical_spacing(coordinates).log10() + LOWER_DECADE_OFFSET;
    let upper = total_span.log10() - UPPER_DECADE_OFFSET;
    log10_spaced(lower, upper, count)
}

/// Robust average spacing over the central half of the sorted coordinates:
/// the coordinate IQR divided by the number of gaps it spans. On a regular
/// grid this is exactly the grid step; sparse tails do not distort it.
fn typical_spacing(coordinates: &[f64]) -> f64 {
    let gaps = coordinates.len().saturating_sub(1) as f64 / 2.0;
    iqr(coordinates) / gaps
}

/// Validate caller-supplied box sizes.
///
/// Drops non-finite and non-positive entries and deduplicates exact
/// repeats, keeping first occurrences. The surviving sizes stay in the
/// order they were supplied, which is the order fluctuation points are
/// reported in.
///
/// # Errors
/// [`DfaError::InvalidBoxSizes`] when fewer than two distinct sizes remain.
pub fn validate_box_sizes(supplied: &[f64]) -> DfaResult<Vec<f64>> {
    let mut sizes: Vec<f64> = Vec::with_capacity(supplied.len());
    for &s in supplied {
        if s.is_finite() && s > 0.0 && !sizes.contains(&s) {
            sizes.push(s);
        }
    }

    if sizes.len() < 2 {
        return Err(DfaError::InvalidBoxSizes { valid: sizes.len() });
    }
    Ok(sizes)
}

/// The contiguous run of series indices one box encloses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxSpan {
    /// Box position within the partition, 0-based.
    pub index: usize,
    /// First enclosed sample index.
    pub start: usize,
    /// One past the last enclosed sample index.
    pub end: usize,
}

impl BoxSpan {
    /// Number of samples the box encloses.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the box encloses no samples.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Partition sorted coordinates into boxes of width `size`.
///
/// Returns `None` when the size does not fit the span even once (or is not a
/// usable positive finite width); that size yields no fluctuation value.
/// Otherwise returns the non-empty boxes in ascending order. Box `i` covers
/// `(b[i], b[i+1]]` with `b[i] = xbeg + offset + size * i` and
/// `offset = (total_span - size * nbox) / 2`, so slack is split evenly at
/// both ends of the span. Samples at or below the first boundary, or above
/// the last, belong to no box.
pub fn partition_boxes(coordinates: &[f64], range: &AnalysisRange, size: f64) -> Option<Vec<BoxSpan>> {
    let total_span = range.total_span();
    if !size.is_finite() || size <= 0.0 || !total_span.is_finite() || total_span <= 0.0 {
        log::debug!("Skipping unusable box size {}", size);
        return None;
    }

    let nbox_f = (total_span / size).floor();
    if nbox_f < 1.0 {
        return None;
    }
    // A box narrower than the minimum spacing can never hold two distinct
    // coordinates, so capping the count only drops boxes that would be
    // skipped anyway while keeping the index arithmetic exact in f64.
    let nbox = nbox_f.min(MAX_BOXES as f64) as usize;

    let offset = (total_span - size * nbox as f64) / 2.0;
    let base = range.xbeg + offset;
    let boundary = |i: usize| base + size * i as f64;

    let n = coordinates.len();
    let mut boxes = Vec::new();

    // Single sweep: advance past samples below the first boundary, then walk
    // each occupied box's run. The box index for a coordinate is located by
    // a division hint and corrected against the exact boundary values, so
    // membership is always decided by the same (lower, upper] comparisons.
    let mut p = 0;
    while p < n && coordinates[p] <= base {
        p += 1;
    }

    while p < n {
        let c = coordinates[p];

        let hint = ((c - base) / size).ceil() as i64 - 1;
        let mut k = hint.clamp(0, nbox as i64 - 1) as usize;
        while k > 0 && c <= boundary(k) {
            k -= 1;
        }
        while k + 1 < nbox && c > boundary(k + 1) {
            k += 1;
        }
        if c > boundary(k + 1) {
            // Past the last boundary; all remaining samples are too.
            break;
        }

        let upper = boundary(k + 1);
        let start = p;
        while p < n && coordinates[p] <= upper {
            p += 1;
        }
        boxes.push(BoxSpan {
            index: k,
            start,
            end: p,
        });
    }

    Some(boxes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DfaError;
    use assert_approx_eq::assert_approx_eq;

    fn range(xbeg: f64, xend: f64) -> AnalysisRange {
        AnalysisRange { xbeg, xend }
    }

    #[test]
    fn test_validate_box_sizes_filters_and_keeps_input_order() {
        let sizes =
            validate_box_sizes(&[8.0, f64::NAN, 2.0, -1.0, 0.0, 2.0, f64::INFINITY, 4.0]).unwrap();
        assert_eq!(sizes, vec![8.0, 2.0, 4.0]);
    }

    #[test]
    fn test_validate_box_sizes_requires_two_distinct() {
        match validate_box_sizes(&[5.0, 5.0]) {
            Err(DfaError::InvalidBoxSizes { valid }) => assert_eq!(valid, 1),
            _ => panic!("Expected InvalidBoxSizes error"),
        }
        match validate_box_sizes(&[f64::NAN, -3.0]) {
            Err(DfaError::InvalidBoxSizes { valid }) => assert_eq!(valid, 0),
            _ => panic!("Expected InvalidBoxSizes error"),
        }
    }

    #[test]
    fn test_generated_sizes_formula() {
        // Coordinates 1..=100: IQR = 49.5 over 49.5 gaps, so the spacing
        // estimate is exactly 1. Span chosen as 100.
        let coords: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        let sizes = generate_box_sizes(&coords, 100.0);
        assert_eq!(sizes.len(), 50);
        assert_approx_eq!(sizes[0], 10f64.powf(1.001), 1e-9);
        assert_approx_eq!(sizes[49], 10f64.powf(2.0 - 0.5), 1e-9);
        assert!(sizes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_smallest_generated_size_tracks_spacing_not_span() {
        // A ten-fold longer grid with the same unit spacing keeps the same
        // smallest size; only the largest size grows with the span. Tying
        // the lower end to the span instead would push every size into the
        // large-scale region where the scaling relation flattens.
        let short: Vec<f64> = (1..=1_000).map(|i| i as f64).collect();
        let long: Vec<f64> = (1..=10_000).map(|i| i as f64).collect();
        let short_sizes = generate_box_sizes(&short, 999.0);
        let long_sizes = generate_box_sizes(&long, 9_999.0);
        assert_approx_eq!(short_sizes[0], long_sizes[0], 1e-9);
        assert_approx_eq!(long_sizes[0], 10f64.powf(1.001), 1e-9);
        assert!(long_sizes[49] > short_sizes[49]);
    }

    #[test]
    fn test_generated_size_count_capped_by_samples() {
        let coords: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let sizes = generate_box_sizes(&coords, 20.0);
        assert_eq!(sizes.len(), 20);
    }

    #[test]
    fn test_partition_even_split() {
        // Span (0, 12], size 6: boundaries 0, 6, 12 with no slack.
        let coords: Vec<f64> = (1..=12).map(|i| i as f64).collect();
        let boxes = partition_boxes(&coords, &range(0.0, 12.0), 6.0).unwrap();
        assert_eq!(boxes.len(), 2);
        assert_eq!((boxes[0].start, boxes[0].end), (0, 6));
        assert_eq!((boxes[1].start, boxes[1].end), (6, 12));
    }

    #[test]
    fn test_partition_centers_slack() {
        // Span 10, size 4: nbox = 2, offset = 1, boundaries 1, 5, 9.
        // Coordinate 1.0 sits exactly on the first boundary and is excluded
        // by the lower-exclusive convention; 5.0 is upper-inclusive in box 0.
        let coords: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let boxes = partition_boxes(&coords, &range(0.0, 10.0), 4.0).unwrap();
        assert_eq!(boxes.len(), 2);
        assert_eq!((boxes[0].start, boxes[0].end), (1, 5)); // 2, 3, 4, 5
        assert_eq!((boxes[1].start, boxes[1].end), (5, 9)); // 6, 7, 8, 9
    }

    #[test]
    fn test_partition_size_exceeding_span() {
        let coords: Vec<f64> = (1..=5).map(|i| i as f64).collect();
        assert!(partition_boxes(&coords, &range(0.0, 5.0), 7.5).is_none());
    }

    #[test]
    fn test_partition_skips_empty_boxes() {
        // A gap in the middle of the span leaves interior boxes empty; they
        // are simply absent from the result.
        let coords = vec![0.5, 1.0, 1.5, 8.5, 9.0, 9.5];
        let boxes = partition_boxes(&coords, &range(0.0, 10.0), 2.0).unwrap();
        let indices: Vec<usize> = boxes.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![0, 4]);
        assert_eq!(boxes[0].len(), 3);
        assert_eq!(boxes[1].len(), 3);
    }

    #[test]
    fn test_partition_irregular_coordinates() {
        let coords = vec![0.3, 0.9, 2.2, 2.3, 2.4, 4.8, 5.9, 7.1, 9.9];
        let boxes = partition_boxes(&coords, &range(0.0, 10.0), 2.5).unwrap();
        // nbox = 4, boundaries 0, 2.5, 5, 7.5, 10.
        assert_eq!(boxes.len(), 4);
        assert_eq!(boxes[0].len(), 5); // 0.3 .. 2.4
        assert_eq!(boxes[1].len(), 1); // 4.8
        assert_eq!(boxes[2].len(), 2); // 5.9, 7.1
        assert_eq!(boxes[3].len(), 1); // 9.9
    }

    #[test]
    fn test_partition_excludes_samples_outside_centered_boxes() {
        // Size 3 on span 10: offset = 0.5, boundaries 0.5, 3.5, 6.5, 9.5.
        // Samples at 0.25 and 9.75 fall in the slack and belong to no box.
        let coords = vec![0.25, 1.0, 2.0, 4.0, 5.0, 7.0, 8.0, 9.75];
        let boxes = partition_boxes(&coords, &range(0.0, 10.0), 3.0).unwrap();
        let total: usize = boxes.iter().map(|b| b.len()).sum();
        assert_eq!(total, 6);
        assert_eq!(boxes.first().unwrap().start, 1);
        assert_eq!(boxes.last().unwrap().end, 7);
    }
}
