//! Range list compaction
//!
//! Bulk edits (paste, autofill, reference-range updates) tend to produce
//! long lists of small rectangular fragments. [`merge_ranges`] compacts such
//! a list into a smaller set of maximal rectangles covering exactly the same
//! cells, which keeps persisted and transmitted payloads small.
//!
//! The algorithm is the classic largest-rectangle-in-histogram lifted to 2D
//! and applied greedily: build a column-run histogram over the covered
//! cells, repeatedly extract the largest all-present rectangle, and repair
//! the histogram in place after each extraction. Greedy extraction is not a
//! globally minimal rectangle decomposition; the guarantee is exact coverage
//! plus a reduced fragment count in the sparse workloads this serves.
//!
//! Time complexity: O(R * m * n) for m rows, n columns, and R output
//! rectangles; R is small in practice.

use crate::error::{Error, Result};
use crate::matrix::SparseMatrix;
use crate::range::GridRange;

/// Merge fragmented ranges into a compact covering set of rectangles
///
/// Rectangles come back in extraction order: largest area first, with scan
/// order (top-to-bottom, left-to-right) breaking ties. Overlapping and
/// duplicate inputs are unioned; a cell is either covered or not.
///
/// # Errors
///
/// Returns [`Error::InvalidRange`] if any input has reversed bounds. The
/// fields of [`GridRange`] are public, so a caller can assemble a range that
/// bypasses the constructor's validation; a reversed range would silently
/// corrupt the histogram, so it is rejected here.
pub fn merge_ranges(ranges: &[GridRange]) -> Result<Vec<GridRange>> {
    for range in ranges {
        if !range.is_well_formed() {
            return Err(Error::InvalidRange(format!(
                "reversed bounds: rows {}..={}, columns {}..={}",
                range.start_row, range.end_row, range.start_column, range.end_column
            )));
        }
    }

    let mut histogram = build_histogram(ranges);
    let mut merged = Vec::new();

    while let Some(rect) = find_maximal_rectangle(&histogram) {
        subtract_rectangle(&mut histogram, &rect);
        merged.push(rect);
    }

    Ok(merged)
}

/// Build the vertical-run histogram for the union of the input ranges
///
/// Every covered cell starts at 1; the forward pass then replaces each value
/// with `1 + value_above` when the cell directly above is present, so a
/// cell's value is the length of the contiguous filled run ending at it.
/// The pass walks rows ascending, which guarantees the upper neighbor's run
/// length is final before it is read.
fn build_histogram(ranges: &[GridRange]) -> SparseMatrix<u32> {
    let mut histogram = SparseMatrix::new();

    for range in ranges {
        for (row, col) in range.cells() {
            histogram.insert(row, col, 1u32);
        }
    }

    for row in histogram.row_indices() {
        if row == 0 {
            continue;
        }
        for col in histogram.columns_in_row(row) {
            if let Some(&above) = histogram.get(row - 1, col) {
                histogram.insert(row, col, above + 1);
            }
        }
    }

    histogram
}

/// Find the largest all-present rectangle in the histogram, if any
///
/// Each present cell is treated as the bottom-right corner of a candidate.
/// Extending leftward, the candidate height shrinks to the smallest run
/// length seen so far. The comparison is strictly greater-than, so among
/// equal-area rectangles the first one reached in scan order wins.
fn find_maximal_rectangle(histogram: &SparseMatrix<u32>) -> Option<GridRange> {
    let mut best_area: u64 = 0;
    let mut best: Option<GridRange> = None;

    histogram.for_each(|row, col, &run| {
        let mut height = run;
        let mut consider = |height: u32, left: u16| {
            let width = (col - left + 1) as u64;
            let area = height as u64 * width;
            if area > best_area {
                best_area = area;
                best = Some(GridRange {
                    start_row: row + 1 - height,
                    end_row: row,
                    start_column: left,
                    end_column: col,
                });
            }
        };

        consider(height, col);

        let mut left = col;
        while left > 0 {
            let neighbor = match histogram.get(row, left - 1) {
                Some(&run) => run,
                None => break,
            };
            left -= 1;
            height = height.min(neighbor);
            consider(height, left);
        }
    });

    best
}

/// Remove an extracted rectangle's cells and repair the runs beneath it
///
/// Every cell of the rectangle is hard-deleted. For each deleted cell, run
/// lengths cascade downward within the column: cells below lose one unit of
/// run per removed row above them, stopping at the first run of 1 or the
/// first absent cell. This keeps the histogram consistent without a rebuild.
fn subtract_rectangle(histogram: &mut SparseMatrix<u32>, rect: &GridRange) {
    for (row, col) in rect.cells() {
        histogram.remove(row, col);

        let mut next_row = row + 1;
        while let Some(&below) = histogram.get(next_row, col) {
            if below <= 1 {
                break;
            }
            histogram.insert(next_row, col, below - 1);
            next_row += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn covered(ranges: &[GridRange]) -> BTreeSet<(u32, u16)> {
        ranges.iter().flat_map(|r| r.cells()).collect()
    }

    fn range(sr: u32, sc: u16, er: u32, ec: u16) -> GridRange {
        GridRange::new(sr, sc, er, ec).unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(merge_ranges(&[]).unwrap(), vec![]);
    }

    #[test]
    fn test_single_range_unchanged() {
        let input = range(2, 3, 7, 9);
        assert_eq!(merge_ranges(&[input]).unwrap(), vec![input]);
    }

    #[test]
    fn test_single_cell() {
        let input = range(4, 4, 4, 4);
        assert_eq!(merge_ranges(&[input]).unwrap(), vec![input]);
    }

    #[test]
    fn test_adjacent_fragments_coalesce() {
        // Two side-by-side blocks form one rectangle.
        let merged = merge_ranges(&[range(0, 0, 2, 1), range(0, 2, 2, 3)]).unwrap();
        assert_eq!(merged, vec![range(0, 0, 2, 3)]);
    }

    #[test]
    fn test_stacked_fragments_coalesce() {
        let merged = merge_ranges(&[range(0, 0, 0, 4), range(1, 0, 1, 4), range(2, 0, 2, 4)])
            .unwrap();
        assert_eq!(merged, vec![range(0, 0, 2, 4)]);
    }

    #[test]
    fn test_duplicates_are_unioned() {
        let input = range(1, 1, 3, 3);
        let merged = merge_ranges(&[input, input, range(1, 1, 2, 2)]).unwrap();
        assert_eq!(merged, vec![input]);
    }

    #[test]
    fn test_l_shape_covers_exactly() {
        // Vertical bar plus horizontal bar sharing a corner cell.
        let input = vec![range(0, 0, 3, 0), range(3, 0, 3, 3)];
        let merged = merge_ranges(&input).unwrap();

        assert_eq!(covered(&merged), covered(&input));
        assert_eq!(merged.len(), 2);
        // Both bars cover four cells; the vertical one is anchored at (3,0),
        // reached before any leftward extension along row 3 ties its area.
        assert_eq!(merged[0], range(0, 0, 3, 0));
        assert_eq!(merged[1], range(3, 1, 3, 3));
    }

    #[test]
    fn test_tie_broken_by_scan_order() {
        let first = range(0, 0, 0, 1);
        let second = range(5, 5, 5, 6);
        let merged = merge_ranges(&[second, first]).unwrap();
        // Equal areas: the rectangle reached first in row-major scan wins
        // each extraction pass, regardless of input order.
        assert_eq!(merged, vec![first, second]);
    }

    #[test]
    fn test_overlapping_cross() {
        let input = vec![range(0, 2, 4, 2), range(2, 0, 2, 4)];
        let merged = merge_ranges(&input).unwrap();
        // Output rectangles may overlap (the crossing cell is covered
        // twice), but the union must match the input exactly.
        assert_eq!(covered(&merged), covered(&input));
        assert_eq!(merged[0], range(2, 0, 2, 4));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            range(0, 0, 1, 1),
            range(0, 2, 1, 2),
            range(4, 0, 4, 5),
            range(5, 0, 5, 5),
        ];
        let once = merge_ranges(&input).unwrap();
        let twice = merge_ranges(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_rejects_reversed_bounds() {
        let malformed = GridRange {
            start_row: 5,
            end_row: 2,
            start_column: 0,
            end_column: 0,
        };
        assert!(matches!(
            merge_ranges(&[malformed]),
            Err(Error::InvalidRange(_))
        ));
    }

    #[test]
    fn test_histogram_runs() {
        let histogram = build_histogram(&[range(1, 0, 3, 1)]);
        assert_eq!(histogram.get(1, 0), Some(&1));
        assert_eq!(histogram.get(2, 0), Some(&2));
        assert_eq!(histogram.get(3, 1), Some(&3));
        assert_eq!(histogram.get(0, 0), None);
    }

    #[test]
    fn test_subtract_cascades_decrement() {
        // Column of five cells; removing the top two shortens the runs below.
        let mut histogram = build_histogram(&[range(0, 0, 4, 0)]);
        subtract_rectangle(&mut histogram, &range(0, 0, 1, 0));

        assert_eq!(histogram.get(0, 0), None);
        assert_eq!(histogram.get(1, 0), None);
        assert_eq!(histogram.get(2, 0), Some(&1));
        assert_eq!(histogram.get(3, 0), Some(&2));
        assert_eq!(histogram.get(4, 0), Some(&3));
    }
}
