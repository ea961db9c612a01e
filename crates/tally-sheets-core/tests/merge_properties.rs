//! Property tests for range-list compaction
//!
//! The merge algorithm makes two promises: the union of its output covers
//! exactly the cells covered by the input, and feeding the output back in
//! changes nothing. Both are checked against randomly generated rectangle
//! sets.

use proptest::prelude::*;
use std::collections::BTreeSet;
use tally_sheets_core::{merge_ranges, GridRange};

fn covered(ranges: &[GridRange]) -> BTreeSet<(u32, u16)> {
    ranges.iter().flat_map(|r| r.cells()).collect()
}

fn arb_range() -> impl Strategy<Value = GridRange> {
    (0u32..12, 0u16..12, 0u32..5, 0u16..5).prop_map(|(row, col, height, width)| {
        GridRange::new(row, col, row + height, col + width).unwrap()
    })
}

fn arb_ranges() -> impl Strategy<Value = Vec<GridRange>> {
    prop::collection::vec(arb_range(), 0..8)
}

proptest! {
    #[test]
    fn merge_preserves_coverage(ranges in arb_ranges()) {
        let merged = merge_ranges(&ranges).unwrap();
        prop_assert_eq!(covered(&merged), covered(&ranges));
    }

    #[test]
    fn merge_is_idempotent(ranges in arb_ranges()) {
        let once = merge_ranges(&ranges).unwrap();
        let twice = merge_ranges(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn merge_output_is_well_formed(ranges in arb_ranges()) {
        for rect in merge_ranges(&ranges).unwrap() {
            prop_assert!(rect.is_well_formed());
            prop_assert!(rect.cell_count() > 0);
        }
    }

    #[test]
    fn merge_never_grows_fragment_count(ranges in arb_ranges()) {
        // Greedy extraction is not globally minimal, but it never does worse
        // than one rectangle per input cell.
        let merged = merge_ranges(&ranges).unwrap();
        prop_assert!(merged.len() <= covered(&ranges).len());
    }
}
