//! Utilities useful for testing.
//!
//! Note these aren't placed behind an `cfg[(test)]` annotation since they
//! should be usable outside of the crate.

use crate::array::ListArray;
use crate::host::slice_to_host;

/// Asserts that two list arrays are logically equal.
///
/// Only the used portion of each array is compared, spare capacity and the
/// spans of null sub-arrays are ignored.
pub fn assert_list_arrays_eq(a: &ListArray, b: &ListArray) {
    if a.len() != b.len() {
        panic!("Array lengths differ, got {} and {}", a.len(), b.len());
    }

    assert_eq!(a.child_type(), b.child_type(), "Child types differ");

    for (idx, (a_item, b_item)) in a.iter().zip(b.iter()).enumerate() {
        assert_eq!(
            a_item.map(|s| slice_to_host(&s)),
            b_item.map(|s| slice_to_host(&s)),
            "Sub-arrays differ at index {idx}"
        );
    }
}
