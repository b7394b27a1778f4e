use tracing::debug;
use varlist_error::Result;

use super::take::take;
use crate::array::ListArray;
use crate::index::Slice;

/// Select sub-arrays using a Python style slice.
///
/// Not zero-copy, the selected sub-arrays are copied into a new array.
pub fn slice(arr: &ListArray, slice: &Slice) -> Result<ListArray> {
    let normalized = slice.normalize(arr.len())?;
    debug!(?slice, ?normalized, len = arr.len(), "slice");

    let indices: Vec<usize> = normalized.indices().collect();
    take(arr, &indices)
}
