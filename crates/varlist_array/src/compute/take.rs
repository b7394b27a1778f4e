use tracing::debug;
use varlist_error::{Result, VarlistError};

use crate::array::ListArray;
use crate::capacity::{add_nested_counts, counts_to_hints, init_nested_counts};

/// Take sub-arrays at the provided indices, and return a new array.
///
/// An index may appear multiple times, in which case its values are copied
/// again. Validity is carried over from the source.
pub fn take(arr: &ListArray, indices: &[usize]) -> Result<ListArray> {
    if let Some(&idx) = indices.iter().find(|&&idx| idx >= arr.len()) {
        return Err(VarlistError::out_of_range(idx, arr.len()));
    }

    let child_type = arr.child_type();
    let mut counts = init_nested_counts(&child_type);
    for &idx in indices {
        add_nested_counts(&mut counts, &arr.child_slice(idx));
    }
    debug!(n_arrays = indices.len(), ?counts, "take");

    let mut out = ListArray::pre_alloc(indices.len(), &counts_to_hints(&counts), &child_type);
    for (out_idx, &idx) in indices.iter().enumerate() {
        out.set(out_idx, arr.child_slice(idx))?;
        out.validity.set(out_idx, arr.validity.value(idx));
    }

    Ok(out)
}
