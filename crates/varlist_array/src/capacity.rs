//! Growth and shrinking of child data buffers.
use tracing::trace;

use crate::array::{ChildData, ChildSlice};
use crate::datatype::DataType;

/// A buffer whose allocated capacity may exceed the length actually in use.
pub trait GrowableBuffer {
    /// Number of elements the buffer can hold without reallocating.
    fn capacity(&self) -> usize;

    /// Reallocate to hold exactly `new_capacity` elements, keeping the first
    /// `used` elements intact.
    fn reallocate(&mut self, used: usize, new_capacity: usize);

    /// Allocated size in bytes.
    fn nbytes(&self) -> usize;
}

/// Make sure `buffer` can hold `new_used` elements.
///
/// Grows to `max(2 * capacity, new_used)` when needed, copying the first
/// `old_used` elements. Returns true if a reallocation happened.
pub fn ensure_capacity<B>(buffer: &mut B, old_used: usize, new_used: usize) -> bool
where
    B: GrowableBuffer + ?Sized,
{
    let capacity = buffer.capacity();
    if capacity >= new_used {
        return false;
    }

    let new_capacity = usize::max(2 * capacity, new_used);
    trace!(%capacity, %new_capacity, %old_used, "growing buffer");
    buffer.reallocate(old_used, new_capacity);

    true
}

/// Shrink `buffer` to exactly `used` elements.
///
/// Returns true if a reallocation happened.
pub fn trim<B>(buffer: &mut B, used: usize) -> bool
where
    B: GrowableBuffer + ?Sized,
{
    let capacity = buffer.capacity();
    if capacity == used {
        return false;
    }

    trace!(%capacity, %used, "trimming buffer");
    buffer.reallocate(used, used);

    true
}

/// Zeroed element counts for each nesting level of `child_type`.
///
/// The first count is the number of child elements, each following count is
/// the number of elements one level deeper.
pub fn init_nested_counts(child_type: &DataType) -> Vec<usize> {
    vec![0; child_type.alloc_count()]
}

/// Add the element counts of a sub-array to `counts`.
pub fn add_nested_counts(counts: &mut [usize], values: &ChildSlice<'_>) {
    if let Some(first) = counts.first_mut() {
        *first += values.len();
    }

    if let ChildSlice::List(list) = values {
        if counts.len() > 1 {
            add_nested_counts(&mut counts[1..], &list.flat_values());
        }
    }
}

/// Convert counts into pre-allocation hints.
pub fn counts_to_hints(counts: &[usize]) -> Vec<Option<usize>> {
    counts.iter().map(|c| Some(*c)).collect()
}

impl GrowableBuffer for ChildData {
    fn capacity(&self) -> usize {
        crate::array::match_child_data!(self, buf => buf.capacity(), list => list.len())
    }

    fn reallocate(&mut self, used: usize, new_capacity: usize) {
        crate::array::match_child_data!(
            self,
            buf => buf.resize_and_copy(used, new_capacity),
            list => list.reallocate(used, new_capacity)
        )
    }

    fn nbytes(&self) -> usize {
        crate::array::match_child_data!(self, buf => buf.nbytes(), list => list.nbytes())
    }
}
