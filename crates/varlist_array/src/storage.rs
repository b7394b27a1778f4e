//! Backing storage for primitive child values.

/// Tightly packed buffer of primitive values.
///
/// The full length of the underlying vector is the allocated capacity. How
/// much of it is actually in use is tracked by the owning list array's
/// offsets, not by the buffer itself.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveStorage<T> {
    values: Vec<T>,
}

impl<T: Copy + Default> PrimitiveStorage<T> {
    /// Allocate a buffer holding `capacity` default values.
    pub fn with_capacity(capacity: usize) -> Self {
        PrimitiveStorage {
            values: vec![T::default(); capacity],
        }
    }

    /// Reallocate to exactly `new_capacity` values, keeping the first `used`
    /// values.
    ///
    /// Values past `used` are reset to their defaults.
    pub fn resize_and_copy(&mut self, used: usize, new_capacity: usize) {
        let keep = used.min(new_capacity).min(self.values.len());
        let mut values = vec![T::default(); new_capacity];
        values[..keep].copy_from_slice(&self.values[..keep]);
        self.values = values;
    }
}

impl<T> PrimitiveStorage<T> {
    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Allocated size in bytes.
    pub fn nbytes(&self) -> usize {
        self.values.len() * std::mem::size_of::<T>()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }
}

impl<T> From<Vec<T>> for PrimitiveStorage<T> {
    fn from(value: Vec<T>) -> Self {
        PrimitiveStorage { values: value }
    }
}

impl<T> AsRef<[T]> for PrimitiveStorage<T> {
    fn as_ref(&self) -> &[T] {
        &self.values
    }
}
