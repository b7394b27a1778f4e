use std::ops::Range;

use varlist_error::{ErrorKind, Result, VarlistError};

/// Offsets delimiting sub-arrays in a shared data buffer.
///
/// Holds `n + 1` boundaries for `n` sub-arrays. Sub-array `i` occupies
/// `[at(i), at(i + 1))` in the data buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offsets(Vec<u64>);

impl Offsets {
    /// Offsets for `num_spans` sub-arrays with every boundary set to zero.
    pub fn zeroed(num_spans: usize) -> Self {
        Offsets(vec![0; num_spans + 1])
    }

    /// Build offsets from a sequence of sub-array lengths.
    pub fn from_lengths(lengths: impl IntoIterator<Item = usize>) -> Self {
        let lengths = lengths.into_iter();
        let mut offsets = Vec::with_capacity(lengths.size_hint().0 + 1);
        let mut curr = 0;
        offsets.push(curr);
        for len in lengths {
            curr += len as u64;
            offsets.push(curr);
        }
        Offsets(offsets)
    }

    /// Get the boundary at `idx`.
    ///
    /// Panics if `idx` is out of bounds.
    #[inline]
    pub fn at(&self, idx: usize) -> u64 {
        self.0[idx]
    }

    /// Range of the data buffer covered by sub-array `idx`.
    ///
    /// Boundaries past the last written sub-array may be stale and smaller
    /// than the start, such spans are empty.
    ///
    /// Panics if `idx + 1` is out of bounds.
    #[inline]
    pub fn span(&self, idx: usize) -> Range<usize> {
        self.range(idx, idx + 1)
    }

    /// Range of the data buffer between boundaries `start` and `end`, empty
    /// if `end` is below `start`.
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn range(&self, start: usize, end: usize) -> Range<usize> {
        let start = self.0[start];
        let end = self.0[end].max(start);
        (start as usize)..(end as usize)
    }

    /// Set the boundary at `idx`.
    ///
    /// Panics if `idx` is out of bounds.
    #[inline]
    pub fn set(&mut self, idx: usize, offset: u64) {
        self.0[idx] = offset
    }

    /// Number of boundaries (one more than the number of sub-arrays).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of sub-arrays delimited.
    pub fn num_spans(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// The final boundary, i.e. the used length of the data buffer.
    pub fn last(&self) -> u64 {
        self.0.last().copied().unwrap_or(0)
    }

    /// Resize to `len` boundaries. New boundaries take the value `fill`.
    pub fn resize(&mut self, len: usize, fill: u64) {
        self.0.resize(len, fill)
    }

    pub fn nbytes(&self) -> usize {
        self.0.len() * std::mem::size_of::<u64>()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    /// Check layout invariants against a data buffer holding `data_capacity`
    /// elements.
    ///
    /// Offsets must be non-empty, start at zero, be non-decreasing, and end
    /// within the data buffer.
    pub fn validate(&self, data_capacity: usize) -> Result<()> {
        let first = match self.0.first() {
            Some(first) => *first,
            None => {
                return Err(VarlistError::new(
                    ErrorKind::InvalidLayout,
                    "Offsets must contain at least one value",
                ))
            }
        };

        if first != 0 {
            return Err(VarlistError::new(
                ErrorKind::InvalidLayout,
                format!("First offset must be zero, got {first}"),
            ));
        }

        if let Some(idx) = self.0.windows(2).position(|w| w[0] > w[1]) {
            return Err(VarlistError::new(
                ErrorKind::InvalidLayout,
                format!(
                    "Offsets decrease at index {}: {} > {}",
                    idx + 1,
                    self.0[idx],
                    self.0[idx + 1]
                ),
            ));
        }

        let last = self.last();
        if last as usize > data_capacity {
            return Err(VarlistError::new(
                ErrorKind::InvalidLayout,
                format!("Last offset {last} exceeds data capacity {data_capacity}"),
            ));
        }

        Ok(())
    }
}

impl From<Vec<u64>> for Offsets {
    fn from(value: Vec<u64>) -> Self {
        Offsets(value)
    }
}

impl AsRef<[u64]> for Offsets {
    fn as_ref(&self) -> &[u64] {
        &self.0
    }
}
