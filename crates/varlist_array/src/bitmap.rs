use std::borrow::BorrowMut;

use varlist_error::{ErrorKind, Result, VarlistError};

/// An LSB ordered bitmap.
///
/// Bits past `len` in the last byte are always zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    len: usize,
    data: Vec<u8>,
}

/// Number of bytes needed to hold `len` bits.
pub const fn num_bytes_for_bits(len: usize) -> usize {
    (len + 7) / 8
}

impl Bitmap {
    /// Create a bitmap with all bits unset.
    pub fn new_with_all_false(len: usize) -> Self {
        Bitmap {
            len,
            data: vec![0; num_bytes_for_bits(len)],
        }
    }

    /// Create a bitmap with all bits set.
    pub fn new_with_all_true(len: usize) -> Self {
        let mut bitmap = Bitmap {
            len,
            data: vec![u8::MAX; num_bytes_for_bits(len)],
        };
        bitmap.clear_trailing_bits();
        bitmap
    }

    pub fn from_bool_iter(iter: impl IntoIterator<Item = bool>) -> Self {
        let mut iter = iter.into_iter();

        let mut data = Vec::new();
        let mut len = 0;

        loop {
            let mut byte = 0;
            let mut bit_len = 0;

            for (idx, bit) in iter.borrow_mut().take(8).enumerate() {
                bit_len += 1;
                if bit {
                    byte |= 1 << idx;
                }
            }

            // No more bits, exit loop.
            if bit_len == 0 {
                break;
            }

            // Push byte, continue loop to get next 8 values.
            data.push(byte);
            len += bit_len;
        }

        Bitmap { len, data }
    }

    /// Create a bitmap from raw LSB ordered bytes.
    ///
    /// Errors if the number of bytes doesn't match what's needed for `len`
    /// bits.
    pub fn try_from_bytes(len: usize, bytes: Vec<u8>) -> Result<Self> {
        let expected = num_bytes_for_bits(len);
        if bytes.len() != expected {
            return Err(VarlistError::new(
                ErrorKind::InvalidLayout,
                format!(
                    "Bitmap of {len} bits needs {expected} bytes, got {}",
                    bytes.len()
                ),
            ));
        }

        let mut bitmap = Bitmap { len, data: bytes };
        bitmap.clear_trailing_bits();
        Ok(bitmap)
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the value at index.
    ///
    /// Panics if index is out of bounds.
    pub fn value(&self, idx: usize) -> bool {
        assert!(idx < self.len);
        self.data[idx >> 3] & (1 << (idx & 7)) != 0
    }

    /// Set a bit at index.
    ///
    /// Panics if index is out of bounds.
    pub fn set(&mut self, idx: usize, val: bool) {
        assert!(idx < self.len);
        if val {
            self.data[idx >> 3] |= 1 << (idx & 7)
        } else {
            self.data[idx >> 3] &= !(1 << (idx & 7))
        }
    }

    /// Count of set bits.
    pub fn popcnt(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Resize to `len` bits, newly added bits are unset.
    pub fn resize(&mut self, len: usize) {
        self.data.resize(num_bytes_for_bits(len), 0);
        self.len = len;
        self.clear_trailing_bits();
    }

    /// Size of the underlying byte buffer.
    pub fn nbytes(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get an iterator over the bitmap.
    pub const fn iter(&self) -> BitmapIter {
        BitmapIter {
            idx: 0,
            bitmap: self,
        }
    }

    fn clear_trailing_bits(&mut self) {
        let rem = self.len & 7;
        if rem != 0 {
            if let Some(last) = self.data.last_mut() {
                *last &= (1 << rem) - 1;
            }
        }
    }
}

impl FromIterator<bool> for Bitmap {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Self::from_bool_iter(iter)
    }
}

#[derive(Debug)]
pub struct BitmapIter<'a> {
    idx: usize,
    bitmap: &'a Bitmap,
}

impl<'a> Iterator for BitmapIter<'a> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= self.bitmap.len() {
            return None;
        }

        let v = self.bitmap.value(self.idx);
        self.idx += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (
            self.bitmap.len() - self.idx,
            Some(self.bitmap.len() - self.idx),
        )
    }
}

impl<'a> ExactSizeIterator for BitmapIter<'a> {}
