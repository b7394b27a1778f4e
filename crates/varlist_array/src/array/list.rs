use varlist_error::{ErrorKind, Result, VarlistError};

use super::child::type_mismatch;
use super::{ChildData, ChildSlice, PrimitiveType};
use crate::bitmap::Bitmap;
use crate::capacity::{self, GrowableBuffer};
use crate::compute::{filter::filter, slice::slice, take::take};
use crate::datatype::DataType;
use crate::index::{normalize_index, normalize_indices, IndexExpr, Slice};
use crate::offsets::Offsets;
use crate::storage::PrimitiveStorage;

/// A variable-length list array.
///
/// Each logical element (sub-array) is a run of child values stored
/// contiguously in a shared data buffer. Sub-array `i` occupies
/// `data[offsets[i]..offsets[i + 1]]`, and validity bit `i` says whether it's
/// present or null. A null and an empty sub-array are different things.
///
/// The data buffer may have more capacity than is in use. `offsets[len]` is
/// the used length.
#[derive(Debug, Clone)]
pub struct ListArray {
    /// Number of sub-arrays. Always `offsets.len() - 1`.
    pub(crate) n_arrays: usize,

    /// Child values.
    pub(crate) data: ChildData,

    /// Offsets into the data buffer. The first value should be 0.
    pub(crate) offsets: Offsets,

    /// "True" values indicate the sub-array at index is valid, "false"
    /// indicates null.
    pub(crate) validity: Bitmap,
}

/// Result of indexing into a list array.
#[derive(Debug, PartialEq)]
pub enum Indexed<'a> {
    /// A single sub-array borrowed from the indexed array.
    Scalar(ChildSlice<'a>),
    /// A newly allocated array holding the selected sub-arrays.
    Array(ListArray),
}

impl ListArray {
    /// Allocate an array for `n_arrays` sub-arrays of `child_type`.
    ///
    /// `hints` are the expected element counts for each nesting level, the
    /// first being the number of child values. A missing or `None` hint falls
    /// back to the number of sub-arrays at that level, growth corrects for it
    /// later.
    ///
    /// Every sub-array starts out null. Sub-arrays are then filled in index
    /// order with `set` or `set_null`.
    pub fn pre_alloc(n_arrays: usize, hints: &[Option<usize>], child_type: &DataType) -> Self {
        let capacity = hints.first().copied().flatten().unwrap_or(n_arrays);
        let nested_hints = hints.get(1..).unwrap_or(&[]);
        let data = ChildData::with_capacity(child_type, capacity, nested_hints);

        let mut offsets = Offsets::zeroed(n_arrays);
        if n_arrays > 0 {
            offsets.set(n_arrays, capacity as u64);
        }

        ListArray {
            n_arrays,
            data,
            offsets,
            validity: Bitmap::new_with_all_false(n_arrays),
        }
    }

    /// Create an array from existing buffers.
    ///
    /// Errors if the offsets aren't a valid index into `data`, or if the
    /// validity bitmap doesn't have one bit per sub-array.
    pub fn try_new(data: ChildData, offsets: impl Into<Offsets>, validity: Bitmap) -> Result<Self> {
        let offsets = offsets.into();
        offsets.validate(data.capacity())?;

        let n_arrays = offsets.num_spans();
        if validity.len() != n_arrays {
            return Err(VarlistError::new(
                ErrorKind::InvalidLayout,
                format!(
                    "Validity has {} bits, expected {n_arrays}",
                    validity.len()
                ),
            ));
        }

        Ok(ListArray {
            n_arrays,
            data,
            offsets,
            validity,
        })
    }

    /// Take the underlying buffers.
    pub fn into_parts(self) -> (ChildData, Offsets, Bitmap) {
        (self.data, self.offsets, self.validity)
    }

    /// Number of sub-arrays.
    pub fn len(&self) -> usize {
        self.n_arrays
    }

    pub fn is_empty(&self) -> bool {
        self.n_arrays == 0
    }

    pub fn shape(&self) -> (usize,) {
        (self.n_arrays,)
    }

    pub const fn ndim(&self) -> usize {
        1
    }

    /// Type of this array's elements.
    pub fn datatype(&self) -> DataType {
        DataType::list(self.child_type())
    }

    /// Type of the values inside each sub-array.
    pub fn child_type(&self) -> DataType {
        self.data.datatype()
    }

    /// Total allocated bytes across the data, offsets, and validity buffers.
    pub fn nbytes(&self) -> usize {
        self.data.nbytes() + self.offsets.nbytes() + self.validity.nbytes()
    }

    pub fn data(&self) -> &ChildData {
        &self.data
    }

    pub fn offsets(&self) -> &Offsets {
        &self.offsets
    }

    pub fn validity(&self) -> &Bitmap {
        &self.validity
    }

    /// Number of child values in use.
    pub fn used_len(&self) -> usize {
        self.offsets.last() as usize
    }

    /// Get the validity of the sub-array at `idx`.
    pub fn is_valid(&self, idx: usize) -> Result<bool> {
        self.check_index(idx)?;
        Ok(self.validity.value(idx))
    }

    /// Get the sub-array at `idx`.
    ///
    /// This doesn't take validity into account, a null sub-array is returned
    /// as whatever its span covers (typically empty).
    pub fn get(&self, idx: usize) -> Result<ChildSlice<'_>> {
        self.check_index(idx)?;
        Ok(self.child_slice(idx))
    }

    /// Get the sub-array at `idx` as primitive values.
    pub fn values<T: PrimitiveType>(&self, idx: usize) -> Result<&[T]> {
        let vals = self.get(idx)?;
        T::downcast_slice(&vals).ok_or_else(|| type_mismatch(&self.child_type(), &T::DATATYPE))
    }

    /// Iterate over all sub-arrays, yielding None for nulls.
    pub fn iter(&self) -> impl Iterator<Item = Option<ChildSlice<'_>>> + '_ {
        (0..self.n_arrays).map(move |idx| self.validity.value(idx).then(|| self.child_slice(idx)))
    }

    /// Index into the array.
    ///
    /// A scalar index (negative counts from the end) borrows a single
    /// sub-array. Masks, integer arrays, and slices produce a new array.
    pub fn get_item(&self, index: &IndexExpr) -> Result<Indexed<'_>> {
        Ok(match index {
            IndexExpr::Scalar(idx) => {
                let idx = normalize_index(*idx, self.n_arrays)?;
                Indexed::Scalar(self.child_slice(idx))
            }
            IndexExpr::Mask(mask) => Indexed::Array(filter(self, mask)?),
            IndexExpr::Indices(indices) => {
                let indices = normalize_indices(indices, self.n_arrays)?;
                Indexed::Array(take(self, &indices)?)
            }
            IndexExpr::Slice(s) => Indexed::Array(slice(self, s)?),
        })
    }

    /// Set the sub-array at `idx`.
    ///
    /// Writes the values starting at `offsets[idx]` and updates only
    /// `offsets[idx + 1]`. Later offsets are never shifted, so sub-arrays must
    /// be set in increasing index order starting from 0. Overwriting an
    /// earlier sub-array with a different length leaves the following spans
    /// inconsistent.
    pub fn set(&mut self, idx: usize, values: ChildSlice<'_>) -> Result<()> {
        self.check_index(idx)?;

        let child_type = self.child_type();
        let value_type = values.datatype();
        if child_type != value_type {
            return Err(type_mismatch(&child_type, &value_type));
        }

        if idx == 0 {
            self.offsets.set(0, 0);
        }

        let start = self.offsets.at(idx) as usize;
        let new_end = start + values.len();
        capacity::ensure_capacity(&mut self.data, start, new_end);
        self.data.write(start, &values)?;

        self.offsets.set(idx + 1, new_end as u64);
        self.validity.set(idx, true);

        Ok(())
    }

    /// Set the sub-array at `idx` from primitive values.
    pub fn set_values<T: PrimitiveType>(&mut self, idx: usize, values: &[T]) -> Result<()> {
        self.set(idx, T::wrap_slice(values))
    }

    /// Mark the sub-array at `idx` as null with an empty span.
    ///
    /// Same ordering requirements as `set`.
    pub fn set_null(&mut self, idx: usize) -> Result<()> {
        self.check_index(idx)?;

        if idx == 0 {
            self.offsets.set(0, 0);
        }

        let start = self.offsets.at(idx);
        self.offsets.set(idx + 1, start);
        self.validity.set(idx, false);

        Ok(())
    }

    /// Assign sub-arrays from `src` to a contiguous slice of this array.
    ///
    /// The source's data is copied to `offsets[start]` and the offsets for
    /// the slice are rewritten from the source's offsets. Like `set`, offsets
    /// after the slice aren't touched.
    pub fn set_slice(&mut self, slice: &Slice, src: &ListArray) -> Result<()> {
        let normalized = slice.normalize(self.n_arrays)?;
        if normalized.step != 1 {
            return Err(VarlistError::new(
                ErrorKind::UnsupportedIndexMode,
                format!(
                    "Slice assignment requires a step of 1, got {}",
                    normalized.step
                ),
            ));
        }

        let count = normalized.len();
        if src.len() != count {
            return Err(VarlistError::new(
                ErrorKind::LengthMismatch,
                format!(
                    "Cannot assign {} sub-arrays to a slice of length {count}",
                    src.len()
                ),
            ));
        }

        let child_type = self.child_type();
        let src_type = src.child_type();
        if child_type != src_type {
            return Err(type_mismatch(&child_type, &src_type));
        }

        let start = normalized.start as usize;
        if start == 0 {
            self.offsets.set(0, 0);
        }

        let base = self.offsets.at(start);
        let src_used = src.used_len();
        let new_end = base as usize + src_used;
        capacity::ensure_capacity(&mut self.data, base as usize, new_end);
        self.data.write(base as usize, &src.data.slice(0..src_used))?;

        for idx in 0..=count {
            self.offsets.set(start + idx, src.offsets.at(idx) + base);
        }
        for idx in 0..count {
            self.validity.set(start + idx, src.validity.value(idx));
        }

        Ok(())
    }

    /// Set every sub-array selected by `slice` to `values`, in slice order.
    pub fn fill_slice(&mut self, slice: &Slice, values: ChildSlice<'_>) -> Result<()> {
        let normalized = slice.normalize(self.n_arrays)?;
        for idx in normalized.indices() {
            self.set(idx, values)?;
        }
        Ok(())
    }

    /// Create an independent deep copy of this array.
    pub fn copy(&self) -> ListArray {
        self.clone()
    }

    /// Swap out the data buffer, returning the old one.
    ///
    /// The new buffer must have the same element type and hold at least the
    /// values currently in use.
    pub fn replace_data(&mut self, data: ChildData) -> Result<ChildData> {
        let child_type = self.child_type();
        let data_type = data.datatype();
        if child_type != data_type {
            return Err(type_mismatch(&child_type, &data_type));
        }

        let used = self.used_len();
        if data.capacity() < used {
            return Err(VarlistError::new(
                ErrorKind::InvalidLayout,
                format!(
                    "Replacement data holds {} values, {used} are in use",
                    data.capacity()
                ),
            ));
        }

        Ok(std::mem::replace(&mut self.data, data))
    }

    /// Shrink the data buffer (and any nested buffers) to what's in use.
    pub fn trim_excess_data(&mut self) {
        let used = self.used_len();
        capacity::trim(&mut self.data, used);
        if let ChildData::List(child) = &mut self.data {
            child.trim_excess_data();
        }
    }

    /// Get the sub-array at `idx` without validating the index against the
    /// array length.
    ///
    /// Panics if `idx` is out of bounds.
    pub(crate) fn child_slice(&self, idx: usize) -> ChildSlice<'_> {
        self.data.slice(self.offsets.span(idx))
    }

    fn check_index(&self, idx: usize) -> Result<()> {
        if idx >= self.n_arrays {
            return Err(VarlistError::out_of_range(idx, self.n_arrays));
        }
        Ok(())
    }
}

/// A nested list array's capacity is its number of sub-array slots. Growing
/// it only touches offsets and validity, the nested data buffer grows on its
/// own as sub-arrays get written.
impl GrowableBuffer for ListArray {
    fn capacity(&self) -> usize {
        self.n_arrays
    }

    fn reallocate(&mut self, used: usize, new_capacity: usize) {
        let keep = used.min(new_capacity).min(self.n_arrays);
        let fill = self.offsets.at(keep);

        self.offsets.resize(keep + 1, 0);
        self.offsets.resize(new_capacity + 1, fill);

        self.validity.resize(keep);
        self.validity.resize(new_capacity);

        self.n_arrays = new_capacity;
    }

    fn nbytes(&self) -> usize {
        ListArray::nbytes(self)
    }
}

/// Arrays are equal if they have the same child type, validity, and the same
/// values for every valid sub-array. Spare capacity and spans of null
/// sub-arrays aren't compared.
impl PartialEq for ListArray {
    fn eq(&self, other: &Self) -> bool {
        if self.n_arrays != other.n_arrays {
            return false;
        }

        if self.validity != other.validity {
            return false;
        }

        if self.child_type() != other.child_type() {
            return false;
        }

        self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: PrimitiveType> FromIterator<Option<Vec<T>>> for ListArray {
    fn from_iter<I: IntoIterator<Item = Option<Vec<T>>>>(iter: I) -> Self {
        let mut values = Vec::new();
        let mut lengths = Vec::new();
        let mut validity = Vec::new();

        for item in iter {
            match item {
                Some(vals) => {
                    lengths.push(vals.len());
                    values.extend(vals);
                    validity.push(true);
                }
                None => {
                    lengths.push(0);
                    validity.push(false);
                }
            }
        }

        ListArray {
            n_arrays: lengths.len(),
            data: T::wrap_storage(PrimitiveStorage::from(values)),
            offsets: Offsets::from_lengths(lengths),
            validity: Bitmap::from_bool_iter(validity),
        }
    }
}

impl<T: PrimitiveType> FromIterator<Vec<T>> for ListArray {
    fn from_iter<I: IntoIterator<Item = Vec<T>>>(iter: I) -> Self {
        iter.into_iter().map(Some).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::ListSlice;

    /// `[[1, 2], [3], null, [5, 4, 6], []]`
    fn scenario_a() -> ListArray {
        [
            Some(vec![1_i64, 2]),
            Some(vec![3]),
            None,
            Some(vec![5, 4, 6]),
            Some(vec![]),
        ]
        .into_iter()
        .collect()
    }

    fn int64_data(arr: &ListArray) -> &[i64] {
        i64::downcast_data(arr.data()).unwrap().as_slice()
    }

    #[test]
    fn layout_from_iter() {
        let arr = scenario_a();

        assert_eq!(5, arr.len());
        assert_eq!(&[1, 2, 3, 5, 4, 6], int64_data(&arr));
        assert_eq!(&[0, 2, 3, 3, 6, 6], arr.offsets().as_slice());
        assert_eq!(
            vec![true, true, false, true, true],
            arr.validity().iter().collect::<Vec<_>>()
        );
        assert_eq!(&[5, 4, 6], arr.values::<i64>(3).unwrap());
        assert_eq!(DataType::list(DataType::Int64), arr.datatype());
    }

    #[test]
    fn get_matches_offsets() {
        let arr = scenario_a();
        let data = int64_data(&arr);

        for idx in 0..arr.len() {
            let span = arr.offsets().span(idx);
            assert_eq!(&data[span], arr.values::<i64>(idx).unwrap());
        }
    }

    #[test]
    fn get_out_of_range() {
        let arr = scenario_a();
        let err = arr.get(5).unwrap_err();
        assert_eq!(ErrorKind::OutOfRange, err.kind());

        let err = arr.is_valid(10).unwrap_err();
        assert_eq!(ErrorKind::OutOfRange, err.kind());
    }

    #[test]
    fn values_wrong_type() {
        let arr = scenario_a();
        let err = arr.values::<f64>(0).unwrap_err();
        assert_eq!(ErrorKind::TypeMismatch, err.kind());
    }

    #[test]
    fn null_and_empty_are_different() {
        let arr = scenario_a();

        assert!(arr.get(2).unwrap().is_empty());
        assert!(!arr.is_valid(2).unwrap());

        assert!(arr.get(4).unwrap().is_empty());
        assert!(arr.is_valid(4).unwrap());
    }

    #[test]
    fn pre_alloc_unknown_then_set() {
        let mut arr = ListArray::pre_alloc(3, &[None], &DataType::Int64);
        assert_eq!(3, arr.data().capacity());

        arr.set_values(0, &[7_i64, 8, 9]).unwrap();
        arr.set_values(1, &[1_i64]).unwrap();
        arr.set_values::<i64>(2, &[]).unwrap();

        assert_eq!(&[0, 3, 4, 4], arr.offsets().as_slice());
        assert_eq!(&[7, 8, 9], arr.values::<i64>(0).unwrap());
        assert_eq!(&[1], arr.values::<i64>(1).unwrap());
        assert!(arr.get(2).unwrap().is_empty());
        assert!(arr.is_valid(2).unwrap());
        // Grew from 3 to max(6, 4).
        assert_eq!(6, arr.data().capacity());
    }

    #[test]
    fn get_unset_slot_after_pre_alloc() {
        let mut arr = ListArray::pre_alloc(3, &[None], &DataType::Int64);
        arr.set_values(0, &[7_i64, 8, 9]).unwrap();
        assert_eq!(&[0, 3, 0, 3], arr.offsets().as_slice());

        assert!(arr.get(1).unwrap().is_empty());
        assert!(!arr.is_valid(1).unwrap());
        assert_eq!(&[7, 8, 9], arr.values::<i64>(0).unwrap());

        let got = arr.get_item(&IndexExpr::Scalar(1)).unwrap();
        assert_eq!(Indexed::Scalar(ChildSlice::from([0_i64; 0].as_slice())), got);
    }

    #[test]
    fn set_grows_preserving_prefix() {
        let mut arr = ListArray::pre_alloc(2, &[Some(2)], &DataType::Int64);
        arr.set_values(0, &[10_i64, 11]).unwrap();
        assert_eq!(2, arr.data().capacity());

        arr.set_values(1, &[12_i64, 13, 14]).unwrap();
        assert_eq!(5, arr.data().capacity());
        assert_eq!(&[10, 11, 12, 13, 14], int64_data(&arr));
        assert_eq!(&[0, 2, 5], arr.offsets().as_slice());
    }

    #[test]
    fn set_type_mismatch() {
        let mut arr = ListArray::pre_alloc(2, &[Some(2)], &DataType::Int64);
        let err = arr.set_values(0, &[1.5_f64]).unwrap_err();
        assert_eq!(ErrorKind::TypeMismatch, err.kind());
        // Nothing was written.
        assert!(!arr.is_valid(0).unwrap());
    }

    #[test]
    fn set_out_of_range() {
        let mut arr = ListArray::pre_alloc(2, &[Some(2)], &DataType::Int64);
        let err = arr.set_values(2, &[1_i64]).unwrap_err();
        assert_eq!(ErrorKind::OutOfRange, err.kind());
    }

    #[test]
    fn set_null_keeps_offsets_flat() {
        let mut arr = ListArray::pre_alloc(3, &[Some(4)], &DataType::Int32);
        arr.set_values(0, &[1_i32, 2]).unwrap();
        arr.set_null(1).unwrap();
        arr.set_values(2, &[3_i32]).unwrap();

        assert_eq!(&[0, 2, 2, 3], arr.offsets().as_slice());
        assert_eq!(
            vec![true, false, true],
            arr.validity().iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn offsets_non_decreasing_after_appends() {
        let mut arr = ListArray::pre_alloc(6, &[Some(1)], &DataType::UInt8);
        for idx in 0..6 {
            let vals: Vec<u8> = (0..(idx % 3) as u8).collect();
            arr.set_values(idx, &vals).unwrap();
        }

        let offsets = arr.offsets().as_slice();
        assert_eq!(0, offsets[0]);
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(6, arr.used_len());
        assert_eq!(arr.len() + 1, offsets.len());
    }

    #[test]
    fn nbytes_sums_buffers() {
        let arr = scenario_a();
        let expected = arr.data().nbytes() + arr.offsets().nbytes() + arr.validity().nbytes();
        assert_eq!(expected, arr.nbytes());
        assert_eq!(6 * 8 + 6 * 8 + 1, arr.nbytes());
    }

    #[test]
    fn copy_is_independent() {
        let arr = ListArray::pre_alloc(2, &[Some(2)], &DataType::Int64);
        let mut original = arr.copy();
        original.set_values(0, &[1_i64, 2]).unwrap();

        let mut copy = original.copy();
        assert_eq!(original, copy);

        copy.set_values(1, &[3_i64, 4, 5]).unwrap();
        assert_ne!(original, copy);
        assert_eq!(2, original.data().capacity());
        assert!(!original.is_valid(1).unwrap());
    }

    #[test]
    fn try_new_validates() {
        let data = i64::wrap_storage(PrimitiveStorage::from(vec![1, 2, 3]));
        let arr = ListArray::try_new(data.clone(), vec![0, 1, 3], Bitmap::new_with_all_true(2))
            .unwrap();
        assert_eq!(2, arr.len());
        assert_eq!(&[2, 3], arr.values::<i64>(1).unwrap());

        let err = ListArray::try_new(data.clone(), vec![0, 1, 4], Bitmap::new_with_all_true(2))
            .unwrap_err();
        assert_eq!(ErrorKind::InvalidLayout, err.kind());

        let err =
            ListArray::try_new(data, vec![0, 1, 3], Bitmap::new_with_all_true(3)).unwrap_err();
        assert_eq!(ErrorKind::InvalidLayout, err.kind());
    }

    #[test]
    fn into_parts_roundtrip() {
        let arr = scenario_a();
        let (data, offsets, validity) = arr.clone().into_parts();
        let rebuilt = ListArray::try_new(data, offsets, validity).unwrap();
        assert_eq!(arr, rebuilt);
    }

    #[test]
    fn scalar_index_negative() {
        let arr = scenario_a();
        let got = arr.get_item(&IndexExpr::Scalar(-2)).unwrap();
        let expected = [5_i64, 4, 6];
        assert_eq!(Indexed::Scalar(ChildSlice::from(expected.as_slice())), got);

        let err = arr.get_item(&IndexExpr::Scalar(-6)).unwrap_err();
        assert_eq!(ErrorKind::OutOfRange, err.kind());
    }

    #[test]
    fn set_slice_contiguous() {
        let mut arr = ListArray::pre_alloc(4, &[Some(2)], &DataType::Int64);
        arr.set_values(0, &[1_i64]).unwrap();

        let src: ListArray = [Some(vec![2_i64, 3]), None, Some(vec![4])]
            .into_iter()
            .collect();
        arr.set_slice(&Slice::new(Some(1), None, None), &src).unwrap();

        assert_eq!(&[0, 1, 3, 3, 4], arr.offsets().as_slice());
        assert_eq!(
            vec![true, true, false, true],
            arr.validity().iter().collect::<Vec<_>>()
        );
        assert_eq!(&[2, 3], arr.values::<i64>(1).unwrap());
        assert_eq!(&[4], arr.values::<i64>(3).unwrap());
    }

    #[test]
    fn set_slice_errors() {
        let mut arr = ListArray::pre_alloc(4, &[Some(2)], &DataType::Int64);
        let src: ListArray = [Some(vec![2_i64, 3])].into_iter().collect();

        let err = arr
            .set_slice(&Slice::new(Some(0), Some(2), None), &src)
            .unwrap_err();
        assert_eq!(ErrorKind::LengthMismatch, err.kind());

        let err = arr
            .set_slice(&Slice::new(Some(0), Some(2), Some(2)), &src)
            .unwrap_err();
        assert_eq!(ErrorKind::UnsupportedIndexMode, err.kind());

        let other: ListArray = [Some(vec![1_i32])].into_iter().collect();
        let err = arr
            .set_slice(&Slice::new(Some(0), Some(1), None), &other)
            .unwrap_err();
        assert_eq!(ErrorKind::TypeMismatch, err.kind());
    }

    #[test]
    fn fill_slice_broadcasts() {
        let mut arr = ListArray::pre_alloc(3, &[None], &DataType::Float64);
        let vals = [0.5_f64, 1.5];
        arr.fill_slice(&Slice::full(), ChildSlice::from(vals.as_slice()))
            .unwrap();

        assert_eq!(&[0, 2, 4, 6], arr.offsets().as_slice());
        for idx in 0..3 {
            assert_eq!(&vals, arr.values::<f64>(idx).unwrap());
        }
    }

    #[test]
    fn trim_excess() {
        let mut arr = ListArray::pre_alloc(2, &[Some(100)], &DataType::Int16);
        arr.set_values(0, &[1_i16]).unwrap();
        arr.set_values(1, &[2_i16, 3]).unwrap();
        assert_eq!(200, arr.data().nbytes());

        arr.trim_excess_data();
        assert_eq!(3, arr.data().capacity());
        assert_eq!(&[2, 3], arr.values::<i16>(1).unwrap());
    }

    #[test]
    fn replace_data_checks() {
        let mut arr = scenario_a();

        let err = arr
            .replace_data(f64::wrap_storage(PrimitiveStorage::with_capacity(10)))
            .unwrap_err();
        assert_eq!(ErrorKind::TypeMismatch, err.kind());

        let err = arr
            .replace_data(i64::wrap_storage(PrimitiveStorage::with_capacity(2)))
            .unwrap_err();
        assert_eq!(ErrorKind::InvalidLayout, err.kind());

        let old = arr
            .replace_data(i64::wrap_storage(PrimitiveStorage::from(vec![
                9, 9, 9, 9, 9, 9, 9,
            ])))
            .unwrap();
        assert_eq!(6, old.capacity());
        assert_eq!(&[9, 9], arr.values::<i64>(0).unwrap());
    }

    #[test]
    fn nested_set_and_get() {
        let inner_type = DataType::list(DataType::Int32);
        let mut arr = ListArray::pre_alloc(2, &[None, None], &inner_type);

        let first: ListArray = [Some(vec![1_i32, 2]), None].into_iter().collect();
        let second: ListArray = [Some(vec![3_i32]), Some(vec![]), Some(vec![4, 5])]
            .into_iter()
            .collect();

        arr.set(0, ChildSlice::List(ListSlice::full(&first))).unwrap();
        arr.set(1, ChildSlice::List(ListSlice::full(&second))).unwrap();

        assert_eq!(&[0, 2, 5], arr.offsets().as_slice());
        assert_eq!(inner_type, arr.child_type());

        let got = arr.get(1).unwrap().as_list().unwrap();
        assert_eq!(3, got.len());
        assert_eq!(Some([4_i32, 5].as_slice()), got.get(2).values::<i32>());
        assert_eq!(ChildSlice::List(ListSlice::full(&second)), arr.get(1).unwrap());

        let got = arr.get(0).unwrap().as_list().unwrap();
        assert!(!got.is_valid(1));
    }

    #[test]
    fn nested_set_wrong_inner_type() {
        let mut arr = ListArray::pre_alloc(1, &[], &DataType::list(DataType::Int32));
        let inner: ListArray = [Some(vec![1_i64])].into_iter().collect();

        let err = arr
            .set(0, ChildSlice::List(ListSlice::full(&inner)))
            .unwrap_err();
        assert_eq!(ErrorKind::TypeMismatch, err.kind());
    }
}
