use std::fmt::Debug;
use std::ops::Range;

use varlist_error::{ErrorKind, Result, VarlistError};

use super::{match_child_data, match_child_slice, ListArray};
use crate::datatype::DataType;
use crate::host::HostValue;
use crate::storage::PrimitiveStorage;

/// Data buffer backing a list array.
///
/// Either a tightly packed buffer of primitive values, or a nested list array
/// where each element is itself a variable-length sub-array.
#[derive(Debug, Clone)]
pub enum ChildData {
    Boolean(PrimitiveStorage<bool>),
    Int8(PrimitiveStorage<i8>),
    Int16(PrimitiveStorage<i16>),
    Int32(PrimitiveStorage<i32>),
    Int64(PrimitiveStorage<i64>),
    UInt8(PrimitiveStorage<u8>),
    UInt16(PrimitiveStorage<u16>),
    UInt32(PrimitiveStorage<u32>),
    UInt64(PrimitiveStorage<u64>),
    Float32(PrimitiveStorage<f32>),
    Float64(PrimitiveStorage<f64>),
    List(Box<ListArray>),
}

impl ChildData {
    /// Allocate a buffer for `datatype` holding `capacity` elements.
    ///
    /// `nested_hints` are only used for list children, and size the nested
    /// array's own data buffer.
    pub fn with_capacity(
        datatype: &DataType,
        capacity: usize,
        nested_hints: &[Option<usize>],
    ) -> Self {
        match datatype {
            DataType::Boolean => Self::Boolean(PrimitiveStorage::with_capacity(capacity)),
            DataType::Int8 => Self::Int8(PrimitiveStorage::with_capacity(capacity)),
            DataType::Int16 => Self::Int16(PrimitiveStorage::with_capacity(capacity)),
            DataType::Int32 => Self::Int32(PrimitiveStorage::with_capacity(capacity)),
            DataType::Int64 => Self::Int64(PrimitiveStorage::with_capacity(capacity)),
            DataType::UInt8 => Self::UInt8(PrimitiveStorage::with_capacity(capacity)),
            DataType::UInt16 => Self::UInt16(PrimitiveStorage::with_capacity(capacity)),
            DataType::UInt32 => Self::UInt32(PrimitiveStorage::with_capacity(capacity)),
            DataType::UInt64 => Self::UInt64(PrimitiveStorage::with_capacity(capacity)),
            DataType::Float32 => Self::Float32(PrimitiveStorage::with_capacity(capacity)),
            DataType::Float64 => Self::Float64(PrimitiveStorage::with_capacity(capacity)),
            DataType::List(meta) => Self::List(Box::new(ListArray::pre_alloc(
                capacity,
                nested_hints,
                &meta.datatype,
            ))),
        }
    }

    /// Type of a single element in this buffer.
    pub fn datatype(&self) -> DataType {
        match_child_data!(self, buf => datatype_of(buf), list => list.datatype())
    }

    /// Get a view of the elements in `range`.
    ///
    /// Panics if the range is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> ChildSlice<'_> {
        match_child_data!(
            self,
            buf => PrimitiveType::wrap_slice(&buf.as_slice()[range]),
            list => {
                assert!(range.end <= list.len());
                ChildSlice::List(ListSlice::new(list, range.start, range.end))
            }
        )
    }

    /// Write `values` into this buffer starting at `start`.
    ///
    /// The buffer must already have enough capacity. For nested data, each
    /// sub-array in `values` is appended to the nested array in order,
    /// including its validity.
    pub(crate) fn write(&mut self, start: usize, values: &ChildSlice<'_>) -> Result<()> {
        match_child_data!(
            self,
            buf => write_primitive(buf, start, values),
            list => {
                let src = match values {
                    ChildSlice::List(src) => src,
                    other => return Err(type_mismatch(&list.datatype(), &other.datatype())),
                };
                for idx in 0..src.len() {
                    list.set(start + idx, src.get(idx))?;
                    list.validity.set(start + idx, src.is_valid(idx));
                }
                Ok(())
            }
        )
    }
}

fn datatype_of<T: PrimitiveType>(_buf: &PrimitiveStorage<T>) -> DataType {
    T::DATATYPE
}

fn write_primitive<T: PrimitiveType>(
    buf: &mut PrimitiveStorage<T>,
    start: usize,
    values: &ChildSlice<'_>,
) -> Result<()> {
    let vals =
        T::downcast_slice(values).ok_or_else(|| type_mismatch(&T::DATATYPE, &values.datatype()))?;
    buf.as_mut_slice()[start..(start + vals.len())].copy_from_slice(vals);
    Ok(())
}

pub(crate) fn type_mismatch(expected: &DataType, got: &DataType) -> VarlistError {
    VarlistError::new(
        ErrorKind::TypeMismatch,
        format!("Expected values of type {expected}, got {got}"),
    )
}

/// A borrowed run of child elements, usually a single sub-array.
#[derive(Debug, Clone, Copy)]
pub enum ChildSlice<'a> {
    Boolean(&'a [bool]),
    Int8(&'a [i8]),
    Int16(&'a [i16]),
    Int32(&'a [i32]),
    Int64(&'a [i64]),
    UInt8(&'a [u8]),
    UInt16(&'a [u16]),
    UInt32(&'a [u32]),
    UInt64(&'a [u64]),
    Float32(&'a [f32]),
    Float64(&'a [f64]),
    List(ListSlice<'a>),
}

impl<'a> ChildSlice<'a> {
    pub fn len(&self) -> usize {
        match_child_slice!(self, vals => vals.len(), list => list.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type of a single element in this slice.
    pub fn datatype(&self) -> DataType {
        match_child_slice!(self, vals => slice_datatype(vals), list => list.array().datatype())
    }

    /// Try to get the primitive values, returning None if `T` isn't the
    /// element type.
    pub fn values<T: PrimitiveType>(&self) -> Option<&'a [T]> {
        T::downcast_slice(self)
    }

    pub fn as_list(&self) -> Option<ListSlice<'a>> {
        match self {
            Self::List(list) => Some(*list),
            _ => None,
        }
    }
}

fn slice_datatype<T: PrimitiveType>(_vals: &[T]) -> DataType {
    T::DATATYPE
}

impl<'a> PartialEq for ChildSlice<'a> {
    fn eq(&self, other: &Self) -> bool {
        match_child_slice!(
            self,
            vals => eq_primitive(vals, other),
            list => match other {
                ChildSlice::List(other) => list == other,
                _ => false,
            }
        )
    }
}

fn eq_primitive<T: PrimitiveType>(a: &[T], other: &ChildSlice<'_>) -> bool {
    match T::downcast_slice(other) {
        Some(b) => a == b,
        None => false,
    }
}

impl<'a, T: PrimitiveType> From<&'a [T]> for ChildSlice<'a> {
    fn from(value: &'a [T]) -> Self {
        T::wrap_slice(value)
    }
}

/// A view over a contiguous range of sub-arrays in a nested list array.
#[derive(Debug, Clone, Copy)]
pub struct ListSlice<'a> {
    array: &'a ListArray,
    start: usize,
    end: usize,
}

impl<'a> ListSlice<'a> {
    pub(crate) fn new(array: &'a ListArray, start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        ListSlice { array, start, end }
    }

    /// View over every sub-array in `array`.
    pub fn full(array: &'a ListArray) -> Self {
        ListSlice::new(array, 0, array.len())
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The array this is a view into.
    pub fn array(&self) -> &'a ListArray {
        self.array
    }

    /// Validity of sub-array `idx` of this view.
    ///
    /// Panics if `idx` is out of bounds.
    pub fn is_valid(&self, idx: usize) -> bool {
        assert!(idx < self.len());
        self.array.validity.value(self.start + idx)
    }

    /// Get sub-array `idx` of this view.
    ///
    /// Panics if `idx` is out of bounds.
    pub fn get(&self, idx: usize) -> ChildSlice<'a> {
        assert!(idx < self.len());
        self.array.child_slice(self.start + idx)
    }

    /// All child elements covered by this view.
    pub fn flat_values(&self) -> ChildSlice<'a> {
        self.array
            .data
            .slice(self.array.offsets.range(self.start, self.end))
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<ChildSlice<'a>>> + 'a {
        let view = *self;
        (0..view.len()).map(move |idx| view.is_valid(idx).then(|| view.get(idx)))
    }
}

/// Views are equal if they hold the same sub-arrays with the same validity.
/// Spans of null sub-arrays aren't compared.
impl<'a> PartialEq for ListSlice<'a> {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }

        if self.array.child_type() != other.array.child_type() {
            return false;
        }

        self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

/// Primitive element types that can be stored in a list array.
pub trait PrimitiveType: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    const DATATYPE: DataType;

    fn downcast_data(data: &ChildData) -> Option<&PrimitiveStorage<Self>>;

    fn downcast_slice<'a>(values: &ChildSlice<'a>) -> Option<&'a [Self]>;

    fn wrap_slice(values: &[Self]) -> ChildSlice<'_>;

    fn wrap_storage(storage: PrimitiveStorage<Self>) -> ChildData;

    /// Convert from a host value, returning None if the value can't be
    /// represented by this type.
    fn from_host(value: &HostValue) -> Option<Self>;

    fn to_host(self) -> HostValue;
}

macro_rules! impl_primitive_type {
    ($ty:ty, $variant:ident, |$host:ident| $from_host:expr, |$val:ident| $to_host:expr) => {
        impl PrimitiveType for $ty {
            const DATATYPE: DataType = DataType::$variant;

            fn downcast_data(data: &ChildData) -> Option<&PrimitiveStorage<Self>> {
                match data {
                    ChildData::$variant(buf) => Some(buf),
                    _ => None,
                }
            }

            fn downcast_slice<'a>(values: &ChildSlice<'a>) -> Option<&'a [Self]> {
                match values {
                    ChildSlice::$variant(vals) => Some(*vals),
                    _ => None,
                }
            }

            fn wrap_slice(values: &[Self]) -> ChildSlice<'_> {
                ChildSlice::$variant(values)
            }

            fn wrap_storage(storage: PrimitiveStorage<Self>) -> ChildData {
                ChildData::$variant(storage)
            }

            fn from_host($host: &HostValue) -> Option<Self> {
                $from_host
            }

            fn to_host(self) -> HostValue {
                let $val = self;
                $to_host
            }
        }
    };
}

impl_primitive_type!(bool, Boolean, |v| match v {
    HostValue::Bool(b) => Some(*b),
    _ => None,
}, |v| HostValue::Bool(v));

impl_primitive_type!(i8, Int8, |v| int_from_host(v), |v| HostValue::Int(i64::from(v)));
impl_primitive_type!(i16, Int16, |v| int_from_host(v), |v| HostValue::Int(i64::from(v)));
impl_primitive_type!(i32, Int32, |v| int_from_host(v), |v| HostValue::Int(i64::from(v)));
impl_primitive_type!(i64, Int64, |v| int_from_host(v), |v| HostValue::Int(v));
impl_primitive_type!(u8, UInt8, |v| int_from_host(v), |v| HostValue::UInt(u64::from(v)));
impl_primitive_type!(u16, UInt16, |v| int_from_host(v), |v| HostValue::UInt(u64::from(v)));
impl_primitive_type!(u32, UInt32, |v| int_from_host(v), |v| HostValue::UInt(u64::from(v)));
impl_primitive_type!(u64, UInt64, |v| int_from_host(v), |v| HostValue::UInt(v));
impl_primitive_type!(f32, Float32, |v| float_from_host(v).map(|f| f as f32), |v| {
    HostValue::Float(f64::from(v))
});
impl_primitive_type!(f64, Float64, |v| float_from_host(v), |v| HostValue::Float(v));

/// Integers accept any host integer that fits.
fn int_from_host<T>(value: &HostValue) -> Option<T>
where
    T: TryFrom<i64> + TryFrom<u64>,
{
    match value {
        HostValue::Int(v) => T::try_from(*v).ok(),
        HostValue::UInt(v) => T::try_from(*v).ok(),
        _ => None,
    }
}

/// Floats accept any host number.
fn float_from_host(value: &HostValue) -> Option<f64> {
    match value {
        HostValue::Float(v) => Some(*v),
        HostValue::Int(v) => Some(*v as f64),
        HostValue::UInt(v) => Some(*v as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_primitive() {
        let data = ChildData::Int64(PrimitiveStorage::from(vec![1, 2, 3, 4]));
        let slice = data.slice(1..3);

        assert_eq!(2, slice.len());
        assert_eq!(Some([2_i64, 3].as_slice()), slice.values::<i64>());
        assert_eq!(None, slice.values::<i32>());
        assert_eq!(DataType::Int64, slice.datatype());
    }

    #[test]
    fn write_type_mismatch() {
        let mut data = ChildData::Int64(PrimitiveStorage::with_capacity(4));
        let vals = [1.0_f64, 2.0];

        let err = data.write(0, &ChildSlice::from(vals.as_slice())).unwrap_err();
        assert_eq!(ErrorKind::TypeMismatch, err.kind());
    }

    #[test]
    fn write_nested() {
        let mut data = ChildData::with_capacity(&DataType::list(DataType::Int32), 3, &[Some(4)]);
        let src: ListArray = [Some(vec![1_i32, 2]), None, Some(vec![3, 4])]
            .into_iter()
            .collect();

        data.write(0, &ChildSlice::List(ListSlice::full(&src)))
            .unwrap();

        let list = match &data {
            ChildData::List(list) => list,
            other => panic!("unexpected data: {other:?}"),
        };
        assert_eq!(&[0, 2, 2, 4], list.offsets().as_slice());
        assert_eq!(
            vec![true, false, true],
            list.validity().iter().collect::<Vec<_>>()
        );
        assert_eq!(&src, &**list);
    }

    #[test]
    fn host_conversions() {
        assert_eq!(Some(4_u8), u8::from_host(&HostValue::Int(4)));
        assert_eq!(None, u8::from_host(&HostValue::Int(-1)));
        assert_eq!(None, i8::from_host(&HostValue::Int(300)));
        assert_eq!(Some(2.0_f32), f32::from_host(&HostValue::UInt(2)));
        assert_eq!(None, i64::from_host(&HostValue::Float(1.5)));
        assert_eq!(None, bool::from_host(&HostValue::Int(1)));
        assert_eq!(HostValue::UInt(7), 7_u16.to_host());
    }
}
