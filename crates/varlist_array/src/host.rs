//! Conversion between list arrays and plain host values.
use serde::{Deserialize, Serialize};
use tracing::debug;
use varlist_error::{ErrorKind, Result, VarlistError};

use crate::array::{match_child_slice, ChildData, ChildSlice, ListArray, ListSlice, PrimitiveType};
use crate::capacity::{counts_to_hints, init_nested_counts};
use crate::datatype::DataType;
use crate::storage::PrimitiveStorage;

/// A dynamically typed value, mirrors what a JSON document can hold.
///
/// Untagged, so `[[1, 2], null, []]` deserializes as a list of two lists and
/// a null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    List(Vec<HostValue>),
}

/// Build a list array with elements of `child_type` from a host list.
///
/// Every item of `value` must either be null or a list of values
/// convertible to `child_type`.
pub fn from_host(value: &HostValue, child_type: &DataType) -> Result<ListArray> {
    match value {
        HostValue::List(items) => from_host_items(items, child_type),
        other => Err(VarlistError::new(
            ErrorKind::TypeMismatch,
            format!("Expected a list of sub-arrays, got {other:?}"),
        )),
    }
}

fn from_host_items(items: &[HostValue], child_type: &DataType) -> Result<ListArray> {
    let mut counts = init_nested_counts(child_type);
    for item in items {
        if let HostValue::List(values) = item {
            count_host_values(&mut counts, values, child_type);
        }
    }
    debug!(n_arrays = items.len(), ?counts, %child_type, "converting from host");

    let mut arr = ListArray::pre_alloc(items.len(), &counts_to_hints(&counts), child_type);

    for (idx, item) in items.iter().enumerate() {
        match item {
            HostValue::Null => arr.set_null(idx)?,
            HostValue::List(values) => {
                let data = child_from_host(values, child_type)?;
                arr.set(idx, data.slice(0..values.len()))?;
            }
            other => {
                return Err(VarlistError::new(
                    ErrorKind::TypeMismatch,
                    format!("Expected a list or null at index {idx}, got {other:?}"),
                ))
            }
        }
    }

    Ok(arr)
}

/// Same as `add_nested_counts`, but over host values. Malformed values are
/// skipped here and rejected during conversion.
fn count_host_values(counts: &mut [usize], values: &[HostValue], child_type: &DataType) {
    if let Some(first) = counts.first_mut() {
        *first += values.len();
    }

    if let (DataType::List(meta), Some(rest)) = (child_type, counts.get_mut(1..)) {
        for value in values {
            if let HostValue::List(inner) = value {
                count_host_values(rest, inner, &meta.datatype);
            }
        }
    }
}

fn child_from_host(values: &[HostValue], child_type: &DataType) -> Result<ChildData> {
    match child_type {
        DataType::Boolean => primitive_from_host::<bool>(values),
        DataType::Int8 => primitive_from_host::<i8>(values),
        DataType::Int16 => primitive_from_host::<i16>(values),
        DataType::Int32 => primitive_from_host::<i32>(values),
        DataType::Int64 => primitive_from_host::<i64>(values),
        DataType::UInt8 => primitive_from_host::<u8>(values),
        DataType::UInt16 => primitive_from_host::<u16>(values),
        DataType::UInt32 => primitive_from_host::<u32>(values),
        DataType::UInt64 => primitive_from_host::<u64>(values),
        DataType::Float32 => primitive_from_host::<f32>(values),
        DataType::Float64 => primitive_from_host::<f64>(values),
        DataType::List(meta) => Ok(ChildData::List(Box::new(from_host_items(
            values,
            &meta.datatype,
        )?))),
    }
}

fn primitive_from_host<T: PrimitiveType>(values: &[HostValue]) -> Result<ChildData> {
    let vals = values
        .iter()
        .map(|v| {
            T::from_host(v).ok_or_else(|| {
                VarlistError::new(
                    ErrorKind::TypeMismatch,
                    format!("Cannot convert {v:?} to {}", T::DATATYPE),
                )
            })
        })
        .collect::<Result<Vec<T>>>()?;

    Ok(T::wrap_storage(PrimitiveStorage::from(vals)))
}

/// Convert a list array to a host list. Null sub-arrays become `Null`.
pub fn to_host(arr: &ListArray) -> HostValue {
    HostValue::List(
        arr.iter()
            .map(|item| item.map(|s| slice_to_host(&s)).unwrap_or(HostValue::Null))
            .collect(),
    )
}

/// Convert a single sub-array.
pub fn slice_to_host(values: &ChildSlice<'_>) -> HostValue {
    match_child_slice!(
        values,
        vals => HostValue::List(vals.iter().map(|v| PrimitiveType::to_host(*v)).collect()),
        list => list_slice_to_host(list)
    )
}

fn list_slice_to_host(list: &ListSlice<'_>) -> HostValue {
    HostValue::List(
        list.iter()
            .map(|item| item.map(|s| slice_to_host(&s)).unwrap_or(HostValue::Null))
            .collect(),
    )
}
