/// Match on every variant of `ChildData`.
///
/// The primitive arm is expanded once per primitive variant, so the
/// expression may be generic over the element type.
macro_rules! match_child_data {
    ($value:expr, $buf:ident => $prim:expr, $list:ident => $nested:expr $(,)?) => {
        match $value {
            $crate::array::ChildData::Boolean($buf) => $prim,
            $crate::array::ChildData::Int8($buf) => $prim,
            $crate::array::ChildData::Int16($buf) => $prim,
            $crate::array::ChildData::Int32($buf) => $prim,
            $crate::array::ChildData::Int64($buf) => $prim,
            $crate::array::ChildData::UInt8($buf) => $prim,
            $crate::array::ChildData::UInt16($buf) => $prim,
            $crate::array::ChildData::UInt32($buf) => $prim,
            $crate::array::ChildData::UInt64($buf) => $prim,
            $crate::array::ChildData::Float32($buf) => $prim,
            $crate::array::ChildData::Float64($buf) => $prim,
            $crate::array::ChildData::List($list) => $nested,
        }
    };
}
pub(crate) use match_child_data;

/// Match on every variant of `ChildSlice`, see `match_child_data`.
macro_rules! match_child_slice {
    ($value:expr, $vals:ident => $prim:expr, $list:ident => $nested:expr $(,)?) => {
        match $value {
            $crate::array::ChildSlice::Boolean($vals) => $prim,
            $crate::array::ChildSlice::Int8($vals) => $prim,
            $crate::array::ChildSlice::Int16($vals) => $prim,
            $crate::array::ChildSlice::Int32($vals) => $prim,
            $crate::array::ChildSlice::Int64($vals) => $prim,
            $crate::array::ChildSlice::UInt8($vals) => $prim,
            $crate::array::ChildSlice::UInt16($vals) => $prim,
            $crate::array::ChildSlice::UInt32($vals) => $prim,
            $crate::array::ChildSlice::UInt64($vals) => $prim,
            $crate::array::ChildSlice::Float32($vals) => $prim,
            $crate::array::ChildSlice::Float64($vals) => $prim,
            $crate::array::ChildSlice::List($list) => $nested,
        }
    };
}
pub(crate) use match_child_slice;

pub mod child;
pub use child::*;
pub mod list;
pub use list::*;
