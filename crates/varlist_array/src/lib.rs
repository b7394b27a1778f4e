//! Variable-length list arrays backed by a flat data buffer, u64 offsets, and
//! a validity bitmap.
pub mod array;
pub mod bitmap;
pub mod capacity;
pub mod compute;
pub mod datatype;
pub mod host;
pub mod index;
pub mod offsets;
pub mod storage;
pub mod testutil;
