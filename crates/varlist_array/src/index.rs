//! Index expressions for selecting sub-arrays.
use std::str::FromStr;

use varlist_error::{ErrorKind, Result, VarlistError};

use crate::host::HostValue;

/// Ways a list array can be indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexExpr {
    /// A single sub-array. Negative values count from the end.
    Scalar(i64),
    /// Keep sub-arrays where the mask is true. Must match the array length.
    Mask(Vec<bool>),
    /// Take sub-arrays at these positions, in order. Repeats are allowed.
    Indices(Vec<i64>),
    /// A Python style slice.
    Slice(Slice),
}

impl IndexExpr {
    /// Interpret a host value as an index expression.
    ///
    /// Integers are scalar indices, lists of booleans are masks, and lists of
    /// integers are fancy indices. Everything else is unsupported.
    pub fn from_host(value: &HostValue) -> Result<Self> {
        match value {
            HostValue::Int(v) => Ok(IndexExpr::Scalar(*v)),
            HostValue::UInt(v) => Ok(IndexExpr::Scalar(host_uint_index(*v)?)),
            HostValue::List(items) => {
                if !items.is_empty() && items.iter().all(|v| matches!(v, HostValue::Bool(_))) {
                    let mask = items
                        .iter()
                        .map(|v| matches!(v, HostValue::Bool(true)))
                        .collect();
                    return Ok(IndexExpr::Mask(mask));
                }

                let indices = items
                    .iter()
                    .map(|item| match item {
                        HostValue::Int(v) => Ok(*v),
                        HostValue::UInt(v) => host_uint_index(*v),
                        other => Err(unsupported(other)),
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(IndexExpr::Indices(indices))
            }
            other => Err(unsupported(other)),
        }
    }
}

fn host_uint_index(v: u64) -> Result<i64> {
    i64::try_from(v).map_err(|_| VarlistError::out_of_range(v, i64::MAX as usize))
}

fn unsupported(value: &HostValue) -> VarlistError {
    VarlistError::new(
        ErrorKind::UnsupportedIndexMode,
        format!("Cannot index with {value:?}, expected an integer, a list of integers, a list of booleans, or a slice"),
    )
}

impl From<Slice> for IndexExpr {
    fn from(value: Slice) -> Self {
        IndexExpr::Slice(value)
    }
}

/// Normalize a possibly negative index against `len`.
pub fn normalize_index(idx: i64, len: usize) -> Result<usize> {
    let normalized = if idx < 0 { idx + len as i64 } else { idx };
    if normalized < 0 || normalized as usize >= len {
        return Err(VarlistError::out_of_range(idx, len));
    }
    Ok(normalized as usize)
}

/// Normalize every index in `indices` against `len`.
pub fn normalize_indices(indices: &[i64], len: usize) -> Result<Vec<usize>> {
    indices
        .iter()
        .map(|idx| normalize_index(*idx, len))
        .collect()
}

/// An unresolved slice, bounds may be negative or missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slice {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: Option<i64>,
}

/// A slice resolved against a concrete length.
///
/// `start` is always a valid position when `len() > 0`. `stop` may be -1
/// for negative steps that run to the beginning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedSlice {
    pub start: i64,
    pub stop: i64,
    pub step: i64,
}

impl Slice {
    pub const fn new(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Self {
        Slice { start, stop, step }
    }

    /// Slice covering everything (`[:]`).
    pub const fn full() -> Self {
        Slice::new(None, None, None)
    }

    /// Resolve against an array of length `len` following Python's rules.
    ///
    /// Out of bounds starts and stops are clamped. A step of zero is an
    /// error.
    pub fn normalize(&self, len: usize) -> Result<NormalizedSlice> {
        let len = len as i64;
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(VarlistError::new(
                ErrorKind::UnsupportedIndexMode,
                "Slice step cannot be zero",
            ));
        }

        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };

        let clamp = |bound: i64| {
            if bound < 0 {
                (bound + len).max(lower)
            } else {
                bound.min(upper)
            }
        };

        let start = match self.start {
            Some(start) => clamp(start),
            None if step < 0 => upper,
            None => lower,
        };
        let stop = match self.stop {
            Some(stop) => clamp(stop),
            None if step < 0 => lower,
            None => upper,
        };

        Ok(NormalizedSlice { start, stop, step })
    }
}

/// Parses `start:stop[:step]` with any part optional, e.g. `1:`, `::-1`.
impl FromStr for Slice {
    type Err = VarlistError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<_> = s.split(':').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(VarlistError::new(
                ErrorKind::UnsupportedIndexMode,
                format!("Invalid slice: '{s}'"),
            ));
        }

        let parse_part = |part: &str| -> Result<Option<i64>> {
            let part = part.trim();
            if part.is_empty() {
                return Ok(None);
            }
            part.parse().map(Some).map_err(|_| {
                VarlistError::new(
                    ErrorKind::UnsupportedIndexMode,
                    format!("Invalid slice bound '{part}' in '{s}'"),
                )
            })
        };

        Ok(Slice {
            start: parse_part(parts[0])?,
            stop: parse_part(parts[1])?,
            step: match parts.get(2) {
                Some(part) => parse_part(part)?,
                None => None,
            },
        })
    }
}

impl NormalizedSlice {
    /// Number of positions selected.
    pub fn len(&self) -> usize {
        // Bounds lie within [-1, len]. The step may be i64::MIN.
        let distance = if self.step < 0 {
            self.start - self.stop
        } else {
            self.stop - self.start
        };
        if distance <= 0 {
            return 0;
        }
        ((distance as u64 - 1) / self.step.unsigned_abs() + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selected positions in slice order.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        let NormalizedSlice { start, step, .. } = *self;
        (0..self.len() as i64).map(move |k| (start + k * step) as usize)
    }
}
