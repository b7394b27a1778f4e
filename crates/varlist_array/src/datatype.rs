use std::fmt;
use std::str::FromStr;

use varlist_error::{ErrorKind, Result, VarlistError};

/// Metadata associated with lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListTypeMeta {
    pub datatype: Box<DataType>,
}

/// Element types a list array can hold.
///
/// Primitive types are stored tightly packed in the data buffer. A `List`
/// child is itself a variable-length list array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// A list of values all of the same type.
    List(ListTypeMeta),
}

impl DataType {
    pub fn list(child: DataType) -> Self {
        DataType::List(ListTypeMeta {
            datatype: Box::new(child),
        })
    }

    /// Number of element counts needed to fully size a buffer of this type.
    ///
    /// A primitive buffer only needs its own length, each level of list
    /// nesting adds one more count for the level below it.
    pub fn alloc_count(&self) -> usize {
        match self {
            DataType::List(meta) => 1 + meta.datatype.alloc_count(),
            _ => 1,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "Boolean"),
            Self::Int8 => write!(f, "Int8"),
            Self::Int16 => write!(f, "Int16"),
            Self::Int32 => write!(f, "Int32"),
            Self::Int64 => write!(f, "Int64"),
            Self::UInt8 => write!(f, "UInt8"),
            Self::UInt16 => write!(f, "UInt16"),
            Self::UInt32 => write!(f, "UInt32"),
            Self::UInt64 => write!(f, "UInt64"),
            Self::Float32 => write!(f, "Float32"),
            Self::Float64 => write!(f, "Float64"),
            Self::List(meta) => write!(f, "List[{}]", meta.datatype),
        }
    }
}

/// Parses the display form (`List[Int64]`), case insensitive. Angle brackets
/// are accepted for lists as well (`list<int64>`).
impl FromStr for DataType {
    type Err = VarlistError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();

        if let Some(rest) = lower.strip_prefix("list") {
            let rest = rest.trim_start();
            let inner = rest
                .strip_prefix('[')
                .and_then(|r| r.strip_suffix(']'))
                .or_else(|| rest.strip_prefix('<').and_then(|r| r.strip_suffix('>')))
                .ok_or_else(|| {
                    VarlistError::new(
                        ErrorKind::TypeMismatch,
                        format!("Malformed list type: '{s}'"),
                    )
                })?;
            return Ok(DataType::list(inner.parse()?));
        }

        Ok(match lower.as_str() {
            "boolean" | "bool" => DataType::Boolean,
            "int8" => DataType::Int8,
            "int16" => DataType::Int16,
            "int32" => DataType::Int32,
            "int64" => DataType::Int64,
            "uint8" => DataType::UInt8,
            "uint16" => DataType::UInt16,
            "uint32" => DataType::UInt32,
            "uint64" => DataType::UInt64,
            "float32" => DataType::Float32,
            "float64" => DataType::Float64,
            _ => {
                return Err(VarlistError::new(
                    ErrorKind::TypeMismatch,
                    format!("Unknown data type: '{s}'"),
                ))
            }
        })
    }
}
