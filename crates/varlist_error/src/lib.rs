use std::error::Error;
use std::fmt;

pub type Result<T, E = VarlistError> = std::result::Result<T, E>;

/// Broad category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Index outside `[0, len)`.
    OutOfRange,
    /// Two lengths that must agree don't (mask vs array, slice vs source).
    LengthMismatch,
    /// Element type of a value doesn't match the declared child type.
    TypeMismatch,
    /// Indexing expression isn't one of the supported modes.
    UnsupportedIndexMode,
    /// Caller supplied buffers that don't form a valid layout.
    InvalidLayout,
    /// Anything else, usually a wrapped external error.
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OutOfRange => "out of range",
            Self::LengthMismatch => "length mismatch",
            Self::TypeMismatch => "type mismatch",
            Self::UnsupportedIndexMode => "unsupported index mode",
            Self::InvalidLayout => "invalid layout",
            Self::Other => "error",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug)]
pub struct VarlistError {
    kind: ErrorKind,
    msg: String,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl VarlistError {
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        VarlistError {
            kind,
            msg: msg.into(),
            source: None,
        }
    }

    pub fn with_source(
        kind: ErrorKind,
        msg: impl Into<String>,
        source: Box<dyn Error + Send + Sync>,
    ) -> Self {
        VarlistError {
            kind,
            msg: msg.into(),
            source: Some(source),
        }
    }

    /// Index `idx` isn't valid for something holding `len` items.
    pub fn out_of_range(idx: impl fmt::Display, len: usize) -> Self {
        Self::new(
            ErrorKind::OutOfRange,
            format!("Index {idx} out of range for length {len}"),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn get_msg(&self) -> &str {
        self.msg.as_str()
    }
}

impl fmt::Display for VarlistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)?;
        if let Some(source) = &self.source {
            write!(f, "\nError source: {source}")?;
        }
        Ok(())
    }
}

impl Error for VarlistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl From<fmt::Error> for VarlistError {
    fn from(value: fmt::Error) -> Self {
        Self::with_source(ErrorKind::Other, "Format error", Box::new(value))
    }
}

impl From<std::io::Error> for VarlistError {
    fn from(value: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Other, "IO error", Box::new(value))
    }
}

/// Attach a message to a foreign error.
pub trait ResultExt<T, E> {
    fn context(self, msg: &'static str) -> Result<T>;

    fn context_fn<F: Fn() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Error + Send + Sync + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| VarlistError::with_source(ErrorKind::Other, msg, Box::new(e)))
    }

    fn context_fn<F: Fn() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| VarlistError::with_source(ErrorKind::Other, f(), Box::new(e)))
    }
}

pub trait OptionExt<T> {
    /// Return an error with the given message if the option is None.
    fn required(self, msg: &'static str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn required(self, msg: &'static str) -> Result<T> {
        match self {
            Self::Some(v) => Ok(v),
            None => Err(VarlistError::new(ErrorKind::Other, msg)),
        }
    }
}
