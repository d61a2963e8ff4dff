//! Error types for sheetcell-core

use thiserror::Error;

use crate::cell::ValueKind;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, converting or writing a cell value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The requested representation is undefined for the active kind
    #[error("Type mismatch: cannot read {requested} from a {actual} value")]
    TypeMismatch {
        requested: &'static str,
        actual: ValueKind,
    },

    /// A numeric conversion does not fit the target width
    #[error("Value {value} out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    /// Persisted text cannot be parsed as the kind its type code claims
    #[error("Malformed {kind} value: {text:?}")]
    MalformedValue { kind: ValueKind, text: String },

    /// The type attribute carries a code this crate cannot interpret
    #[error("Unsupported cell type code: {0:?}")]
    UnsupportedTypeCode(String),
}

impl Error {
    pub(crate) fn mismatch(requested: &'static str, actual: ValueKind) -> Self {
        Error::TypeMismatch { requested, actual }
    }

    pub(crate) fn malformed<S: Into<String>>(kind: ValueKind, text: S) -> Self {
        Error::MalformedValue {
            kind,
            text: text.into(),
        }
    }

    /// Whether the caller can reasonably fall back and carry on.
    ///
    /// Conversion failures are recoverable; data-integrity failures found
    /// while loading a cell are not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. } | Error::OutOfRange { .. })
    }
}
