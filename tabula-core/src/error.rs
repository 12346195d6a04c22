// Error types for tabula

use crate::types::Kind;
use thiserror::Error;

/// Failures raised by value accessors, comparisons and kind checks
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: Kind, actual: Kind },
    #[error("Cannot compare {left} with {right}")]
    Incomparable { left: Kind, right: Kind },
    #[error("Unsupported operation {operation} on {kind} value")]
    Unsupported { operation: &'static str, kind: Kind },
    #[error("Cannot convert {kind} value: {reason}")]
    Conversion { kind: Kind, reason: String },
}

/// Core errors across tabula layers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{0}")]
    Type(#[from] TypeError),

    #[error("Value count mismatch: expected {expected}, got {actual}")]
    ValueCount { expected: usize, actual: usize },
    #[error("Field '{field}' expects {expected}, got {actual}")]
    FieldKind {
        field: String,
        expected: Kind,
        actual: Kind,
    },
    #[error("Unknown field alias: {0}")]
    UnknownField(String),
    #[error("Field index {index} out of bounds for {len} fields")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Order segment {position} is not comparable: {source}")]
    IncomparableSegment { position: usize, source: TypeError },
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Field '{field}' has no possible value labelled '{label}'")]
    UnknownPossibleValue { field: String, label: String },
}

/// Category of a failure, used by callers to decide how to surface it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TypeMismatch,
    InvalidArgument,
    IllegalState,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Type(_) => ErrorKind::TypeMismatch,
            Error::ValueCount { .. }
            | Error::FieldKind { .. }
            | Error::UnknownField(_)
            | Error::IndexOutOfBounds { .. }
            | Error::IncomparableSegment { .. }
            | Error::InvalidValue { .. } => ErrorKind::InvalidArgument,
            Error::UnknownPossibleValue { .. } => ErrorKind::IllegalState,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::TypeMismatch => f.write_str("type mismatch"),
            ErrorKind::InvalidArgument => f.write_str("invalid argument"),
            ErrorKind::IllegalState => f.write_str("illegal state"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err: Error = TypeError::Mismatch {
            expected: Kind::Integer,
            actual: Kind::String,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);

        let err = Error::ValueCount {
            expected: 2,
            actual: 3,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = Error::UnknownPossibleValue {
            field: "STATUS".to_string(),
            label: "Gone".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::IllegalState);
    }

    #[test]
    fn test_field_kind_message_names_both_kinds() {
        let err = Error::FieldKind {
            field: "AMOUNT".to_string(),
            expected: Kind::Decimal,
            actual: Kind::String,
        };
        assert_eq!(err.to_string(), "Field 'AMOUNT' expects decimal, got string");
    }
}
