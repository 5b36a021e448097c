//! Encoder error types.

use thiserror::Error;

/// Errors that can occur while appending values to a [`BinaryEncoder`].
///
/// Numeric writes never fail: values that do not fit the target width wrap
/// by two's-complement truncation. Only structural checks on array elements
/// produce errors.
///
/// [`BinaryEncoder`]: crate::BinaryEncoder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("type mismatch at element {index}: expected {expected}, got {found}")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unsupported array element at index {index}: {kind}")]
    UnsupportedElement { index: usize, kind: &'static str },
}

impl EncodeError {
    /// Returns whether this error reports a value that is not of the expected kind.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, EncodeError::TypeMismatch { .. })
    }

    /// Returns the index of the array element that caused the error.
    pub fn index(&self) -> usize {
        match self {
            EncodeError::TypeMismatch { index, .. } => *index,
            EncodeError::UnsupportedElement { index, .. } => *index,
        }
    }
}

/// Error returned when parsing an [`ArrayMode`] from a string.
///
/// [`ArrayMode`]: crate::ArrayMode
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown array mode: {0}")]
pub struct ParseArrayModeError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_type_mismatch() {
        let err = EncodeError::TypeMismatch {
            index: 0,
            expected: "message",
            found: "null",
        };
        assert!(err.is_type_mismatch());

        let err = EncodeError::UnsupportedElement {
            index: 3,
            kind: "bool",
        };
        assert!(!err.is_type_mismatch());
    }

    #[test]
    fn test_error_index() {
        let err = EncodeError::TypeMismatch {
            index: 7,
            expected: "int32",
            found: "text",
        };
        assert_eq!(err.index(), 7);

        let err = EncodeError::UnsupportedElement {
            index: 2,
            kind: "bytes",
        };
        assert_eq!(err.index(), 2);
    }

    #[test]
    fn test_encode_error_display() {
        let err = EncodeError::TypeMismatch {
            index: 1,
            expected: "message",
            found: "null",
        };
        let msg = err.to_string();
        assert!(msg.contains("message"));
        assert!(msg.contains("null"));
        assert!(msg.contains('1'));

        let err = EncodeError::UnsupportedElement {
            index: 4,
            kind: "bool",
        };
        let msg = err.to_string();
        assert!(msg.contains("bool"));
        assert!(msg.contains('4'));
    }
}
