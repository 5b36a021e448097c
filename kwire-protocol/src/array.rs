//! Array element model.
//!
//! An array is written as an int32 element count followed by each element.
//! Elements carry their runtime kind ([`ArrayElement`]); the caller may pin
//! the encoding with an explicit [`ElementType`]. What happens to elements
//! that cannot be encoded is decided by [`ArrayMode`].

use crate::encoder::BinaryEncoder;
use crate::error::{EncodeError, ParseArrayModeError};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Explicit per-element encoding for an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Big-endian int32.
    Int32,
    /// int16-length-prefixed UTF-8 string.
    String,
    /// Nested encoder, embedded without framing.
    Message,
}

impl ElementType {
    pub fn name(self) -> &'static str {
        match self {
            ElementType::Int32 => "int32",
            ElementType::String => "string",
            ElementType::Message => "message",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How `write_array` treats elements it cannot encode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayMode {
    /// Reject the whole array before writing anything.
    #[default]
    Strict,
    /// Drop the element without writing bytes for it. The count prefix still
    /// reflects the input length.
    Lenient,
}

impl std::str::FromStr for ArrayMode {
    type Err = ParseArrayModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(ArrayMode::Strict),
            "lenient" => Ok(ArrayMode::Lenient),
            _ => Err(ParseArrayModeError(s.to_string())),
        }
    }
}

/// A value to be written as one array element.
#[derive(Debug, Clone)]
pub enum ArrayElement {
    /// Numeric value; written as int32 (truncating).
    Int(i64),
    /// Text value; `None` writes the null string sentinel.
    Text(Option<String>),
    /// Nested message.
    Message(BinaryEncoder),
    /// Boolean. Not an encodable array element kind.
    Bool(bool),
    /// Raw bytes. Not an encodable array element kind.
    Bytes(Bytes),
    /// Absent compound value.
    Null,
}

impl ArrayElement {
    /// Name of the runtime kind, as reported in errors and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ArrayElement::Int(_) => "int",
            ArrayElement::Text(_) => "text",
            ArrayElement::Message(_) => "message",
            ArrayElement::Bool(_) => "bool",
            ArrayElement::Bytes(_) => "bytes",
            ArrayElement::Null => "null",
        }
    }
}

impl From<i32> for ArrayElement {
    fn from(value: i32) -> Self {
        ArrayElement::Int(value as i64)
    }
}

impl From<i64> for ArrayElement {
    fn from(value: i64) -> Self {
        ArrayElement::Int(value)
    }
}

impl From<&str> for ArrayElement {
    fn from(value: &str) -> Self {
        ArrayElement::Text(Some(value.to_string()))
    }
}

impl From<String> for ArrayElement {
    fn from(value: String) -> Self {
        ArrayElement::Text(Some(value))
    }
}

impl From<BinaryEncoder> for ArrayElement {
    fn from(value: BinaryEncoder) -> Self {
        ArrayElement::Message(value)
    }
}

impl From<bool> for ArrayElement {
    fn from(value: bool) -> Self {
        ArrayElement::Bool(value)
    }
}

impl From<Bytes> for ArrayElement {
    fn from(value: Bytes) -> Self {
        ArrayElement::Bytes(value)
    }
}

/// How a single element will be written, once checked.
pub(crate) enum Plan<'a> {
    Int32(i32),
    String(Option<&'a str>),
    Message(&'a BinaryEncoder),
}

/// Resolves the encoding of `element` at `index`.
///
/// `Ok(None)` means the element has an unrecognized kind and is subject to
/// the array mode. A value that does not match an explicit element type, or
/// a null in a nested-message slot, is always a type mismatch.
pub(crate) fn plan(
    index: usize,
    element: &ArrayElement,
    element_type: Option<ElementType>,
) -> Result<Option<Plan<'_>>, EncodeError> {
    let mismatch = |expected: ElementType| EncodeError::TypeMismatch {
        index,
        expected: expected.name(),
        found: element.kind(),
    };

    match (element_type, element) {
        (Some(ElementType::Int32) | None, ArrayElement::Int(v)) => {
            Ok(Some(Plan::Int32(*v as i32)))
        }
        (Some(ElementType::String) | None, ArrayElement::Text(s)) => {
            Ok(Some(Plan::String(s.as_deref())))
        }
        (Some(ElementType::Message) | None, ArrayElement::Message(e)) => {
            Ok(Some(Plan::Message(e)))
        }
        (Some(ElementType::Message) | None, ArrayElement::Null) => {
            Err(mismatch(ElementType::Message))
        }
        (Some(expected), _) => Err(mismatch(expected)),
        (None, ArrayElement::Bool(_) | ArrayElement::Bytes(_)) => Ok(None),
    }
}
