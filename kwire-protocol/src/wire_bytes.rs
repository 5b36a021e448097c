//! Conversion of values into the payload of a byte-blob field.
//!
//! Raw byte sequences pass through verbatim. Every other scalar is written as
//! the UTF-8 bytes of its textual representation.

use bytes::{Bytes, BytesMut};
use std::borrow::Cow;

/// A value that can be written as the payload of a length-prefixed byte blob.
pub trait AsWireBytes {
    /// Returns the exact payload bytes for this value.
    fn wire_bytes(&self) -> Cow<'_, [u8]>;
}

impl AsWireBytes for [u8] {
    fn wire_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl<const N: usize> AsWireBytes for [u8; N] {
    fn wire_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl AsWireBytes for Vec<u8> {
    fn wire_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl AsWireBytes for Bytes {
    fn wire_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_ref())
    }
}

impl AsWireBytes for BytesMut {
    fn wire_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_ref())
    }
}

impl AsWireBytes for str {
    fn wire_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl AsWireBytes for String {
    fn wire_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

macro_rules! impl_textual {
    ($($ty:ty),* $(,)?) => {
        $(
            impl AsWireBytes for $ty {
                fn wire_bytes(&self) -> Cow<'_, [u8]> {
                    Cow::Owned(self.to_string().into_bytes())
                }
            }
        )*
    };
}

impl_textual!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize, f32, f64, bool, char);

impl<T: AsWireBytes + ?Sized> AsWireBytes for &T {
    fn wire_bytes(&self) -> Cow<'_, [u8]> {
        (**self).wire_bytes()
    }
}
