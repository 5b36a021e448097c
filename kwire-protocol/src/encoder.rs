//! Append-only binary encoder.
//!
//! Every write appends a fully specified byte sequence to an internal
//! growable buffer and returns the encoder, so writes chain:
//!
//! ```
//! use kwire_protocol::BinaryEncoder;
//!
//! let mut header = BinaryEncoder::new();
//! header
//!     .write_int16(18)
//!     .write_int16(4)
//!     .write_int32(7)
//!     .write_string(Some("client-1"));
//!
//! assert_eq!(header.size(), 2 + 2 + 4 + 2 + 8);
//! ```
//!
//! Integers are big-endian two's complement. Values that do not fit the
//! target width wrap by truncation; nothing here range-checks numbers.

use crate::array::{self, ArrayElement, ArrayMode, ElementType, Plan};
use crate::config::EncoderConfig;
use crate::error::EncodeError;
use crate::varint;
use crate::wire_bytes::AsWireBytes;
use crate::{DEFAULT_INITIAL_CAPACITY, NULL_LENGTH};
use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

/// Width of a fixed-size integer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    /// Number of bytes a value of this width occupies.
    pub fn bytes(self) -> usize {
        match self {
            IntWidth::W8 => 1,
            IntWidth::W16 => 2,
            IntWidth::W32 => 4,
            IntWidth::W64 => 8,
        }
    }

    /// Number of bits in this width.
    pub fn bits(self) -> u32 {
        self.bytes() as u32 * 8
    }

    /// Parses a bit count (8, 16, 32 or 64).
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(IntWidth::W8),
            16 => Some(IntWidth::W16),
            32 => Some(IntWidth::W32),
            64 => Some(IntWidth::W64),
            _ => None,
        }
    }
}

/// A type that knows how to write itself into a [`BinaryEncoder`].
///
/// Message schemas implement this to decide field order; the encoder only
/// provides the primitives.
pub trait Encodable {
    fn encode_to(&self, encoder: &mut BinaryEncoder) -> Result<(), EncodeError>;
}

/// Append-only byte builder for the kwire wire format.
///
/// Two encoders are equal when their written bytes are equal; the array
/// mode does not take part in the comparison.
#[derive(Debug, Clone, Default)]
pub struct BinaryEncoder {
    buffer: BytesMut,
    array_mode: ArrayMode,
}

impl PartialEq for BinaryEncoder {
    fn eq(&self, other: &Self) -> bool {
        self.buffer == other.buffer
    }
}

impl Eq for BinaryEncoder {}

impl BinaryEncoder {
    /// Creates an empty encoder in strict array mode.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// Creates an empty encoder with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            array_mode: ArrayMode::default(),
        }
    }

    /// Creates an empty encoder from configuration.
    pub fn with_config(config: &EncoderConfig) -> Self {
        tracing::trace!(
            initial_capacity = config.initial_capacity,
            array_mode = ?config.array_mode,
            "creating encoder"
        );
        Self::with_capacity(config.initial_capacity).with_array_mode(config.array_mode)
    }

    /// Sets how arrays treat elements of unrecognized kinds.
    pub fn with_array_mode(mut self, mode: ArrayMode) -> Self {
        self.array_mode = mode;
        self
    }

    pub fn array_mode(&self) -> ArrayMode {
        self.array_mode
    }

    /// Encodes `message` into a fresh encoder.
    pub fn encode_message<E: Encodable + ?Sized>(message: &E) -> Result<Self, EncodeError> {
        let mut encoder = Self::new();
        message.encode_to(&mut encoder)?;
        Ok(encoder)
    }

    // --- fixed width ---

    /// Writes `value` as a `width`-bit two's-complement big-endian integer,
    /// keeping only the low `width` bits.
    pub fn write_fixed_int(&mut self, width: IntWidth, value: i64) -> &mut Self {
        match width {
            IntWidth::W8 => self.write_int8(value as i8),
            IntWidth::W16 => self.write_int16(value as i16),
            IntWidth::W32 => self.write_int32(value as i32),
            IntWidth::W64 => self.write_int64(value),
        }
    }

    pub fn write_int8(&mut self, value: i8) -> &mut Self {
        self.buffer.put_i8(value);
        self
    }

    pub fn write_int16(&mut self, value: i16) -> &mut Self {
        self.buffer.put_i16(value);
        self
    }

    pub fn write_int32(&mut self, value: i32) -> &mut Self {
        self.buffer.put_i32(value);
        self
    }

    /// Writes the high 32-bit word, then the low word, each big-endian.
    pub fn write_int64(&mut self, value: i64) -> &mut Self {
        let high = (value >> 32) as u32;
        let low = value as u32;
        self.buffer.put_u32(high);
        self.buffer.put_u32(low);
        self
    }

    pub fn write_uint8(&mut self, value: u8) -> &mut Self {
        self.buffer.put_u8(value);
        self
    }

    pub fn write_uint16(&mut self, value: u16) -> &mut Self {
        self.buffer.put_u16(value);
        self
    }

    pub fn write_uint32(&mut self, value: u32) -> &mut Self {
        self.buffer.put_u32(value);
        self
    }

    /// Writes an IEEE 754 double, big-endian.
    pub fn write_float64(&mut self, value: f64) -> &mut Self {
        self.buffer.put_f64(value);
        self
    }

    pub fn write_boolean(&mut self, value: bool) -> &mut Self {
        self.write_int8(i8::from(value))
    }

    /// Writes the 16 bytes of `value` in RFC 4122 order.
    pub fn write_uuid(&mut self, value: &Uuid) -> &mut Self {
        self.buffer.put_slice(value.as_bytes());
        self
    }

    // --- length-prefixed ---

    /// Writes an int16 UTF-8 byte length followed by the bytes, or int16 `-1`
    /// for `None`.
    ///
    /// Strings longer than `i16::MAX` bytes get a truncated length prefix; the
    /// caller is responsible for staying within range.
    pub fn write_string(&mut self, value: Option<&str>) -> &mut Self {
        match value {
            None => self.write_int16(NULL_LENGTH as i16),
            Some(s) => {
                self.write_int16(s.len() as i16);
                self.buffer.put_slice(s.as_bytes());
                self
            }
        }
    }

    /// Writes an int32 payload length followed by the payload, or int32 `-1`
    /// for `None`.
    ///
    /// Raw byte sequences are copied verbatim; other scalars are written as
    /// the UTF-8 bytes of their textual form (see [`AsWireBytes`]).
    pub fn write_bytes<T: AsWireBytes + ?Sized>(&mut self, value: Option<&T>) -> &mut Self {
        match value {
            None => self.write_int32(NULL_LENGTH),
            Some(v) => {
                let payload = v.wire_bytes();
                self.write_int32(payload.len() as i32);
                self.buffer.put_slice(&payload);
                self
            }
        }
    }

    /// Writes `len + 1` as an unsigned varint followed by the UTF-8 bytes, or
    /// a single `0x00` for `None`.
    pub fn write_compact_string(&mut self, value: Option<&str>) -> &mut Self {
        match value {
            None => self.write_unsigned_varint32(0),
            Some(s) => {
                self.write_unsigned_varint32((s.len() as u32).wrapping_add(1));
                self.buffer.put_slice(s.as_bytes());
                self
            }
        }
    }

    /// Writes `len + 1` as an unsigned varint followed by the payload, or a
    /// single `0x00` for `None`.
    pub fn write_compact_bytes<T: AsWireBytes + ?Sized>(&mut self, value: Option<&T>) -> &mut Self {
        match value {
            None => self.write_unsigned_varint32(0),
            Some(v) => {
                let payload = v.wire_bytes();
                self.write_unsigned_varint32((payload.len() as u32).wrapping_add(1));
                self.buffer.put_slice(&payload);
                self
            }
        }
    }

    /// Writes the byte length as a signed varint followed by the UTF-8 bytes,
    /// or varint `-1` for `None`.
    pub fn write_varint_string(&mut self, value: Option<&str>) -> &mut Self {
        match value {
            None => self.write_signed_varint32(NULL_LENGTH),
            Some(s) => {
                self.write_signed_varint32(s.len() as i32);
                self.buffer.put_slice(s.as_bytes());
                self
            }
        }
    }

    /// Writes the payload length as a signed varint followed by the payload,
    /// or varint `-1` for `None`.
    pub fn write_varint_bytes<T: AsWireBytes + ?Sized>(&mut self, value: Option<&T>) -> &mut Self {
        match value {
            None => self.write_signed_varint32(NULL_LENGTH),
            Some(v) => {
                let payload = v.wire_bytes();
                self.write_signed_varint32(payload.len() as i32);
                self.buffer.put_slice(&payload);
                self
            }
        }
    }

    // --- composition ---

    /// Appends the current contents of `child` with no framing.
    ///
    /// `child` is left untouched and can still be written to or embedded
    /// elsewhere.
    pub fn write_encoder(&mut self, child: &BinaryEncoder) -> &mut Self {
        self.buffer.put_slice(&child.buffer);
        self
    }

    /// Appends `child` preceded by its int32 byte length.
    pub fn write_size_prefixed(&mut self, child: &BinaryEncoder) -> &mut Self {
        self.write_int32(child.size() as i32);
        self.write_encoder(child)
    }

    /// Lets `message` write its own fields into this encoder.
    pub fn write_encodable<E: Encodable + ?Sized>(
        &mut self,
        message: &E,
    ) -> Result<&mut Self, EncodeError> {
        message.encode_to(self)?;
        Ok(self)
    }

    /// Writes an int32 element count followed by every element.
    ///
    /// With `element_type` set, every element must be of that kind. Without
    /// it, integers are written as int32, text as strings and nested encoders
    /// are embedded. Elements of any other kind are rejected in strict mode
    /// and dropped (without bytes) in lenient mode.
    ///
    /// On error nothing is written.
    pub fn write_array(
        &mut self,
        elements: &[ArrayElement],
        element_type: Option<ElementType>,
    ) -> Result<&mut Self, EncodeError> {
        let plans = self.plan_array(elements, element_type)?;
        self.write_int32(elements.len() as i32);
        self.write_plans(plans);
        Ok(self)
    }

    /// Like [`write_array`](Self::write_array), with an unsigned varint
    /// `count + 1` prefix. `None` writes a single `0x00`.
    pub fn write_compact_array(
        &mut self,
        elements: Option<&[ArrayElement]>,
        element_type: Option<ElementType>,
    ) -> Result<&mut Self, EncodeError> {
        let Some(elements) = elements else {
            return Ok(self.write_unsigned_varint32(0));
        };
        let plans = self.plan_array(elements, element_type)?;
        self.write_unsigned_varint32((elements.len() as u32).wrapping_add(1));
        self.write_plans(plans);
        Ok(self)
    }

    fn plan_array<'a>(
        &self,
        elements: &'a [ArrayElement],
        element_type: Option<ElementType>,
    ) -> Result<Vec<Option<Plan<'a>>>, EncodeError> {
        let mut plans = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            let plan = array::plan(index, element, element_type).inspect_err(|e| {
                tracing::debug!(index, error = %e, "rejected array element");
            })?;
            if plan.is_none() {
                match self.array_mode {
                    ArrayMode::Strict => {
                        tracing::debug!(index, kind = element.kind(), "rejected array element");
                        return Err(EncodeError::UnsupportedElement {
                            index,
                            kind: element.kind(),
                        });
                    }
                    ArrayMode::Lenient => {
                        tracing::warn!(
                            index,
                            kind = element.kind(),
                            "dropping array element of unsupported kind"
                        );
                    }
                }
            }
            plans.push(plan);
        }
        Ok(plans)
    }

    fn write_plans(&mut self, plans: Vec<Option<Plan<'_>>>) {
        for plan in plans.into_iter().flatten() {
            match plan {
                Plan::Int32(v) => self.write_int32(v),
                Plan::String(s) => self.write_string(s),
                Plan::Message(e) => self.write_encoder(e),
            };
        }
    }

    // --- varints ---

    /// Writes `value` in base-128 groups, least significant first (1 to 5 bytes).
    pub fn write_unsigned_varint32(&mut self, value: u32) -> &mut Self {
        varint::put_unsigned_varint32(&mut self.buffer, value);
        self
    }

    /// Zigzag-maps `value`, then writes it as an unsigned varint.
    pub fn write_signed_varint32(&mut self, value: i32) -> &mut Self {
        varint::put_signed_varint32(&mut self.buffer, value);
        self
    }

    /// Writes `value` in base-128 groups, least significant first (1 to 10 bytes).
    pub fn write_unsigned_varint64(&mut self, value: u64) -> &mut Self {
        varint::put_unsigned_varint64(&mut self.buffer, value);
        self
    }

    /// Zigzag-maps `value`, then writes it as an unsigned varint.
    pub fn write_signed_varint64(&mut self, value: i64) -> &mut Self {
        varint::put_signed_varint64(&mut self.buffer, value);
        self
    }

    // --- inspection ---

    /// Returns the number of bytes written so far.
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the bytes written so far.
    pub fn serialized_view(&self) -> &[u8] {
        &self.buffer
    }

    /// Copies the bytes written so far.
    pub fn to_vec(&self) -> Vec<u8> {
        self.buffer.to_vec()
    }

    /// Consumes the encoder, returning its bytes.
    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }
}

impl AsRef<[u8]> for BinaryEncoder {
    fn as_ref(&self) -> &[u8] {
        &self.buffer
    }
}

impl From<BinaryEncoder> for Bytes {
    fn from(encoder: BinaryEncoder) -> Self {
        encoder.into_bytes()
    }
}
