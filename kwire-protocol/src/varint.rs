//! Variable-length integer encoding.
//!
//! Values are split into 7-bit groups, least significant group first. Every
//! byte except the last has its high bit (`0x80`) set:
//!
//! ```text
//! 300 = 0b1_0010_1100
//!       group 0: 010_1100 -> 0xAC (continuation)
//!       group 1: 000_0010 -> 0x02
//! ```
//!
//! Signed values are first zigzag-mapped so that small magnitudes of either
//! sign produce short encodings: `0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, ...`

use bytes::BufMut;

/// Maximum encoded length of a 32-bit varint.
pub const MAX_VARINT32_LEN: usize = 5;

/// Maximum encoded length of a 64-bit varint.
pub const MAX_VARINT64_LEN: usize = 10;

const CONTINUATION_BIT: u8 = 0x80;
const PAYLOAD_MASK: u8 = 0x7F;

/// Maps a signed 32-bit value to its zigzag code.
#[inline]
pub fn zigzag32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Maps a signed 64-bit value to its zigzag code.
#[inline]
pub fn zigzag64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag32`].
#[inline]
pub fn unzigzag32(code: u32) -> i32 {
    ((code >> 1) as i32) ^ -((code & 1) as i32)
}

/// Inverse of [`zigzag64`].
#[inline]
pub fn unzigzag64(code: u64) -> i64 {
    ((code >> 1) as i64) ^ -((code & 1) as i64)
}

/// Appends `value` as an unsigned varint (1 to 5 bytes).
pub fn put_unsigned_varint32<B: BufMut>(buf: &mut B, mut value: u32) {
    while value & !(PAYLOAD_MASK as u32) != 0 {
        buf.put_u8((value as u8 & PAYLOAD_MASK) | CONTINUATION_BIT);
        value >>= 7;
    }
    buf.put_u8(value as u8 & PAYLOAD_MASK);
}

/// Appends `value` as an unsigned varint (1 to 10 bytes).
pub fn put_unsigned_varint64<B: BufMut>(buf: &mut B, mut value: u64) {
    while value & !(PAYLOAD_MASK as u64) != 0 {
        buf.put_u8((value as u8 & PAYLOAD_MASK) | CONTINUATION_BIT);
        value >>= 7;
    }
    buf.put_u8(value as u8 & PAYLOAD_MASK);
}

/// Appends `value` as a zigzag-mapped varint.
pub fn put_signed_varint32<B: BufMut>(buf: &mut B, value: i32) {
    put_unsigned_varint32(buf, zigzag32(value));
}

/// Appends `value` as a zigzag-mapped varint.
pub fn put_signed_varint64<B: BufMut>(buf: &mut B, value: i64) {
    put_unsigned_varint64(buf, zigzag64(value));
}

/// Number of bytes [`put_unsigned_varint32`] emits for `value`.
pub fn unsigned_varint32_len(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}

/// Number of bytes [`put_unsigned_varint64`] emits for `value`.
pub fn unsigned_varint64_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.max(1).div_ceil(7)
}
