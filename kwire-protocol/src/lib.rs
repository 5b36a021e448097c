//! # kwire-protocol
//!
//! Byte-exact binary encoder for the kwire request/response wire format.
//!
//! This crate provides:
//! - An append-only [`BinaryEncoder`] with chained write operations
//! - Big-endian fixed-width integers, booleans, floats and UUIDs
//! - Length-prefixed strings and byte blobs with `-1` null sentinels
//! - Unsigned base-128 varints and zigzag signed varints (32 and 64 bit)
//! - Nested message composition and typed arrays
//! - Encoder configuration (initial capacity, array strictness)

pub mod array;
pub mod config;
pub mod encoder;
pub mod error;
pub mod varint;
pub mod wire_bytes;

#[cfg(test)]
mod proptest_tests;

pub use array::{ArrayElement, ArrayMode, ElementType};
pub use config::{ConfigError, EncoderConfig};
pub use encoder::{BinaryEncoder, Encodable, IntWidth};
pub use error::{EncodeError, ParseArrayModeError};
pub use wire_bytes::AsWireBytes;

/// Length sentinel written in place of a null string or null byte blob.
pub const NULL_LENGTH: i32 = -1;

/// Default initial buffer capacity for new encoders (256 bytes).
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// Upper bound accepted for a configured initial capacity (16 MiB).
pub const MAX_INITIAL_CAPACITY: usize = 16 * 1024 * 1024;
