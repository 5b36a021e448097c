//! Property-based tests for encoder output.
//!
//! A minimal reader over `bytes::Buf` checks that each write produces the
//! layout a decoder expects.

use bytes::Buf;
use proptest::prelude::*;

use crate::array::{ArrayElement, ArrayMode, ElementType};
use crate::encoder::{BinaryEncoder, IntWidth};
use crate::varint::{self, unzigzag32, unzigzag64};

fn read_uvarint64(buf: &mut &[u8]) -> u64 {
    let mut value = 0u64;
    let mut shift = 0;
    loop {
        let byte = buf.get_u8();
        value |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return value;
        }
        shift += 7;
    }
}

fn read_string(buf: &mut &[u8]) -> Option<String> {
    let len = buf.get_i16();
    if len < 0 {
        return None;
    }
    let bytes = buf.copy_to_bytes(len as usize);
    Some(String::from_utf8(bytes.to_vec()).unwrap())
}

fn arb_width() -> impl Strategy<Value = IntWidth> {
    prop_oneof![
        Just(IntWidth::W8),
        Just(IntWidth::W16),
        Just(IntWidth::W32),
        Just(IntWidth::W64),
    ]
}

/// Strategy for encodable array elements (no unrecognized kinds).
fn arb_element() -> impl Strategy<Value = ArrayElement> {
    prop_oneof![
        any::<i32>().prop_map(ArrayElement::from),
        proptest::option::of("[a-z0-9 ]{0,20}").prop_map(ArrayElement::Text),
        prop::collection::vec(any::<u8>(), 0..8).prop_map(|raw| {
            let mut nested = BinaryEncoder::new();
            nested.write_bytes(Some(&raw));
            ArrayElement::Message(nested)
        }),
    ]
}

proptest! {
    #[test]
    fn fixed_int_roundtrip(width in arb_width(), value in any::<i64>()) {
        let mut enc = BinaryEncoder::new();
        enc.write_fixed_int(width, value);
        prop_assert_eq!(enc.size(), width.bytes());

        let mut buf = enc.serialized_view();
        let decoded = match width {
            IntWidth::W8 => buf.get_i8() as i64,
            IntWidth::W16 => buf.get_i16() as i64,
            IntWidth::W32 => buf.get_i32() as i64,
            IntWidth::W64 => buf.get_i64(),
        };
        let expected = match width {
            IntWidth::W8 => value as i8 as i64,
            IntWidth::W16 => value as i16 as i64,
            IntWidth::W32 => value as i32 as i64,
            IntWidth::W64 => value,
        };
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn unsigned_varint32_roundtrip(value in any::<u32>()) {
        let mut enc = BinaryEncoder::new();
        enc.write_unsigned_varint32(value);
        prop_assert!((1..=varint::MAX_VARINT32_LEN).contains(&enc.size()));
        prop_assert_eq!(enc.size(), varint::unsigned_varint32_len(value));

        let mut buf = enc.serialized_view();
        prop_assert_eq!(read_uvarint64(&mut buf), value as u64);
        prop_assert!(buf.is_empty());
    }

    #[test]
    fn unsigned_varint64_roundtrip(value in any::<u64>()) {
        let mut enc = BinaryEncoder::new();
        enc.write_unsigned_varint64(value);
        prop_assert!((1..=varint::MAX_VARINT64_LEN).contains(&enc.size()));

        let mut buf = enc.serialized_view();
        prop_assert_eq!(read_uvarint64(&mut buf), value);
        prop_assert!(buf.is_empty());
    }

    #[test]
    fn signed_varint32_roundtrip(value in any::<i32>()) {
        let mut enc = BinaryEncoder::new();
        enc.write_signed_varint32(value);

        let mut buf = enc.serialized_view();
        let code = read_uvarint64(&mut buf);
        prop_assert_eq!(unzigzag32(code as u32), value);
    }

    #[test]
    fn signed_varint64_roundtrip(value in any::<i64>()) {
        let mut enc = BinaryEncoder::new();
        enc.write_signed_varint64(value);

        let mut buf = enc.serialized_view();
        let code = read_uvarint64(&mut buf);
        prop_assert_eq!(unzigzag64(code), value);
    }

    #[test]
    fn small_magnitudes_stay_one_byte(value in -64i64..64) {
        let mut enc = BinaryEncoder::new();
        enc.write_signed_varint64(value);
        prop_assert_eq!(enc.size(), 1);
    }

    #[test]
    fn string_roundtrip(value in proptest::option::of(".{0,64}")) {
        let mut enc = BinaryEncoder::new();
        enc.write_string(value.as_deref());

        let expected_len = 2 + value.as_ref().map_or(0, |s| s.len());
        prop_assert_eq!(enc.size(), expected_len);

        let mut buf = enc.serialized_view();
        prop_assert_eq!(read_string(&mut buf), value);
    }

    #[test]
    fn bytes_pass_through(raw in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut enc = BinaryEncoder::new();
        enc.write_bytes(Some(&raw));

        let mut buf = enc.serialized_view();
        let len = buf.get_i32();
        prop_assert_eq!(len as usize, raw.len());
        prop_assert_eq!(buf, raw.as_slice());
    }

    #[test]
    fn embedding_preserves_child(
        prefix in prop::collection::vec(any::<u8>(), 0..32),
        child_value in any::<i64>(),
    ) {
        let mut child = BinaryEncoder::new();
        child.write_int64(child_value).write_signed_varint64(child_value);
        let before = child.to_vec();

        let mut parent = BinaryEncoder::new();
        for b in &prefix {
            parent.write_uint8(*b);
        }
        parent.write_encoder(&child);

        prop_assert_eq!(child.to_vec(), before.clone());
        prop_assert_eq!(parent.size(), prefix.len() + before.len());
        prop_assert!(parent.serialized_view().ends_with(&before));
    }

    #[test]
    fn array_of_encodable_elements(
        elements in prop::collection::vec(arb_element(), 0..16),
        lenient in any::<bool>(),
    ) {
        let mode = if lenient { ArrayMode::Lenient } else { ArrayMode::Strict };
        let mut enc = BinaryEncoder::new().with_array_mode(mode);
        enc.write_array(&elements, None).unwrap();

        let mut buf = enc.serialized_view();
        prop_assert_eq!(buf.get_i32() as usize, elements.len());
        for element in &elements {
            match element {
                ArrayElement::Int(v) => prop_assert_eq!(buf.get_i32() as i64, *v),
                ArrayElement::Text(s) => prop_assert_eq!(&read_string(&mut buf), s),
                ArrayElement::Message(nested) => {
                    let n = nested.size();
                    prop_assert_eq!(&buf[..n], nested.serialized_view());
                    buf.advance(n);
                }
                _ => unreachable!(),
            }
        }
        prop_assert!(buf.is_empty());
    }

    #[test]
    fn explicit_int32_array(values in prop::collection::vec(any::<i32>(), 0..32)) {
        let elements: Vec<ArrayElement> = values.iter().copied().map(ArrayElement::from).collect();
        let mut enc = BinaryEncoder::new();
        enc.write_array(&elements, Some(ElementType::Int32)).unwrap();
        prop_assert_eq!(enc.size(), 4 + 4 * values.len());
    }
}
