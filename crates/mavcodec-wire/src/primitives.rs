//! Codec primitives (component E): little-endian read/write and
//! char-array trimming.
//!
//! The X.25 CRC accumulator lives in `mavcodec_schema::codec`, shared with
//! the Layout & CRC-seed Compiler; everything here is specific to
//! serializing/deserializing field *values* once a [`FieldDescriptor`] has
//! told us the type and offset.

use mavcodec_schema::{BaseType, FieldDescriptor};

use crate::{error::BuildError, values::FieldValue};

/// Trim a `char[N]` array to a `String` at the first trailing `0x00`.
///
/// If every byte is zero, the result is the empty string. Non-UTF-8 bytes
/// are replaced per [`String::from_utf8_lossy`] rather than rejected: the
/// wire format makes no charset guarantee beyond "ASCII in practice".
#[must_use]
pub fn trim_char_array(bytes: &[u8]) -> String {
    match bytes.iter().rposition(|&b| b != 0x00) {
        Some(last) => String::from_utf8_lossy(&bytes[..=last]).into_owned(),
        None => String::new(),
    }
}

macro_rules! scalar_codec {
    ($write:ident, $read:ident, $ty:ty, $variant:ident) => {
        fn $write(buf: &mut [u8], value: $ty) {
            buf.copy_from_slice(&value.to_le_bytes());
        }

        fn $read(buf: &[u8]) -> FieldValue {
            let mut array = [0u8; std::mem::size_of::<$ty>()];
            array.copy_from_slice(buf);
            FieldValue::$variant(<$ty>::from_le_bytes(array))
        }
    };
}

scalar_codec!(write_i8, read_i8, i8, I8);
scalar_codec!(write_u8, read_u8, u8, U8);
scalar_codec!(write_i16, read_i16, i16, I16);
scalar_codec!(write_u16, read_u16, u16, U16);
scalar_codec!(write_i32, read_i32, i32, I32);
scalar_codec!(write_u32, read_u32, u32, U32);
scalar_codec!(write_i64, read_i64, i64, I64);
scalar_codec!(write_u64, read_u64, u64, U64);
scalar_codec!(write_f32, read_f32, f32, F32);
scalar_codec!(write_f64, read_f64, f64, F64);

/// Write one field's value(s) into `buf` at `offset`, per its descriptor.
///
/// Scalars occupy exactly `field.type_size()` bytes; arrays occupy
/// `field.total_size()` bytes laid out element-by-element. `char` arrays
/// accept a [`FieldValue::Str`]: bytes beyond the string's length stay
/// `0x00` (the caller is expected to have zero-filled the payload buffer
/// already); bytes beyond `field.array_length` are silently dropped.
///
/// # Errors
///
/// Returns [`BuildError::InvalidFieldType`] if `value`'s shape doesn't
/// match the field's declared type/arity.
pub fn encode_field(
    buf: &mut [u8],
    offset: usize,
    field: &FieldDescriptor,
    value: &FieldValue,
) -> Result<(), BuildError> {
    let size = field.type_size();
    let span = &mut buf[offset..offset + field.total_size()];

    if field.base_type == BaseType::Char {
        let FieldValue::Str(s) = value else {
            return invalid(field, "a string for a char array");
        };
        let bytes = s.as_bytes();
        let n = bytes.len().min(field.array_length);
        span[..n].copy_from_slice(&bytes[..n]);
        return Ok(());
    }

    if field.is_scalar() {
        encode_scalar(span, field, value)?;
        return Ok(());
    }

    encode_array(span, size, field, value)
}

fn invalid<T>(field: &FieldDescriptor, expected: &'static str) -> Result<T, BuildError> {
    Err(BuildError::InvalidFieldType { field: field.name.clone(), expected })
}

fn encode_scalar(
    span: &mut [u8],
    field: &FieldDescriptor,
    value: &FieldValue,
) -> Result<(), BuildError> {
    match (field.base_type, value) {
        (BaseType::Int8, FieldValue::I8(v)) => write_i8(span, *v),
        (BaseType::Uint8, FieldValue::U8(v)) => write_u8(span, *v),
        (BaseType::Int16, FieldValue::I16(v)) => write_i16(span, *v),
        (BaseType::Uint16, FieldValue::U16(v)) => write_u16(span, *v),
        (BaseType::Int32, FieldValue::I32(v)) => write_i32(span, *v),
        (BaseType::Uint32, FieldValue::U32(v)) => write_u32(span, *v),
        (BaseType::Int64, FieldValue::I64(v)) => write_i64(span, *v),
        (BaseType::Uint64, FieldValue::U64(v)) => write_u64(span, *v),
        (BaseType::Float, FieldValue::F32(v)) => write_f32(span, *v),
        (BaseType::Double, FieldValue::F64(v)) => write_f64(span, *v),
        _ => return invalid(field, "a scalar value matching the field's base type"),
    }
    Ok(())
}

fn encode_array(
    span: &mut [u8],
    size: usize,
    field: &FieldDescriptor,
    value: &FieldValue,
) -> Result<(), BuildError> {
    macro_rules! write_elements {
        ($values:expr, $write:ident) => {{
            if $values.len() != field.array_length {
                return invalid(field, "an array matching the field's declared length");
            }
            for (i, v) in $values.iter().enumerate() {
                $write(&mut span[i * size..(i + 1) * size], *v);
            }
            Ok(())
        }};
    }

    match (field.base_type, value) {
        (BaseType::Int8, FieldValue::I8Array(v)) => write_elements!(v, write_i8),
        (BaseType::Uint8, FieldValue::U8Array(v)) => write_elements!(v, write_u8),
        (BaseType::Int16, FieldValue::I16Array(v)) => write_elements!(v, write_i16),
        (BaseType::Uint16, FieldValue::U16Array(v)) => write_elements!(v, write_u16),
        (BaseType::Int32, FieldValue::I32Array(v)) => write_elements!(v, write_i32),
        (BaseType::Uint32, FieldValue::U32Array(v)) => write_elements!(v, write_u32),
        (BaseType::Int64, FieldValue::I64Array(v)) => write_elements!(v, write_i64),
        (BaseType::Uint64, FieldValue::U64Array(v)) => write_elements!(v, write_u64),
        (BaseType::Float, FieldValue::F32Array(v)) => write_elements!(v, write_f32),
        (BaseType::Double, FieldValue::F64Array(v)) => write_elements!(v, write_f64),
        _ => invalid(field, "an array matching the field's base type"),
    }
}

/// Decode one field's value(s) from `buf` at `offset`, per its descriptor.
#[must_use]
pub fn decode_field(buf: &[u8], offset: usize, field: &FieldDescriptor) -> FieldValue {
    let size = field.type_size();
    let span = &buf[offset..offset + field.total_size()];

    if field.base_type == BaseType::Char {
        return FieldValue::Str(trim_char_array(span));
    }

    if field.is_scalar() {
        return decode_scalar(span, field.base_type);
    }

    decode_array(span, size, field.base_type, field.array_length)
}

fn decode_scalar(span: &[u8], base_type: BaseType) -> FieldValue {
    match base_type {
        BaseType::Int8 => read_i8(span),
        BaseType::Uint8 => read_u8(span),
        BaseType::Int16 => read_i16(span),
        BaseType::Uint16 => read_u16(span),
        BaseType::Int32 => read_i32(span),
        BaseType::Uint32 => read_u32(span),
        BaseType::Int64 => read_i64(span),
        BaseType::Uint64 => read_u64(span),
        BaseType::Float => read_f32(span),
        BaseType::Double => read_f64(span),
        BaseType::Char => unreachable!("char is handled by the caller before dispatching here"),
    }
}

fn decode_array(span: &[u8], size: usize, base_type: BaseType, array_length: usize) -> FieldValue {
    match base_type {
        BaseType::Int8 => FieldValue::I8Array(
            (0..array_length).map(|i| read_i8_raw(&span[i * size..(i + 1) * size])).collect(),
        ),
        BaseType::Uint8 => FieldValue::U8Array(
            (0..array_length).map(|i| read_u8_raw(&span[i * size..(i + 1) * size])).collect(),
        ),
        BaseType::Int16 => FieldValue::I16Array(
            (0..array_length).map(|i| read_i16_raw(&span[i * size..(i + 1) * size])).collect(),
        ),
        BaseType::Uint16 => FieldValue::U16Array(
            (0..array_length).map(|i| read_u16_raw(&span[i * size..(i + 1) * size])).collect(),
        ),
        BaseType::Int32 => FieldValue::I32Array(
            (0..array_length).map(|i| read_i32_raw(&span[i * size..(i + 1) * size])).collect(),
        ),
        BaseType::Uint32 => FieldValue::U32Array(
            (0..array_length).map(|i| read_u32_raw(&span[i * size..(i + 1) * size])).collect(),
        ),
        BaseType::Int64 => FieldValue::I64Array(
            (0..array_length).map(|i| read_i64_raw(&span[i * size..(i + 1) * size])).collect(),
        ),
        BaseType::Uint64 => FieldValue::U64Array(
            (0..array_length).map(|i| read_u64_raw(&span[i * size..(i + 1) * size])).collect(),
        ),
        BaseType::Float => FieldValue::F32Array(
            (0..array_length).map(|i| read_f32_raw(&span[i * size..(i + 1) * size])).collect(),
        ),
        BaseType::Double => FieldValue::F64Array(
            (0..array_length).map(|i| read_f64_raw(&span[i * size..(i + 1) * size])).collect(),
        ),
        BaseType::Char => unreachable!("char is handled by the caller before dispatching here"),
    }
}

fn read_i8_raw(buf: &[u8]) -> i8 {
    i8::from_le_bytes([buf[0]])
}
fn read_u8_raw(buf: &[u8]) -> u8 {
    buf[0]
}
fn read_i16_raw(buf: &[u8]) -> i16 {
    i16::from_le_bytes(buf.try_into().unwrap_or_default())
}
fn read_u16_raw(buf: &[u8]) -> u16 {
    u16::from_le_bytes(buf.try_into().unwrap_or_default())
}
fn read_i32_raw(buf: &[u8]) -> i32 {
    i32::from_le_bytes(buf.try_into().unwrap_or_default())
}
fn read_u32_raw(buf: &[u8]) -> u32 {
    u32::from_le_bytes(buf.try_into().unwrap_or_default())
}
fn read_i64_raw(buf: &[u8]) -> i64 {
    i64::from_le_bytes(buf.try_into().unwrap_or_default())
}
fn read_u64_raw(buf: &[u8]) -> u64 {
    u64::from_le_bytes(buf.try_into().unwrap_or_default())
}
fn read_f32_raw(buf: &[u8]) -> f32 {
    f32::from_le_bytes(buf.try_into().unwrap_or_default())
}
fn read_f64_raw(buf: &[u8]) -> f64 {
    f64::from_le_bytes(buf.try_into().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mavcodec_schema::FieldDescriptor;

    fn field(base_type: BaseType, array_length: usize) -> FieldDescriptor {
        FieldDescriptor { name: "x".to_string(), base_type, array_length, source_position: 0 }
    }

    #[test]
    fn scalar_round_trip() {
        let f = field(BaseType::Float, 1);
        let mut buf = [0u8; 4];
        encode_field(&mut buf, 0, &f, &FieldValue::F32(1.5)).unwrap();
        assert_eq!(decode_field(&buf, 0, &f), FieldValue::F32(1.5));
    }

    #[test]
    fn array_round_trip() {
        let f = field(BaseType::Uint16, 3);
        let mut buf = [0u8; 6];
        encode_field(&mut buf, 0, &f, &FieldValue::U16Array(vec![1, 2, 3])).unwrap();
        assert_eq!(decode_field(&buf, 0, &f), FieldValue::U16Array(vec![1, 2, 3]));
    }

    #[test]
    fn char_array_trims_trailing_zeros() {
        let f = field(BaseType::Char, 16);
        let mut buf = [0u8; 16];
        encode_field(&mut buf, 0, &f, &FieldValue::Str("MY_PI".to_string())).unwrap();
        assert_eq!(&buf[0..5], b"MY_PI");
        assert!(buf[5..].iter().all(|&b| b == 0));
        assert_eq!(decode_field(&buf, 0, &f), FieldValue::Str("MY_PI".to_string()));
    }

    #[test]
    fn all_zero_char_array_decodes_to_empty_string() {
        let f = field(BaseType::Char, 8);
        let buf = [0u8; 8];
        assert_eq!(decode_field(&buf, 0, &f), FieldValue::Str(String::new()));
    }

    #[test]
    fn overlong_string_is_truncated() {
        let f = field(BaseType::Char, 4);
        let mut buf = [0u8; 4];
        encode_field(&mut buf, 0, &f, &FieldValue::Str("abcdefgh".to_string())).unwrap();
        assert_eq!(&buf, b"abcd");
    }

    #[test]
    fn mismatched_value_type_is_rejected() {
        let f = field(BaseType::Uint32, 1);
        let mut buf = [0u8; 4];
        let err = encode_field(&mut buf, 0, &f, &FieldValue::F32(1.0)).unwrap_err();
        assert!(matches!(err, BuildError::InvalidFieldType { .. }));
    }

    #[test]
    fn sixty_four_bit_scalars_round_trip_natively() {
        let f = field(BaseType::Uint64, 1);
        let mut buf = [0u8; 8];
        encode_field(&mut buf, 0, &f, &FieldValue::U64(u64::MAX)).unwrap();
        assert_eq!(decode_field(&buf, 0, &f), FieldValue::U64(u64::MAX));
    }
}
