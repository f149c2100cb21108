//! Decoded field values and the map they're collected into.

use std::collections::HashMap;

/// A single decoded (or to-be-encoded) field value.
///
/// Scalar fields decode to their bare variant (e.g. `Float(1.0)`); array
/// fields of any non-`char` type decode to the matching `*Array` variant;
/// array-of-`char` fields decode to [`FieldValue::Str`] (trimmed at the
/// first trailing `0x00`).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Scalar `int8`.
    I8(i8),
    /// Scalar `uint8`.
    U8(u8),
    /// Scalar `int16`.
    I16(i16),
    /// Scalar `uint16`.
    U16(u16),
    /// Scalar `int32`.
    I32(i32),
    /// Scalar `uint32`.
    U32(u32),
    /// Scalar `int64`.
    I64(i64),
    /// Scalar `uint64`.
    U64(u64),
    /// Scalar `float`.
    F32(f32),
    /// Scalar `double`.
    F64(f64),
    /// `char[N]` array, trimmed at the first trailing zero byte.
    Str(String),
    /// `int8[N]` array (`N > 1`).
    I8Array(Vec<i8>),
    /// `uint8[N]` array (`N > 1`).
    U8Array(Vec<u8>),
    /// `int16[N]` array (`N > 1`).
    I16Array(Vec<i16>),
    /// `uint16[N]` array (`N > 1`).
    U16Array(Vec<u16>),
    /// `int32[N]` array (`N > 1`).
    I32Array(Vec<i32>),
    /// `uint32[N]` array (`N > 1`).
    U32Array(Vec<u32>),
    /// `int64[N]` array (`N > 1`).
    I64Array(Vec<i64>),
    /// `uint64[N]` array (`N > 1`).
    U64Array(Vec<u64>),
    /// `float[N]` array (`N > 1`).
    F32Array(Vec<f32>),
    /// `double[N]` array (`N > 1`).
    F64Array(Vec<f64>),
}

/// A message's fields by name, as handed to the builder or returned by the
/// parser.
pub type FieldMap = HashMap<String, FieldValue>;
