//! Layout & CRC-seed Compiler (component B).
//!
//! Turns a [`RawMessage`] into a fully compiled [`MessageDescriptor`]:
//! normalizes each field's type token, computes the wire-layout order, and
//! folds the canonical signature string into a CRC seed.

use crate::{
    codec::{crc16_x25, fold_crc_seed},
    document::{RawField, RawMessage},
    error::SchemaError,
    types::{BaseType, FieldDescriptor, MessageDescriptor},
};

/// Parse a schema type token into `(base_type, array_length)`.
///
/// Grammar: `<base>` (scalar, `array_length == 1`) or `<base>[<N>]` with
/// `N >= 1`.
fn parse_type_token(token: &str) -> Option<(BaseType, usize)> {
    if let Some(bracket) = token.find('[') {
        if !token.ends_with(']') {
            return None;
        }
        let base = &token[..bracket];
        let count = &token[bracket + 1..token.len() - 1];
        let array_length: usize = count.parse().ok()?;
        if array_length == 0 {
            return None;
        }
        let base_type = BaseType::parse(base)?;
        Some((base_type, array_length))
    } else {
        let base_type = BaseType::parse(token)?;
        Some((base_type, 1))
    }
}

fn compile_field(raw: &RawField, source_position: usize) -> Result<FieldDescriptor, SchemaError> {
    let (base_type, array_length) = parse_type_token(&raw.type_token)
        .ok_or_else(|| SchemaError::UnknownType(raw.type_token.clone()))?;
    Ok(FieldDescriptor { name: raw.name.clone(), base_type, array_length, source_position })
}

/// Stable sort fields into wire-layout order: descending `type_size`, with
/// `source_position` (original schema order) as tie-breaker.
fn layout_sort(fields: &mut [FieldDescriptor]) {
    fields.sort_by_key(|field| (std::cmp::Reverse(field.type_size()), field.source_position));
}

/// Build the canonical signature string used to derive `crc_seed`.
///
/// Concatenates, with single spaces as separators: the message name, then
/// for each field *in layout order* its base-type token and name, plus (for
/// array fields) one character whose code point equals `array_length`.
fn signature_string(name: &str, fields: &[FieldDescriptor]) -> String {
    let mut signature = String::from(name);
    for field in fields {
        signature.push(' ');
        signature.push_str(field.base_type.signature_token());
        signature.push(' ');
        signature.push_str(&field.name);
        if field.array_length > 1 {
            #[allow(clippy::as_conversions)]
            if let Some(ch) = char::from_u32(field.array_length as u32) {
                signature.push(ch);
            }
        }
    }
    signature
}

/// Compile one [`RawMessage`] into a [`MessageDescriptor`].
pub(crate) fn compile_message(raw: &RawMessage) -> Result<MessageDescriptor, SchemaError> {
    let mut fields = raw
        .fields
        .iter()
        .enumerate()
        .map(|(position, field)| compile_field(field, position))
        .collect::<Result<Vec<_>, _>>()?;

    layout_sort(&mut fields);

    let payload_length = fields.iter().map(FieldDescriptor::total_size).sum();
    let signature = signature_string(&raw.name, &fields);
    let crc_seed = fold_crc_seed(crc16_x25(signature.as_bytes()));

    Ok(MessageDescriptor { id: raw.id, name: raw.name.clone(), fields, payload_length, crc_seed })
}
