//! Message catalog data model.
//!
//! A [`MessageCatalog`] is the compiled output of the schema pipeline: every
//! [`MessageDescriptor`] it holds has already been through the Layout &
//! CRC-seed Compiler (see [`crate::compiler`]), so `fields` is in wire order
//! and `crc_seed`/`payload_length` are final.

use std::collections::HashMap;

/// Wire-level primitive types a field can hold.
///
/// Variants carry their fixed per-element wire size, used by
/// [`BaseType::type_size`]. `Char` elements are always bytes on the wire;
/// arrays of `Char` are trimmed to a `String` during decode (see
/// `mavcodec-wire`'s payload decoder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    /// Signed 8-bit integer.
    Int8,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    Uint64,
    /// ASCII byte, decoded as part of a trimmed string when in an array.
    Char,
    /// IEEE 754 binary32.
    Float,
    /// IEEE 754 binary64.
    Double,
}

impl BaseType {
    /// Parse a dialect type token, applying the source aliases.
    ///
    /// `uint8_t_mavlink_version` aliases to `uint8`; `array` aliases to
    /// `int8`. Any other unrecognized token is `None`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "int8" => Some(Self::Int8),
            "uint8" | "uint8_t_mavlink_version" => Some(Self::Uint8),
            "array" => Some(Self::Int8),
            "int16" => Some(Self::Int16),
            "uint16" => Some(Self::Uint16),
            "int32" => Some(Self::Int32),
            "uint32" => Some(Self::Uint32),
            "int64" => Some(Self::Int64),
            "uint64" => Some(Self::Uint64),
            "char" => Some(Self::Char),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            _ => None,
        }
    }

    /// Wire size in bytes of a single element of this type.
    #[must_use]
    pub fn type_size(self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 | Self::Char => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float => 4,
            Self::Int64 | Self::Uint64 | Self::Double => 8,
        }
    }

    /// Canonical token used in the CRC-seed signature string (no brackets).
    #[must_use]
    pub fn signature_token(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Char => "char",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

/// One field of one message, already normalized by the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field identifier, unique within its message.
    pub name: String,
    /// Normalized wire type of one element.
    pub base_type: BaseType,
    /// Number of elements; `1` for scalar fields.
    pub array_length: usize,
    /// Index of this field in the original schema document, used as the
    /// tie-breaker when fields share `type_size` during layout sort.
    pub source_position: usize,
}

impl FieldDescriptor {
    /// Wire size of one element (`base_type.type_size()`).
    #[must_use]
    pub fn type_size(&self) -> usize {
        self.base_type.type_size()
    }

    /// Total wire size of this field: `type_size * array_length`.
    #[must_use]
    pub fn total_size(&self) -> usize {
        self.type_size() * self.array_length
    }

    /// Whether this field is a scalar (`array_length == 1`).
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.array_length == 1
    }
}

/// One message, with fields already reordered into wire-layout order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDescriptor {
    /// Message identifier, unique across the catalog, in `[0, 255]`.
    pub id: u8,
    /// Message identifier string, unique across the catalog.
    pub name: String,
    /// Fields in wire-layout order (descending `type_size`, schema order as
    /// tie-breaker) - not the order they appeared in the schema document.
    pub fields: Vec<FieldDescriptor>,
    /// Sum of `field.total_size()` over all fields.
    pub payload_length: usize,
    /// Per-message CRC seed folded from the canonical signature string.
    pub crc_seed: u8,
}

/// An enum definition retained from the schema document for introspection.
///
/// The core codec never reads these; they exist so collaborators (e.g. a
/// UI that wants to render a field's symbolic value) can look them up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    /// Enum name as it appeared in the schema document.
    pub name: String,
    /// `(entry name, numeric value)` pairs, in document order.
    pub entries: Vec<(String, i64)>,
}

/// Compiled catalog of every message descriptor loaded from the schema.
///
/// `by_id` and `by_name` are built so that look-ups by either key return
/// the identical descriptor (see [`MessageCatalog::get_by_id`] /
/// [`MessageCatalog::get_by_name`]); this is checked in the loader, not
/// re-checked on every lookup.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    by_id: HashMap<u8, MessageDescriptor>,
    by_name: HashMap<String, u8>,
    /// Enums retained for introspection (see [`EnumDescriptor`]).
    pub enums: Vec<EnumDescriptor>,
}

impl MessageCatalog {
    /// Build a catalog directly from already-compiled descriptors.
    ///
    /// Bypasses the loader and its duplicate-id/name validation; intended
    /// for hand-built fixtures (tests, the harness crate) where the caller
    /// already guarantees uniqueness. [`crate::loader::load`] is the
    /// validated path for real schema documents.
    #[must_use]
    pub fn from_descriptors(
        descriptors: Vec<MessageDescriptor>,
        enums: Vec<EnumDescriptor>,
    ) -> Self {
        let mut by_id = HashMap::with_capacity(descriptors.len());
        let mut by_name = HashMap::with_capacity(descriptors.len());
        for descriptor in descriptors {
            by_name.insert(descriptor.name.clone(), descriptor.id);
            by_id.insert(descriptor.id, descriptor);
        }
        Self { by_id, by_name, enums }
    }

    /// Look up a message descriptor by numeric id.
    #[must_use]
    pub fn get_by_id(&self, id: u8) -> Option<&MessageDescriptor> {
        self.by_id.get(&id)
    }

    /// Look up a message descriptor by name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&MessageDescriptor> {
        let id = *self.by_name.get(name)?;
        self.by_id.get(&id)
    }

    /// Number of messages in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the catalog has no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Iterate over every message descriptor (unspecified order).
    pub fn messages(&self) -> impl Iterator<Item = &MessageDescriptor> {
        self.by_id.values()
    }
}
