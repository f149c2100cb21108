//! Parsed schema document shapes and the document-retrieval seam.
//!
//! The XML-dialect syntactic parser that turns schema files into these
//! structures is an external collaborator (see the crate's top-level
//! docs); this module only describes the tree shape it must produce and
//! the trait the loader uses to ask for one.

use async_trait::async_trait;

/// One field as it appears in a schema document, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    /// Raw `type` attribute, e.g. `"float"` or `"uint8[16]"`.
    pub type_token: String,
    /// Field name.
    pub name: String,
}

/// One message as it appears in a schema document, before compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// `id` attribute, decimal `0..=255`.
    pub id: u8,
    /// `name` attribute.
    pub name: String,
    /// Fields in schema (author-visible) order.
    pub fields: Vec<RawField>,
}

/// One enum entry: `(name, value)`.
pub type RawEnumEntry = (String, i64);

/// One enum as it appears in a schema document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEnum {
    /// Enum name.
    pub name: String,
    /// Entries in document order.
    pub entries: Vec<RawEnumEntry>,
}

/// A single parsed definition document: the `mavlink` root's
/// `enums[0].enum[]` and `messages[0].message[]` children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definitions {
    /// Enums declared in this document.
    pub enums: Vec<RawEnum>,
    /// Messages declared in this document.
    pub messages: Vec<RawMessage>,
}

/// Protocol framing version the catalog is compiled for.
///
/// Affects only the Frame Parser/Builder's start sentinel and checksum
/// policy (`mavcodec-wire`); it has no bearing on schema compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Version {
    /// v1.0 wire format: start byte `0xFE`, CRC seed mixed into checksum.
    #[default]
    V1_0,
    /// v0.9-compatible framing: start byte `0x55`, checksum advisory only.
    V0_9,
}

impl std::str::FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1.0" => Ok(Self::V1_0),
            "v0.9" => Ok(Self::V0_9),
            other => Err(format!("unrecognized protocol version: {other:?}")),
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::V1_0 => "v1.0",
            Self::V0_9 => "v0.9",
        })
    }
}

/// Resolves a document identifier (e.g. `"common"`, `"ardupilotmega"`) to
/// its parsed [`Definitions`] tree.
///
/// This is the seam between the schema compiler and the out-of-scope XML
/// parser / file-I/O layer: production callers implement this against
/// their definition files on disk, while tests implement it against
/// in-memory fixtures (see `mavcodec-harness`).
#[async_trait]
pub trait DefinitionProvider: Send + Sync {
    /// Error type surfaced when an identifier cannot be resolved.
    type Error: std::fmt::Display + Send + Sync + 'static;

    /// Resolve `identifier` to its parsed document tree.
    async fn resolve(&self, identifier: &str) -> Result<Definitions, Self::Error>;
}
