//! Message catalog compiler for the mavcodec wire protocol.
//!
//! This crate owns components A and B of the codec: the Schema Loader,
//! which turns already-parsed definition documents into a
//! [`MessageCatalog`], and the Layout & CRC-seed Compiler, which computes
//! each message's wire-layout field order and per-message CRC seed.
//!
//! Parsing the XML-dialect schema files themselves, and any file I/O
//! needed to locate them, are out of scope here - see
//! [`document::DefinitionProvider`].

pub mod codec;
pub mod compiler;
pub mod document;
pub mod error;
pub mod loader;
pub mod types;

pub use document::{DefinitionProvider, Definitions, RawEnum, RawField, RawMessage, Version};
pub use error::SchemaError;
pub use loader::{load, CatalogReady, DEFAULT_DEFINITIONS};
pub use types::{BaseType, EnumDescriptor, FieldDescriptor, MessageCatalog, MessageDescriptor};
