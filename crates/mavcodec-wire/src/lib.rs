//! Frame parser and frame builder for the mavcodec wire protocol.
//!
//! This crate owns components C, D, and E of the codec: the incremental
//! [`parser::FrameParser`], the [`builder::FrameEmitter`] that assembles
//! outgoing frames, and the little-endian/char-array primitives both of
//! them sit on. It depends on `mavcodec-schema` for the compiled
//! [`mavcodec_schema::MessageCatalog`] that gives both components their
//! message layouts.

pub mod builder;
pub mod dispatcher;
pub mod error;
pub mod header;
pub mod parser;
pub mod primitives;
pub mod values;

pub use builder::{FrameEmitter, MessageRef};
pub use dispatcher::Dispatcher;
pub use error::BuildError;
pub use header::FrameHeader;
pub use parser::{CodecConfig, FrameParser, ParserEvent};
pub use values::{FieldMap, FieldValue};
