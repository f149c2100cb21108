//! Errors raised while compiling definition documents into a catalog.

use thiserror::Error;

/// Errors that can occur while loading and compiling schema definitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two messages in the combined definition set declared the same id.
    #[error("duplicate message id {id}: already used by {existing:?}, also claimed by {incoming:?}")]
    DuplicateId {
        /// The conflicting id.
        id: u8,
        /// Name of the message that first claimed this id.
        existing: String,
        /// Name of the message that also claims this id.
        incoming: String,
    },

    /// Two messages in the combined definition set declared the same name.
    #[error("duplicate message name {name:?}")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },

    /// A field declared a type token the compiler doesn't recognize.
    #[error("unknown field type token: {0:?}")]
    UnknownType(String),

    /// Document retrieval (the out-of-scope XML-parser/file-I/O layer)
    /// failed for the named identifier.
    #[error("failed to resolve schema document {identifier:?}: {reason}")]
    Io {
        /// The document identifier that failed to resolve.
        identifier: String,
        /// Display of the underlying [`crate::document::DefinitionProvider::Error`].
        reason: String,
    },
}
