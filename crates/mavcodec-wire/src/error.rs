//! Errors raised while building an outgoing frame.

use thiserror::Error;

/// Errors that can occur while building a frame from a field map.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Neither `by_id` nor `by_name` in the catalog recognized the target.
    #[error("unknown message: {0}")]
    UnknownMessage(String),

    /// The field map was missing a field the descriptor requires.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// `system_id` and `component_id` are both zero (promiscuous-receive
    /// configuration); sending is forbidden in this state.
    #[error("cannot build a frame while system_id and component_id are both 0")]
    NotConfigured,

    /// A field's supplied value didn't match the descriptor's declared
    /// type/arity (e.g. a scalar value for an array field).
    #[error("field {field} has the wrong type for its descriptor (expected {expected})")]
    InvalidFieldType {
        /// Name of the mismatched field.
        field: String,
        /// Description of what was expected.
        expected: &'static str,
    },
}
