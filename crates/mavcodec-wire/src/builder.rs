//! Frame Builder (component D): assembles an outgoing frame from a message
//! name or id plus a field map.

use std::sync::Arc;

use mavcodec_schema::{codec::crc16_x25, codec::crc16_x25_accumulate, MessageCatalog, MessageDescriptor, Version};

use crate::{
    error::BuildError,
    header::{FrameHeader, HEADER_SIZE, START_V0_9, START_V1_0, TRAILER_SIZE},
    primitives::encode_field,
    values::FieldMap,
};

use crate::parser::CodecConfig;

/// A message, addressed either by its declared id or its schema name.
#[derive(Debug, Clone)]
pub enum MessageRef<'a> {
    /// Numeric message id.
    Id(u8),
    /// Schema-declared message name.
    Name(&'a str),
}

impl<'a> From<u8> for MessageRef<'a> {
    fn from(id: u8) -> Self {
        Self::Id(id)
    }
}

impl<'a> From<&'a str> for MessageRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

/// Builds outgoing frames against a fixed catalog and configuration.
///
/// Owns the per-connection sequence counter, incremented once per
/// successful [`FrameEmitter::build`] call and wrapping at 256.
pub struct FrameEmitter {
    catalog: Arc<MessageCatalog>,
    config: CodecConfig,
    next_sequence: u8,
}

impl FrameEmitter {
    /// Create an emitter bound to a compiled catalog and configuration.
    #[must_use]
    pub fn new(catalog: Arc<MessageCatalog>, config: CodecConfig) -> Self {
        Self { catalog, config, next_sequence: 0 }
    }

    /// Override the sequence byte the next [`Self::build`] call will use.
    ///
    /// Intended for resuming a sequence counter across a reconnect once the
    /// peer's last-seen sequence is known.
    pub fn set_next_sequence(&mut self, sequence: u8) {
        self.next_sequence = sequence;
    }

    /// Build one frame's wire bytes for `message` from `fields`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotConfigured`] if both `system_id` and
    /// `component_id` are `0`; [`BuildError::UnknownMessage`] if `message`
    /// isn't in the catalog; [`BuildError::MissingField`] if `fields` lacks
    /// one of the descriptor's fields; [`BuildError::InvalidFieldType`] if a
    /// supplied value doesn't match its field's declared type.
    pub fn build(&mut self, message: MessageRef<'_>, fields: &FieldMap) -> Result<Vec<u8>, BuildError> {
        if self.config.is_promiscuous() {
            return Err(BuildError::NotConfigured);
        }

        let descriptor = self.resolve(message)?;
        let mut payload = vec![0u8; descriptor.payload_length];
        let mut offset = 0;
        for field in &descriptor.fields {
            let value = fields.get(&field.name).ok_or_else(|| BuildError::MissingField(field.name.clone()))?;
            encode_field(&mut payload, offset, field, value)?;
            offset += field.total_size();
        }

        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);

        let header = FrameHeader {
            start: self.start_sentinel(),
            payload_length: descriptor.payload_length as u8,
            sequence,
            system_id: self.config.system_id,
            component_id: self.config.component_id,
            message_id: descriptor.id,
        };

        let mut frame = Vec::with_capacity(HEADER_SIZE + descriptor.payload_length + TRAILER_SIZE);
        frame.extend_from_slice(&header.to_bytes());
        frame.extend_from_slice(&payload);

        let mut crc = crc16_x25(&frame[1..]);
        if self.config.version == Version::V1_0 {
            crc = crc16_x25_accumulate(crc, descriptor.crc_seed);
        }
        frame.extend_from_slice(&crc.to_le_bytes());

        tracing::debug!(name = %descriptor.name, id = descriptor.id, sequence, "frame built");
        Ok(frame)
    }

    fn resolve(&self, message: MessageRef<'_>) -> Result<&MessageDescriptor, BuildError> {
        match message {
            MessageRef::Id(id) => {
                self.catalog.get_by_id(id).ok_or_else(|| BuildError::UnknownMessage(id.to_string()))
            },
            MessageRef::Name(name) => {
                self.catalog.get_by_name(name).ok_or_else(|| BuildError::UnknownMessage(name.to_string()))
            },
        }
    }

    fn start_sentinel(&self) -> u8 {
        match self.config.version {
            Version::V1_0 => START_V1_0,
            Version::V0_9 => START_V0_9,
        }
    }
}
