//! Frame Parser (component C): an incremental, byte-driven state machine.

use std::sync::Arc;

use mavcodec_schema::{codec::crc16_x25, codec::crc16_x25_accumulate, MessageCatalog, Version};

use crate::{
    dispatcher::Dispatcher,
    header::{FrameHeader, FRAME_OVERHEAD, HEADER_SIZE, MAX_FRAME_SIZE, START_V0_9, START_V1_0, TRAILER_SIZE},
    primitives::decode_field,
    values::FieldMap,
};

/// Configuration recognized at parser/builder construction (see the wire
/// protocol's `system_id`, `component_id`, and `version` options).
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Own system id. `0` means promiscuous receive; forbids sending.
    pub system_id: u8,
    /// Own component id. `0` means promiscuous receive; forbids sending.
    pub component_id: u8,
    /// Active framing/checksum version.
    pub version: Version,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { system_id: 0, component_id: 0, version: Version::V1_0 }
    }
}

impl CodecConfig {
    /// Whether this configuration accepts frames from any origin.
    #[must_use]
    pub fn is_promiscuous(&self) -> bool {
        self.system_id == 0 && self.component_id == 0
    }

    fn start_sentinel(&self) -> u8 {
        match self.version {
            Version::V1_0 => START_V1_0,
            Version::V0_9 => START_V0_9,
        }
    }
}

/// Diagnostic and data events produced by [`FrameParser::feed`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParserEvent {
    /// A frame was fully decoded and accepted.
    Message {
        /// Message name (also the per-name dispatcher channel).
        name: String,
        /// Raw frame header.
        header: FrameHeader,
        /// Decoded field values.
        fields: FieldMap,
    },
    /// An accepted frame's sequence byte skipped ahead of the expected
    /// value.
    SequenceError {
        /// Number of frames presumed lost: `(seq - last_seq - 1) mod 256`.
        gap: u8,
    },
    /// A frame's checksum didn't match its trailer.
    ChecksumFail {
        /// The frame's message id (may not exist in the catalog).
        id: u8,
        /// CRC seed used (0 if `id` is unknown to the catalog).
        seed: u8,
        /// CRC computed by the parser.
        computed: u16,
        /// CRC read from the frame's trailer.
        received: u16,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Len,
    Body,
}

/// Incremental byte-driven frame parser.
///
/// Not safe for concurrent mutation from multiple threads (see the crate's
/// concurrency model); a single parser is meant to be driven from whatever
/// thread owns the transport.
pub struct FrameParser {
    catalog: Arc<MessageCatalog>,
    config: CodecConfig,
    state: State,
    buffer: Vec<u8>,
    payload_length: usize,
    last_sequence: Option<u8>,
    dispatcher: Dispatcher,
}

impl FrameParser {
    /// Create a parser bound to a compiled catalog and configuration.
    #[must_use]
    pub fn new(catalog: Arc<MessageCatalog>, config: CodecConfig) -> Self {
        Self {
            catalog,
            config,
            state: State::Idle,
            buffer: Vec::with_capacity(MAX_FRAME_SIZE),
            payload_length: 0,
            last_sequence: None,
            dispatcher: Dispatcher::new(),
        }
    }

    /// Access the dispatcher to register message subscribers.
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /// Feed an arbitrarily-sized chunk of bytes, in arrival order.
    ///
    /// Returns every event produced while processing this chunk, in
    /// byte-arrival order; decoded-message dispatch to subscribers
    /// registered via [`Self::dispatcher_mut`] happens synchronously, before
    /// `feed` returns.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<ParserEvent> {
        let mut events = Vec::new();
        for &byte in bytes {
            self.feed_one(byte, &mut events);
        }
        events
    }

    fn feed_one(&mut self, byte: u8, events: &mut Vec<ParserEvent>) {
        match self.state {
            State::Idle => {
                if byte == self.config.start_sentinel() {
                    self.buffer.clear();
                    self.buffer.push(byte);
                    self.state = State::Len;
                }
                // else: discard and keep scanning for the sentinel.
            },
            State::Len => {
                self.buffer.push(byte);
                self.payload_length = usize::from(byte);
                self.state = State::Body;
            },
            State::Body => {
                self.buffer.push(byte);
                if self.buffer.len() == self.payload_length + FRAME_OVERHEAD {
                    self.check(events);
                    self.reset();
                }
            },
        }
    }

    fn reset(&mut self) {
        self.state = State::Idle;
        self.buffer.clear();
        self.payload_length = 0;
    }

    fn check(&mut self, events: &mut Vec<ParserEvent>) {
        let header = FrameHeader::from_bytes(&self.buffer[..HEADER_SIZE]);
        let payload_end = HEADER_SIZE + self.payload_length;
        let payload = &self.buffer[HEADER_SIZE..payload_end];
        let trailer = &self.buffer[payload_end..payload_end + TRAILER_SIZE];
        let received_crc = u16::from_le_bytes([trailer[0], trailer[1]]);

        let descriptor = self.catalog.get_by_id(header.message_id);
        let seed = descriptor.map_or(0, |d| d.crc_seed);

        let mut computed = crc16_x25(&self.buffer[1..payload_end]);
        if self.config.version == Version::V1_0 {
            computed = crc16_x25_accumulate(computed, seed);
        }

        if computed != received_crc {
            tracing::warn!(id = header.message_id, %received_crc, %computed, "frame checksum mismatch");
            events.push(ParserEvent::ChecksumFail {
                id: header.message_id,
                seed,
                computed,
                received: received_crc,
            });
            return;
        }

        if let Some(gap) = self.sequence_gap(header.sequence) {
            tracing::warn!(gap, "frame sequence gap detected");
            events.push(ParserEvent::SequenceError { gap });
        }
        self.last_sequence = Some(header.sequence);

        let Some(descriptor) = descriptor else { return };
        let accepted = self.config.is_promiscuous()
            || (header.system_id == self.config.system_id && header.component_id == self.config.component_id);
        if !accepted {
            return;
        }

        let mut fields = FieldMap::with_capacity(descriptor.fields.len());
        let mut offset = 0;
        for field in &descriptor.fields {
            fields.insert(field.name.clone(), decode_field(payload, offset, field));
            offset += field.total_size();
        }

        tracing::debug!(name = %descriptor.name, id = header.message_id, "frame accepted");
        self.dispatcher.dispatch(&descriptor.name, &header, &fields);
        events.push(ParserEvent::Message { name: descriptor.name.clone(), header, fields });
    }

    /// Returns `Some(gap)` if `sequence` isn't the expected next value.
    ///
    /// Uses `Option<u8>` rather than a `0`-initialized counter so that "no
    /// frame received yet" and "the last frame's sequence byte was 0" are
    /// distinguishable - this is what lets wraparound (`255 -> 0`) and
    /// startup both behave correctly without a special case for either.
    fn sequence_gap(&self, sequence: u8) -> Option<u8> {
        let last = self.last_sequence?;
        let diff = sequence.wrapping_sub(last);
        if diff == 1 {
            None
        } else {
            Some(diff.wrapping_sub(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mavcodec_schema::{BaseType, FieldDescriptor, MessageDescriptor};

    /// A single-field `uint8` HEARTBEAT-like descriptor, built by hand
    /// rather than through the schema compiler - these tests exercise the
    /// parser state machine, not the compiler.
    fn heartbeat_descriptor() -> MessageDescriptor {
        let field =
            FieldDescriptor { name: "kind".to_string(), base_type: BaseType::Uint8, array_length: 1, source_position: 0 };
        MessageDescriptor {
            id: 0,
            name: "HEARTBEAT".to_string(),
            payload_length: field.total_size(),
            fields: vec![field],
            crc_seed: 0x4E,
        }
    }

    fn catalog() -> Arc<MessageCatalog> {
        Arc::new(MessageCatalog::from_descriptors(vec![heartbeat_descriptor()], vec![]))
    }

    fn valid_heartbeat_frame(sequence: u8) -> Vec<u8> {
        let payload = [0x07u8];
        let mut header_and_payload = vec![0x01, sequence, 0x01, 0x01, 0x00];
        header_and_payload.extend_from_slice(&payload);
        let mut checksummable = vec![header_and_payload[0]];
        checksummable.extend_from_slice(&header_and_payload[1..]);
        let mut crc = crc16_x25(&checksummable);
        crc = crc16_x25_accumulate(crc, 0x4E);
        let mut frame = vec![START_V1_0];
        frame.extend_from_slice(&header_and_payload);
        frame.extend_from_slice(&crc.to_le_bytes());
        frame
    }

    #[test]
    fn garbage_bytes_before_sentinel_are_discarded_while_scanning() {
        let mut parser = FrameParser::new(catalog(), CodecConfig { system_id: 1, component_id: 1, ..CodecConfig::default() });
        let events = parser.feed(&[0x00, 0x01, 0x02, 0x03]);
        assert!(events.is_empty());
    }

    #[test]
    fn valid_frame_is_decoded_and_dispatched() {
        let mut parser = FrameParser::new(catalog(), CodecConfig { system_id: 1, component_id: 1, ..CodecConfig::default() });
        let frame = valid_heartbeat_frame(0);
        let events = parser.feed(&frame);
        assert_eq!(events.len(), 1);
        match &events[0] {
            ParserEvent::Message { name, fields, .. } => {
                assert_eq!(name, "HEARTBEAT");
                assert_eq!(fields.get("kind"), Some(&crate::values::FieldValue::U8(0x07)));
            },
            other => panic!("expected Message event, got {other:?}"),
        }
    }

    #[test]
    fn flipped_trailer_byte_produces_checksum_fail() {
        let mut parser = FrameParser::new(catalog(), CodecConfig { system_id: 1, component_id: 1, ..CodecConfig::default() });
        let mut frame = valid_heartbeat_frame(0);
        let last = frame.len() - 1;
        frame[last] ^= 0x01;
        let events = parser.feed(&frame);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ParserEvent::ChecksumFail { id: 0, .. }));
    }

    #[test]
    fn resynchronizes_after_a_corrupt_frame() {
        let mut parser = FrameParser::new(catalog(), CodecConfig { system_id: 1, component_id: 1, ..CodecConfig::default() });
        let mut corrupt = valid_heartbeat_frame(0);
        let last = corrupt.len() - 1;
        corrupt[last] ^= 0x01;
        let good = valid_heartbeat_frame(1);

        let mut combined = corrupt;
        combined.extend_from_slice(&good);
        let events = parser.feed(&combined);

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ParserEvent::ChecksumFail { .. }));
        assert!(matches!(events[1], ParserEvent::Message { .. }));
    }

    #[test]
    fn sequence_gap_is_reported() {
        let mut parser = FrameParser::new(catalog(), CodecConfig { system_id: 1, component_id: 1, ..CodecConfig::default() });
        parser.feed(&valid_heartbeat_frame(5));
        let events = parser.feed(&valid_heartbeat_frame(9));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ParserEvent::SequenceError { gap: 3 });
    }

    #[test]
    fn wraparound_from_255_to_0_is_not_a_gap() {
        let mut parser = FrameParser::new(catalog(), CodecConfig { system_id: 1, component_id: 1, ..CodecConfig::default() });
        parser.feed(&valid_heartbeat_frame(255));
        let events = parser.feed(&valid_heartbeat_frame(0));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ParserEvent::Message { .. }));
    }

    #[test]
    fn first_frame_ever_never_reports_a_gap() {
        let mut parser = FrameParser::new(catalog(), CodecConfig { system_id: 1, component_id: 1, ..CodecConfig::default() });
        let events = parser.feed(&valid_heartbeat_frame(42));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ParserEvent::Message { .. }));
    }

    #[test]
    fn promiscuous_config_accepts_any_origin() {
        let mut parser = FrameParser::new(catalog(), CodecConfig::default());
        let events = parser.feed(&valid_heartbeat_frame(0));
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ParserEvent::Message { .. }));
    }

    #[test]
    fn non_matching_origin_is_silently_dropped_when_not_promiscuous() {
        let mut parser = FrameParser::new(catalog(), CodecConfig { system_id: 9, component_id: 9, version: Version::V1_0 });
        let events = parser.feed(&valid_heartbeat_frame(0));
        assert!(events.is_empty());
    }

    #[test]
    fn generic_and_named_subscribers_see_dispatched_message() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut parser = FrameParser::new(catalog(), CodecConfig { system_id: 1, component_id: 1, ..CodecConfig::default() });
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        parser.dispatcher_mut().on_named("HEARTBEAT", move |_, _| *h.borrow_mut() += 1);

        parser.feed(&valid_heartbeat_frame(0));
        assert_eq!(*hits.borrow(), 1);
    }
}
