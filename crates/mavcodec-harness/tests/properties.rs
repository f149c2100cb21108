//! Property-based tests over the full build -> parse pipeline.

use std::sync::Arc;

use mavcodec_harness::compiled_catalog;
use mavcodec_schema::MessageCatalog;
use mavcodec_wire::{CodecConfig, FieldMap, FieldValue, FrameEmitter, FrameParser, MessageRef, ParserEvent};
use proptest::prelude::*;

fn heartbeat_fields(
    kind: u8,
    autopilot: u8,
    base_mode: u8,
    custom_mode: u32,
    system_status: u8,
    mavlink_version: u8,
) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert("type".to_string(), FieldValue::U8(kind));
    fields.insert("autopilot".to_string(), FieldValue::U8(autopilot));
    fields.insert("base_mode".to_string(), FieldValue::U8(base_mode));
    fields.insert("custom_mode".to_string(), FieldValue::U32(custom_mode));
    fields.insert("system_status".to_string(), FieldValue::U8(system_status));
    fields.insert("mavlink_version".to_string(), FieldValue::U8(mavlink_version));
    fields
}

fn pair(catalog: Arc<MessageCatalog>) -> (FrameEmitter, FrameParser) {
    let config = CodecConfig { system_id: 1, component_id: 1, ..CodecConfig::default() };
    (FrameEmitter::new(catalog.clone(), config.clone()), FrameParser::new(catalog, config))
}

proptest! {
    /// Every descriptor's declared payload length is the sum of its
    /// fields' total sizes, and layout order is non-increasing by
    /// element width.
    #[test]
    fn payload_length_matches_field_sizes(_seed in 0u32..1) {
        let catalog = compiled_catalog();
        for descriptor in catalog.messages() {
            let summed: usize = descriptor.fields.iter().map(|f| f.total_size()).sum();
            prop_assert_eq!(descriptor.payload_length, summed);

            let widths: Vec<usize> = descriptor.fields.iter().map(|f| f.type_size()).collect();
            let mut sorted = widths.clone();
            sorted.sort_by(|a, b| b.cmp(a));
            prop_assert_eq!(widths, sorted);
        }
    }

    /// Loading the fixture schema twice yields identical CRC seeds for
    /// every message.
    #[test]
    fn crc_seed_is_deterministic_across_loads(_seed in 0u32..1) {
        let first = compiled_catalog();
        let second = compiled_catalog();
        for descriptor in first.messages() {
            let other = second.get_by_id(descriptor.id).unwrap();
            prop_assert_eq!(descriptor.crc_seed, other.crc_seed);
        }
    }

    /// Building then parsing a HEARTBEAT yields back the same field map.
    #[test]
    fn heartbeat_round_trips(
        kind in any::<u8>(), autopilot in any::<u8>(), base_mode in any::<u8>(),
        custom_mode in any::<u32>(), system_status in any::<u8>(), mavlink_version in any::<u8>(),
    ) {
        let catalog = compiled_catalog();
        let (mut emitter, mut parser) = pair(catalog);
        let fields = heartbeat_fields(kind, autopilot, base_mode, custom_mode, system_status, mavlink_version);

        let frame = emitter.build(MessageRef::Id(0), &fields).unwrap();
        let events = parser.feed(&frame);

        prop_assert_eq!(events.len(), 1);
        let ParserEvent::Message { fields: decoded, .. } = &events[0] else {
            panic!("expected a Message event");
        };
        prop_assert_eq!(decoded, &fields);
    }

    /// `build` is deterministic apart from the sequence byte.
    #[test]
    fn build_is_idempotent_modulo_sequence(
        kind in any::<u8>(), custom_mode in any::<u32>(), fixed_sequence in any::<u8>(),
    ) {
        let catalog = compiled_catalog();
        let (mut emitter, _) = pair(catalog);
        let fields = heartbeat_fields(kind, 1, 0, custom_mode, 4, 3);

        emitter.set_next_sequence(fixed_sequence);
        let first = emitter.build(MessageRef::Id(0), &fields).unwrap();
        emitter.set_next_sequence(fixed_sequence);
        let second = emitter.build(MessageRef::Id(0), &fields).unwrap();

        prop_assert_eq!(first, second);
    }

    /// Flipping any single bit in the checksummed region (sequence through
    /// payload, excluding the start sentinel, length byte, and CRC trailer)
    /// always trips `checksum_fail`.
    ///
    /// The sentinel and length bytes are excluded: corrupting either of
    /// those is a framing-loss case (the parser never reaches `Body`, so
    /// `feed` returns zero events), not a checksum case.
    #[test]
    fn any_bit_flip_outside_the_trailer_fails_checksum(
        kind in any::<u8>(), custom_mode in any::<u32>(), bit in (2 * 8)..(15 * 8),
    ) {
        let catalog = compiled_catalog();
        let (mut emitter, mut parser) = pair(catalog);
        let fields = heartbeat_fields(kind, 1, 0, custom_mode, 4, 3);

        let mut frame = emitter.build(MessageRef::Id(0), &fields).unwrap();
        // HEARTBEAT's payload is 9 bytes (1+1+1+4+1+1); header is 6, so the
        // trailer starts at byte 15 - `bit` is restricted to stay in the
        // checksummed region (bytes 2..15: seq, sysid, compid, id, payload).
        let byte_index = bit / 8;
        let bit_index = bit % 8;
        frame[byte_index] ^= 1 << bit_index;

        let events = parser.feed(&frame);
        prop_assert_eq!(events.len(), 1);
        prop_assert!(matches!(events[0], ParserEvent::ChecksumFail { .. }));
    }

    /// `build` called N times yields sequence bytes `s, s+1, ..., s+N-1 mod 256`.
    #[test]
    fn sequence_advances_by_one_per_build(start in any::<u8>(), count in 1usize..40) {
        let catalog = compiled_catalog();
        let (mut emitter, _) = pair(catalog);
        let fields = heartbeat_fields(1, 1, 0, 0, 4, 3);

        emitter.set_next_sequence(start);
        for i in 0..count {
            let frame = emitter.build(MessageRef::Id(0), &fields).unwrap();
            prop_assert_eq!(frame[2], start.wrapping_add(i as u8));
        }
    }

    /// Garbage bytes containing no start sentinel, prefixed before a valid
    /// frame, never prevent that frame from being delivered.
    #[test]
    fn garbage_prefix_without_the_sentinel_never_blocks_delivery(
        garbage in prop::collection::vec(1u8..=253u8, 0..40),
        kind in any::<u8>(),
    ) {
        let catalog = compiled_catalog();
        let (mut emitter, mut parser) = pair(catalog);
        let fields = heartbeat_fields(kind, 1, 0, 0, 4, 3);
        let frame = emitter.build(MessageRef::Id(0), &fields).unwrap();

        let mut stream = garbage;
        stream.extend_from_slice(&frame);

        let events = parser.feed(&stream);
        prop_assert_eq!(events.len(), 1);
        prop_assert!(matches!(events[0], ParserEvent::Message { .. }));
    }
}
