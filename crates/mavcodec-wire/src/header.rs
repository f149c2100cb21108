//! Frame header: the 6 fixed bytes preceding a frame's payload.
//!
//! Unlike a fixed-size protocol header, this one is tiny and entirely
//! numeric - there's no benefit to a `zerocopy`-style packed-struct cast
//! here, so accessors just index into the raw byte slice.

/// Start sentinel for V1.0 framing.
pub const START_V1_0: u8 = 0xFE;

/// Start sentinel for V0.9 framing.
pub const START_V0_9: u8 = 0x55;

/// Number of bytes in the fixed header (before the variable payload).
pub const HEADER_SIZE: usize = 6;

/// Number of bytes in the CRC trailer.
pub const TRAILER_SIZE: usize = 2;

/// Total non-payload overhead: header + trailer.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + TRAILER_SIZE;

/// Largest possible frame: a 255-byte payload plus 8 overhead bytes.
pub const MAX_FRAME_SIZE: usize = 255 + FRAME_OVERHEAD;

/// The 6 fixed bytes preceding a frame's payload.
///
/// # Invariants
///
/// - `start` is always the sentinel for the parser's active version
///   ([`START_V1_0`] or [`START_V0_9`]) - [`FrameHeader::from_bytes`] does
///   not itself validate this; the caller (the Frame Parser) only invokes
///   it once the sentinel byte has already been matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Start sentinel byte.
    pub start: u8,
    /// Declared payload length `L`, in `0..=255`.
    pub payload_length: u8,
    /// Frame sequence number.
    pub sequence: u8,
    /// Origin system id.
    pub system_id: u8,
    /// Origin component id.
    pub component_id: u8,
    /// Message id, looked up in the catalog to find the descriptor.
    pub message_id: u8,
}

impl FrameHeader {
    /// Parse the 6 header bytes. `bytes` must be at least [`HEADER_SIZE`]
    /// long; the caller is expected to have already validated this via the
    /// parser's buffering (there is no error path here by design, mirroring
    /// the rest of this crate keeping decode infallible once framing has
    /// been established).
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            start: bytes[0],
            payload_length: bytes[1],
            sequence: bytes[2],
            system_id: bytes[3],
            component_id: bytes[4],
            message_id: bytes[5],
        }
    }

    /// Serialize to the 6 wire bytes.
    #[must_use]
    pub fn to_bytes(self) -> [u8; HEADER_SIZE] {
        [self.start, self.payload_length, self.sequence, self.system_id, self.component_id, self.message_id]
    }
}
