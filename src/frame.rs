//! Wire frame header.

use serde::{Deserialize, Serialize};

use crate::schema::MsgId;

/// Fixed-layout frame header.
///
/// Offsets from the start of the frame, multi-byte fields little-endian:
///
/// | Offset | Size | Field                 |
/// |--------|------|-----------------------|
/// | 0      | 1    | start marker (`0xfd`) |
/// | 1      | 1    | `payload_len`         |
/// | 2      | 1    | `incompat_flags`      |
/// | 3      | 1    | `compat_flags`        |
/// | 4      | 1    | `sequence`            |
/// | 5      | 1    | `system_id`           |
/// | 6      | 1    | `component_id`        |
/// | 7      | 3    | `message_id` (u24)    |
///
/// The payload follows at offset 10, then a u16 little-endian checksum.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub payload_len: u8,
    pub incompat_flags: u8,
    pub compat_flags: u8,
    /// Frame counter, wraps modulo 256.
    pub sequence: u8,
    pub system_id: u8,
    pub component_id: u8,
    pub message_id: MsgId,
}

impl Header {
    /// Header length in bytes.
    pub const LEN: usize = 10;
    /// Trailing checksum length in bytes.
    pub const CHECKSUM_LEN: usize = 2;
    /// Frame bytes beyond the payload: header plus checksum.
    pub const OVERHEAD: usize = Self::LEN + Self::CHECKSUM_LEN;
    /// Start-of-frame marker.
    pub const MARKER: u8 = 0xfd;

    /// Construct from the provided bytes, or `None` if there are not enough
    /// bytes.
    #[must_use]
    pub fn decode(dat: &[u8]) -> Option<Self> {
        if dat.len() < Self::LEN {
            return None;
        }
        Some(Header {
            payload_len: dat[1],
            incompat_flags: dat[2],
            compat_flags: dat[3],
            sequence: dat[4],
            system_id: dat[5],
            component_id: dat[6],
            message_id: u32::from_le_bytes([dat[7], dat[8], dat[9], 0]),
        })
    }

    /// Total frame length implied by this header.
    #[must_use]
    pub fn frame_len(&self) -> usize {
        Self::OVERHEAD + self.payload_len as usize
    }
}
