//! Frame slicing and classification
//!
//! A block's payload region packs 11-byte frames back to back from offset 0.
//! Classification is a pure function of the first byte: either of the top two
//! bits set marks a control frame, otherwise the slot parses as a record.

use byteorder::{BigEndian, ByteOrder};

use crate::block::BLOCK_SIZE;
use crate::types::{ControlFrame, Frame, Record};

/// Fixed width of every frame slot
pub const FRAME_LEN: usize = 11;

/// Number of frame slots per block; the remaining bytes hold the trailer
pub const FRAMES_PER_BLOCK: usize = BLOCK_SIZE / FRAME_LEN;

/// Bit mask selecting the control-frame tag space
const CONTROL_MASK: u8 = 0xC0;

/// Decode one 11-byte frame slot
pub(crate) fn decode_frame(bytes: &[u8]) -> Frame {
    debug_assert_eq!(bytes.len(), FRAME_LEN);

    if bytes[0] & CONTROL_MASK != 0 {
        let mut raw = [0u8; FRAME_LEN];
        raw.copy_from_slice(bytes);
        Frame::Control(ControlFrame { raw })
    } else {
        let mut payload = [0u8; 8];
        payload.copy_from_slice(&bytes[3..FRAME_LEN]);
        Frame::Record(Record {
            counting: bytes[0],
            op: BigEndian::read_u16(&bytes[1..3]),
            payload,
        })
    }
}
