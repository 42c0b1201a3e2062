//! Block trailer integrity checks
//!
//! Every block after the header ends in a 5-byte trailer: a 4-byte big-endian
//! checksum followed by a fixed `0xFF` sentinel. The stored value is the
//! bitwise complement of the CRC-32 of everything before the trailer. A block
//! failing either check must not be decoded.

use byteorder::{BigEndian, ByteOrder};

use crate::block::BLOCK_SIZE;

/// Length of the trailer at the end of each block
pub const TRAILER_LEN: usize = 5;

/// Fixed value of the trailer's final byte
const TRAILER_SENTINEL: u8 = 0xFF;

/// Ways a block can fail its integrity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ChecksumError {
    #[error("trailer sentinel is 0x{found:02X}, expected 0xFF")]
    BadSentinel { found: u8 },

    #[error("stored checksum 0x{stored:08X} does not match computed 0x{computed:08X}")]
    BadChecksum { stored: u32, computed: u32 },
}

/// Validate a block's trailer
///
/// `block` must be exactly [`BLOCK_SIZE`] bytes. Pure function of the block's
/// bytes; must pass before any frame of the block is trusted.
pub(crate) fn validate(block: &[u8]) -> Result<(), ChecksumError> {
    debug_assert_eq!(block.len(), BLOCK_SIZE);

    let trailer = &block[BLOCK_SIZE - TRAILER_LEN..];
    if trailer[4] != TRAILER_SENTINEL {
        return Err(ChecksumError::BadSentinel { found: trailer[4] });
    }

    let stored = BigEndian::read_u32(&trailer[0..4]);
    let computed = !crc32fast::hash(&block[..BLOCK_SIZE - TRAILER_LEN]);
    if computed != stored {
        return Err(ChecksumError::BadChecksum { stored, computed });
    }

    Ok(())
}

/// Stamp a valid trailer onto a block buffer (test helper)
#[cfg(test)]
pub(crate) fn seal(block: &mut [u8]) {
    let computed = !crc32fast::hash(&block[..BLOCK_SIZE - TRAILER_LEN]);
    BigEndian::write_u32(&mut block[BLOCK_SIZE - TRAILER_LEN..BLOCK_SIZE - 1], computed);
    block[BLOCK_SIZE - 1] = TRAILER_SENTINEL;
}
