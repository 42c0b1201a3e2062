//! Block segmentation
//!
//! Splits a file's byte buffer into fixed-size blocks. The first block of
//! every file carries a different, unsupported layout and is always skipped;
//! trailing bytes that do not fill a whole block are ignored. Segmentation
//! is a pure function of the buffer length; validation is deferred to the
//! checksum unit.

/// Fixed block size of the HRL container format
pub const BLOCK_SIZE: usize = 0x4000;

/// Byte offset of the block at `block_index` (0 = first block after the header)
pub(crate) fn block_offset(block_index: usize) -> usize {
    (block_index + 1) * BLOCK_SIZE
}

/// Number of decodable blocks in a buffer of `len` bytes
///
/// Counts whole blocks at offsets `BLOCK_SIZE, 2*BLOCK_SIZE, ...`; the
/// header block and any truncated tail are excluded.
pub(crate) fn block_count(len: usize) -> usize {
    (len / BLOCK_SIZE).saturating_sub(1)
}
