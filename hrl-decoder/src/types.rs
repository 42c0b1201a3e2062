//! Core types for the HRL log decoder library
//!
//! This module defines all the fundamental types that the decoder emits when processing
//! log files. The decoder is stateless between files and only outputs decoded events -
//! report formatting and statistics presentation live in the application layer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::checksum::ChecksumError;

/// Timestamp type used throughout the decoder
pub type Timestamp = DateTime<Utc>;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// One 11-byte frame slot of a block, classified by its first byte
///
/// Either of the top two bits of byte 0 set means a control marker,
/// both clear means a data record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Marker frame delimiting counting sequences; carries no decoded fields
    Control(ControlFrame),
    /// Data record with counting byte, op-code and payload
    Record(Record),
}

/// 11-byte marker frame, kept raw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlFrame {
    /// The unmodified frame bytes
    pub raw: [u8; 11],
}

/// 11-byte data record
///
/// Layout: 1-byte counting field, 2-byte big-endian op-code, 8 payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// Intra-block sequence byte, monotonically non-decreasing between control markers
    pub counting: u8,
    /// Semantic tag selecting the payload interpretation
    pub op: u16,
    /// Opaque payload, handed to the interpreter registry
    pub payload: [u8; 8],
}

/// Errors that can occur during decoding
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("corrupt block {block_index} in {file}: {reason}")]
    CorruptBlock {
        file: String,
        block_index: usize,
        #[source]
        reason: ChecksumError,
    },

    #[error("filename {0:?} does not encode a hex creation timestamp")]
    InvalidFilenameTimestamp(String),

    #[error("file {file} is {len} bytes long, shorter than one block")]
    TruncatedFile { file: String, len: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Data-quality warning attached to a decoded record
///
/// Anomalies are reported alongside the offending record and never stop the
/// decoding pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SequenceAnomaly {
    /// Counting byte went backwards without an intervening control marker
    NonMonotonic { prev: u8, got: u8 },
    /// Counting byte exceeds the reset sentinel value
    CountingAboveSentinel { got: u8 },
}

impl fmt::Display for SequenceAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceAnomaly::NonMonotonic { prev, got } => {
                write!(f, "counting went backwards (0x{prev:02x} -> 0x{got:02x})")
            }
            SequenceAnomaly::CountingAboveSentinel { got } => {
                write!(f, "counting 0x{got:02x} exceeds reset sentinel 0x40")
            }
        }
    }
}

/// Typed value produced by interpreting a record's payload
///
/// Unregistered op-codes and failed interpretations both end up as `Raw`;
/// rendering is total and never aborts a decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RenderedValue {
    /// UTC calendar timestamp (seconds resolution)
    Timestamp(Timestamp),
    /// Vehicle model designation fragment
    Model(String),
    /// Vehicle serial number fragment
    SerialNumber(String),
    /// World manufacturer identifier fragment
    Manufacturer(String),
    /// Fallback: the 8 payload bytes, shown as hex plus a printable projection
    Raw([u8; 8]),
}

impl fmt::Display for RenderedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderedValue::Timestamp(when) => {
                write!(f, "{} GMT", when.format("%Y-%m-%d %H:%M:%S"))
            }
            RenderedValue::Model(s) => write!(f, "Model: {s}"),
            RenderedValue::SerialNumber(s) => write!(f, "Serial: {s}"),
            RenderedValue::Manufacturer(s) => write!(f, "Manufacturer: {s}"),
            RenderedValue::Raw(bytes) => write!(f, "{}", hex_with_ascii(bytes)),
        }
    }
}

/// Format bytes as space-separated hex followed by a printable-ASCII projection
///
/// Bytes outside `0x20..=0x7E` show as `.` in the projection.
pub fn hex_with_ascii(bytes: &[u8]) -> String {
    let hex = bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ");
    let ascii: String = bytes
        .iter()
        .map(|&b| if (0x20..=0x7e).contains(&b) { b as char } else { '.' })
        .collect();
    format!("{hex}  |{ascii}|")
}

/// Main decoded event type - the primary output of the decoder
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DecodedEvent {
    /// A log file is about to yield blocks
    FileStart {
        /// File name as given on the command line
        name: String,
        /// Total file size in bytes (including the skipped header block)
        byte_len: usize,
        /// Creation timestamp decoded from the hex filename
        created: Timestamp,
    },

    /// A block passed its integrity check and is about to yield frames
    BlockStart {
        /// Index of the file within the ordered ingestion set
        file_index: usize,
        /// Index of the block within its file (0 = first block after the header)
        block_index: usize,
        /// Byte offset of the block within the file
        offset: usize,
    },

    /// A control marker frame
    ControlMarker {
        block_index: usize,
        frame_index: usize,
        raw: [u8; 11],
    },

    /// A data record with its interpreted payload
    Record {
        block_index: usize,
        frame_index: usize,
        counting: u8,
        op: u16,
        /// Interpreted payload, or the raw fallback
        value: RenderedValue,
        /// Sequencing warnings for this record (usually empty)
        anomalies: Vec<SequenceAnomaly>,
    },
}
