//! File ingestion and ordering
//!
//! HRL files are named by their creation time: the base name (minus
//! extension) is the big-endian hex unix timestamp of the moment the device
//! opened the file. Multi-file sessions are ordered by that timestamp before
//! any decoding starts, so the concatenated block stream is chronological
//! regardless of argument or directory order.

use chrono::DateTime;
use std::fs;
use std::path::{Path, PathBuf};

use crate::block::BLOCK_SIZE;
use crate::types::{DecoderError, Result, Timestamp};

/// One ingested log file: an immutable named byte buffer
#[derive(Debug, Clone)]
pub struct LogFile {
    /// Path the file was read from
    pub path: PathBuf,
    /// Display name (final path component)
    pub name: String,
    /// Creation timestamp decoded from the filename
    pub created: Timestamp,
    /// Raw file contents
    pub data: Vec<u8>,
    /// Numeric sort key (the filename timestamp before conversion)
    sort_key: u64,
}

impl LogFile {
    /// Build a log file from a name and an in-memory buffer
    ///
    /// The name must carry a hex creation timestamp like an on-disk file;
    /// buffers shorter than one block are rejected since even the skipped
    /// header block would be incomplete.
    pub fn from_bytes(name: &str, data: Vec<u8>) -> Result<Self> {
        let (sort_key, created) = parse_filename_timestamp(Path::new(name))?;
        if data.len() < BLOCK_SIZE {
            return Err(DecoderError::TruncatedFile {
                file: name.to_string(),
                len: data.len(),
            });
        }
        Ok(Self {
            path: PathBuf::from(name),
            name: name.to_string(),
            created,
            data,
            sort_key,
        })
    }

    /// Read a log file from disk
    pub fn open(path: &Path) -> Result<Self> {
        let (sort_key, created) = parse_filename_timestamp(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let data = fs::read(path)?;
        if data.len() < BLOCK_SIZE {
            return Err(DecoderError::TruncatedFile {
                file: name,
                len: data.len(),
            });
        }
        log::debug!("read {} ({} bytes, created {})", name, data.len(), created);
        Ok(Self {
            path: path.to_path_buf(),
            name,
            created,
            data,
            sort_key,
        })
    }
}

/// Decode the creation timestamp embedded in a filename
///
/// The base name minus extension must parse as hex (case-insensitive) and
/// map to a representable UTC date. Returns the raw value (used as the sort
/// key) together with the decoded timestamp.
pub fn parse_filename_timestamp(path: &Path) -> Result<(u64, Timestamp)> {
    let invalid = || DecoderError::InvalidFilenameTimestamp(path.display().to_string());

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(invalid)?;

    let raw = u64::from_str_radix(stem, 16).map_err(|_| invalid())?;
    let secs = i64::try_from(raw).map_err(|_| invalid())?;
    let created = DateTime::from_timestamp(secs, 0).ok_or_else(invalid)?;
    Ok((raw, created))
}

/// Read every file and order the set by creation timestamp ascending
///
/// Any unparsable filename fails the whole request before a single byte is
/// decoded: sort order is a correctness precondition for multi-file streams.
pub fn load_files(paths: &[PathBuf]) -> Result<Vec<LogFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(LogFile::open(path)?);
    }
    sort_files(&mut files);
    Ok(files)
}

/// Order files by filename timestamp, name as a deterministic tie-breaker
pub(crate) fn sort_files(files: &mut [LogFile]) {
    files.sort_by(|a, b| a.sort_key.cmp(&b.sort_key).then_with(|| a.name.cmp(&b.name)));
}
