//! Main decoder API
//!
//! This module provides the primary interface for the decoder library.
//! The Decoder struct owns the interpreter registry and hands out lazy
//! decoding sessions over one or more ingested log files.

use std::path::PathBuf;

use crate::block::{block_count, block_offset, BLOCK_SIZE};
use crate::checksum;
use crate::config::DecoderConfig;
use crate::frame::{decode_frame, FRAMES_PER_BLOCK, FRAME_LEN};
use crate::ingest::{self, LogFile};
use crate::interpret::InterpreterRegistry;
use crate::sequence::SequenceTracker;
use crate::stats::OpCodeStats;
use crate::types::{DecodedEvent, DecoderError, Frame, Result};

/// The main decoder struct - entry point for all decoding operations
pub struct Decoder {
    /// Interpreter registry, built once and read-only afterwards
    registry: InterpreterRegistry,
}

impl Decoder {
    /// Create a new decoder with the built-in interpreters
    pub fn new() -> Self {
        Self {
            registry: InterpreterRegistry::with_builtins(),
        }
    }

    /// Access the interpreter registry
    pub fn registry(&self) -> &InterpreterRegistry {
        &self.registry
    }

    /// Ingest files from disk and return a lazy decoding session
    ///
    /// Files are ordered by the creation timestamp embedded in their names;
    /// an unparsable name fails the whole request before any decoding.
    ///
    /// # Example
    /// ```no_run
    /// use hrl_decoder::{Decoder, DecoderConfig};
    /// use std::path::PathBuf;
    ///
    /// let decoder = Decoder::new();
    /// let session = decoder
    ///     .decode_files(&[PathBuf::from("000000005e0a1be0.HRL")], DecoderConfig::new())
    ///     .unwrap();
    /// for event in session {
    ///     match event {
    ///         Ok(decoded) => println!("{decoded:?}"),
    ///         Err(e) => eprintln!("decode error: {e}"),
    ///     }
    /// }
    /// ```
    pub fn decode_files(
        &self,
        paths: &[PathBuf],
        config: DecoderConfig,
    ) -> Result<DecodeSession<'_>> {
        let files = ingest::load_files(paths)?;
        log::info!("decoding {} file(s)", files.len());
        Ok(self.decode_loaded(files, config))
    }

    /// Start a session over already-loaded files (ordering is applied here too)
    pub fn decode_loaded(&self, mut files: Vec<LogFile>, config: DecoderConfig) -> DecodeSession<'_> {
        ingest::sort_files(&mut files);
        DecodeSession {
            registry: &self.registry,
            config,
            files,
            stats: OpCodeStats::new(),
            file_index: 0,
            cursor: Cursor::FileStart,
            tracker: SequenceTracker::new(),
            blocks_decoded: 0,
            finished: false,
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Position of the session within the concatenated block stream
#[derive(Debug, Clone, Copy)]
enum Cursor {
    /// About to announce the current file
    FileStart,
    /// About to validate and announce the block at `block_index`
    Block { block_index: usize },
    /// Mid-block, about to decode the frame at `frame_index`
    Frames {
        block_index: usize,
        frame_index: usize,
    },
}

/// Lazy decoding pass over an ordered set of log files
///
/// Pull-based: each `next()` call advances segmentation, checksum gating,
/// frame decoding, sequencing and interpretation just far enough to produce
/// one event. A corrupt block yields one error and abandons the rest of its
/// file; decoding resumes with the next file.
pub struct DecodeSession<'a> {
    registry: &'a InterpreterRegistry,
    config: DecoderConfig,
    files: Vec<LogFile>,
    stats: OpCodeStats,
    file_index: usize,
    cursor: Cursor,
    tracker: SequenceTracker,
    blocks_decoded: usize,
    finished: bool,
}

impl DecodeSession<'_> {
    /// Statistics gathered so far (complete once the session is exhausted)
    pub fn stats(&self) -> &OpCodeStats {
        &self.stats
    }

    /// Consume the session, keeping only the statistics aggregate
    pub fn into_stats(self) -> OpCodeStats {
        self.stats
    }

    /// Skip the rest of the current file and re-enter at the next one
    fn abandon_file(&mut self) {
        self.file_index += 1;
        self.cursor = Cursor::FileStart;
    }
}

impl Iterator for DecodeSession<'_> {
    type Item = Result<DecodedEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished || self.file_index >= self.files.len() {
                self.finished = true;
                return None;
            }
            let file = &self.files[self.file_index];

            match self.cursor {
                Cursor::FileStart => {
                    self.cursor = Cursor::Block { block_index: 0 };
                    return Some(Ok(DecodedEvent::FileStart {
                        name: file.name.clone(),
                        byte_len: file.data.len(),
                        created: file.created,
                    }));
                }

                Cursor::Block { block_index } => {
                    if self
                        .config
                        .max_blocks
                        .is_some_and(|max| self.blocks_decoded >= max)
                    {
                        log::info!("block limit reached, stopping");
                        self.finished = true;
                        return None;
                    }

                    if block_index >= block_count(file.data.len()) {
                        // File exhausted; any truncated tail is ignored
                        self.abandon_file();
                        continue;
                    }

                    let offset = block_offset(block_index);
                    let bytes = &file.data[offset..offset + BLOCK_SIZE];
                    if let Err(reason) = checksum::validate(bytes) {
                        let err = DecoderError::CorruptBlock {
                            file: file.name.clone(),
                            block_index,
                            reason,
                        };
                        log::warn!("{err}");
                        if self.config.stop_after_corrupt_file {
                            self.finished = true;
                        } else {
                            self.abandon_file();
                        }
                        return Some(Err(err));
                    }

                    self.blocks_decoded += 1;
                    self.tracker.reset_block();
                    self.cursor = Cursor::Frames {
                        block_index,
                        frame_index: 0,
                    };
                    return Some(Ok(DecodedEvent::BlockStart {
                        file_index: self.file_index,
                        block_index,
                        offset,
                    }));
                }

                Cursor::Frames {
                    block_index,
                    frame_index,
                } => {
                    if frame_index >= FRAMES_PER_BLOCK {
                        self.cursor = Cursor::Block {
                            block_index: block_index + 1,
                        };
                        continue;
                    }
                    self.cursor = Cursor::Frames {
                        block_index,
                        frame_index: frame_index + 1,
                    };

                    let start = block_offset(block_index) + frame_index * FRAME_LEN;
                    match decode_frame(&file.data[start..start + FRAME_LEN]) {
                        Frame::Control(ctrl) => {
                            self.tracker.observe_control();
                            if !self.config.emit_control_frames {
                                continue;
                            }
                            return Some(Ok(DecodedEvent::ControlMarker {
                                block_index,
                                frame_index,
                                raw: ctrl.raw,
                            }));
                        }
                        Frame::Record(rec) => {
                            let anomalies = self.tracker.observe_record(rec.counting);
                            for anomaly in &anomalies {
                                log::warn!(
                                    "block {block_index} frame {frame_index}: {anomaly}"
                                );
                            }
                            if self.config.collect_stats {
                                self.stats.observe(rec.op, rec.payload[0]);
                            }
                            let value = self.registry.render(rec.op, &rec.payload);
                            return Some(Ok(DecodedEvent::Record {
                                block_index,
                                frame_index,
                                counting: rec.counting,
                                op: rec.op,
                                value,
                                anomalies,
                            }));
                        }
                    }
                }
            }
        }
    }
}
