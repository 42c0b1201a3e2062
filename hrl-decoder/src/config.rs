//! Decoder configuration types
//!
//! This module defines the minimal configuration needed by the decoder
//! library. Presentation concerns (colors, truncation, output formats) are
//! handled by the application layer.

use serde::{Deserialize, Serialize};

/// Configuration for the decoder library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Whether control marker frames appear in the event stream
    /// (they always reset the counting sequence either way)
    #[serde(default = "default_true")]
    pub emit_control_frames: bool,

    /// Whether to build the op-code statistics aggregate
    #[serde(default = "default_true")]
    pub collect_stats: bool,

    /// Optional cap on the number of blocks decoded across the session
    #[serde(default)]
    pub max_blocks: Option<usize>,

    /// Whether a corrupt block ends the whole session instead of only the
    /// containing file
    #[serde(default)]
    pub stop_after_corrupt_file: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            emit_control_frames: true,
            collect_stats: true,
            max_blocks: None,
            stop_after_corrupt_file: false,
        }
    }
}

impl DecoderConfig {
    /// Create a new decoder configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: enable or disable control marker events
    pub fn with_control_frames(mut self, enabled: bool) -> Self {
        self.emit_control_frames = enabled;
        self
    }

    /// Builder method: enable or disable statistics collection
    pub fn with_stats(mut self, enabled: bool) -> Self {
        self.collect_stats = enabled;
        self
    }

    /// Builder method: cap the number of decoded blocks
    pub fn with_max_blocks(mut self, max_blocks: usize) -> Self {
        self.max_blocks = Some(max_blocks);
        self
    }

    /// Builder method: end the session on the first corrupt block
    pub fn with_stop_after_corrupt_file(mut self, enabled: bool) -> Self {
        self.stop_after_corrupt_file = enabled;
        self
    }
}
