use serde::{Deserialize, Serialize};

use crate::error::{FlateError, Result};

/// Size of the scratch buffer each drive-loop step writes into.
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Codec default compression level sentinel.
pub const DEFAULT_LEVEL: i32 = -1;

/// Largest DEFLATE window (32 KiB).
pub const MAX_WINDOW_BITS: u8 = 15;

/// Smallest window a raw deflate stream may be created with.
pub const MIN_WINDOW_BITS: u8 = 9;

/// What decompression does with bytes that follow the end of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingData {
    /// Drop them and return the decoded stream.
    #[default]
    Ignore,
    /// Fail the call with [`FlateError::TrailingData`].
    Reject,
}

/// Tunables for a pair of codec contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlateConfig {
    /// Transfer buffer size in bytes.
    pub chunk_size: usize,
    /// Level used when a compress call does not pass one.
    pub default_level: i32,
    /// Window size for the compressor, as a power of two.
    pub window_bits: u8,
    /// Policy for bytes left over after the end of a decompressed stream.
    pub trailing_data: TrailingData,
}

impl Default for FlateConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            default_level: DEFAULT_LEVEL,
            window_bits: MAX_WINDOW_BITS,
            trailing_data: TrailingData::Ignore,
        }
    }
}

impl FlateConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(FlateError::Config("chunk_size must be non-zero".into()));
        }
        if !(-1..=9).contains(&self.default_level) {
            return Err(FlateError::Config(format!(
                "default_level {} out of range -1..=9",
                self.default_level
            )));
        }
        if !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&self.window_bits) {
            return Err(FlateError::Config(format!(
                "window_bits {} out of range {}..={}",
                self.window_bits, MIN_WINDOW_BITS, MAX_WINDOW_BITS
            )));
        }
        Ok(())
    }
}
