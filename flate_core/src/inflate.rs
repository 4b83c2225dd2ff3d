use tracing::{debug, warn};
use xxhash_rust::xxh3::xxh3_64;

use crate::config::TrailingData;
use crate::context::Context;
use crate::engine::{Engine, Flush, Mode};
use crate::error::{FlateError, Result};

/// Decompression side of a [`Flate`](crate::Flate) pair.
pub struct Inflater {
    ctx: Context<dyn Engine>,
    trailing: TrailingData,
}

impl Inflater {
    pub fn new(engine: Box<dyn Engine>, chunk_size: usize, trailing: TrailingData) -> Result<Self> {
        if engine.mode() != Mode::Decompress {
            return Err(FlateError::Config(format!(
                "inflater needs a decompress engine, got {}",
                engine.mode()
            )));
        }
        Ok(Self {
            ctx: Context::new(engine, chunk_size)?,
            trailing,
        })
    }

    /// Decompress one raw stream held entirely in `input`.
    ///
    /// The stream's own terminator ends decoding, so the drive loop runs
    /// without a finish signal. Bytes after the terminator are handled per the
    /// configured [`TrailingData`] policy.
    pub fn decompress(
        &self,
        input: Option<&[u8]>,
        dictionary: Option<&[u8]>,
    ) -> Result<Option<Vec<u8>>> {
        let Some(input) = input else {
            return Ok(None);
        };

        let drained = self.ctx.lock()?.process(input, dictionary, Flush::None)?;

        let trailing = input.len() - drained.consumed;
        if trailing > 0 {
            match self.trailing {
                TrailingData::Ignore => {
                    warn!(bytes = trailing, "ignoring trailing data after end of stream");
                }
                TrailingData::Reject => {
                    return Err(FlateError::TrailingData { bytes: trailing });
                }
            }
        }

        debug!(
            dictionary = dictionary.map(xxh3_64),
            input = input.len(),
            output = drained.output.len(),
            "decompressed"
        );
        Ok(Some(drained.output))
    }

    pub fn is_poisoned(&self) -> bool {
        self.ctx.is_poisoned()
    }
}
