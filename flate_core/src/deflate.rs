use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

use crate::context::Context;
use crate::engine::{DeflateEngine, Flush, Mode};
use crate::error::{CodecCall, CodecOp, FlateError, Result};

/// Compression side of a [`Flate`](crate::Flate) pair.
pub struct Deflater {
    ctx: Context<dyn DeflateEngine>,
    default_level: i32,
}

impl Deflater {
    pub fn new(
        engine: Box<dyn DeflateEngine>,
        chunk_size: usize,
        default_level: i32,
    ) -> Result<Self> {
        if engine.mode() != Mode::Compress {
            return Err(FlateError::Config(format!(
                "deflater needs a compress engine, got {}",
                engine.mode()
            )));
        }
        Ok(Self {
            ctx: Context::new(engine, chunk_size)?,
            default_level,
        })
    }

    /// Compress all of `input` into a single raw stream.
    ///
    /// `None` input means there is nothing to do: the context is not touched
    /// and `Ok(None)` comes back. `level` falls back to the configured default.
    /// A rejected level leaves the context as it was, since nothing has been
    /// fed yet; every later failure resets the context before returning.
    pub fn compress(
        &self,
        input: Option<&[u8]>,
        dictionary: Option<&[u8]>,
        level: Option<i32>,
    ) -> Result<Option<Vec<u8>>> {
        let Some(input) = input else {
            return Ok(None);
        };
        let level = level.unwrap_or(self.default_level);

        let mut state = self.ctx.lock()?;
        state
            .engine
            .set_params(level)
            .map_err(|failure| {
                FlateError::codec(CodecCall::new(Mode::Compress, CodecOp::SetParams), failure)
            })?;

        let drained = state.process(input, dictionary, Flush::Finish)?;
        debug!(
            level,
            dictionary = dictionary.map(xxh3_64),
            input = input.len(),
            output = drained.output.len(),
            "compressed"
        );
        Ok(Some(drained.output))
    }

    pub fn is_poisoned(&self) -> bool {
        self.ctx.is_poisoned()
    }
}
