use tracing::debug;

use crate::config::FlateConfig;
use crate::deflate::Deflater;
use crate::engine::{DeflateEngine, Engine};
use crate::error::Result;
use crate::inflate::Inflater;

/// The pair of long-lived codec contexts: one compressor, one decompressor.
///
/// Both contexts are independent. Each serializes its own callers, so a
/// compress and a decompress may run at the same time from different threads
/// but two compress calls never interleave.
pub struct Flate {
    deflater: Deflater,
    inflater: Inflater,
}

impl Flate {
    pub fn new(
        deflate: Box<dyn DeflateEngine>,
        inflate: Box<dyn Engine>,
        config: &FlateConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            deflater: Deflater::new(deflate, config.chunk_size, config.default_level)?,
            inflater: Inflater::new(inflate, config.chunk_size, config.trailing_data)?,
        })
    }

    /// See [`Deflater::compress`].
    pub fn compress(
        &self,
        input: Option<&[u8]>,
        dictionary: Option<&[u8]>,
        level: Option<i32>,
    ) -> Result<Option<Vec<u8>>> {
        self.deflater.compress(input, dictionary, level)
    }

    /// See [`Inflater::decompress`].
    pub fn decompress(
        &self,
        input: Option<&[u8]>,
        dictionary: Option<&[u8]>,
    ) -> Result<Option<Vec<u8>>> {
        self.inflater.decompress(input, dictionary)
    }

    pub fn deflater(&self) -> &Deflater {
        &self.deflater
    }

    pub fn inflater(&self) -> &Inflater {
        &self.inflater
    }

    /// Release both codec states. Engines free their resources on drop.
    pub fn shutdown(self) {
        debug!(
            deflate_poisoned = self.deflater.is_poisoned(),
            inflate_poisoned = self.inflater.is_poisoned(),
            "shutting down codec contexts"
        );
        drop(self);
    }
}
