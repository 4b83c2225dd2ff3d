mod deflate;
mod inflate;
pub mod runtime;

pub use deflate::ZlibDeflate;
pub use inflate::ZlibInflate;

use flate_core::{CodecCall, CodecOp, Flate, FlateConfig, FlateError, Mode};

/// Build a compressor/decompressor pair for `config`.
///
/// Any failure here is fatal: the caller has no contexts to serve from.
pub fn initialize(config: &FlateConfig) -> Result<Flate, FlateError> {
    config.validate()?;
    let deflate = ZlibDeflate::new(config.window_bits)
        .map_err(|failure| FlateError::fatal(CodecCall::new(Mode::Compress, CodecOp::Init), failure))?;
    Flate::new(Box::new(deflate), Box::new(ZlibInflate::new()), config)
}
