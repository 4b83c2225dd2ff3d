use flate2::{Compress, CompressError, Compression, FlushCompress, Status};

use flate_core::config::{MAX_WINDOW_BITS, MIN_WINDOW_BITS};
use flate_core::{CodecFailure, CodecStatus, DeflateEngine, Engine, Flush, Mode, Step, StepStatus};

/// Raw DEFLATE compressor backed by `flate2::Compress`.
///
/// The stream is created without a zlib header or trailer, so the output is
/// the bare DEFLATE bit stream.
pub struct ZlibDeflate {
    inner: Compress,
}

impl ZlibDeflate {
    /// Create a raw compressor at the default level with a `2^window_bits`
    /// byte window.
    pub fn new(window_bits: u8) -> Result<Self, CodecFailure> {
        if !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&window_bits) {
            return Err(CodecFailure::with_message(
                CodecStatus::StreamError,
                format!("window bits {window_bits} not supported for raw deflate"),
            ));
        }
        Ok(Self {
            inner: Compress::new_with_window_bits(Compression::default(), false, window_bits),
        })
    }
}

fn failure(status: CodecStatus, err: CompressError) -> CodecFailure {
    match err.message() {
        Some(message) => CodecFailure::with_message(status, message),
        None => CodecFailure::new(status),
    }
}

/// Map a caller level onto the codec's range; `-1` is the codec default.
fn compression(level: i32) -> Option<Compression> {
    match level {
        -1 => Some(Compression::default()),
        0..=9 => Some(Compression::new(level as u32)),
        _ => None,
    }
}

impl Engine for ZlibDeflate {
    fn mode(&self) -> Mode {
        Mode::Compress
    }

    fn set_dictionary(&mut self, dictionary: &[u8]) -> Result<(), CodecFailure> {
        self.inner
            .set_dictionary(dictionary)
            .map(|_adler| ())
            .map_err(|e| failure(CodecStatus::StreamError, e))
    }

    fn step(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Step, CodecFailure> {
        let flush = match flush {
            Flush::None => FlushCompress::None,
            Flush::Finish => FlushCompress::Finish,
        };
        let before_in = self.inner.total_in();
        let before_out = self.inner.total_out();

        let status = self
            .inner
            .compress(input, output, flush)
            .map_err(|e| failure(CodecStatus::StreamError, e))?;

        let consumed = (self.inner.total_in() - before_in) as usize;
        let produced = (self.inner.total_out() - before_out) as usize;
        let status = match status {
            Status::Ok => StepStatus::Progress,
            Status::StreamEnd => StepStatus::StreamEnd,
            Status::BufError => return Err(CodecFailure::new(CodecStatus::BufError)),
        };
        Ok(Step {
            consumed,
            produced,
            status,
        })
    }

    fn reset(&mut self) -> Result<(), CodecFailure> {
        self.inner.reset();
        Ok(())
    }
}

impl DeflateEngine for ZlibDeflate {
    fn set_params(&mut self, level: i32) -> Result<(), CodecFailure> {
        let Some(level) = compression(level) else {
            return Err(CodecFailure::with_message(
                CodecStatus::StreamError,
                format!("invalid compression level {level}"),
            ));
        };
        self.inner
            .set_level(level)
            .map_err(|e| failure(CodecStatus::BufError, e))
    }
}
