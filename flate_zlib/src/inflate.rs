use flate2::{Decompress, DecompressError, FlushDecompress, Status};

use flate_core::{CodecFailure, CodecStatus, Engine, Flush, Mode, Step, StepStatus};

/// Raw DEFLATE decompressor backed by `flate2::Decompress`.
///
/// Always decodes with the maximum window, which accepts streams produced
/// with any smaller window.
pub struct ZlibInflate {
    inner: Decompress,
}

impl ZlibInflate {
    pub fn new() -> Self {
        Self {
            inner: Decompress::new(false),
        }
    }
}

impl Default for ZlibInflate {
    fn default() -> Self {
        Self::new()
    }
}

fn failure(err: DecompressError) -> CodecFailure {
    let status = if err.needs_dictionary().is_some() {
        CodecStatus::NeedDict
    } else {
        CodecStatus::DataError
    };
    match err.message() {
        Some(message) => CodecFailure::with_message(status, message),
        None => CodecFailure::new(status),
    }
}

impl Engine for ZlibInflate {
    fn mode(&self) -> Mode {
        Mode::Decompress
    }

    fn set_dictionary(&mut self, dictionary: &[u8]) -> Result<(), CodecFailure> {
        self.inner
            .set_dictionary(dictionary)
            .map(|_adler| ())
            .map_err(failure)
    }

    fn step(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Step, CodecFailure> {
        let flush = match flush {
            Flush::None => FlushDecompress::None,
            Flush::Finish => FlushDecompress::Finish,
        };
        let before_in = self.inner.total_in();
        let before_out = self.inner.total_out();

        let status = self.inner.decompress(input, output, flush).map_err(failure)?;

        let consumed = (self.inner.total_in() - before_in) as usize;
        let produced = (self.inner.total_out() - before_out) as usize;
        let status = match status {
            Status::Ok => StepStatus::Progress,
            Status::StreamEnd => StepStatus::StreamEnd,
            // truncated input: the codec wants more than was supplied
            Status::BufError => {
                return Err(CodecFailure::with_message(
                    CodecStatus::BufError,
                    "unexpected end of input",
                ))
            }
        };
        Ok(Step {
            consumed,
            produced,
            status,
        })
    }

    fn reset(&mut self) -> Result<(), CodecFailure> {
        self.inner.reset(false);
        Ok(())
    }
}
