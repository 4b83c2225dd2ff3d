use tracing::trace;

use crate::engine::{CodecFailure, CodecStatus, Engine, Flush, StepStatus};
use crate::error::{CodecCall, CodecOp, FlateError, Result};

/// Everything one run of the drive loop produced.
#[derive(Debug)]
pub(crate) struct Drained {
    pub output: Vec<u8>,
    /// How much of the input the codec consumed before reaching stream end.
    pub consumed: usize,
}

/// Pump `input` through `engine` until it reports end of stream.
///
/// Every step gets the whole of `transfer` as output space. Whatever the step
/// wrote is appended to the accumulator, so chunks land in the order the codec
/// emitted them. On failure the accumulator is dropped and the caller is
/// responsible for resetting the engine.
pub(crate) fn drive<E: Engine + ?Sized>(
    engine: &mut E,
    transfer: &mut [u8],
    input: &[u8],
    flush: Flush,
) -> Result<Drained> {
    let call = CodecCall::new(engine.mode(), CodecOp::Step);
    let mut output = Vec::new();
    let mut offset = 0usize;

    loop {
        let step = engine
            .step(&input[offset..], transfer, flush)
            .map_err(|failure| FlateError::codec(call, failure))?;

        offset += step.consumed;
        if step.produced > 0 {
            output.extend_from_slice(&transfer[..step.produced]);
        }
        trace!(
            consumed = step.consumed,
            produced = step.produced,
            total = output.len(),
            "{call} step"
        );

        match step.status {
            StepStatus::StreamEnd => break,
            StepStatus::Progress if step.consumed == 0 && step.produced == 0 => {
                return Err(FlateError::codec(
                    call,
                    CodecFailure::with_message(CodecStatus::BufError, "no progress possible"),
                ));
            }
            StepStatus::Progress => {}
        }
    }

    Ok(Drained {
        output,
        consumed: offset,
    })
}
