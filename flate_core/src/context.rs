use std::sync::{Mutex, MutexGuard};

use tracing::error;

use crate::drive::{drive, Drained};
use crate::engine::{Engine, Flush, Mode};
use crate::error::{CodecCall, CodecOp, FlateError, Result};

/// Mutable half of a [`Context`], only reachable through its lock.
pub(crate) struct State<E: ?Sized> {
    /// Set once a reset has failed. Never cleared.
    poisoned: bool,
    transfer: Box<[u8]>,
    pub(crate) engine: Box<E>,
}

impl<E: Engine + ?Sized> State<E> {
    /// Return the engine to its ready state. A failure here poisons the
    /// context and is reported as fatal.
    pub(crate) fn reset(&mut self) -> Result<()> {
        let call = CodecCall::new(self.engine.mode(), CodecOp::Reset);
        if let Err(failure) = self.engine.reset() {
            self.poisoned = true;
            let err = FlateError::fatal(call, failure);
            error!(%err, "codec context poisoned");
            return Err(err);
        }
        Ok(())
    }

    /// Reset after a failed call. A reset failure supersedes `err`.
    pub(crate) fn recover(&mut self, err: FlateError) -> FlateError {
        match self.reset() {
            Ok(()) => err,
            Err(fatal) => fatal,
        }
    }

    /// Install the optional dictionary, drive all of `input` through the
    /// engine and reset it, on every path.
    pub(crate) fn process(
        &mut self,
        input: &[u8],
        dictionary: Option<&[u8]>,
        flush: Flush,
    ) -> Result<Drained> {
        if let Some(dictionary) = dictionary {
            if let Err(failure) = self.engine.set_dictionary(dictionary) {
                let call = CodecCall::new(self.engine.mode(), CodecOp::SetDictionary);
                return Err(self.recover(FlateError::codec(call, failure)));
            }
        }

        let drained = match drive(&mut *self.engine, &mut self.transfer, input, flush) {
            Ok(drained) => drained,
            Err(err) => return Err(self.recover(err)),
        };

        self.reset()?;
        Ok(drained)
    }
}

/// One persistent codec state machine plus its transfer buffer.
///
/// The context is built once and reused for every call; between calls it is
/// always in a freshly-reset state. The lock serializes callers, so at most
/// one operation is ever in flight against the engine.
pub struct Context<E: ?Sized> {
    mode: Mode,
    state: Mutex<State<E>>,
}

impl<E: Engine + ?Sized> Context<E> {
    pub fn new(engine: Box<E>, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(FlateError::Config("chunk_size must be non-zero".into()));
        }
        Ok(Self {
            mode: engine.mode(),
            state: Mutex::new(State {
                poisoned: false,
                transfer: vec![0u8; chunk_size].into_boxed_slice(),
                engine,
            }),
        })
    }

    /// Whether an earlier fatal error has made this context unusable.
    pub fn is_poisoned(&self) -> bool {
        match self.state.lock() {
            Ok(state) => state.poisoned,
            Err(_) => true,
        }
    }

    /// Take exclusive access to the engine, refusing poisoned contexts.
    ///
    /// A panic while the lock was held leaves the engine mid-operation with no
    /// reset, so std mutex poisoning is treated the same as a failed reset.
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, State<E>>> {
        let state = self.state.lock().map_err(|_| {
            error!(mode = %self.mode, "codec context lock poisoned by a panic");
            FlateError::Poisoned { mode: self.mode }
        })?;
        if state.poisoned {
            return Err(FlateError::Poisoned { mode: self.mode });
        }
        Ok(state)
    }
}
