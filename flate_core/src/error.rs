//! Error taxonomy for codec contexts.
//!
//! Errors fall into two classes. Per-call errors abort the current operation
//! but leave the context ready for the next call. Fatal errors mean a context
//! can no longer be trusted; see [`FlateError::is_fatal`].

use std::fmt;

use thiserror::Error;

use crate::engine::{CodecFailure, CodecStatus, Mode};

/// The codec call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecOp {
    Init,
    SetParams,
    SetDictionary,
    Step,
    Reset,
}

/// A [`CodecOp`] bound to the direction it ran in, rendered with the
/// conventional zlib function name (`deflateParams`, `inflateReset`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecCall {
    pub mode: Mode,
    pub op: CodecOp,
}

impl CodecCall {
    pub fn new(mode: Mode, op: CodecOp) -> Self {
        Self { mode, op }
    }
}

impl fmt::Display for CodecCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.op {
            CodecOp::Init => "Init2",
            CodecOp::SetParams => "Params",
            CodecOp::SetDictionary => "SetDictionary",
            CodecOp::Step => "",
            CodecOp::Reset => "Reset",
        };
        write!(f, "{}{}", self.mode, suffix)
    }
}

fn detail(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(" ({m})"),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum FlateError {
    /// A codec call failed during an operation. The context was restored
    /// before this error was returned.
    #[error("{call} failed: {status}{}", detail(.message))]
    Codec {
        call: CodecCall,
        status: CodecStatus,
        message: Option<String>,
    },

    /// Decompression reached end-of-stream with input left over.
    #[error("{bytes} bytes of trailing data after end of stream")]
    TrailingData { bytes: usize },

    /// Construction or reset failed; the context is unusable from here on.
    #[error("fatal: {call} failed: {status}{}", detail(.message))]
    Fatal {
        call: CodecCall,
        status: CodecStatus,
        message: Option<String>,
    },

    /// The context was poisoned by an earlier fatal error.
    #[error("{mode} context is poisoned by an earlier fatal error")]
    Poisoned { mode: Mode },

    #[error("invalid configuration: {0}")]
    Config(String),

    /// The process-wide contexts have not been loaded.
    #[error("codec contexts are not loaded")]
    NotLoaded,
}

impl FlateError {
    pub fn codec(call: CodecCall, failure: CodecFailure) -> Self {
        FlateError::Codec {
            call,
            status: failure.status,
            message: failure.message,
        }
    }

    pub fn fatal(call: CodecCall, failure: CodecFailure) -> Self {
        FlateError::Fatal {
            call,
            status: failure.status,
            message: failure.message,
        }
    }

    /// Whether the subsystem should stop serving operations after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FlateError::Fatal { .. } | FlateError::Poisoned { .. } | FlateError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FlateError>;
