use std::fmt;

/// Direction a codec context runs in. Fixed when the context is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Decompress,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Compress => f.write_str("deflate"),
            Mode::Decompress => f.write_str("inflate"),
        }
    }
}

/// Per-step directive passed to [`Engine::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flush {
    /// More input may follow; the codec decides when the stream ends.
    None,
    /// No more input will ever arrive: emit everything and terminate the stream.
    Finish,
}

/// Failure status reported by a codec engine.
///
/// The numeric codes follow the zlib convention so that error messages stay
/// recognizable to anyone who has debugged a zlib-based stack before.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecStatus {
    NeedDict,
    StreamError,
    DataError,
    MemError,
    BufError,
    VersionError,
}

impl CodecStatus {
    pub fn code(self) -> i32 {
        match self {
            CodecStatus::NeedDict => 2,
            CodecStatus::StreamError => -2,
            CodecStatus::DataError => -3,
            CodecStatus::MemError => -4,
            CodecStatus::BufError => -5,
            CodecStatus::VersionError => -6,
        }
    }
}

impl fmt::Display for CodecStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// What an engine call returns when the codec rejects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecFailure {
    pub status: CodecStatus,
    /// Codec-provided detail, when the backend has one.
    pub message: Option<String>,
}

impl CodecFailure {
    pub fn new(status: CodecStatus) -> Self {
        Self { status, message: None }
    }

    pub fn with_message(status: CodecStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: Some(message.into()),
        }
    }
}

/// Outcome of a successful step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Forward progress was made; the stream has not ended yet.
    Progress,
    /// The codec reached the end of the stream.
    StreamEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Input bytes consumed by this step.
    pub consumed: usize,
    /// Output bytes written to the front of the output slice by this step.
    pub produced: usize,
    pub status: StepStatus,
}

/// A persistent streaming codec state machine.
///
/// Implementations are black boxes over a real codec library:
/// - Construction is the codec's `init`; `Drop` is its `end`.
/// - `step` must never retain `input` or `output` past the call. All input
///   bookkeeping lives with the caller, so a context can never carry a stale
///   input cursor from one call into the next.
/// - `reset` returns the state machine to its freshly-initialized state
///   without releasing resources.
pub trait Engine: Send {
    fn mode(&self) -> Mode;

    /// Install a preset dictionary. Only valid right after construction or
    /// `reset`, before any input has been fed.
    fn set_dictionary(&mut self, dictionary: &[u8]) -> Result<(), CodecFailure>;

    /// Run the codec once over `input`, writing into `output`.
    fn step(&mut self, input: &[u8], output: &mut [u8], flush: Flush) -> Result<Step, CodecFailure>;

    fn reset(&mut self) -> Result<(), CodecFailure>;
}

/// Compression engines additionally accept per-call parameters.
pub trait DeflateEngine: Engine {
    /// Apply a compression level. `-1` selects the codec's default; values the
    /// codec does not support fail with [`CodecStatus::StreamError`].
    fn set_params(&mut self, level: i32) -> Result<(), CodecFailure>;
}
