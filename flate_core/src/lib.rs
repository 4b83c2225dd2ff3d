pub mod config;
mod context;
mod deflate;
mod drive;
pub mod engine;
pub mod error;
mod flate;
mod inflate;

pub use config::{FlateConfig, TrailingData, DEFAULT_CHUNK_SIZE, DEFAULT_LEVEL};
pub use deflate::Deflater;
pub use engine::{CodecFailure, CodecStatus, DeflateEngine, Engine, Flush, Mode, Step, StepStatus};
pub use error::{CodecCall, CodecOp, FlateError, Result};
pub use flate::Flate;
pub use inflate::Inflater;
