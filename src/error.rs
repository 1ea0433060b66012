use std::io;
use thiserror::Error;

/// Errors raised while setting up or running a simulation.
#[derive(Debug, Error)]
pub enum SseError {
    /// A model or schedule parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// A packed op code which does not correspond to any op.
    #[error("invalid packed op code {0}")]
    InvalidPackedOp(usize),
    /// A bin was finalized before any measurement was taken.
    #[error("cannot finalize a bin with no measurements")]
    EmptyBin,
    /// Writing results failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
