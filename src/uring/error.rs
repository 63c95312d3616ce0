use core::result;
use std::{io, path::PathBuf};

use io_uring::squeue;
use thiserror::Error;

use super::Token;

/// A helper type for wrapping a [result::Result] such that we can reduce noise in our signatures.
pub type Result<T> = result::Result<T, Error>;

/// An error representing a failure interacting with the underlying io_uring, or misuse of the
/// request lifecycle built on top of it.
///
/// Failures of the I/O operations themselves are *not* represented here, those are delivered as
/// raw result codes inside of a [super::Completion] and left for the caller to interpret.
#[derive(Debug, Error)]
pub enum Error {
    #[error("encountered unexpected IO error: {0}")]
    IO(
        #[from]
        #[source]
        io::Error,
    ),
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("submission queue is full, submit and drain completions before preparing more")]
    QueueFull,
    #[error("all {0} in-flight slots are taken, drain completions before preparing more")]
    CapacityExhausted(usize),
    #[error("buffer of {0} bytes exceeds the maximum single operation size")]
    BufferTooLarge(usize),
    #[error("completion reported unknown token {0}")]
    UnknownToken(Token),
    #[error("token {0} is already registered")]
    DuplicateToken(Token),
    #[error("token {0} does not name the next vacant slot")]
    StaleToken(Token),
    #[error("ring has been closed")]
    Closed,
    #[error("ring still has {0} outstanding operations")]
    Outstanding(usize),
    #[error("no operation is pending completion")]
    NothingPending,
    #[error("driver disconnected before delivering a result")]
    Disconnected,
    #[error("no default driver has been configured")]
    NotConfigured,
}

impl From<squeue::PushError> for Error {
    fn from(_: squeue::PushError) -> Self {
        Self::QueueFull
    }
}

impl From<nix::Error> for Error {
    fn from(value: nix::Error) -> Self {
        Self::IO(value.into())
    }
}
