//! Bookkeeping for operations between the moment they are prepared and the moment their completion
//! is consumed. A [Request] owns everything the kernel is touching on behalf of one operation, and
//! the [Tracker] maps each outstanding [crate::Token] back to its [Request].

mod tracker;

use std::{fmt, os::fd::OwnedFd, sync::Arc};

use crate::uring::Buffer;

pub use tracker::Tracker;

/// The kind of operation a [Request] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Read,
    Write,
}

/// The metadata of a single pending operation. The request owns its buffer until the completion is
/// consumed, and holds a reference on the file descriptor so it cannot be closed underneath the
/// kernel.
pub struct Request {
    pub(crate) kind: Kind,
    pub(crate) file: Arc<OwnedFd>,
    pub(crate) buffer: Buffer,
}

impl Request {
    pub fn new(kind: Kind, file: Arc<OwnedFd>, buffer: Buffer) -> Request {
        Request { kind, file, buffer }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("kind", &self.kind)
            .field("file", &self.file)
            .field("buffer", &self.buffer)
            .finish()
    }
}
