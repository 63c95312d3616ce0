use std::{
    os::fd::{FromRawFd, IntoRawFd, OwnedFd, RawFd},
    path::Path,
    time::Duration,
};

use nix::{
    fcntl::{self, OFlag},
    sys::stat::Mode,
    unistd,
};

use super::{Buffer, Error, Result, Token};

/// A single dequeued completion, reporting the outcome of exactly one submitted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionEvent {
    pub token: Token,
    pub result: i32,
    pub flags: u32,
}

/// The ring facility the [crate::Manager] drives. This is the seam between request bookkeeping and
/// the kernel queues, [super::Uring] binds it to a real `io_uring` instance and any other binding
/// only has to honour the contract documented on each method.
///
/// A facility is single writer, every method takes `&mut self` and implementations are not
/// expected to synchronize internally.
pub trait RingFacility {
    /// Open the file at `path` returning the owned descriptor.
    fn open(&mut self, path: &Path, flags: OFlag, mode: Mode) -> Result<OwnedFd>;

    /// Close a descriptor previously handed out by [RingFacility::open].
    fn close(&mut self, fd: OwnedFd) -> Result<()>;

    /// Allocate a zero filled buffer of `size` bytes.
    fn allocate(&mut self, size: usize) -> Buffer {
        Buffer::zeroed(size)
    }

    /// Release a buffer previously handed out by [RingFacility::allocate].
    fn free(&mut self, buffer: Buffer) {
        drop(buffer)
    }

    /// The number of operations that may be in flight at once before completions must be drained.
    fn capacity(&self) -> usize;

    /// Take a submission slot, tag it with `token`, and fill it with a read of `buffer.len()`
    /// bytes from `fd` at `offset`. The slot is queued but not submitted.
    ///
    /// # Safety
    ///
    /// The kernel writes into `buffer` asynchronously. The memory behind `buffer` and the
    /// descriptor `fd` must stay valid and untouched until the completion carrying `token` has been
    /// marked seen.
    unsafe fn prepare_read(
        &mut self,
        token: Token,
        fd: RawFd,
        buffer: &mut Buffer,
        offset: u64,
    ) -> Result<()>;

    /// Take a submission slot, tag it with `token`, and fill it with a write of `buffer` to `fd` at
    /// `offset`. The slot is queued but not submitted.
    ///
    /// # Safety
    ///
    /// The kernel reads from `buffer` asynchronously. The memory behind `buffer` and the descriptor
    /// `fd` must stay valid and unmodified until the completion carrying `token` has been marked
    /// seen.
    unsafe fn prepare_write(
        &mut self,
        token: Token,
        fd: RawFd,
        buffer: &Buffer,
        offset: u64,
    ) -> Result<()>;

    /// Flush every queued slot to the kernel in one batch, returning how many were submitted.
    ///
    /// Slots run in the order they were queued as far as writes are concerned: anything queued
    /// after a write in the same batch starts only once that write has completed. Calling this
    /// with nothing queued is allowed and gives a ring the chance to free up submission slots.
    fn submit_queued(&mut self) -> Result<usize>;

    /// Block until a completion is available, or until `timeout` expires in which case `None` is
    /// returned. Waiting flushes any queued slots first. The returned event stays at the head of
    /// the completion queue until it is passed to [RingFacility::mark_seen].
    fn wait_for_completion(&mut self, timeout: Option<Duration>) -> Result<Option<CompletionEvent>>;

    /// Return the head of the completion queue without blocking.
    fn peek_completion(&mut self) -> Result<Option<CompletionEvent>>;

    /// Hand the completion slot for `event` back to the ring.
    fn mark_seen(&mut self, event: &CompletionEvent);
}

/// Open `path` with `open(2)`, failures carry the offending path.
pub(crate) fn open(path: &Path, flags: OFlag, mode: Mode) -> Result<OwnedFd> {
    let fd = fcntl::open(path, flags, mode).map_err(|errno| Error::Open {
        path: path.to_path_buf(),
        source: errno.into(),
    })?;

    // SAFETY: open(2) just handed us this descriptor, nothing else can possibly own it yet.
    Ok(unsafe { OwnedFd::from_raw_fd(fd) })
}

/// Close `fd` with `close(2)`, surfacing the error a plain drop would swallow.
pub(crate) fn close(fd: OwnedFd) -> Result<()> {
    unistd::close(fd.into_raw_fd())?;
    Ok(())
}
