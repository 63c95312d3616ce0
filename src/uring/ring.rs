use std::{
    collections::VecDeque,
    os::fd::{OwnedFd, RawFd},
    path::Path,
    time::Duration,
};

use io_uring::{
    opcode, squeue,
    types::{self, SubmitArgs, Timespec},
    IoUring,
};
use nix::{fcntl::OFlag, libc, sys::stat::Mode};
use tracing::trace;

use crate::request::Kind;

use super::{
    facility::{self, CompletionEvent, RingFacility},
    Buffer, Error, Result, RingConfig, Token,
};

/// The [Uring] binds the [RingFacility] contract to a real `io_uring` instance. It handles two
/// pieces of the puzzle, first off it turns prepared reads and writes into tagged submission queue
/// entries. Then it harvests completion queue entries into a local queue so the head completion
/// can be inspected before it is handed back with [RingFacility::mark_seen].
///
/// Unlike a general purpose event loop there is no local backlog here, a full submission queue is
/// reported straight back to the caller as [Error::QueueFull].
///
/// The kernel is free to run the entries of one batch in any order. Every entry queued behind a
/// write in the same batch is therefore marked `IO_DRAIN`, so a read of bytes written earlier in
/// the batch never overtakes that write.
pub struct Uring {
    ring: IoUring,
    ready: VecDeque<CompletionEvent>,
    capacity: usize,
    polling: bool,
    write_queued: bool,
}

impl Uring {
    /// Create a new [Uring] from the given [RingConfig].
    pub fn new(config: &RingConfig) -> Result<Uring> {
        let mut builder = IoUring::builder();
        if config.polling {
            builder.setup_sqpoll(config.poll_idle_ms);
        }
        let ring = builder.build(config.queue_depth)?;

        let capacity = ring.params().cq_entries() as usize;
        let ready = VecDeque::with_capacity(capacity);

        Ok(Uring {
            ring,
            ready,
            capacity,
            polling: config.polling,
            write_queued: false,
        })
    }

    fn push(&mut self, entry: squeue::Entry, kind: Kind) -> Result<()> {
        let entry = if self.write_queued {
            entry.flags(squeue::Flags::IO_DRAIN)
        } else {
            entry
        };

        // SAFETY: the caller of prepare_read/prepare_write guarantees the buffer and descriptor
        // referenced by the entry outlive its completion.
        unsafe { self.ring.submission().push(&entry)? };
        if kind == Kind::Write {
            self.write_queued = true;
        }
        Ok(())
    }

    fn harvest(&mut self) {
        for cqe in self.ring.completion() {
            let event = CompletionEvent {
                token: Token::from_user_data(cqe.user_data()),
                result: cqe.result(),
                flags: cqe.flags(),
            };
            trace!(token = %event.token, result = event.result, "harvested completion");
            self.ready.push_back(event);
        }
    }

    fn enter(&mut self, timeout: Option<Duration>) -> std::io::Result<usize> {
        match timeout {
            None => self.ring.submit_and_wait(1),
            Some(timeout) => {
                let spec = Timespec::new()
                    .sec(timeout.as_secs())
                    .nsec(timeout.subsec_nanos());
                let args = SubmitArgs::new().timespec(&spec);
                self.ring.submitter().submit_with_args(1, &args)
            }
        }
    }
}

impl RingFacility for Uring {
    fn open(&mut self, path: &Path, flags: OFlag, mode: Mode) -> Result<OwnedFd> {
        facility::open(path, flags, mode)
    }

    fn close(&mut self, fd: OwnedFd) -> Result<()> {
        facility::close(fd)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    unsafe fn prepare_read(
        &mut self,
        token: Token,
        fd: RawFd,
        buffer: &mut Buffer,
        offset: u64,
    ) -> Result<()> {
        let len = u32::try_from(buffer.len()).map_err(|_| Error::BufferTooLarge(buffer.len()))?;
        let entry = opcode::Read::new(types::Fd(fd), buffer.as_mut_ptr(), len)
            .offset(offset)
            .build()
            .user_data(token.user_data());
        trace!(%token, fd, len, offset, drained = self.write_queued, "queued read");
        self.push(entry, Kind::Read)
    }

    unsafe fn prepare_write(
        &mut self,
        token: Token,
        fd: RawFd,
        buffer: &Buffer,
        offset: u64,
    ) -> Result<()> {
        let len = u32::try_from(buffer.len()).map_err(|_| Error::BufferTooLarge(buffer.len()))?;
        let entry = opcode::Write::new(types::Fd(fd), buffer.as_ptr(), len)
            .offset(offset)
            .build()
            .user_data(token.user_data());
        trace!(%token, fd, len, offset, drained = self.write_queued, "queued write");
        self.push(entry, Kind::Write)
    }

    fn submit_queued(&mut self) -> Result<usize> {
        let submitted = self.ring.submit()?;
        self.write_queued = false;

        // With a polling thread the entries only leave the queue once that thread picks them up,
        // wait for it to make room rather than reporting a queue we just flushed as full.
        if self.polling && self.ring.submission().is_full() {
            self.ring.submitter().squeue_wait()?;
        }
        Ok(submitted)
    }

    fn wait_for_completion(&mut self, timeout: Option<Duration>) -> Result<Option<CompletionEvent>> {
        if !self.ring.submission().is_empty() {
            self.submit_queued()?;
        }

        loop {
            self.harvest();
            if let Some(event) = self.ready.front() {
                return Ok(Some(*event));
            }

            match self.enter(timeout) {
                Ok(_) => {}
                Err(e) => match e.raw_os_error() {
                    // We timed out on our ring wait, hand back whatever showed up in the meantime.
                    Some(libc::ETIME) => {
                        self.harvest();
                        return Ok(self.ready.front().copied());
                    }
                    Some(libc::EINTR) | Some(libc::EBUSY) => {}
                    _ => return Err(Error::from(e)),
                },
            }
        }
    }

    fn peek_completion(&mut self) -> Result<Option<CompletionEvent>> {
        self.harvest();
        Ok(self.ready.front().copied())
    }

    fn mark_seen(&mut self, event: &CompletionEvent) {
        if let Some(pos) = self.ready.iter().position(|ready| ready == event) {
            self.ready.remove(pos);
        }
    }
}
