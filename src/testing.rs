//! Test-only helpers: an in-process [RingFacility] with deterministic behaviour, and a scratch
//! directory named after the running test.

use std::{
    collections::VecDeque,
    io,
    os::fd::{BorrowedFd, OwnedFd, RawFd},
    path::Path,
    slice,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use nix::{fcntl::OFlag, libc, sys::stat::Mode, sys::uio};

use crate::{
    request::Kind,
    uring::{facility, Buffer, CompletionEvent, Error, Result, RingFacility, Token},
};

mod dir;

pub(crate) use dir::TestDir;

/// Byte pattern written over a buffer as it is freed, a later read of the same memory through a
/// stale pointer would show it.
const POISON: u8 = 0xde;

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

struct Op {
    token: Token,
    kind: Kind,
    fd: RawFd,
    addr: usize,
    len: usize,
    offset: u64,
}

#[derive(Default)]
pub(crate) struct Stats {
    pub(crate) freed: Vec<usize>,
    pub(crate) closed: usize,
    pub(crate) submits: usize,
    pub(crate) seen: usize,
    injected: VecDeque<CompletionEvent>,
}

/// A shared view into a [FakeRing] that stays usable after the ring moved into a manager.
#[derive(Clone, Default)]
pub(crate) struct FakeHandle(Arc<Mutex<Stats>>);

impl FakeHandle {
    pub(crate) fn stats(&self) -> MutexGuard<'_, Stats> {
        self.0.lock().expect("failed to lock fake ring stats: poisoned")
    }

    /// Queue a completion for the next harvest, as if the kernel produced it.
    pub(crate) fn inject(&self, event: CompletionEvent) {
        self.stats().injected.push_back(event);
    }
}

/// A [RingFacility] that performs the queued operations synchronously with `pread`/`pwrite` when
/// they are submitted, in submission order, and then reports their completions in reverse order.
///
/// A lagging fake behaves like a ring with a polling thread that is slow to pick entries up: the
/// entries of one submission keep their submission queue slots until the next call to submit.
pub(crate) struct FakeRing {
    depth: usize,
    capacity: usize,
    queued: Vec<Op>,
    lag: bool,
    lagging: usize,
    ready: VecDeque<CompletionEvent>,
    handle: FakeHandle,
}

impl FakeRing {
    pub(crate) fn new(depth: usize) -> FakeRing {
        FakeRing::with_capacity(depth, depth * 2)
    }

    pub(crate) fn with_capacity(depth: usize, capacity: usize) -> FakeRing {
        FakeRing {
            depth,
            capacity,
            queued: Vec::new(),
            lag: false,
            lagging: 0,
            ready: VecDeque::new(),
            handle: FakeHandle::default(),
        }
    }

    pub(crate) fn lagging(depth: usize) -> FakeRing {
        FakeRing {
            lag: true,
            ..FakeRing::new(depth)
        }
    }

    pub(crate) fn handle(&self) -> FakeHandle {
        self.handle.clone()
    }

    fn queue(&mut self, op: Op) -> Result<()> {
        if self.queued.len() + self.lagging >= self.depth {
            return Err(Error::QueueFull);
        }
        self.queued.push(op);
        Ok(())
    }

    fn harvest(&mut self) {
        let mut stats = self.handle.stats();
        self.ready.extend(stats.injected.drain(..));
    }

    fn execute(op: &Op) -> i32 {
        // SAFETY: the manager keeps the descriptor and the buffer alive until the completion is
        // seen, and the fake runs the operation before even reporting it.
        let fd = unsafe { BorrowedFd::borrow_raw(op.fd) };
        let offset = op.offset as libc::off_t;
        let result = match op.kind {
            Kind::Read => {
                let buf = unsafe { slice::from_raw_parts_mut(op.addr as *mut u8, op.len) };
                uio::pread(fd, buf, offset)
            }
            Kind::Write => {
                let buf = unsafe { slice::from_raw_parts(op.addr as *const u8, op.len) };
                uio::pwrite(fd, buf, offset)
            }
        };
        match result {
            Ok(n) => n as i32,
            Err(errno) => -(errno as i32),
        }
    }
}

impl RingFacility for FakeRing {
    fn open(&mut self, path: &Path, flags: OFlag, mode: Mode) -> Result<OwnedFd> {
        facility::open(path, flags, mode)
    }

    fn close(&mut self, fd: OwnedFd) -> Result<()> {
        self.handle.stats().closed += 1;
        facility::close(fd)
    }

    fn free(&mut self, mut buffer: Buffer) {
        buffer.fill(POISON);
        self.handle.stats().freed.push(buffer.as_ptr() as usize);
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
        let op = Op {
            token,
            kind: Kind::Read,
            fd,
            addr: buffer.as_mut_ptr() as usize,
            len: buffer.len(),
            offset,
        };
        self.queue(op)
    }

    unsafe fn prepare_write(
        &mut self,
        token: Token,
        fd: RawFd,
        buffer: &Buffer,
        offset: u64,
    ) -> Result<()> {
        let op = Op {
            token,
            kind: Kind::Write,
            fd,
            addr: buffer.as_ptr() as usize,
            len: buffer.len(),
            offset,
        };
        self.queue(op)
    }

    fn submit_queued(&mut self) -> Result<usize> {
        let ops: Vec<Op> = self.queued.drain(..).collect();
        let events: Vec<CompletionEvent> = ops
            .iter()
            .map(|op| CompletionEvent {
                token: op.token,
                result: FakeRing::execute(op),
                flags: 0,
            })
            .collect();
        self.ready.extend(events.into_iter().rev());
        self.lagging = if self.lag { ops.len() } else { 0 };
        self.handle.stats().submits += 1;
        Ok(ops.len())
    }

    fn wait_for_completion(&mut self, timeout: Option<Duration>) -> Result<Option<CompletionEvent>> {
        if !self.queued.is_empty() {
            self.submit_queued()?;
        }
        self.harvest();
        match (self.ready.front(), timeout) {
            (Some(event), _) => Ok(Some(*event)),
            (None, Some(_)) => Ok(None),
            (None, None) => Err(Error::IO(io::Error::new(
                io::ErrorKind::WouldBlock,
                "fake ring would block forever",
            ))),
        }
    }

    fn peek_completion(&mut self) -> Result<Option<CompletionEvent>> {
        self.harvest();
        Ok(self.ready.front().copied())
    }

    fn mark_seen(&mut self, event: &CompletionEvent) {
        if let Some(pos) = self.ready.iter().position(|ready| ready == event) {
            self.ready.remove(pos);
            self.handle.stats().seen += 1;
        }
    }
}
