use std::{
    os::fd::{AsRawFd, OwnedFd},
    path::Path,
    sync::Arc,
    time::Duration,
};

use nix::{fcntl::OFlag, sys::stat::Mode};
use tracing::{debug, error, warn};

use crate::{
    request::{Kind, Request, Tracker},
    uring::{
        Buffer, Completion, CompletionEvent, Error, ReadResult, Result, RingConfig, RingFacility,
        Token, Uring, WriteResult,
    },
};

/// The [Manager] orchestrates the life of every operation on a single ring: prepare, submit, then
/// wait. It owns the ring facility along with the [Tracker] that correlates completions back to
/// the request that produced them, and it enforces the cleanup policy for buffers and descriptors:
///
/// - Descriptors opened by [Manager::prepare_read] and [Manager::prepare_write] are closed as soon
///   as the operation's completion is consumed.
/// - Write buffers are released internally once the write's completion is consumed.
/// - Read buffers are handed to the caller in the [ReadResult] and never released here.
///
/// The ring is single writer, so a [Manager] must only be driven from one thread at a time. To
/// share a ring between many callers use a [crate::Driver] instead.
///
/// # Examples
///
/// ```no_run
/// use liouring::{Completion, Manager};
///
/// let mut manager = Manager::new(2, false)?;
/// manager.prepare_write("t.txt", b"hi", 0)?;
/// manager.prepare_read("t.txt", 2, 0)?;
/// manager.submit()?;
///
/// for _ in 0..2 {
///     match manager.wait_for_result()? {
///         Completion::Read(read) => println!("read {:?}", &read.buffer()[..]),
///         Completion::Write(write) => println!("wrote {} bytes", write.result()),
///     }
/// }
/// manager.close()?;
/// # Ok::<(), liouring::Error>(())
/// ```
pub struct Manager<R: RingFacility = Uring> {
    ring: Option<R>,
    tracker: Tracker,
    queued: usize,
}

impl Manager<Uring> {
    /// Create a new [Manager] on top of a fresh `io_uring` with `queue_depth` submission entries,
    /// optionally with kernel side submission queue polling.
    pub fn new(queue_depth: u32, polling: bool) -> Result<Manager<Uring>> {
        Manager::from_config(&RingConfig::new(queue_depth, polling))
    }

    pub fn from_config(config: &RingConfig) -> Result<Manager<Uring>> {
        Ok(Manager::with_facility(Uring::new(config)?))
    }
}

impl<R: RingFacility> Manager<R> {
    /// Create a new [Manager] driving the given ring facility.
    pub fn with_facility(ring: R) -> Manager<R> {
        let tracker = Tracker::with_capacity(ring.capacity());
        Manager {
            ring: Some(ring),
            tracker,
            queued: 0,
        }
    }

    /// Prepare a read of `size` bytes at `offset` from the file at `path`. The file is opened read
    /// only, a fresh buffer is allocated for the result, and the read is queued but not submitted.
    ///
    /// Failing to open the file is reported here, never as a completion.
    pub fn prepare_read<P: AsRef<Path>>(
        &mut self,
        path: P,
        size: usize,
        offset: u64,
    ) -> Result<Token> {
        self.ensure_capacity(size)?;
        let ring = self.facility()?;
        let fd = ring.open(
            path.as_ref(),
            OFlag::O_RDONLY | OFlag::O_CLOEXEC,
            Mode::empty(),
        )?;
        let buffer = ring.allocate(size);
        self.enqueue(Kind::Read, Arc::new(fd), buffer, offset)
    }

    /// Prepare a write of `bytes` at `offset` to the file at `path`. The file is opened for writing
    /// and created if absent, `bytes` is copied into an internal buffer, and the write is queued
    /// but not submitted.
    pub fn prepare_write<P: AsRef<Path>>(
        &mut self,
        path: P,
        bytes: &[u8],
        offset: u64,
    ) -> Result<Token> {
        self.ensure_capacity(bytes.len())?;
        let ring = self.facility()?;
        let fd = ring.open(
            path.as_ref(),
            OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_CLOEXEC,
            Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP | Mode::S_IROTH,
        )?;
        let mut buffer = ring.allocate(bytes.len());
        buffer.copy_from_slice(bytes);
        self.enqueue(Kind::Write, Arc::new(fd), buffer, offset)
    }

    /// Prepare a read against an already open descriptor. The descriptor is shared, it is only
    /// closed here if this request ends up holding the last reference to it.
    pub fn prepare_read_at(
        &mut self,
        file: &Arc<OwnedFd>,
        size: usize,
        offset: u64,
    ) -> Result<Token> {
        self.ensure_capacity(size)?;
        let buffer = self.facility()?.allocate(size);
        self.enqueue(Kind::Read, file.clone(), buffer, offset)
    }

    /// Prepare a write against an already open descriptor, see [Manager::prepare_read_at].
    pub fn prepare_write_at(
        &mut self,
        file: &Arc<OwnedFd>,
        bytes: &[u8],
        offset: u64,
    ) -> Result<Token> {
        self.ensure_capacity(bytes.len())?;
        let mut buffer = self.facility()?.allocate(bytes.len());
        buffer.copy_from_slice(bytes);
        self.enqueue(Kind::Write, file.clone(), buffer, offset)
    }

    /// Open a file through the ring facility, for use with [Manager::prepare_read_at] and
    /// [Manager::prepare_write_at].
    pub fn open<P: AsRef<Path>>(&mut self, path: P, flags: OFlag, mode: Mode) -> Result<OwnedFd> {
        self.facility()?.open(path.as_ref(), flags, mode)
    }

    /// Flush every queued operation to the kernel in a single batch. This is a no-op when nothing
    /// is queued and may be called any number of times between prepares.
    pub fn submit(&mut self) -> Result<usize> {
        let ring = self.ring.as_mut().ok_or(Error::Closed)?;
        if self.queued == 0 {
            return Ok(0);
        }

        let submitted = ring.submit_queued()?;
        debug!(queued = self.queued, submitted, "submitted operations");
        self.queued = 0;
        Ok(submitted)
    }

    /// Like [Manager::submit] but always enters the ring, even with nothing queued. A ring whose
    /// submission queue is drained by a polling thread may still report [Error::QueueFull] after
    /// every queued operation was submitted, flushing is what makes room again.
    pub(crate) fn flush(&mut self) -> Result<usize> {
        let ring = self.ring.as_mut().ok_or(Error::Closed)?;
        let submitted = ring.submit_queued()?;
        debug!(queued = self.queued, submitted, "flushed submission queue");
        self.queued = 0;
        Ok(submitted)
    }

    /// Block until one completion is available and return its typed result. The matching request
    /// is retired, its descriptor released, and for writes its buffer freed.
    ///
    /// Returns [Error::NothingPending] rather than blocking forever when no operation is
    /// outstanding. Waiting flushes queued operations the same way [Manager::submit] does.
    pub fn wait_for_result(&mut self) -> Result<Completion> {
        loop {
            if let Some(completion) = self.wait(None)? {
                return Ok(completion);
            }
        }
    }

    /// Like [Manager::wait_for_result] but gives up after `timeout`, returning `None`.
    pub fn wait_for_result_timeout(&mut self, timeout: Duration) -> Result<Option<Completion>> {
        self.wait(Some(timeout))
    }

    /// Consume a completion if one is already available, without blocking or submitting.
    pub fn try_wait_for_result(&mut self) -> Result<Option<Completion>> {
        let ring = self.ring.as_mut().ok_or(Error::Closed)?;
        if self.tracker.is_empty() {
            return Err(Error::NothingPending);
        }

        match ring.peek_completion()? {
            Some(event) => self.complete(event).map(Some),
            None => Ok(None),
        }
    }

    fn wait(&mut self, timeout: Option<Duration>) -> Result<Option<Completion>> {
        let ring = self.ring.as_mut().ok_or(Error::Closed)?;
        if self.tracker.is_empty() {
            return Err(Error::NothingPending);
        }

        let event = ring.wait_for_completion(timeout)?;
        self.queued = 0;
        match event {
            Some(event) => self.complete(event).map(Some),
            None => Ok(None),
        }
    }

    /// Release the ring. This refuses with [Error::Outstanding] while any operation is still
    /// outstanding, leaving the manager untouched so those can be drained first. Every call after a
    /// successful close fails with [Error::Closed].
    pub fn close(&mut self) -> Result<()> {
        if self.ring.is_none() {
            return Err(Error::Closed);
        }
        if !self.tracker.is_empty() {
            return Err(Error::Outstanding(self.tracker.len()));
        }

        self.ring.take();
        debug!("closed ring");
        Ok(())
    }

    /// The number of operations prepared but whose completion has not been consumed yet.
    pub fn outstanding(&self) -> usize {
        self.tracker.len()
    }

    /// The number of operations prepared since the last submit.
    pub fn queued(&self) -> usize {
        self.queued
    }

    /// The number of operations that may be outstanding at once, zero once closed.
    pub fn capacity(&self) -> usize {
        self.ring.as_ref().map(|ring| ring.capacity()).unwrap_or(0)
    }

    pub fn is_closed(&self) -> bool {
        self.ring.is_none()
    }

    fn facility(&mut self) -> Result<&mut R> {
        self.ring.as_mut().ok_or(Error::Closed)
    }

    fn ensure_capacity(&self, size: usize) -> Result<()> {
        let ring = self.ring.as_ref().ok_or(Error::Closed)?;
        if u32::try_from(size).is_err() {
            return Err(Error::BufferTooLarge(size));
        }
        if self.tracker.len() >= ring.capacity() {
            return Err(Error::CapacityExhausted(ring.capacity()));
        }
        Ok(())
    }

    fn enqueue(
        &mut self,
        kind: Kind,
        file: Arc<OwnedFd>,
        buffer: Buffer,
        offset: u64,
    ) -> Result<Token> {
        let ring = self.ring.as_mut().ok_or(Error::Closed)?;
        let len = buffer.len();
        let token = self.tracker.reserve();
        self.tracker
            .register(token, Request::new(kind, file, buffer))?;

        let request = self.tracker.get_mut(token)?;
        let fd = request.file.as_raw_fd();
        // SAFETY: the request, and with it the buffer and descriptor, stays in the tracker until the
        // completion carrying this token has been consumed and marked seen.
        let queued = unsafe {
            match kind {
                Kind::Read => ring.prepare_read(token, fd, &mut request.buffer, offset),
                Kind::Write => ring.prepare_write(token, fd, &request.buffer, offset),
            }
        };

        if let Err(err) = queued {
            let request = self.tracker.resolve_and_remove(token)?;
            discard(ring, request);
            return Err(err);
        }

        self.queued += 1;
        debug!(%token, ?kind, len, offset, "prepared operation");
        Ok(token)
    }

    fn complete(&mut self, event: CompletionEvent) -> Result<Completion> {
        let ring = self.ring.as_mut().ok_or(Error::Closed)?;
        let request = self.tracker.resolve_and_remove(event.token);
        ring.mark_seen(&event);

        let Request { kind, file, buffer } = match request {
            Ok(request) => request,
            Err(err) => {
                error!(token = %event.token, result = event.result, "completion for unknown token");
                return Err(err);
            }
        };

        if let Err(err) = release_file(ring, file) {
            warn!(token = %event.token, %err, "failed to close file descriptor");
        }

        debug!(token = %event.token, ?kind, result = event.result, "consumed completion");
        let completion = match kind {
            Kind::Write => {
                ring.free(buffer);
                Completion::Write(WriteResult::new(event.token, event.result))
            }
            Kind::Read => Completion::Read(ReadResult::new(event.token, buffer, event.result)),
        };
        Ok(completion)
    }
}

impl<R: RingFacility> Drop for Manager<R> {
    fn drop(&mut self) {
        if !self.tracker.is_empty() {
            // The kernel may still be reading or writing these buffers, so they can't be freed.
            let leaked = self.tracker.leak();
            warn!(
                leaked,
                "dropped ring with outstanding operations, leaking their buffers and descriptors"
            );
        }
    }
}

/// Close `file` if this was the last reference to it.
fn release_file<R: RingFacility>(ring: &mut R, file: Arc<OwnedFd>) -> Result<()> {
    match Arc::try_unwrap(file) {
        Ok(fd) => ring.close(fd),
        Err(_) => Ok(()),
    }
}

/// Release everything a request holds without it ever having been submitted.
fn discard<R: RingFacility>(ring: &mut R, request: Request) {
    let Request { buffer, file, .. } = request;
    ring.free(buffer);
    if let Err(err) = release_file(ring, file) {
        warn!(%err, "failed to close file descriptor");
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, fs};

    use super::*;
    use crate::testing::{init_tracing, FakeHandle, FakeRing, TestDir};

    fn fake_manager(depth: usize) -> (Manager<FakeRing>, FakeHandle) {
        init_tracing();
        let ring = FakeRing::new(depth);
        let handle = ring.handle();
        (Manager::with_facility(ring), handle)
    }

    #[test]
    fn test_write_then_read_scenario() {
        let dir = TestDir::new();
        let path = dir.join("t.txt");
        let (mut manager, handle) = fake_manager(2);

        let write = manager.prepare_write(&path, b"hi", 0).unwrap();
        let read = manager.prepare_read(&path, 2, 0).unwrap();
        assert_eq!(manager.queued(), 2);
        assert_eq!(manager.submit().unwrap(), 2);

        let mut writes = 0;
        let mut reads = 0;
        for _ in 0..2 {
            match manager.wait_for_result().unwrap() {
                Completion::Write(result) => {
                    assert_eq!(result.token(), write);
                    assert_eq!(result.result(), 2);
                    writes += 1;
                }
                Completion::Read(result) => {
                    assert_eq!(result.token(), read);
                    assert_eq!(result.result(), 2);
                    assert_eq!(&result.buffer()[..], b"hi");
                    let addr = result.buffer().as_ptr() as usize;
                    assert!(!handle.stats().freed.contains(&addr));
                    result.into_buffer().release();
                    reads += 1;
                }
            }
        }
        assert_eq!((writes, reads), (1, 1));
        assert_eq!(manager.outstanding(), 0);

        let stats = handle.stats();
        assert_eq!(stats.freed.len(), 1);
        assert_eq!(stats.closed, 2);
        assert_eq!(stats.seen, 2);
    }

    #[test]
    fn test_each_wait_returns_distinct_result() {
        let dir = TestDir::new();
        let (mut manager, _handle) = fake_manager(8);

        let mut tokens = HashSet::new();
        for i in 0..8u8 {
            let path = dir.join(format!("file-{}", i));
            fs::write(&path, [i; 4]).unwrap();
            tokens.insert(manager.prepare_read(&path, 4, 0).unwrap());
        }
        assert_eq!(tokens.len(), 8);
        manager.submit().unwrap();

        let mut seen = HashSet::new();
        for _ in 0..8 {
            let read = match manager.wait_for_result().unwrap() {
                Completion::Read(read) => read,
                Completion::Write(_) => panic!("only reads were prepared"),
            };
            assert!(tokens.contains(&read.token()));
            assert!(seen.insert(read.token()));
        }
        assert_eq!(manager.outstanding(), 0);
        assert!(matches!(
            manager.wait_for_result(),
            Err(Error::NothingPending)
        ));
    }

    #[test]
    fn test_round_trip_at_offset() {
        let dir = TestDir::new();
        let path = dir.join("round-trip");
        let (mut manager, _handle) = fake_manager(4);
        let payload = b"the quick brown fox";

        manager.prepare_write(&path, payload, 100).unwrap();
        manager.submit().unwrap();
        match manager.wait_for_result().unwrap() {
            Completion::Write(write) => {
                assert_eq!(write.bytes_written().unwrap(), payload.len())
            }
            Completion::Read(_) => panic!("expected a write"),
        }

        manager.prepare_read(&path, payload.len(), 100).unwrap();
        manager.submit().unwrap();
        match manager.wait_for_result().unwrap() {
            Completion::Read(read) => assert_eq!(&read.buffer()[..], payload),
            Completion::Write(_) => panic!("expected a read"),
        }
    }

    #[test]
    fn test_missing_file_fails_at_prepare() {
        let dir = TestDir::new();
        let (mut manager, handle) = fake_manager(2);

        let err = manager
            .prepare_read(dir.join("does-not-exist"), 8, 0)
            .unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
        assert_eq!(manager.outstanding(), 0);
        assert_eq!(manager.queued(), 0);
        assert_eq!(manager.submit().unwrap(), 0);
        assert_eq!(handle.stats().submits, 0);
    }

    #[test]
    fn test_concurrent_reads_are_isolated() {
        let dir = TestDir::new();
        let (mut manager, _handle) = fake_manager(4);
        fs::write(dir.join("a"), b"aaaa").unwrap();
        fs::write(dir.join("b"), b"bbbb").unwrap();

        let a = manager.prepare_read(dir.join("a"), 4, 0).unwrap();
        manager.prepare_read(dir.join("b"), 4, 0).unwrap();
        manager.submit().unwrap();

        let mut first = manager.wait_for_result().unwrap();
        let mut second = manager.wait_for_result().unwrap();
        if first.token() != a {
            std::mem::swap(&mut first, &mut second);
        }
        let (a, b) = match (first, second) {
            (Completion::Read(a), Completion::Read(b)) => (a.into_buffer(), b.into_buffer()),
            _ => panic!("expected two reads"),
        };
        assert_eq!(&a[..], b"aaaa");
        a.release();
        assert_eq!(&b[..], b"bbbb");
    }

    #[test]
    fn test_write_buffer_released_once() {
        let dir = TestDir::new();
        let (mut manager, handle) = fake_manager(2);

        manager.prepare_write(dir.join("w"), b"payload", 0).unwrap();
        manager.submit().unwrap();
        assert!(matches!(
            manager.wait_for_result().unwrap(),
            Completion::Write(_)
        ));

        // Freed exactly once, and only after the write landed.
        assert_eq!(handle.stats().freed.len(), 1);
        assert_eq!(fs::read(dir.join("w")).unwrap(), b"payload");
    }

    #[test]
    fn test_capacity_exhausted() {
        let dir = TestDir::new();
        init_tracing();
        let ring = FakeRing::with_capacity(4, 2);
        let handle = ring.handle();
        let mut manager = Manager::with_facility(ring);
        let path = dir.join("cap");

        manager.prepare_write(&path, b"1", 0).unwrap();
        manager.prepare_write(&path, b"2", 1).unwrap();
        assert!(matches!(
            manager.prepare_write(&path, b"3", 2),
            Err(Error::CapacityExhausted(2))
        ));
        assert_eq!(manager.outstanding(), 2);

        manager.submit().unwrap();
        manager.wait_for_result().unwrap();
        manager.prepare_write(&path, b"3", 2).unwrap();
        manager.submit().unwrap();
        manager.wait_for_result().unwrap();
        manager.wait_for_result().unwrap();
        assert_eq!(handle.stats().closed, 3);
        assert_eq!(fs::read(&path).unwrap(), b"123");
    }

    #[test]
    fn test_queue_full_releases_resources() {
        let dir = TestDir::new();
        init_tracing();
        let ring = FakeRing::with_capacity(1, 4);
        let handle = ring.handle();
        let mut manager = Manager::with_facility(ring);
        let path = dir.join("full");

        manager.prepare_write(&path, b"a", 0).unwrap();
        assert!(matches!(
            manager.prepare_write(&path, b"b", 1),
            Err(Error::QueueFull)
        ));
        assert_eq!(manager.outstanding(), 1);
        assert_eq!(manager.queued(), 1);
        {
            let stats = handle.stats();
            assert_eq!(stats.freed.len(), 1);
            assert_eq!(stats.closed, 1);
        }

        manager.submit().unwrap();
        manager.wait_for_result().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"a");
    }

    #[test]
    fn test_unknown_token_is_fatal() {
        let dir = TestDir::new();
        let (mut manager, handle) = fake_manager(2);
        manager.prepare_write(dir.join("x"), b"x", 0).unwrap();

        let bogus = Token::new(9, 77);
        handle.inject(CompletionEvent {
            token: bogus,
            result: 0,
            flags: 0,
        });
        assert!(matches!(
            manager.try_wait_for_result(),
            Err(Error::UnknownToken(token)) if token == bogus
        ));
        assert_eq!(manager.outstanding(), 1);

        manager.submit().unwrap();
        assert!(matches!(
            manager.wait_for_result().unwrap(),
            Completion::Write(_)
        ));
        assert_eq!(handle.stats().seen, 2);
    }

    #[test]
    fn test_close_with_outstanding_fails() {
        let dir = TestDir::new();
        let (mut manager, _handle) = fake_manager(2);
        manager.prepare_write(dir.join("c"), b"c", 0).unwrap();

        assert!(matches!(manager.close(), Err(Error::Outstanding(1))));
        assert!(!manager.is_closed());

        manager.submit().unwrap();
        manager.wait_for_result().unwrap();
        manager.close().unwrap();
        assert!(manager.is_closed());
        assert_eq!(manager.capacity(), 0);

        assert!(matches!(manager.close(), Err(Error::Closed)));
        assert!(matches!(
            manager.prepare_read(dir.join("c"), 1, 0),
            Err(Error::Closed)
        ));
        assert!(matches!(manager.submit(), Err(Error::Closed)));
        assert!(matches!(manager.wait_for_result(), Err(Error::Closed)));
    }

    #[test]
    fn test_try_wait_does_not_submit() {
        let dir = TestDir::new();
        let (mut manager, handle) = fake_manager(2);
        manager.prepare_write(dir.join("t"), b"t", 0).unwrap();

        assert!(manager.try_wait_for_result().unwrap().is_none());
        assert_eq!(handle.stats().submits, 0);

        manager.submit().unwrap();
        assert!(manager.try_wait_for_result().unwrap().is_some());
        assert!(matches!(
            manager.try_wait_for_result(),
            Err(Error::NothingPending)
        ));
    }

    #[test]
    fn test_wait_flushes_queued() {
        let dir = TestDir::new();
        let (mut manager, handle) = fake_manager(2);
        manager.prepare_write(dir.join("f"), b"f", 0).unwrap();

        let completion = manager
            .wait_for_result_timeout(Duration::from_millis(10))
            .unwrap();
        assert!(matches!(completion, Some(Completion::Write(_))));
        assert_eq!(manager.queued(), 0);
        assert_eq!(handle.stats().submits, 1);
        assert_eq!(manager.submit().unwrap(), 0);
    }

    #[test]
    fn test_flush_with_nothing_queued() {
        let dir = TestDir::new();
        init_tracing();
        let ring = FakeRing::lagging(1);
        let handle = ring.handle();
        let mut manager = Manager::with_facility(ring);
        let path = dir.join("lag");

        manager.prepare_write(&path, b"a", 0).unwrap();
        assert_eq!(manager.submit().unwrap(), 1);
        manager.wait_for_result().unwrap();

        // The submitted entry still holds its slot, and a plain submit has nothing to do.
        assert!(matches!(
            manager.prepare_write(&path, b"b", 1),
            Err(Error::QueueFull)
        ));
        assert_eq!(manager.submit().unwrap(), 0);
        assert_eq!(handle.stats().submits, 1);

        assert_eq!(manager.flush().unwrap(), 0);
        assert_eq!(handle.stats().submits, 2);
        manager.prepare_write(&path, b"b", 1).unwrap();
        manager.wait_for_result().unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"ab");
    }

    #[test]
    fn test_shared_descriptor_stays_open() {
        let dir = TestDir::new();
        let path = dir.join("shared");
        fs::write(&path, b"shared").unwrap();
        let (mut manager, handle) = fake_manager(2);

        let fd = Arc::new(
            manager
                .open(&path, OFlag::O_RDONLY | OFlag::O_CLOEXEC, Mode::empty())
                .unwrap(),
        );
        for _ in 0..2 {
            manager.prepare_read_at(&fd, 6, 0).unwrap();
        }
        manager.submit().unwrap();
        for _ in 0..2 {
            match manager.wait_for_result().unwrap() {
                Completion::Read(read) => assert_eq!(&read.buffer()[..], b"shared"),
                Completion::Write(_) => panic!("expected a read"),
            }
        }
        assert_eq!(handle.stats().closed, 0);
        assert_eq!(Arc::strong_count(&fd), 1);
    }

    #[test]
    fn test_drop_with_outstanding_leaks() {
        let dir = TestDir::new();
        let (mut manager, handle) = fake_manager(2);
        manager.prepare_write(dir.join("leak"), b"leak", 0).unwrap();
        manager.submit().unwrap();
        drop(manager);

        let stats = handle.stats();
        assert!(stats.freed.is_empty());
        assert_eq!(stats.closed, 0);
    }
}
