//! A blocking front end over a [crate::Manager] that any number of threads can share. The
//! [Driver] owns a dedicated drainer thread, which is the only thread touching the ring. Callers
//! hand operations to it over a channel and get back a [Handoff] that resolves to exactly their
//! own completion, either by awaiting it or by calling [Handoff::wait].
//!
//! ```no_run
//! use liouring::Driver;
//!
//! let driver = Driver::new()?;
//!
//! driver.write("/tmp/liouring-driver", "hello", 0).wait()?;
//! let read = driver.read("/tmp/liouring-driver", 5, 0).wait()?;
//! assert_eq!(&read.buffer()[..], b"hello");
//!
//! driver.shutdown()?;
//! # Ok::<(), liouring::Error>(())
//! ```

mod drainer;
mod file;
mod message;

use std::{
    fmt,
    path::Path,
    sync::atomic::{AtomicUsize, Ordering},
    sync::mpsc,
    sync::{Arc, Mutex},
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::info_span;

use crate::{
    sync::Handoff,
    uring::{Error, ReadResult, Result, RingConfig, RingFacility, Uring, WriteResult},
    Manager,
};

use drainer::Drainer;
use message::{Message, Target};

pub use file::{File, OpenOptions};

const DEFAULT_TICK: Duration = Duration::from_millis(100);
const DEFAULT_NAME: &str = "liouring-drainer";

/// A cloneable handle to a ring drained by its own thread. Every clone talks to the same drainer,
/// once the last clone is dropped the drainer finishes whatever is still in flight and exits.
pub struct Driver {
    state: Arc<DriverState>,
}

/// Driver configuration object.
pub struct DriverBuilder {
    ring: RingConfig,
    tick: Duration,
    name: String,
}

#[allow(dead_code)]
trait AssertSendSync: Send + Sync {}
impl AssertSendSync for Driver {}

struct DriverState {
    tx: Mutex<mpsc::Sender<Message>>,
    cnt: AtomicUsize,
    drainer: Mutex<Option<JoinHandle<Result<()>>>>,
    name: String,
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("name", &self.state.name)
            .finish()
    }
}

impl fmt::Debug for DriverBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverBuilder")
            .field("ring", &self.ring)
            .field("tick", &self.tick)
            .field("name", &self.name)
            .finish()
    }
}

impl Driver {
    /// Start a driver with the default configuration.
    ///
    /// See documentation for the methods in [DriverBuilder] for details on the default
    /// configuration.
    pub fn new() -> Result<Driver> {
        DriverBuilder::new().create()
    }

    /// Create a default driver configuration, which can then be customized.
    pub fn builder() -> DriverBuilder {
        DriverBuilder::new()
    }

    /// Read `size` bytes of `path` starting at `offset`. The file is opened for this read alone
    /// and closed again once it completes.
    pub fn read<P: AsRef<Path>>(
        &self,
        path: P,
        size: usize,
        offset: u64,
    ) -> Handoff<Result<ReadResult>> {
        self.read_target(Target::Path(path.as_ref().to_path_buf()), size, offset)
    }

    /// Write `data` to `path` at `offset`, creating the file if it doesn't exist. Like
    /// [Driver::read] the file is only open for the lifetime of this one write.
    pub fn write<P, B>(&self, path: P, data: B, offset: u64) -> Handoff<Result<WriteResult>>
    where
        P: AsRef<Path>,
        B: Into<Vec<u8>>,
    {
        self.write_target(Target::Path(path.as_ref().to_path_buf()), data.into(), offset)
    }

    /// Open `path` once for any number of reads and writes, see [File].
    pub fn open<P: AsRef<Path>>(&self, path: P, options: &OpenOptions) -> Result<File> {
        let (flags, mode) = options.as_flags();
        let (msg, result) = Message::open(path.as_ref(), flags, mode);
        self.state.send(msg);
        let fd = Handoff::new(result).wait()?;
        Ok(File::new(fd, self.clone()))
    }

    pub(crate) fn read_target(
        &self,
        target: Target,
        size: usize,
        offset: u64,
    ) -> Handoff<Result<ReadResult>> {
        let (msg, result) = Message::read(target, size, offset);
        self.state.send(msg);
        Handoff::new(result)
    }

    pub(crate) fn write_target(
        &self,
        target: Target,
        data: Vec<u8>,
        offset: u64,
    ) -> Handoff<Result<WriteResult>> {
        let (msg, result) = Message::write(target, data, offset);
        self.state.send(msg);
        Handoff::new(result)
    }

    /// Ask the drainer to stop and wait for it to exit. Operations already handed over are still
    /// driven to completion first, anything other clones send once the drainer is gone is rejected
    /// with [Error::Disconnected]. The first call returns the drainer's own result, later calls from
    /// other clones find the drainer already joined and return `Ok(())`.
    pub fn shutdown(self) -> Result<()> {
        self.state.send(Message::Close);
        let drainer = self
            .state
            .drainer
            .lock()
            .expect("failed to lock drainer handle: poisoned")
            .take();
        drop(self);

        match drainer {
            Some(handle) => handle.join().map_err(|_| Error::Disconnected)?,
            None => Ok(()),
        }
    }
}

impl DriverState {
    fn send(&self, msg: Message) {
        let sent = self
            .tx
            .lock()
            .expect("failed to lock driver channel: poisoned")
            .send(msg);

        // The drainer only hangs up once it has exited, so tell the caller right away.
        if let Err(mpsc::SendError(msg)) = sent {
            msg.fail(Error::Disconnected);
        }
    }
}

impl Clone for Driver {
    fn clone(&self) -> Self {
        self.state.cnt.fetch_add(1, Ordering::Relaxed);
        Self {
            state: self.state.clone(),
        }
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        if self.state.cnt.fetch_sub(1, Ordering::Relaxed) == 1 {
            self.state.send(Message::Close);
        }
    }
}

impl DriverBuilder {
    /// Create a default driver configuration.
    ///
    /// See the other methods on this type for details on the defaults.
    pub fn new() -> Self {
        Self {
            ring: RingConfig::default(),
            tick: DEFAULT_TICK,
            name: DEFAULT_NAME.to_string(),
        }
    }

    /// Set the submission queue depth of the driver's ring, `256` by default.
    ///
    /// # Panics
    ///
    /// Panics if `depth == 0`.
    pub fn queue_depth(&mut self, depth: u32) -> &mut Self {
        assert!(depth > 0);
        self.ring.queue_depth = depth;
        self
    }

    /// Have the kernel poll the submission queue from its own thread, off by default.
    pub fn polling(&mut self, polling: bool) -> &mut Self {
        self.ring.polling = polling;
        self
    }

    /// Set how long the kernel polling thread idles before sleeping, in milliseconds.
    pub fn poll_idle_ms(&mut self, idle: u32) -> &mut Self {
        self.ring.poll_idle_ms = idle;
        self
    }

    /// Set how long the drainer waits on the ring before checking for new operations, `100ms` by
    /// default. This bounds how long a new operation can sit in the channel while older ones are
    /// still in flight.
    pub fn tick(&mut self, tick: Duration) -> &mut Self {
        self.tick = tick;
        self
    }

    /// Set the name of the drainer thread, `liouring-drainer` by default.
    pub fn name<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Create a [Driver] over a new [Uring] with the given configuration.
    pub fn create(&mut self) -> Result<Driver> {
        let ring = Uring::new(&self.ring)?;
        self.create_with(ring)
    }

    /// Create a [Driver] draining the supplied facility instead of a new [Uring].
    pub fn create_with<R>(&mut self, ring: R) -> Result<Driver>
    where
        R: RingFacility + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let drainer = Drainer::new(Manager::with_facility(ring), rx, self.tick);

        let name = self.name.clone();
        let handle = thread::Builder::new().name(self.name.clone()).spawn(move || {
            let span = info_span!("drainer", name = %name);
            let _enter = span.enter();
            drainer.run()
        })?;

        Ok(Driver {
            state: Arc::new(DriverState {
                tx: Mutex::new(tx),
                cnt: AtomicUsize::new(1),
                drainer: Mutex::new(Some(handle)),
                name: self.name.clone(),
            }),
        })
    }
}

impl Default for DriverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
