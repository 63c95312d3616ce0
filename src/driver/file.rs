use std::{
    fmt,
    os::fd::{AsRawFd, OwnedFd, RawFd},
    sync::Arc,
};

use nix::{fcntl::OFlag, sys::stat::Mode};

use crate::{
    sync::Handoff,
    uring::{facility, ReadResult, Result, WriteResult},
};

use super::{message::Target, Driver};

/// Options used to open a [File] through [Driver::open], mirroring [std::fs::OpenOptions].
#[derive(Debug, Clone)]
pub struct OpenOptions {
    read: bool,
    write: bool,
    create: bool,
    truncate: bool,
    append: bool,
    mode: u32,
}

impl OpenOptions {
    /// Create a blank set of options, every flag off and a creation mode of `0o644`.
    pub fn new() -> OpenOptions {
        OpenOptions {
            read: false,
            write: false,
            create: false,
            truncate: false,
            append: false,
            mode: 0o644,
        }
    }

    pub fn read(&mut self, read: bool) -> &mut Self {
        self.read = read;
        self
    }

    pub fn write(&mut self, write: bool) -> &mut Self {
        self.write = write;
        self
    }

    pub fn create(&mut self, create: bool) -> &mut Self {
        self.create = create;
        self
    }

    pub fn truncate(&mut self, truncate: bool) -> &mut Self {
        self.truncate = truncate;
        self
    }

    pub fn append(&mut self, append: bool) -> &mut Self {
        self.append = append;
        self
    }

    /// Permission bits applied when the file is created.
    pub fn mode(&mut self, mode: u32) -> &mut Self {
        self.mode = mode;
        self
    }

    pub(crate) fn as_flags(&self) -> (OFlag, Mode) {
        let mut flags = match (self.read, self.write || self.append) {
            (true, true) => OFlag::O_RDWR,
            (false, true) => OFlag::O_WRONLY,
            _ => OFlag::O_RDONLY,
        };
        flags |= OFlag::O_CLOEXEC;
        if self.create {
            flags |= OFlag::O_CREAT;
        }
        if self.truncate {
            flags |= OFlag::O_TRUNC;
        }
        if self.append {
            flags |= OFlag::O_APPEND;
        }
        (flags, Mode::from_bits_truncate(self.mode))
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        OpenOptions::new()
    }
}

/// A file opened once and then read from and written to any number of times through its [Driver].
///
/// The descriptor is shared with every operation still in flight against it, so it stays open
/// until the last of those completes even if the [File] itself goes away first. Dropping a [File]
/// closes it quietly, [File::close] does the same but reports a failing close.
pub struct File {
    fd: Arc<OwnedFd>,
    driver: Driver,
}

impl File {
    pub(super) fn new(fd: OwnedFd, driver: Driver) -> File {
        File {
            fd: Arc::new(fd),
            driver,
        }
    }

    /// Read `size` bytes starting at `offset`.
    pub fn read_at(&self, size: usize, offset: u64) -> Handoff<Result<ReadResult>> {
        self.driver
            .read_target(Target::File(self.fd.clone()), size, offset)
    }

    /// Write `data` at `offset`.
    pub fn write_at<B: Into<Vec<u8>>>(&self, data: B, offset: u64) -> Handoff<Result<WriteResult>> {
        self.driver
            .write_target(Target::File(self.fd.clone()), data.into(), offset)
    }

    /// Close the file. If operations against it are still in flight the descriptor is closed by
    /// the drainer once the last of them completes instead.
    pub fn close(self) -> Result<()> {
        let File { fd, driver } = self;
        drop(driver);
        match Arc::try_unwrap(fd) {
            Ok(fd) => facility::close(fd),
            Err(_) => Ok(()),
        }
    }
}

impl AsRawFd for File {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File").field("fd", &self.fd).finish()
    }
}
