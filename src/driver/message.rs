use std::{
    os::fd::OwnedFd,
    path::{Path, PathBuf},
    sync::Arc,
};

use nix::{fcntl::OFlag, sys::stat::Mode};

use crate::{
    sync::OneShot,
    uring::{Error, ReadResult, Result, RingFacility, Token, WriteResult},
    Manager,
};

/// The drainer's end of a [OneShot]. A reply that is dropped without being completed, because its
/// message was still sitting in the channel when the drainer went away for instance, completes its
/// caller with [Error::Disconnected] so no caller is left waiting forever.
pub(crate) struct Reply<T> {
    result: Option<OneShot<Result<T>>>,
}

impl<T> Reply<T> {
    fn new() -> (Reply<T>, OneShot<Result<T>>) {
        let result = OneShot::new();
        let reply = Reply {
            result: Some(result.clone()),
        };
        (reply, result)
    }

    pub(crate) fn complete(mut self, val: Result<T>) {
        if let Some(result) = self.result.take() {
            result.complete(val);
        }
    }
}

impl<T> Drop for Reply<T> {
    fn drop(&mut self) {
        if let Some(result) = self.result.take() {
            result.complete(Err(Error::Disconnected));
        }
    }
}

/// What an operation runs against, either a path opened just for this operation or a descriptor
/// the caller opened up front.
#[derive(Debug)]
pub(crate) enum Target {
    Path(PathBuf),
    File(Arc<OwnedFd>),
}

/// A read or write waiting to be prepared on the drainer's ring.
pub(crate) enum Operation {
    Read {
        target: Target,
        size: usize,
        offset: u64,
        result: Reply<ReadResult>,
    },
    Write {
        target: Target,
        data: Vec<u8>,
        offset: u64,
        result: Reply<WriteResult>,
    },
}

impl Operation {
    /// Prepare this operation on `manager`, queueing it for the next submit.
    pub(crate) fn prepare<R: RingFacility>(&self, manager: &mut Manager<R>) -> Result<Token> {
        match self {
            Operation::Read {
                target, size, offset, ..
            } => match target {
                Target::Path(path) => manager.prepare_read(path, *size, *offset),
                Target::File(fd) => manager.prepare_read_at(fd, *size, *offset),
            },
            Operation::Write {
                target,
                data,
                offset,
                ..
            } => match target {
                Target::Path(path) => manager.prepare_write(path, data, *offset),
                Target::File(fd) => manager.prepare_write_at(fd, data, *offset),
            },
        }
    }

    /// Strip the operation down to the handoff its caller is parked on.
    pub(crate) fn into_pending(self) -> Pending {
        match self {
            Operation::Read { result, .. } => Pending::Read(result),
            Operation::Write { result, .. } => Pending::Write(result),
        }
    }

    pub(crate) fn fail(self, err: Error) {
        self.into_pending().fail(err)
    }
}

/// The handoff registered under a token until that token's completion shows up.
pub(crate) enum Pending {
    Read(Reply<ReadResult>),
    Write(Reply<WriteResult>),
}

impl Pending {
    pub(crate) fn fail(self, err: Error) {
        match self {
            Pending::Read(result) => result.complete(Err(err)),
            Pending::Write(result) => result.complete(Err(err)),
        }
    }
}

/// The messages a [super::Driver] sends to its drainer.
pub(crate) enum Message {
    Operation(Operation),
    Open {
        path: PathBuf,
        flags: OFlag,
        mode: Mode,
        result: Reply<OwnedFd>,
    },
    Close,
}

impl Message {
    pub(crate) fn read(
        target: Target,
        size: usize,
        offset: u64,
    ) -> (Message, OneShot<Result<ReadResult>>) {
        let (reply, result) = Reply::new();
        let op = Operation::Read {
            target,
            size,
            offset,
            result: reply,
        };
        (Message::Operation(op), result)
    }

    pub(crate) fn write(
        target: Target,
        data: Vec<u8>,
        offset: u64,
    ) -> (Message, OneShot<Result<WriteResult>>) {
        let (reply, result) = Reply::new();
        let op = Operation::Write {
            target,
            data,
            offset,
            result: reply,
        };
        (Message::Operation(op), result)
    }

    pub(crate) fn open(
        path: &Path,
        flags: OFlag,
        mode: Mode,
    ) -> (Message, OneShot<Result<OwnedFd>>) {
        let (reply, result) = Reply::new();
        let msg = Message::Open {
            path: path.to_path_buf(),
            flags,
            mode,
            result: reply,
        };
        (msg, result)
    }

    /// Tell whoever is waiting on this message that it will never be handled.
    pub(crate) fn fail(self, err: Error) {
        match self {
            Message::Operation(op) => op.fail(err),
            Message::Open { result, .. } => result.complete(Err(err)),
            Message::Close => {}
        }
    }
}
