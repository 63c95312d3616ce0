use std::{cmp::Ordering, io};

use super::{Buffer, Token};

/// The typed outcome of a single operation, as handed back by [crate::Manager::wait_for_result].
/// Match on it exhaustively to tell reads from writes.
#[derive(Debug)]
pub enum Completion {
    Read(ReadResult),
    Write(WriteResult),
}

impl Completion {
    /// The token returned by the prepare call that produced this completion.
    pub fn token(&self) -> Token {
        match self {
            Completion::Read(read) => read.token,
            Completion::Write(write) => write.token,
        }
    }

    /// The raw result code reported by the kernel.
    pub fn result(&self) -> i32 {
        match self {
            Completion::Read(read) => read.result,
            Completion::Write(write) => write.result,
        }
    }
}

/// The outcome of a read. This owns the buffer the kernel read into, the caller is responsible for
/// releasing it once it is done with the contents.
#[derive(Debug)]
pub struct ReadResult {
    token: Token,
    buffer: Buffer,
    result: i32,
}

impl ReadResult {
    pub(crate) fn new(token: Token, buffer: Buffer, result: i32) -> ReadResult {
        ReadResult {
            token,
            buffer,
            result,
        }
    }

    pub fn token(&self) -> Token {
        self.token
    }

    /// The raw result code, negative values are `-errno` and non-negative values a byte count.
    pub fn result(&self) -> i32 {
        self.result
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Decode the raw result code into either the number of bytes read or the OS error.
    pub fn bytes_read(&self) -> io::Result<usize> {
        decode(self.result)
    }

    /// Take ownership of the buffer, dropping the rest of the result.
    pub fn into_buffer(self) -> Buffer {
        self.buffer
    }

    pub fn into_parts(self) -> (Buffer, i32) {
        (self.buffer, self.result)
    }
}

/// The outcome of a write. The buffer backing the write has already been released by the time this
/// is handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteResult {
    token: Token,
    result: i32,
}

impl WriteResult {
    pub(crate) fn new(token: Token, result: i32) -> WriteResult {
        WriteResult { token, result }
    }

    pub fn token(&self) -> Token {
        self.token
    }

    /// The raw result code, negative values are `-errno` and non-negative values a byte count.
    pub fn result(&self) -> i32 {
        self.result
    }

    /// Decode the raw result code into either the number of bytes written or the OS error.
    pub fn bytes_written(&self) -> io::Result<usize> {
        decode(self.result)
    }
}

fn decode(result: i32) -> io::Result<usize> {
    match result.cmp(&0) {
        Ordering::Less => Err(io::Error::from_raw_os_error(-result)),
        Ordering::Equal | Ordering::Greater => Ok(result as usize),
    }
}
