use std::{
    fmt,
    ops::{Deref, DerefMut},
};

/// A heap allocated I/O buffer sized exactly to the operation it backs. The memory lives behind a
/// boxed slice so its address stays fixed when the [Buffer] itself is moved around, which is what
/// allows the kernel to hold a pointer into it between submission and completion.
///
/// Read buffers are handed to the caller inside of a [super::ReadResult] and are released with
/// [Buffer::release] (or simply by dropping them). Write buffers never leave the
/// [crate::Manager], they are released as soon as the write's completion is consumed.
pub struct Buffer {
    data: Box<[u8]>,
}

impl Buffer {
    /// Allocate a new zero filled [Buffer] of `len` bytes.
    pub fn zeroed(len: usize) -> Buffer {
        Buffer {
            data: vec![0u8; len].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.data.as_mut_ptr()
    }

    /// Consume the [Buffer] returning its contents as a [Vec].
    pub fn into_vec(self) -> Vec<u8> {
        self.data.into_vec()
    }

    /// Explicitly release the memory backing this [Buffer]. This is equivalent to dropping it, and
    /// exists so call sites can make the hand back of a read buffer obvious.
    pub fn release(self) {
        drop(self)
    }
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for Buffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<&[u8]> for Buffer {
    fn from(value: &[u8]) -> Self {
        Buffer {
            data: value.to_vec().into_boxed_slice(),
        }
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("addr", &self.as_ptr())
            .field("len", &self.len())
            .finish()
    }
}
