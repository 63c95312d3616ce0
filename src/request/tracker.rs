use slab::Slab;

use crate::uring::{Error, Result, Token};

use super::Request;

struct Slot {
    generation: u32,
    request: Request,
}

/// The in-memory table of pending requests, keyed by [Token]. Slots are recycled through a [Slab]
/// while every reservation stamps a fresh generation into the token, so a completion for a retired
/// token can never resolve whichever request later landed in the same slot.
///
/// The tracker is owned by exactly one [crate::Manager] and is not synchronized.
#[derive(Default)]
pub struct Tracker {
    slots: Slab<Slot>,
    generation: u32,
}

impl Tracker {
    pub fn new() -> Tracker {
        Tracker::default()
    }

    pub fn with_capacity(capacity: usize) -> Tracker {
        Tracker {
            slots: Slab::with_capacity(capacity),
            generation: 0,
        }
    }

    /// Mint the token the next call to [Tracker::register] must use.
    pub fn reserve(&mut self) -> Token {
        self.generation = match self.generation.wrapping_add(1) {
            0 => 1,
            generation => generation,
        };
        Token::new(self.slots.vacant_key(), self.generation)
    }

    /// Start tracking `request` under `token`.
    pub fn register(&mut self, token: Token, request: Request) -> Result<()> {
        if self.slots.contains(token.index()) {
            return Err(Error::DuplicateToken(token));
        }

        let entry = self.slots.vacant_entry();
        if entry.key() != token.index() {
            return Err(Error::StaleToken(token));
        }

        entry.insert(Slot {
            generation: token.generation(),
            request,
        });
        Ok(())
    }

    /// Borrow the request tracked under `token`.
    pub fn get_mut(&mut self, token: Token) -> Result<&mut Request> {
        match self.slots.get_mut(token.index()) {
            Some(slot) if slot.generation == token.generation() => Ok(&mut slot.request),
            _ => Err(Error::UnknownToken(token)),
        }
    }

    /// Stop tracking `token` returning its request. Fails if the token was never registered or has
    /// already been resolved, which means the ring and the tracker have gone out of sync.
    pub fn resolve_and_remove(&mut self, token: Token) -> Result<Request> {
        match self.slots.get(token.index()) {
            Some(slot) if slot.generation == token.generation() => {
                Ok(self.slots.remove(token.index()).request)
            }
            _ => Err(Error::UnknownToken(token)),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Forget every tracked request without releasing its buffer or descriptor, returning how many
    /// were leaked. Only for teardown while the kernel may still own that memory.
    pub(crate) fn leak(&mut self) -> usize {
        let leaked = self.slots.len();
        for slot in self.slots.drain() {
            std::mem::forget(slot.request);
        }
        leaked
    }
}
