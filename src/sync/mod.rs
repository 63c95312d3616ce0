//! Synchronization primitives used to hand a single completion from the thread draining a ring to
//! the one caller waiting on it.

mod oneshot;

pub use oneshot::{Handoff, OneShot};
