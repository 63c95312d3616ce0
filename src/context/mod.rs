//! The context module holds the ambient, process wide state of the crate. It exposes a [Handle]
//! as an application static global, the handle stores a [thread_local::ThreadLocal] [crate::Manager]
//! so any thread can drive its own ring without passing one around, see [with_manager]. Next to
//! that it keeps an optional default [crate::Driver] that the free [read] and [write] functions
//! route through.
//!
//! Generally speaking you should NOT be creating [Handle] objects directly and instead should
//! leverage the above helpers to do so.

mod handle;
mod statics;

pub use handle::Handle;
pub use statics::{driver, handle, read, set_driver, take_driver, with_manager, write};
