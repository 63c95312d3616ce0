//! # liouring
//!
//! This is a small request lifecycle layer over linux `io_uring` for file reads and writes at
//! explicit offsets. Every operation is stamped with a unique [Token] when it is prepared, so the
//! completions the kernel hands back out of order always find their way to the request, and the
//! buffer, that produced them. The package is split up into a handful of modules each handling a
//! specific piece of the puzzle:
//!
//! - [uring] wraps the ring itself behind the [RingFacility] contract.
//! - [request] tracks the operations currently owned by the kernel.
//! - [Manager] drives one ring from one thread: prepare, submit, then wait.
//! - [driver] shares one ring between any number of threads through a dedicated drainer thread.
//! - [context] keeps per thread managers and a process wide default driver around.
//!
//! For detailed examples see the `demos` directory in the root of this repository.
//!
//! At a high level driving a ring by hand works as you would expect:
//!
//! ```no_run
//! use liouring::{Completion, Manager};
//!
//! let mut manager = Manager::new(8, false)?;
//!
//! // Queue up a write and a read of the same file, nothing reaches the kernel yet.
//! let write = manager.prepare_write("/tmp/liouring", b"Hello from liouring!", 0)?;
//! let read = manager.prepare_read("/tmp/liouring", 20, 0)?;
//!
//! // Hand both to the kernel in a single batch.
//! manager.submit()?;
//!
//! // Completions come back in whatever order the kernel finishes them, the token tells them
//! // apart.
//! for _ in 0..2 {
//!     match manager.wait_for_result()? {
//!         Completion::Write(res) => assert_eq!(res.token(), write),
//!         Completion::Read(res) => {
//!             assert_eq!(res.token(), read);
//!             println!("read: {}", String::from_utf8_lossy(&res.buffer()[..]));
//!         }
//!     }
//! }
//!
//! manager.close()?;
//! # Ok::<(), liouring::Error>(())
//! ```
//!
//! And sharing a ring between threads is done with a [Driver]:
//!
//! ```no_run
//! use std::thread;
//!
//! use liouring::Driver;
//!
//! let driver = Driver::new()?;
//!
//! let workers: Vec<_> = (0..4)
//!     .map(|idx| {
//!         let driver = driver.clone();
//!         thread::spawn(move || {
//!             let path = format!("/tmp/liouring-{}", idx);
//!             driver.write(&path, format!("worker {}", idx), 0).wait()?;
//!             driver.read(&path, 8, 0).wait()
//!         })
//!     })
//!     .collect();
//!
//! for worker in workers {
//!     let read = worker.join().expect("worker panicked")?;
//!     println!("read: {}", String::from_utf8_lossy(&read.buffer()[..]));
//! }
//!
//! driver.shutdown()?;
//! # Ok::<(), liouring::Error>(())
//! ```

pub mod context;
pub mod driver;
mod manager;
pub mod request;
pub mod sync;
pub mod uring;

#[cfg(test)]
mod testing;

pub use context::{read, write};
pub use driver::{Driver, DriverBuilder, File, OpenOptions};
pub use manager::Manager;
pub use sync::Handoff;
pub use uring::{
    Buffer, Completion, CompletionEvent, Error, ReadResult, Result, RingConfig, RingFacility,
    Token, Uring, WriteResult,
};
