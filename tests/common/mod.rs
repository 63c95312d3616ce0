//! Helpers shared by the integration tests.

use liouring::{Error, Manager};

#[path = "../../src/testing/dir.rs"]
mod dir;

pub use dir::TestDir;

/// Check if io_uring is usable here, some kernels and sandboxes refuse `io_uring_setup` outright.
pub fn io_uring_supported() -> bool {
    match Manager::new(1, false) {
        Ok(mut manager) => manager.close().is_ok(),
        Err(Error::IO(err)) => {
            eprintln!("io_uring unavailable, skipping: {}", err);
            false
        }
        Err(err) => panic!("unexpected failure setting up io_uring: {}", err),
    }
}
