use std::env;

use liouring::{Completion, Manager, Result};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let path = env::temp_dir().join("liouring-read-write");

    // First we need a manager, here with room for 8 submissions and no kernel side polling.
    let mut manager = Manager::new(8, false)?;

    // Preparing only queues the operation up, the file is opened right away but nothing is
    // handed to the kernel until we submit.
    let write = manager.prepare_write(&path, b"Hello from liouring!", 0)?;
    println!("Prepared write {}", write);
    manager.submit()?;

    // Each wait hands back exactly one completion along with the token it was prepared under.
    if let Completion::Write(res) = manager.wait_for_result()? {
        println!("Write {} finished with {}", res.token(), res.result());
    }

    // Now queue up a few reads at different offsets and submit them all in one batch.
    let tokens = [
        manager.prepare_read(&path, 5, 0)?,
        manager.prepare_read(&path, 4, 6)?,
        manager.prepare_read(&path, 8, 11)?,
    ];
    println!("Submitted {} reads", manager.submit()?);

    // The kernel may finish them in any order, the token tells us which one we got.
    for _ in tokens {
        match manager.wait_for_result()? {
            Completion::Read(res) => println!(
                "Read {} returned {}: {}",
                res.token(),
                res.result(),
                String::from_utf8_lossy(&res.buffer()[..])
            ),
            Completion::Write(res) => println!("Unexpected write {}", res.token()),
        }
    }

    manager.close()
}
