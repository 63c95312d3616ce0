use std::{env, thread, time::Duration};

use liouring::{context, Driver, OpenOptions, Result};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    // First we need a driver, which spins up the one thread that will drain our ring.
    let driver = Driver::builder()
        .queue_depth(64)
        .tick(Duration::from_millis(50))
        .name("demo-drainer")
        .create()?;

    // Any number of threads can then share it, each one only ever sees its own results.
    let workers: Vec<_> = (0..4)
        .map(|idx| {
            let driver = driver.clone();
            thread::spawn(move || -> Result<()> {
                let path = env::temp_dir().join(format!("liouring-driver-{}", idx));
                let content = format!("Hello from worker {}!", idx);

                driver.write(&path, content.as_str(), 0).wait()?;
                let read = driver.read(&path, content.len(), 0).wait()?;
                println!(
                    "Worker {} read back: {}",
                    idx,
                    String::from_utf8_lossy(&read.buffer()[..])
                );
                Ok(())
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("worker panicked")?;
    }

    // A file can also be opened once and used for many operations, which are futures as well.
    let file = driver.open(
        env::temp_dir().join("liouring-driver-file"),
        OpenOptions::new().read(true).write(true).create(true),
    )?;
    let read = futures::executor::block_on(async {
        file.write_at("awaited", 0).await?;
        file.read_at(7, 0).await
    })?;
    println!("File read back: {}", String::from_utf8_lossy(&read.buffer()[..]));
    file.close()?;

    // Or the driver can be installed as the process wide default.
    context::set_driver(driver);
    liouring::write(env::temp_dir().join("liouring-driver-default"), "default", 0).wait()?;
    if let Some(driver) = context::take_driver() {
        driver.shutdown()?;
    }
    Ok(())
}
