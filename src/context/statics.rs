use std::{path::Path, sync::Mutex};

use lazy_static::lazy_static;

use crate::{
    driver::Driver,
    sync::{Handoff, OneShot},
    uring::{Error, ReadResult, Result, RingConfig, WriteResult},
    Manager,
};

use super::Handle;

lazy_static! {
    static ref HANDLE: Handle = Handle::new(RingConfig::default());
    static ref DRIVER: Mutex<Option<Driver>> = Mutex::new(None);
}

fn lock_driver<'a>() -> std::sync::MutexGuard<'a, Option<Driver>> {
    DRIVER
        .lock()
        .expect("failed to lock default driver: poisoned")
}

/// Return a reference to the global [Handle] object, which hands every thread its own
/// [Manager].
pub fn handle() -> &'static Handle {
    &HANDLE
}

/// Run `f` against the calling thread's [Manager], which is built with the default
/// [RingConfig] the first time the thread gets here.
pub fn with_manager<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut Manager) -> Result<T>,
{
    let mut manager = handle().manager()?;
    f(&mut manager)
}

/// Install `driver` as the process wide default used by [read] and [write], returning the one it
/// replaces if any.
pub fn set_driver(driver: Driver) -> Option<Driver> {
    lock_driver().replace(driver)
}

/// Return a clone of the default [Driver], or [Error::NotConfigured] if none was installed.
pub fn driver() -> Result<Driver> {
    lock_driver().clone().ok_or(Error::NotConfigured)
}

/// Uninstall the default [Driver], usually to call [Driver::shutdown] on it.
pub fn take_driver() -> Option<Driver> {
    lock_driver().take()
}

/// Read through the default [Driver], see [Driver::read].
pub fn read<P: AsRef<Path>>(path: P, size: usize, offset: u64) -> Handoff<Result<ReadResult>> {
    match driver() {
        Ok(driver) => driver.read(path, size, offset),
        Err(err) => Handoff::new(OneShot::ready(Err(err))),
    }
}

/// Write through the default [Driver], see [Driver::write].
pub fn write<P, B>(path: P, data: B, offset: u64) -> Handoff<Result<WriteResult>>
where
    P: AsRef<Path>,
    B: Into<Vec<u8>>,
{
    match driver() {
        Ok(driver) => driver.write(path, data, offset),
        Err(err) => Handoff::new(OneShot::ready(Err(err))),
    }
}
