use std::sync::{Arc, Mutex, MutexGuard};

use thread_local::ThreadLocal;

use crate::{
    uring::{Result, RingConfig},
    Manager,
};

/// Represents a handle to retrieve the calling thread's own [Manager] from. Every thread gets a
/// separate manager, and with it a separate ring, the first time it asks for one. It is generally
/// not a good idea to create this manually, in fact you cannot do so directly and instead leverage
/// either [super::handle] or [super::with_manager] to get access to one of these.
#[derive(Clone)]
pub struct Handle {
    managers: Arc<ThreadLocal<Mutex<Manager>>>,
    config: RingConfig,
}

impl Handle {
    pub(super) fn new(config: RingConfig) -> Handle {
        Handle {
            managers: Arc::new(ThreadLocal::new()),
            config,
        }
    }

    /// The configuration every thread local ring is built with.
    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Lock the calling thread's [Manager], setting it up on first use.
    pub fn manager(&self) -> Result<MutexGuard<'_, Manager>> {
        let manager = self
            .managers
            .get_or_try(|| Manager::from_config(&self.config).map(Mutex::new))?;
        Ok(manager
            .lock()
            .expect("failed to take thread local manager lock: poisoned"))
    }
}
