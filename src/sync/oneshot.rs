use std::{
    future::Future,
    mem,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard},
    task::{Context, Poll, Waker},
};

/// Where a handoff is in its life. A value is delivered exactly once and taken at most once.
#[derive(Debug)]
enum Slot<T> {
    Empty,
    Delivered(T),
    Taken,
}

#[derive(Debug)]
struct Shared<T> {
    slot: Slot<T>,
    waker: Option<Waker>,
}

/// A single value handoff between the drainer of a ring and the one caller waiting on a specific
/// operation. There are always two copies of a [OneShot], one is kept by the waiting side and the
/// other is registered with the drainer under the operation's [crate::Token]. The drainer calls
/// [OneShot::complete] exactly once, which wakes only the task parked on this particular handoff.
#[derive(Debug)]
pub struct OneShot<T> {
    shared: Arc<Mutex<Shared<T>>>,
}

impl<T> OneShot<T> {
    pub fn new() -> OneShot<T> {
        OneShot {
            shared: Arc::new(Mutex::new(Shared {
                slot: Slot::Empty,
                waker: None,
            })),
        }
    }

    /// Create a [OneShot] that is already complete with `val`.
    pub fn ready(val: T) -> OneShot<T> {
        let oneshot = OneShot::new();
        oneshot.complete(val);
        oneshot
    }

    fn lock(&self) -> MutexGuard<'_, Shared<T>> {
        self.shared
            .lock()
            .expect("failed to lock oneshot: poisoned")
    }

    /// Place the value and wake the waiting side.
    ///
    /// # Panics
    ///
    /// Panics if the [OneShot] was already completed.
    pub fn complete(&self, val: T) {
        let waker = {
            let mut shared = self.lock();
            match &shared.slot {
                Slot::Empty => {}
                Slot::Delivered(..) => panic!("invalid state can not call complete more than once."),
                Slot::Taken => panic!("invalid state can not call complete on a taken one shot."),
            }
            shared.slot = Slot::Delivered(val);
            shared.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake()
        }
    }

    /// Take the delivered value, leaving the [OneShot] finalized.
    pub fn take(&self) -> Option<T> {
        let mut shared = self.lock();
        match mem::replace(&mut shared.slot, Slot::Taken) {
            Slot::Delivered(val) => Some(val),
            other => {
                shared.slot = other;
                None
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.lock().slot, Slot::Empty)
    }

    /// Take the value if it was delivered, otherwise park `waker` under the same lock so a
    /// concurrent [OneShot::complete] can't slip in between.
    fn poll_take(&self, waker: &Waker) -> Option<T> {
        let mut shared = self.lock();
        match mem::replace(&mut shared.slot, Slot::Taken) {
            Slot::Delivered(val) => Some(val),
            other => {
                shared.slot = other;
                shared.waker = Some(waker.clone());
                None
            }
        }
    }
}

impl<T> Default for OneShot<T> {
    fn default() -> Self {
        OneShot::new()
    }
}

impl<T> Clone for OneShot<T> {
    fn clone(&self) -> Self {
        OneShot {
            shared: self.shared.clone(),
        }
    }
}

/// The waiting side of a [OneShot]. A [Handoff] is a [Future] resolving to the delivered value, and
/// can also be waited on synchronously from outside of any async context with [Handoff::wait].
#[derive(Debug)]
pub struct Handoff<T> {
    result: OneShot<T>,
}

impl<T> Handoff<T> {
    pub(crate) fn new(result: OneShot<T>) -> Handoff<T> {
        Handoff { result }
    }

    /// Block the current thread until the value is delivered.
    pub fn wait(self) -> T {
        futures::executor::block_on(self)
    }

    /// Take the value if it has already been delivered.
    pub fn try_take(&mut self) -> Option<T> {
        self.result.take()
    }
}

impl<T> Future for Handoff<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.result.poll_take(cx.waker()) {
            Some(result) => Poll::Ready(result),
            None => Poll::Pending,
        }
    }
}
