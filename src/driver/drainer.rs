use std::{
    collections::{HashMap, VecDeque},
    sync::mpsc::{Receiver, TryRecvError},
    time::Duration,
};

use tracing::{debug, error, warn};

use crate::{
    uring::{Completion, Error, Result, RingFacility, Token},
    Manager,
};

use super::message::{Message, Operation, Pending};

/// The one and only writer of a [super::Driver]'s ring. The drainer owns the [Manager], pulls
/// operations off of the message channel, and fans every completion it consumes out to the handoff
/// registered under that completion's token.
///
/// Generally the flow of one loop iteration is this:
/// - Block on the channel if nothing is in flight, otherwise just take what is already there.
/// - Prepare every new operation, parking those that don't fit in the ring on the backlog.
/// - Submit everything queued in one batch.
/// - Wait up to one tick for a completion, then drain whatever else is ready without blocking.
/// - Move backlogged operations onto the ring as capacity frees up.
pub(super) struct Drainer<R: RingFacility> {
    manager: Manager<R>,
    rx: Receiver<Message>,
    pending: HashMap<Token, Pending>,
    backlog: VecDeque<Operation>,
    tick: Duration,
    closing: bool,
}

impl<R: RingFacility> Drainer<R> {
    pub(super) fn new(manager: Manager<R>, rx: Receiver<Message>, tick: Duration) -> Drainer<R> {
        let pending = HashMap::with_capacity(manager.capacity());
        Drainer {
            manager,
            rx,
            pending,
            backlog: VecDeque::new(),
            tick,
            closing: false,
        }
    }

    /// Run until the driver is closed, or until every handle to it is gone, and all outstanding
    /// operations have been delivered. A fault on the ring stops the drainer immediately, every
    /// caller still waiting is then handed [Error::Disconnected].
    pub(super) fn run(mut self) -> Result<()> {
        debug!(capacity = self.manager.capacity(), "drainer started");
        let res = self.drive();
        if let Err(ref err) = res {
            error!(%err, outstanding = self.manager.outstanding(), "drainer failed");
        }

        self.reject_all();
        let closed = self.manager.close();
        debug!("drainer stopped");
        res.and(closed)
    }

    fn drive(&mut self) -> Result<()> {
        loop {
            if self.manager.outstanding() == 0 && self.backlog.is_empty() {
                if self.closing {
                    return Ok(());
                }
                match self.rx.recv() {
                    Ok(msg) => self.handle(msg),
                    Err(_) => return Ok(()),
                }
            }

            loop {
                match self.rx.try_recv() {
                    Ok(msg) => self.handle(msg),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        self.closing = true;
                        break;
                    }
                }
            }

            if let Err(err) = self.manager.submit() {
                warn!(%err, queued = self.manager.queued(), "failed to submit operations");
            }

            self.drain()?;
            self.clear_backlog();
        }
    }

    fn handle(&mut self, msg: Message) {
        match msg {
            Message::Operation(op) => self.start(op),
            Message::Open {
                path,
                flags,
                mode,
                result,
            } => result.complete(self.manager.open(&path, flags, mode)),
            Message::Close => {
                debug!("drainer closing");
                self.closing = true;
            }
        }
    }

    fn start(&mut self, op: Operation) {
        // Operations leave the backlog in arrival order, so a newcomer queues behind it.
        if !self.backlog.is_empty() || self.manager.outstanding() >= self.manager.capacity() {
            self.backlog.push_back(op);
            return;
        }
        self.launch(op);
    }

    fn launch(&mut self, op: Operation) {
        // A full submission queue only means the entries in it haven't been picked up yet, flush
        // the ring and give the operation its slot.
        let prepared = match op.prepare(&mut self.manager) {
            Err(Error::QueueFull) => self
                .manager
                .flush()
                .and_then(|_| op.prepare(&mut self.manager)),
            prepared => prepared,
        };

        match prepared {
            Ok(token) => {
                self.pending.insert(token, op.into_pending());
            }
            Err(err) => op.fail(err),
        }
    }

    fn clear_backlog(&mut self) {
        while self.manager.outstanding() < self.manager.capacity() {
            match self.backlog.pop_front() {
                Some(op) => self.launch(op),
                None => break,
            }
        }
    }

    fn drain(&mut self) -> Result<()> {
        match self.manager.wait_for_result_timeout(self.tick) {
            Ok(Some(completion)) => self.deliver(completion),
            Ok(None) | Err(Error::NothingPending) => return Ok(()),
            Err(err) => return Err(err),
        }

        loop {
            match self.manager.try_wait_for_result() {
                Ok(Some(completion)) => self.deliver(completion),
                Ok(None) | Err(Error::NothingPending) => return Ok(()),
                Err(err) => return Err(err),
            }
        }
    }

    fn deliver(&mut self, completion: Completion) {
        let token = completion.token();
        match (self.pending.remove(&token), completion) {
            (Some(Pending::Read(result)), Completion::Read(read)) => result.complete(Ok(read)),
            (Some(Pending::Write(result)), Completion::Write(write)) => {
                result.complete(Ok(write))
            }
            (Some(pending), _) => {
                error!(%token, "completion kind does not match its handoff");
                pending.fail(Error::UnknownToken(token));
            }
            (None, _) => warn!(%token, "no handoff registered for completion, dropping it"),
        }
    }

    /// Fail everything still waiting on this drainer, in flight, backlogged, or still sitting in
    /// the channel.
    fn reject_all(&mut self) {
        for (_, pending) in self.pending.drain() {
            pending.fail(Error::Disconnected);
        }
        for op in self.backlog.drain(..) {
            op.fail(Error::Disconnected);
        }
        while let Ok(msg) = self.rx.try_recv() {
            msg.fail(Error::Disconnected);
        }
    }
}
