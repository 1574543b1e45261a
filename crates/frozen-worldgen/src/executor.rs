//! Deferred execution of feature work on the authoritative world thread.
//!
//! Large placements are not run inside generation. They are packaged as a
//! [`DeferredTask`] and handed to an [`ExecutionContext`]; the
//! [`ServerExecutor`] queues them on a channel that the server tick drains
//! against the live world. The caller keeps a [`PlacementTicket`] that
//! resolves once the task has run.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded, unbounded};
use tracing::{debug, trace};

/// One unit of work against the world `W`.
pub type DeferredTask<W> = Box<dyn FnOnce(&mut W) + Send + 'static>;

/// Somewhere deferred work can be submitted. Submission never blocks.
pub trait ExecutionContext<W> {
    fn execute(&self, task: DeferredTask<W>);
}

// ---------------------------------------------------------------------------
// Server executor
// ---------------------------------------------------------------------------

/// Queue of deferred tasks drained by the world-update thread.
pub struct ServerExecutor<W> {
    sender: Sender<DeferredTask<W>>,
    receiver: Receiver<DeferredTask<W>>,
}

impl<W> ServerExecutor<W> {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// A sendable submission handle for worker threads.
    pub fn handle(&self) -> ExecutorHandle<W> {
        ExecutorHandle {
            sender: self.sender.clone(),
        }
    }

    /// Number of queued tasks.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Run every task queued so far against `world`. Tasks submitted while
    /// draining run on the next call. Returns the number of tasks run.
    pub fn run_pending(&self, world: &mut W) -> usize {
        let queued = self.receiver.len();
        let mut ran = 0;
        while ran < queued {
            match self.receiver.try_recv() {
                Ok(task) => {
                    task(world);
                    ran += 1;
                }
                Err(_) => break,
            }
        }
        if ran > 0 {
            debug!(ran, "ran deferred tasks");
        }
        ran
    }
}

impl<W> Default for ServerExecutor<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> ExecutionContext<W> for ServerExecutor<W> {
    fn execute(&self, task: DeferredTask<W>) {
        // The executor owns a receiver, so the channel cannot be disconnected.
        let _ = self.sender.send(task);
    }
}

/// Cloneable submission side of a [`ServerExecutor`].
pub struct ExecutorHandle<W> {
    sender: Sender<DeferredTask<W>>,
}

impl<W> Clone for ExecutorHandle<W> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<W> ExecutionContext<W> for ExecutorHandle<W> {
    fn execute(&self, task: DeferredTask<W>) {
        if self.sender.send(task).is_err() {
            trace!("executor gone, deferred task dropped");
        }
    }
}

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

/// State of a deferred placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicketStatus {
    /// Not run yet.
    Pending,
    /// Ran; `true` when at least one block was placed.
    Done(bool),
    /// Dropped without running.
    Abandoned,
}

/// Receiver side of a deferred placement's outcome.
#[derive(Debug)]
pub struct PlacementTicket {
    receiver: Receiver<bool>,
    resolved: Option<bool>,
}

/// Sender side held by the deferred task.
#[derive(Debug)]
pub struct TicketResolver {
    sender: Sender<bool>,
}

impl PlacementTicket {
    /// A linked ticket and resolver.
    pub fn new() -> (PlacementTicket, TicketResolver) {
        let (sender, receiver) = bounded(1);
        (
            PlacementTicket {
                receiver,
                resolved: None,
            },
            TicketResolver { sender },
        )
    }

    /// Poll without blocking.
    pub fn status(&mut self) -> TicketStatus {
        if let Some(placed) = self.resolved {
            return TicketStatus::Done(placed);
        }
        match self.receiver.try_recv() {
            Ok(placed) => {
                self.resolved = Some(placed);
                TicketStatus::Done(placed)
            }
            Err(TryRecvError::Empty) => TicketStatus::Pending,
            Err(TryRecvError::Disconnected) => TicketStatus::Abandoned,
        }
    }

    /// Block up to `timeout` for the outcome. `None` when it did not arrive.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<bool> {
        if let Some(placed) = self.resolved {
            return Some(placed);
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(placed) => {
                self.resolved = Some(placed);
                Some(placed)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl TicketResolver {
    pub fn resolve(self, placed: bool) {
        // The ticket holder may have stopped caring.
        let _ = self.sender.send(placed);
    }
}
