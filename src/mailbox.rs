//! Single-slot mailboxes with bounded long-poll retrieval.
//!
//! Each service owns exactly one slot holding at most one unread message.
//! A send overwrites whatever is pending (last write wins, no queueing) and
//! a successful retrieval atomically clears the slot, so every message is
//! delivered at most once.
//!
//! Long-poll waiters park on a [`Notify`] that `send` signals, instead of a
//! sleep loop, so an outstanding poll costs a suspended future rather than
//! a thread. A configurable recheck interval bounds how long a waiter can
//! stay parked between slot inspections.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::sync::Notify;
use tracing::debug;

use crate::{MsgdropError, Result};

/// One mailbox slot: the pending message and the wakeup for parked waiters.
#[derive(Debug, Default)]
struct Slot {
    pending: Mutex<Option<String>>,
    wakeup: Notify,
}

impl Slot {
    /// Atomic read-and-clear.
    fn take(&self) -> Option<String> {
        self.pending.lock().expect("slot lock poisoned").take()
    }

    /// Publish a message (or clear the slot for an empty one), then wake
    /// every parked waiter. The slot lock is released before notifying.
    fn put(&self, message: &str) {
        {
            let mut pending = self.pending.lock().expect("slot lock poisoned");
            *pending = if message.is_empty() {
                None
            } else {
                Some(message.to_string())
            };
        }
        self.wakeup.notify_waiters();
    }
}

/// Store of one single-slot mailbox per service.
///
/// Slots are registered when their service is created (and re-registered at
/// startup for services loaded from a persistent store); they are never
/// destroyed independently of their service.
#[derive(Debug)]
pub struct MailboxStore {
    slots: RwLock<HashMap<String, Arc<Slot>>>,
    recheck_interval: Duration,
}

impl MailboxStore {
    /// Create a store with the given waiter recheck interval.
    pub fn new(recheck_interval: Duration) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            recheck_interval,
        }
    }

    /// Register an empty slot for a service. Idempotent: re-registering an
    /// existing service keeps its pending message.
    pub fn register(&self, service: &str) {
        let mut slots = self.slots.write().expect("slot map lock poisoned");
        slots.entry(service.to_string()).or_default();
    }

    fn slot(&self, service: &str) -> Option<Arc<Slot>> {
        self.slots
            .read()
            .expect("slot map lock poisoned")
            .get(service)
            .cloned()
    }

    /// Overwrite the pending message for a service. Last write wins.
    ///
    /// An empty message means "no message": it clears the slot rather than
    /// being stored as a deliverable payload.
    pub fn send(&self, service: &str, message: &str) -> Result<()> {
        let slot = self
            .slot(service)
            .ok_or_else(|| MsgdropError::NotFound("service".to_string()))?;
        slot.put(message);
        debug!(service = %service, empty = message.is_empty(), "message stored");
        Ok(())
    }

    /// Atomic read-and-clear. Never blocks; `None` when nothing is pending
    /// or the service does not exist.
    pub fn take_if_present(&self, service: &str) -> Option<String> {
        self.slot(service)?.take()
    }

    /// Block until a message is available or `max_wait` elapses.
    ///
    /// Returns `None` on timeout and, deliberately, also for an unknown
    /// service: the retrieval surface does not distinguish "no such
    /// service" from "no message" to its unauthenticated callers.
    ///
    /// Dropping the returned future (client disconnect) releases the waiter
    /// immediately.
    pub async fn retrieve(&self, service: &str, max_wait: Duration) -> Option<String> {
        let slot = self.slot(service)?;
        let deadline = tokio::time::Instant::now() + max_wait;

        loop {
            let notified = slot.wakeup.notified();
            tokio::pin!(notified);
            // Register interest before inspecting the slot so a send landing
            // between the check and the await is not lost.
            notified.as_mut().enable();

            if let Some(message) = slot.take() {
                return Some(message);
            }

            tokio::select! {
                _ = &mut notified => {}
                _ = tokio::time::sleep(self.recheck_interval) => {}
                _ = tokio::time::sleep_until(deadline) => {
                    // One last look: a send may have raced the timeout.
                    return slot.take();
                }
            }
        }
    }
}
