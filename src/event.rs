//! Change notification for options and debouncers
//!
//! Handlers are invoked synchronously on the thread that raised the event,
//! outside of any internal lock, so a handler may freely read or write other
//! options. Consumers living on another thread can take a channel instead.

use crossbeam_channel::{unbounded, Receiver};
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handle returned by [`Event::subscribe`], used to detach the handler later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Multi-subscriber event
pub struct Event<T> {
    handlers: RwLock<Vec<(SubscriptionId, Handler<T>)>>,
    next_id: AtomicU64,
}

impl<T> Event<T> {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a handler, called once per emitted value
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().push((id, Arc::new(handler)));
        id
    }

    /// Detach a handler. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        handlers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Invoke every handler with `value`
    pub fn emit(&self, value: &T) {
        // Snapshot so handlers can subscribe/unsubscribe without deadlocking
        let handlers: Vec<Handler<T>> = self
            .handlers
            .read()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in handlers {
            handler(value);
        }
    }
}

impl<T: Clone + Send + 'static> Event<T> {
    /// Forward every emitted value into a channel.
    ///
    /// The forwarding handler stays registered after the receiver is dropped;
    /// sends to a closed channel are ignored.
    pub fn channel(&self) -> Receiver<T> {
        let (tx, rx) = unbounded();
        self.subscribe(move |value: &T| {
            let _ = tx.send(value.clone());
        });
        rx
    }
}

impl<T> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
