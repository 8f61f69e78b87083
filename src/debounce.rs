//! Debounce timer primitive
//!
//! Collapses a burst of [`Debouncer::trigger`] calls into one deferred firing
//! that happens `delay` after the last trigger of the burst. Timers live on
//! the ambient tokio runtime when there is one, otherwise on a small shared
//! background runtime. Fire handlers always run on the blocking pool, never on
//! the thread that called `trigger`.

use crate::event::{Event, SubscriptionId};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;
use tokio::runtime::{Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::{error, trace, warn};

/// Shared runtime for debouncers created outside of any tokio context
fn fallback_runtime() -> Option<&'static Runtime> {
    static RUNTIME: OnceLock<Option<Runtime>> = OnceLock::new();
    RUNTIME
        .get_or_init(|| {
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("xreal-options-debounce")
                .enable_time()
                .build()
                .map_err(|e| error!("Failed to start debounce runtime: {}", e))
                .ok()
        })
        .as_ref()
}

struct Inner {
    delay: Duration,
    /// Bumped by every trigger; a timer only fires if it still holds the latest value
    generation: AtomicU64,
    pending: Mutex<Option<JoinHandle<()>>>,
    fired: Event<()>,
    handle: Option<Handle>,
}

impl Inner {
    fn runtime(&self) -> Option<Handle> {
        self.handle
            .clone()
            .or_else(|| Handle::try_current().ok())
            .or_else(|| fallback_runtime().map(|rt| rt.handle().clone()))
    }

    fn trigger(self: &Arc<Self>) {
        let Some(handle) = self.runtime() else {
            warn!("No runtime available, dropping debounce trigger");
            return;
        };

        let mut pending = self.pending.lock();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let weak = Arc::downgrade(self);
        let delay = self.delay;
        *pending = Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;

            let Some(inner) = weak.upgrade() else {
                return;
            };
            {
                let mut pending = inner.pending.lock();
                if inner.generation.load(Ordering::SeqCst) != generation {
                    return;
                }
                pending.take();
            }

            trace!("Debounce window of {:?} elapsed, firing", delay);
            if let Err(e) = tokio::task::spawn_blocking(move || inner.fired.emit(&())).await {
                error!("Debounce handler panicked: {}", e);
            }
        }));
    }

    fn cancel(&self) -> bool {
        let mut pending = self.pending.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        match pending.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(task) = self.pending.get_mut().take() {
            task.abort();
        }
    }
}

/// Trailing-edge debounce timer.
///
/// Clones share the same timer. Dropping the last clone aborts a pending
/// timer without firing it; owners that must not lose the final burst flush
/// explicitly before teardown.
#[derive(Clone)]
pub struct Debouncer {
    inner: Arc<Inner>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self::build(delay, Handle::try_current().ok())
    }

    /// Create a debouncer whose timers run on a specific runtime
    pub fn with_handle(delay: Duration, handle: Handle) -> Self {
        Self::build(delay, Some(handle))
    }

    fn build(delay: Duration, handle: Option<Handle>) -> Self {
        Self {
            inner: Arc::new(Inner {
                delay,
                generation: AtomicU64::new(0),
                pending: Mutex::new(None),
                fired: Event::new(),
                handle,
            }),
        }
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    /// Restart the quiet period. Never blocks on a running handler.
    pub fn trigger(&self) {
        self.inner.trigger();
    }

    /// Drop the pending timer, if any. Returns true if one was canceled.
    pub fn cancel(&self) -> bool {
        self.inner.cancel()
    }

    /// Whether a timer is waiting for its quiet period to elapse
    pub fn is_pending(&self) -> bool {
        self.inner
            .pending
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub fn on_fire<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.fired.subscribe(move |_| handler())
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.fired.unsubscribe(id)
    }

    /// A trigger-only handle that does not keep the debouncer alive
    pub fn trigger_handle(&self) -> DebounceTrigger {
        DebounceTrigger {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.inner.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Weak trigger side of a [`Debouncer`], for wiring into option listeners
#[derive(Clone)]
pub struct DebounceTrigger {
    inner: Weak<Inner>,
}

impl DebounceTrigger {
    /// Trigger the debouncer if it still exists
    pub fn trigger(&self) -> bool {
        match self.inner.upgrade() {
            Some(inner) => {
                inner.trigger();
                true
            }
            None => false,
        }
    }
}
