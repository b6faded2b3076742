//! Readiness callback queues.
//!
//! A [`ReadyQueue`] holds deferred zero-argument callbacks released exactly
//! once when a named condition becomes true. The client keeps two of them:
//! one drained when the host document becomes usable, one drained when the
//! channel opens.

// ============================================================================
// Imports
// ============================================================================

use std::panic::{AssertUnwindSafe, catch_unwind};

use parking_lot::Mutex;
use tracing::{debug, error};

// ============================================================================
// Types
// ============================================================================

/// A queued readiness callback.
type ReadyCallback = Box<dyn FnOnce() + Send>;

// ============================================================================
// ReadyQueue
// ============================================================================

/// Ordered queue of callbacks released once when a condition becomes true.
///
/// # Draining
///
/// [`drain`](Self::drain) invokes every queued callback exactly once, in
/// insertion order, synchronously on the calling execution context. The
/// queue is empty afterwards; a second drain invokes nothing.
///
/// A callback pushed after the queue has drained runs immediately: the
/// condition already holds, so deferring it would mean it never runs.
pub struct ReadyQueue {
    /// Queue identity for diagnostics.
    name: &'static str,
    /// Pending callbacks plus the drained flag.
    inner: Mutex<Inner>,
}

/// Mutable queue state.
struct Inner {
    /// Whether the condition has fired and the queue has drained.
    drained: bool,
    /// Callbacks awaiting the condition, in insertion order.
    pending: Vec<ReadyCallback>,
}

impl ReadyQueue {
    /// Creates an empty, undrained queue.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(Inner {
                drained: false,
                pending: Vec::new(),
            }),
        }
    }

    /// Appends `callback`, or runs it immediately if the queue has already
    /// drained.
    pub fn push(&self, callback: impl FnOnce() + Send + 'static) {
        {
            let mut inner = self.inner.lock();
            if !inner.drained {
                inner.pending.push(Box::new(callback));
                return;
            }
        }

        // Condition already fired; run outside the lock.
        debug!(queue = self.name, "condition already fired, running callback now");
        Self::run_isolated(self.name, Box::new(callback));
    }

    /// Invokes every queued callback exactly once, in insertion order.
    ///
    /// Each invocation is isolated: a panicking callback is logged and
    /// must not block its siblings. The lock is not held across
    /// invocations, so a callback may push onto this queue (the push runs
    /// immediately, as the condition now holds).
    pub fn drain(&self) {
        let pending = {
            let mut inner = self.inner.lock();
            inner.drained = true;
            std::mem::take(&mut inner.pending)
        };

        debug!(queue = self.name, count = pending.len(), "draining ready queue");

        for callback in pending {
            Self::run_isolated(self.name, callback);
        }
    }

    /// Returns the number of callbacks still waiting.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().pending.len()
    }

    /// Returns `true` if no callbacks are waiting.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once the queue has drained.
    #[inline]
    #[must_use]
    pub fn is_drained(&self) -> bool {
        self.inner.lock().drained
    }

    /// Runs one callback, containing any panic.
    fn run_isolated(name: &'static str, callback: ReadyCallback) {
        if catch_unwind(AssertUnwindSafe(callback)).is_err() {
            error!(queue = name, "readiness callback panicked");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn test_drain_runs_in_insertion_order() {
        let queue = ReadyQueue::new("test");
        let order: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));

        for tag in 1..=4u32 {
            let order = Arc::clone(&order);
            queue.push(move || order.lock().push(tag));
        }

        assert_eq!(queue.len(), 4);
        queue.drain();

        assert_eq!(*order.lock(), vec![1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_second_drain_invokes_nothing() {
        let queue = ReadyQueue::new("test");
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = Arc::clone(&count);
        queue.push(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        queue.drain();
        queue.drain();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_push_after_drain_runs_immediately() {
        let queue = ReadyQueue::new("test");
        queue.drain();
        assert!(queue.is_drained());

        let ran = Arc::new(AtomicUsize::new(0));
        let ran_clone = Arc::clone(&ran);
        queue.push(move || {
            ran_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(ran.load(Ordering::SeqCst), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_panicking_callback_does_not_block_siblings() {
        let queue = ReadyQueue::new("test");
        let ran = Arc::new(AtomicUsize::new(0));

        queue.push(|| panic!("deliberate test panic"));
        let ran_clone = Arc::clone(&ran);
        queue.push(move || {
            ran_clone.fetch_add(1, Ordering::SeqCst);
        });

        queue.drain();

        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_callback_may_push_during_drain() {
        let queue = Arc::new(ReadyQueue::new("test"));
        let ran = Arc::new(AtomicUsize::new(0));

        let queue_clone = Arc::clone(&queue);
        let ran_clone = Arc::clone(&ran);
        queue.push(move || {
            let ran_inner = Arc::clone(&ran_clone);
            queue_clone.push(move || {
                ran_inner.fetch_add(1, Ordering::SeqCst);
            });
        });

        queue.drain();

        // The nested push lands after the drained flag is set, so it
        // runs immediately inside the outer callback.
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
