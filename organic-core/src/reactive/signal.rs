//! Signal Implementation
//!
//! A Signal is the fundamental reactive primitive: a mutable cell holding
//! a value plus the set of computations that depend on it.
//!
//! # How Signals Work
//!
//! 1. When a signal is read inside a running computation, the signal
//!    registers that computation as a subscriber.
//!
//! 2. When the value changes, every subscriber is handed to the scheduler.
//!    Nothing re-runs synchronously; the host drains the queue with
//!    [`crate::reactive::flush`].
//!
//! 3. A write that leaves the value equal to the old one schedules nothing.
//!
//! # Sharing
//!
//! `Signal<T>` is a cheap handle: clones share the same cell and subscriber
//! set. The signal lives as long as any handle does; there is no explicit
//! destruction.

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::computation::SubscriberSet;

fn next_signal_id() -> u64 {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A trackable mutable value cell.
///
/// # Example
///
/// ```rust,ignore
/// let count = Signal::new(0);
///
/// let value = count.get();   // read (tracked inside a computation)
/// count.set(5);              // write, schedules subscribers on change
/// count.update(|v| v + 1);   // closure form
/// ```
pub struct Signal<T: 'static> {
    /// Unique identifier, used for diagnostics only.
    id: u64,

    /// The current value.
    value: Rc<RefCell<T>>,

    /// Computations to notify when the value changes.
    subscribers: SubscriberSet,
}

impl<T: Clone + 'static> Signal<T> {
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            id: next_signal_id(),
            value: Rc::new(RefCell::new(value)),
            subscribers: SubscriberSet::new(),
        }
    }

    /// Get the current value.
    ///
    /// Inside a running computation this also registers the computation as
    /// a subscriber; outside one it is a plain untracked read.
    pub fn get(&self) -> T {
        self.subscribers.track();
        self.value.borrow().clone()
    }

    /// Get the current value without registering a dependency.
    pub fn get_untracked(&self) -> T {
        self.value.borrow().clone()
    }

    /// Get the number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    /// Set a new value, scheduling subscribers iff it differs from the old
    /// one.
    ///
    /// Writes apply immediately (later reads in the same turn see the new
    /// value) while reactions are deferred to the next flush. Writing from
    /// inside a running computation is legal and only schedules work for
    /// the next flush cycle.
    pub fn set(&self, value: T) {
        let changed = *self.value.borrow() != value;
        if !changed {
            tracing::trace!(id = self.id, "no-op write ignored");
            return;
        }
        *self.value.borrow_mut() = value;
        self.subscribers.schedule_all();
    }

    /// Update the value from the previous one.
    ///
    /// The closure receives a snapshot of the current value, not a live
    /// borrow, so it may freely read or write this signal (or aliases of
    /// it); the closure's result is applied last.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let current = self.value.borrow().clone();
        self.set(f(&current));
    }
}

impl<T: 'static> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Rc::clone(&self.value),
            subscribers: self.subscribers.clone(),
        }
    }
}

impl<T: Clone + Debug + 'static> Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("value", &self.get_untracked())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
