//! Memo Implementation
//!
//! A Memo is a cached derived value backed by a computation. Readers depend
//! on the memo's output, not transitively on its inputs: an upstream change
//! schedules the memo's internal computation, and only a recompute that
//! actually changes the cached value schedules the memo's own readers.
//!
//! # Consistency model
//!
//! The cached value is **push-based**: it updates at flush time, when the
//! internal computation runs. Reading a memo after an upstream write but
//! before the next [`crate::reactive::flush`] observes the previous cached
//! value; after the flush, reads are consistent. The initial compute is
//! eager, at construction.
//!
//! This is a deliberate choice (the alternative is an eager
//! recompute-if-dirty on every read) and the staleness window is covered by
//! an explicit test rather than left implicit.

use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::Rc;

use super::computation::{Computation, SubscriberSet};

struct MemoInner<T> {
    /// The cached value. Always present after construction.
    value: RefCell<Option<T>>,

    /// Readers of the memo's output.
    subscribers: SubscriberSet,
}

/// A cached, trackable derived value.
///
/// # Type Parameters
///
/// `T` must be `PartialEq` so an unchanged recompute can avoid scheduling
/// readers.
///
/// # Example
///
/// ```rust,ignore
/// let count = Signal::new(2);
/// let doubled = {
///     let count = count.clone();
///     Memo::new(move || count.get() * 2)
/// };
/// assert_eq!(doubled.get(), 4);
/// ```
pub struct Memo<T: 'static> {
    inner: Rc<MemoInner<T>>,

    /// The internal computation that recomputes and stores the value.
    computation: Rc<Computation>,
}

impl<T: Clone + PartialEq + 'static> Memo<T> {
    /// Create a memo and compute its initial value eagerly.
    ///
    /// The internal computation registers with the current owner, so
    /// disposing the surrounding scope freezes the memo at its last value.
    pub fn new(mut compute: impl FnMut() -> T + 'static) -> Self {
        let inner = Rc::new(MemoInner {
            value: RefCell::new(None),
            subscribers: SubscriberSet::new(),
        });

        let state = Rc::clone(&inner);
        let computation = Computation::new(Box::new(move || {
            let next = compute();
            let changed = {
                let current = state.value.borrow();
                current.as_ref() != Some(&next)
            };
            if changed {
                *state.value.borrow_mut() = Some(next);
                // Fan out one level: only readers of the output.
                state.subscribers.schedule_all();
            }
            None
        }));
        computation.run();

        Self { inner, computation }
    }

    /// Get the cached value.
    ///
    /// Behaves exactly like a signal read for tracking purposes: inside a
    /// running computation the reader subscribes to the memo's output.
    pub fn get(&self) -> T {
        self.inner.subscribers.track();
        self.inner
            .value
            .borrow()
            .clone()
            .expect("memo value computed at construction")
    }

    /// Get the number of registered readers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// Dispose the memo's internal computation.
    ///
    /// The cached value stays readable but never updates again.
    pub fn dispose(&self) {
        self.computation.dispose();
    }

    /// Check whether the memo has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.computation.is_disposed()
    }
}

impl<T: 'static> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            computation: Rc::clone(&self.computation),
        }
    }
}

impl<T: Clone + PartialEq + Debug + 'static> Debug for Memo<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memo")
            .field("value", &self.inner.value.borrow())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::{flush, Effect, Signal};
    use std::cell::Cell;

    #[test]
    fn memo_computes_eagerly_at_construction() {
        let computes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&computes);

        let memo = Memo::new(move || {
            counter.set(counter.get() + 1);
            42
        });

        assert_eq!(computes.get(), 1);
        assert_eq!(memo.get(), 42);
        assert_eq!(computes.get(), 1);
    }

    #[test]
    fn memo_caches_between_changes() {
        let signal = Signal::new(5);
        let computes = Rc::new(Cell::new(0));

        let memo = {
            let signal = signal.clone();
            let computes = Rc::clone(&computes);
            Memo::new(move || {
                computes.set(computes.get() + 1);
                signal.get() * 2
            })
        };

        // Many reads, one compute.
        assert_eq!(memo.get(), 10);
        assert_eq!(memo.get(), 10);
        assert_eq!(memo.get(), 10);
        assert_eq!(computes.get(), 1);

        signal.set(10);
        flush().unwrap();

        // One change, one more compute.
        assert_eq!(memo.get(), 20);
        assert_eq!(memo.get(), 20);
        assert_eq!(computes.get(), 2);
    }

    #[test]
    fn memo_is_stale_until_flush() {
        let signal = Signal::new(1);
        let memo = {
            let signal = signal.clone();
            Memo::new(move || signal.get() * 10)
        };
        assert_eq!(memo.get(), 10);

        // Push-based: the cached value lags the write until the flush.
        signal.set(2);
        assert_eq!(memo.get(), 10);

        flush().unwrap();
        assert_eq!(memo.get(), 20);
    }

    #[test]
    fn unchanged_recompute_does_not_wake_readers() {
        let signal = Signal::new(2);
        let memo = {
            let signal = signal.clone();
            // Parity: many inputs map to the same output.
            Memo::new(move || signal.get() % 2)
        };

        let runs = Rc::new(Cell::new(0));
        let _effect = {
            let memo = memo.clone();
            let runs = Rc::clone(&runs);
            Effect::new(move || {
                memo.get();
                runs.set(runs.get() + 1);
            })
        };
        assert_eq!(runs.get(), 1);

        // 2 -> 4: parity unchanged, reader must not re-run.
        signal.set(4);
        flush().unwrap();
        assert_eq!(runs.get(), 1);

        // 4 -> 5: parity changed.
        signal.set(5);
        flush().unwrap();
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn effect_sees_fresh_memo_value_after_one_flush() {
        let signal = Signal::new(1);
        let memo = {
            let signal = signal.clone();
            Memo::new(move || signal.get() * 2)
        };

        let seen = Rc::new(Cell::new(0));
        let _effect = {
            let memo = memo.clone();
            let seen = Rc::clone(&seen);
            Effect::new(move || seen.set(memo.get()))
        };
        assert_eq!(seen.get(), 2);

        // The memo recomputes in the first cycle of the flush and its
        // reader runs in the second, inside the same flush call.
        signal.set(3);
        flush().unwrap();
        assert_eq!(seen.get(), 6);
    }

    #[test]
    fn disposed_memo_freezes_its_value() {
        let signal = Signal::new(1);
        let memo = {
            let signal = signal.clone();
            Memo::new(move || signal.get())
        };
        assert_eq!(memo.get(), 1);

        memo.dispose();
        signal.set(5);
        flush().unwrap();

        assert_eq!(memo.get(), 1);
    }
}
