//! Tracking Context
//!
//! The tracking context records which computation is currently running.
//! This enables automatic dependency tracking: when a signal is read, the
//! current computation is registered as a subscriber.
//!
//! # Implementation
//!
//! A thread-local cell holds the current computation. Entering a run saves
//! the previous occupant and restores it when the guard drops, so nested
//! runs (an effect created inside another effect's body, a memo read during
//! a recompute) unwind correctly even on panic. Execution is synchronous,
//! so at any instant exactly one computation is current per thread.

use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use super::computation::Computation;

thread_local! {
    static CURRENT: RefCell<Option<Rc<Computation>>> = const { RefCell::new(None) };
}

/// Guard that restores the previously current computation when dropped.
pub(crate) struct TrackingGuard {
    previous: Option<Rc<Computation>>,
}

fn replace(next: Option<Rc<Computation>>) -> TrackingGuard {
    let previous = CURRENT.with(|current| mem::replace(&mut *current.borrow_mut(), next));
    TrackingGuard { previous }
}

/// Install `computation` as current until the returned guard drops.
pub(crate) fn enter(computation: Rc<Computation>) -> TrackingGuard {
    replace(Some(computation))
}

/// The currently running computation, if any.
pub(crate) fn current() -> Option<Rc<Computation>> {
    CURRENT.with(|current| current.borrow().clone())
}

impl Drop for TrackingGuard {
    fn drop(&mut self) {
        CURRENT.with(|current| *current.borrow_mut() = self.previous.take());
    }
}

/// Check whether a computation is currently running on this thread.
///
/// Signal reads outside a computation are harmless untracked reads; this
/// exists for callers that want to assert or branch on that.
pub fn is_tracking() -> bool {
    CURRENT.with(|current| current.borrow().is_some())
}

/// Run `f` with dependency tracking suspended.
///
/// Signal and memo reads inside `f` do not register the surrounding
/// computation as a subscriber. Tracking resumes when `f` returns.
pub fn untrack<T>(f: impl FnOnce() -> T) -> T {
    let _guard = replace(None);
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Signal;

    #[test]
    fn nothing_is_tracking_by_default() {
        assert!(!is_tracking());
        assert!(current().is_none());
    }

    #[test]
    fn enter_and_restore() {
        let a = Computation::new(Box::new(|| None));
        let b = Computation::new(Box::new(|| None));

        {
            let _outer = enter(Rc::clone(&a));
            assert_eq!(current().map(|c| c.id()), Some(a.id()));

            {
                let _inner = enter(Rc::clone(&b));
                assert_eq!(current().map(|c| c.id()), Some(b.id()));
            }

            // Inner guard dropped, outer computation is current again.
            assert_eq!(current().map(|c| c.id()), Some(a.id()));
        }

        assert!(current().is_none());
    }

    #[test]
    fn untrack_suspends_tracking() {
        let computation = Computation::new(Box::new(|| None));
        let _guard = enter(Rc::clone(&computation));

        assert!(is_tracking());
        untrack(|| {
            assert!(!is_tracking());
        });
        assert!(is_tracking());
    }

    #[test]
    fn untracked_read_registers_no_subscriber() {
        let signal = Signal::new(1);
        let computation = Computation::new(Box::new(|| None));
        let _guard = enter(Rc::clone(&computation));

        untrack(|| {
            assert_eq!(signal.get(), 1);
        });

        assert_eq!(signal.subscriber_count(), 0);
    }
}
