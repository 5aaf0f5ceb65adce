//! Computation Implementation
//!
//! A Computation is a re-runnable unit of work. During each run it records
//! every signal (or memo output) it reads as its dependency set; when any
//! of those change, the scheduler re-runs it. The body may return a cleanup
//! that executes before the next run and once on disposal.
//!
//! # Lifecycle
//!
//! pending -> clean (ran, dependencies recorded) -> dirty (scheduled)
//! -> clean again after the flush, or -> disposed (terminal).
//!
//! On each run:
//!
//! 1. The previous run's cleanup executes.
//! 2. The computation removes itself from every subscriber set it joined
//!    last run, so dependencies it no longer reads stop notifying it.
//! 3. The body runs with the computation installed as current, re-joining
//!    the subscriber set of everything it actually reads this time.
//!
//! Disposal makes the computation inert rather than merely unscheduled:
//! stale weak references to it may survive in subscriber sets of signals it
//! previously read, and those must never revive it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use smallvec::SmallVec;

use super::{context, owner};

/// A cleanup action returned by a computation body.
///
/// Runs before the computation's next run and once on disposal.
pub type Cleanup = Box<dyn FnOnce()>;

/// Unique identifier for a computation.
///
/// Used to deduplicate scheduler entries and subscriber registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ComputationId(u64);

impl ComputationId {
    pub(crate) fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn raw(self) -> u64 {
        self.0
    }
}

/// Insertion-ordered subscriber registry attached to a signal or memo.
///
/// Holds weak references only; computations are kept alive by their owner
/// (or by a retained [`crate::reactive::Effect`] handle), so disposing a
/// scope leaves behind nothing but inert entries here.
#[derive(Clone, Default)]
pub(crate) struct SubscriberSet {
    inner: Rc<RefCell<IndexMap<ComputationId, Weak<Computation>>>>,
}

impl SubscriberSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register the currently running computation, if any.
    ///
    /// Reads outside a computation are untracked no-ops.
    pub(crate) fn track(&self) {
        let Some(current) = context::current() else {
            return;
        };
        let fresh = self
            .inner
            .borrow_mut()
            .insert(current.id(), Rc::downgrade(&current))
            .is_none();
        if fresh {
            current.remember_source(self);
        }
    }

    /// Hand every live subscriber to the scheduler.
    pub(crate) fn schedule_all(&self) {
        // Collect before scheduling so a body that reads this same set
        // cannot observe it mid-iteration.
        let live: Vec<Rc<Computation>> = self
            .inner
            .borrow()
            .values()
            .filter_map(Weak::upgrade)
            .collect();
        for computation in live {
            super::scheduler::schedule(&computation);
        }
    }

    fn remove(&self, id: ComputationId) {
        self.inner.borrow_mut().shift_remove(&id);
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.borrow().len()
    }
}

/// A re-runnable unit that records its signal reads as dependencies.
pub(crate) struct Computation {
    /// Unique identifier for this computation.
    id: ComputationId,

    /// The run body. Returns an optional cleanup for the next run.
    body: RefCell<Box<dyn FnMut() -> Option<Cleanup>>>,

    /// The previous run's cleanup, consumed before the next run.
    cleanup: RefCell<Option<Cleanup>>,

    /// Subscriber sets this computation currently appears in.
    sources: RefCell<SmallVec<[SubscriberSet; 4]>>,

    /// Set once; a disposed computation never runs again.
    disposed: Cell<bool>,

    /// Self-reference handed to the tracking context during runs.
    weak_self: Weak<Computation>,
}

impl Computation {
    /// Create a computation and register its disposer with the current
    /// owner, if one is installed.
    ///
    /// The computation does not run here; callers decide when the first
    /// run happens.
    pub(crate) fn new(body: Box<dyn FnMut() -> Option<Cleanup>>) -> Rc<Self> {
        let computation = Rc::new_cyclic(|weak_self| Self {
            id: ComputationId::new(),
            body: RefCell::new(body),
            cleanup: RefCell::new(None),
            sources: RefCell::new(SmallVec::new()),
            disposed: Cell::new(false),
            weak_self: weak_self.clone(),
        });

        let handle = Rc::clone(&computation);
        owner::register_with_current(Box::new(move || handle.dispose()));

        computation
    }

    pub(crate) fn id(&self) -> ComputationId {
        self.id
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Re-run the computation, re-establishing its dependency set.
    ///
    /// A no-op when already disposed. If the computation's owner is
    /// disposed during the body (self-disposal mid-run), the cleanup the
    /// body returned executes immediately instead of being stored for a
    /// next run that will never come.
    pub(crate) fn run(&self) {
        if self.disposed.get() {
            return;
        }

        if let Some(cleanup) = self.cleanup.borrow_mut().take() {
            cleanup();
        }

        self.clear_sources();

        let result = {
            let _guard = self
                .weak_self
                .upgrade()
                .map(context::enter)
                .expect("computation ran without a live Rc");
            (self.body.borrow_mut())()
        };

        if self.disposed.get() {
            if let Some(cleanup) = result {
                cleanup();
            }
        } else {
            *self.cleanup.borrow_mut() = result;
        }
    }

    /// Make the computation inert and run its latest cleanup once.
    ///
    /// Idempotent. Stale subscriber-set entries pointing at this
    /// computation stay behind but can never revive it.
    pub(crate) fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.clear_sources();
        if let Some(cleanup) = self.cleanup.borrow_mut().take() {
            cleanup();
        }
    }

    /// Remove this computation from every subscriber set it joined.
    fn clear_sources(&self) {
        let sources = std::mem::take(&mut *self.sources.borrow_mut());
        for set in sources {
            set.remove(self.id);
        }
    }

    /// Record a subscriber set this computation was just inserted into.
    pub(crate) fn remember_source(&self, set: &SubscriberSet) {
        self.sources.borrow_mut().push(set.clone());
    }
}

impl fmt::Debug for Computation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Computation")
            .field("id", &self.id.raw())
            .field("disposed", &self.disposed.get())
            .field("source_count", &self.sources.borrow().len())
            .finish()
    }
}
