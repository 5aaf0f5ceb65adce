//! Owner / Scoped Disposal
//!
//! An owner is a disposal-tree node: it collects every cleanup (including
//! the disposers of computations) created during a bounded extent of work,
//! so disposing the scope deterministically stops everything created
//! within it.
//!
//! # Structure
//!
//! Owners form a strict tree. [`create_scope`] installs a fresh owner as
//! current for the duration of its body and, when a parent owner was
//! already current, registers the child's disposer with the parent, so
//! disposing an outer scope transitively tears down inner scopes.
//!
//! Disposal runs cleanups in reverse registration order (LIFO): resources
//! created later are torn down first. Disposing twice is a no-op.

use std::cell::{Cell, RefCell};
use std::mem;
use std::rc::Rc;

use super::computation::Cleanup;

thread_local! {
    static CURRENT_OWNER: RefCell<Option<Rc<Owner>>> = const { RefCell::new(None) };
}

/// A disposal-tree node collecting cleanups for structured teardown.
pub(crate) struct Owner {
    /// Registered cleanups, run in reverse order on disposal.
    cleanups: RefCell<Vec<Cleanup>>,

    /// Set once; further registrations run immediately.
    disposed: Cell<bool>,
}

impl Owner {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            cleanups: RefCell::new(Vec::new()),
            disposed: Cell::new(false),
        })
    }

    /// Register a cleanup with this owner.
    ///
    /// Registering with an already-disposed owner runs the cleanup
    /// immediately, so nothing created after disposal can outlive the
    /// scope.
    pub(crate) fn register(&self, cleanup: Cleanup) {
        if self.disposed.get() {
            cleanup();
            return;
        }
        self.cleanups.borrow_mut().push(cleanup);
    }

    /// Run all registered cleanups in reverse registration order.
    ///
    /// Idempotent. The cleanup list is taken out before anything runs, so
    /// a cleanup that disposes this same owner again cannot re-enter.
    pub(crate) fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        let mut cleanups = self.cleanups.take();
        while let Some(cleanup) = cleanups.pop() {
            cleanup();
        }
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

/// Guard that restores the previously current owner when dropped.
struct OwnerGuard {
    previous: Option<Rc<Owner>>,
}

impl OwnerGuard {
    fn enter(owner: Rc<Owner>) -> Self {
        let previous =
            CURRENT_OWNER.with(|current| mem::replace(&mut *current.borrow_mut(), Some(owner)));
        Self { previous }
    }
}

impl Drop for OwnerGuard {
    fn drop(&mut self) {
        CURRENT_OWNER.with(|current| *current.borrow_mut() = self.previous.take());
    }
}

fn current_owner() -> Option<Rc<Owner>> {
    CURRENT_OWNER.with(|current| current.borrow().clone())
}

/// Register `cleanup` with the current owner, if one is installed.
///
/// Returns false (and drops the cleanup unrun) when no owner is current;
/// that is the normal case for root-level effects kept alive by their
/// returned handle.
pub(crate) fn register_with_current(cleanup: Cleanup) -> bool {
    match current_owner() {
        Some(owner) => {
            owner.register(cleanup);
            true
        }
        None => false,
    }
}

/// Handle for disposing a scope created by [`create_scope`].
#[derive(Clone)]
pub struct ScopeDisposer {
    owner: Rc<Owner>,
}

impl ScopeDisposer {
    /// Dispose the scope: run every cleanup registered during its body
    /// (and afterwards) in reverse registration order. Safe to call twice.
    pub fn dispose(&self) {
        self.owner.dispose();
    }

    /// Check whether the scope has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.owner.is_disposed()
    }
}

/// Install a new owner as current, run `body`, restore the previous owner.
///
/// Every computation (and [`on_cleanup`] registration) created while the
/// scope's owner is current attaches its disposer to it. Scopes nest:
/// creating a scope inside another registers the child with the parent, so
/// disposing the outer scope disposes the inner one as well.
///
/// The returned [`ScopeDisposer`] is the scope's only lifeline: dropping
/// it without calling [`ScopeDisposer::dispose`] drops the registered
/// computations, which silently stops them.
pub fn create_scope<T>(body: impl FnOnce() -> T) -> (T, ScopeDisposer) {
    let owner = Owner::new();

    if let Some(parent) = current_owner() {
        let child = Rc::clone(&owner);
        parent.register(Box::new(move || child.dispose()));
    }

    let value = {
        let _guard = OwnerGuard::enter(Rc::clone(&owner));
        body()
    };

    (value, ScopeDisposer { owner })
}

/// Register an ad-hoc cleanup with the current owner.
///
/// Runs when the surrounding scope is disposed. Outside any scope the
/// cleanup can never run, so it is dropped with a warning.
pub fn on_cleanup(cleanup: impl FnOnce() + 'static) {
    if !register_with_current(Box::new(cleanup)) {
        tracing::warn!("on_cleanup called outside any scope; cleanup will never run");
    }
}
