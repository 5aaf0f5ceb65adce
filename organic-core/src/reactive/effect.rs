//! Effect Implementation
//!
//! An Effect is a side-effecting computation: it runs once at construction
//! to establish its dependencies, then re-runs (via the scheduler) whenever
//! any of them changes.
//!
//! # Cleanup
//!
//! [`Effect::with_cleanup`] lets the body return a cleanup action that runs
//! before the next re-run and once on disposal, the place to tear down
//! whatever the previous run set up.
//!
//! # Lifetime
//!
//! The effect's disposer is registered with the owner current at creation
//! (see [`crate::reactive::create_scope`]); disposing that scope makes the
//! effect permanently inert. Outside any scope, the returned handle is the
//! effect's lifeline: dropping it silently stops the effect.

use std::fmt;
use std::rc::Rc;

use super::computation::{Cleanup, Computation};

/// A side-effecting computation that re-runs when its dependencies change.
///
/// # Example
///
/// ```rust,ignore
/// let count = Signal::new(0);
///
/// let logger = {
///     let count = count.clone();
///     Effect::new(move || println!("count is {}", count.get()))
/// };
///
/// count.set(5);
/// flush().unwrap(); // prints: "count is 5"
/// ```
pub struct Effect {
    computation: Rc<Computation>,
}

impl Effect {
    /// Create an effect and run it immediately to establish dependencies.
    pub fn new(mut body: impl FnMut() + 'static) -> Self {
        Self::build(Box::new(move || {
            body();
            None
        }))
    }

    /// Create an effect whose body returns a cleanup action.
    ///
    /// The cleanup runs before each re-run and once when the effect is
    /// disposed.
    pub fn with_cleanup<F, C>(mut body: F) -> Self
    where
        F: FnMut() -> C + 'static,
        C: FnOnce() + 'static,
    {
        Self::build(Box::new(move || Some(Box::new(body()) as Cleanup)))
    }

    fn build(body: Box<dyn FnMut() -> Option<Cleanup>>) -> Self {
        let computation = Computation::new(body);
        computation.run();
        Self { computation }
    }

    /// Dispose the effect: run its latest cleanup and make it inert.
    ///
    /// Pending scheduled runs become silent no-ops; writes to signals the
    /// effect previously read can never revive it.
    pub fn dispose(&self) {
        self.computation.dispose();
    }

    /// Check whether the effect has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.computation.is_disposed()
    }
}

impl Clone for Effect {
    fn clone(&self) -> Self {
        Self {
            computation: Rc::clone(&self.computation),
        }
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("computation", &self.computation)
            .finish()
    }
}
