//! Reactive Primitives
//!
//! This module implements the core reactive system: signals, memos, effects,
//! owners, and the batching scheduler.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A [`Signal`] is a container for mutable state. When a signal's value is
//! read inside a running computation, the signal registers that computation
//! as a subscriber. When the value changes, subscribers are handed to the
//! scheduler.
//!
//! ## Effects and memos
//!
//! An [`Effect`] is a side-effecting computation that re-runs when any
//! signal it read during its last run changes. A [`Memo`] is a computation
//! whose result is cached and exposed as a read-only trackable value;
//! readers depend on the memo's output, not on its inputs.
//!
//! ## Owners
//!
//! An owner collects the cleanups (including nested computations) created
//! during a bounded extent of work, so disposing a scope deterministically
//! stops everything created within it. See [`create_scope`].
//!
//! ## The flush point
//!
//! Writes never re-run computations synchronously. They schedule them, and
//! the host drains the queue by calling [`flush`] once per logical tick.
//! Within one flush, computations run in the order they were scheduled and
//! at most once per cycle, so observers always see a settled state after
//! the flush returns.
//!
//! # Implementation Notes
//!
//! Dependency tracking uses a thread-local "current computation" cell that
//! is saved and restored around every run, so nested runs unwind correctly.
//! This transparent-tracking approach is the one used by SolidJS, Vue 3,
//! and Leptos.

mod computation;
mod context;
mod effect;
mod memo;
mod owner;
mod scheduler;
mod signal;

pub use computation::Cleanup;
pub use context::{is_tracking, untrack};
pub use effect::Effect;
pub use memo::Memo;
pub use owner::{create_scope, on_cleanup, ScopeDisposer};
pub use scheduler::{flush, has_pending, MAX_FLUSH_CYCLES};
pub use signal::Signal;

pub(crate) use computation::{Computation, SubscriberSet};
