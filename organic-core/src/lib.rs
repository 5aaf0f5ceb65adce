//! Organic Core
//!
//! This crate provides the core runtime for the Organic reactive UI
//! framework. It implements:
//!
//! - Reactive primitives (signals, memos, effects)
//! - Scoped disposal (owner tree)
//! - A write-batching scheduler with an explicit flush point
//! - Keyed list reconciliation over host-provided renderables
//!
//! The crate never constructs concrete output nodes itself. Hosts supply
//! [`render::Mountable`] values and a [`render::Container`] implementation;
//! the core mounts, reorders, and disposes them as reactive state changes.
//!
//! # Architecture
//!
//! - `reactive`: signals, memos, effects, owners, and the scheduler
//! - `render`: the mount/container contracts and control-flow primitives
//! - `error`: the crate's error taxonomy
//!
//! # Example
//!
//! ```rust,ignore
//! use organic_core::reactive::{flush, Effect, Memo, Signal};
//!
//! let count = Signal::new(0);
//! let doubled = {
//!     let count = count.clone();
//!     Memo::new(move || count.get() * 2)
//! };
//!
//! let _logger = {
//!     let doubled = doubled.clone();
//!     Effect::new(move || println!("doubled: {}", doubled.get()))
//! };
//!
//! count.set(5);
//! flush().unwrap(); // prints: "doubled: 10"
//! ```
//!
//! # Threading model
//!
//! The runtime assumes a single logical thread. Handles are `Rc`-backed and
//! not `Send`; the current computation and current owner live in
//! thread-local cells. Writes apply immediately, reactions are deferred to
//! the next [`reactive::flush`] call.

pub mod error;
pub mod reactive;
pub mod render;
