//! Rendering Contracts and Control Flow
//!
//! The core never constructs concrete output nodes. Hosts implement
//! [`Container`] (an ordered region of output that hands out child
//! fragments) and supply [`Mountable`] values; the core mounts them,
//! reorders them, and calls the disposers they return.
//!
//! Three control-flow primitives consume these contracts:
//!
//! - [`Keyed`]: keyed list reconciliation over a reactive sequence.
//! - [`Show`]: conditional mounting driven by a reactive boolean.
//! - [`Switch`]: multi-branch conditional selected by a reactive value.

mod keyed;
mod mountable;
mod show;
mod switch;

pub use keyed::Keyed;
pub use mountable::{Container, Disposer, Mountable};
pub use show::Show;
pub use switch::Switch;
