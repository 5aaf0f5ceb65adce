//! Mount and Container Contracts
//!
//! These two traits are the whole boundary between the reactive core and
//! the host's output tree (DOM, terminal cells, a test vector, anything
//! ordered).

/// Teardown for one mounted unit. Calling it unmounts whatever `mount`
/// attached.
pub type Disposer = Box<dyn FnOnce()>;

/// A unit of host output that can attach itself under a parent container.
///
/// Implementations that create their own reactive bindings should wrap
/// them in their own scope (see [`crate::reactive::create_scope`]) and
/// fold the scope's disposal into the returned [`Disposer`]; the core's
/// control-flow primitives call that disposer when the unit leaves the
/// output.
pub trait Mountable<C: Container> {
    /// Attach this unit's output under `parent`. Returns the disposer that
    /// detaches it again.
    fn mount(&self, parent: &C) -> Disposer;
}

/// Closures mount directly; handy for hosts and tests.
impl<C, F> Mountable<C> for F
where
    C: Container,
    F: Fn(&C) -> Disposer + 'static,
{
    fn mount(&self, parent: &C) -> Disposer {
        self(parent)
    }
}

/// Host-side ordered container consumed by the control-flow primitives.
///
/// A container hands out child *fragments*: cheap handles bracketing one
/// mounted unit, themselves containers so content can nest. Moving or
/// removing a fragment moves or removes everything mounted inside it. The
/// host owns actual node storage; the core only asks it to create,
/// reorder, and remove fragments.
///
/// Handles are expected to be `Rc`-backed: `Clone` must alias, not copy.
pub trait Container: Clone + 'static {
    /// Create an empty child fragment at the end of this container.
    fn create_fragment(&self) -> Self;

    /// Move `fragment` so it sits immediately after `after`, or at the
    /// front of this container when `after` is `None`.
    fn move_fragment_after(&self, fragment: &Self, after: Option<&Self>);

    /// Detach `fragment` (and everything inside it) from this container.
    fn remove_fragment(&self, fragment: &Self);

    /// Check whether `fragment` directly follows `after` (or is the first
    /// child when `after` is `None`). Lets the reconciler skip moves for
    /// fragments already in place.
    fn fragment_follows(&self, fragment: &Self, after: Option<&Self>) -> bool;
}
