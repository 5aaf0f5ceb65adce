//! Error taxonomy for the reactive runtime.
//!
//! The core is pure in-process bookkeeping: signals cannot fail, reads
//! outside a computation are harmless, and disposed computations are inert.
//! The one reportable condition is a flush that never settles because
//! computations keep scheduling each other (or themselves).

use thiserror::Error;

/// Errors surfaced by [`crate::reactive::flush`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FlushError {
    /// The flush ran `limit` cycles and work was still being scheduled.
    ///
    /// This indicates a write cycle: some computation writes a signal that
    /// (transitively) schedules it again on every cycle. The pending queue
    /// is cleared before this is returned, so the runtime is usable again.
    #[error("flush did not settle after {limit} cycles; a computation keeps scheduling further work")]
    CycleLimitExceeded {
        /// The cycle cap that was hit.
        limit: usize,
    },
}
