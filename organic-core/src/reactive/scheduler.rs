//! Write-Batching Scheduler
//!
//! The scheduler coalesces every signal write in a synchronous turn into a
//! single deduplicated flush of the affected computations.
//!
//! # Why batching
//!
//! Without it, N sequential writes to signals read by the same computation
//! would re-run it N times. With it, a computation re-runs at most once per
//! flush cycle no matter how many of its dependencies changed, and
//! observers always see fully-settled state once [`flush`] returns.
//!
//! # The flush point
//!
//! There is no hidden event-loop hook: the host calls [`flush`] once per
//! logical tick. A flush snapshots the pending queue, clears it, and runs
//! each live entry exactly once in the order it was scheduled. Computations
//! may write further signals while running; that work lands in the next
//! cycle of the same flush. A cycle cap turns a write loop into a
//! reportable [`FlushError`] instead of a hang.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use super::computation::{Computation, ComputationId};
use crate::error::FlushError;

/// Upper bound on scheduling cycles within one [`flush`] call.
pub const MAX_FLUSH_CYCLES: usize = 100;

thread_local! {
    static PENDING: RefCell<IndexMap<ComputationId, Weak<Computation>>> =
        RefCell::new(IndexMap::new());
}

/// Add a computation to the pending queue.
///
/// Deduplicated by id: scheduling an already-pending computation is a
/// no-op, which is what guarantees at most one re-run per cycle.
pub(crate) fn schedule(computation: &Rc<Computation>) {
    if computation.is_disposed() {
        return;
    }
    PENDING.with(|pending| {
        pending
            .borrow_mut()
            .entry(computation.id())
            .or_insert_with(|| Rc::downgrade(computation));
    });
    tracing::trace!(id = computation.id().raw(), "computation scheduled");
}

/// Check whether any computation is waiting for the next flush.
pub fn has_pending() -> bool {
    PENDING.with(|pending| !pending.borrow().is_empty())
}

/// Run every pending computation, batched and deduplicated.
///
/// Each cycle snapshots the queue, clears it, and runs the snapshot in
/// scheduling order. Liveness is re-checked immediately before each run:
/// a computation disposed after it was scheduled is silently skipped.
/// Cycles repeat while runs schedule further work, up to
/// [`MAX_FLUSH_CYCLES`]; past that the queue is cleared and
/// [`FlushError::CycleLimitExceeded`] is returned.
///
/// Returns the number of computation runs performed.
pub fn flush() -> Result<usize, FlushError> {
    let mut total_runs = 0;

    for cycle in 0..MAX_FLUSH_CYCLES {
        let snapshot: Vec<Weak<Computation>> = PENDING.with(|pending| {
            pending.borrow_mut().drain(..).map(|(_, weak)| weak).collect()
        });

        if snapshot.is_empty() {
            tracing::trace!(cycles = cycle, runs = total_runs, "flush settled");
            return Ok(total_runs);
        }

        for weak in snapshot {
            // Re-check liveness right before the run; disposal may have
            // raced the schedule.
            if let Some(computation) = weak.upgrade() {
                if !computation.is_disposed() {
                    computation.run();
                    total_runs += 1;
                }
            }
        }
    }

    PENDING.with(|pending| pending.borrow_mut().clear());
    tracing::error!(
        limit = MAX_FLUSH_CYCLES,
        "flush cycle limit exceeded; dropping pending work"
    );
    Err(FlushError::CycleLimitExceeded {
        limit: MAX_FLUSH_CYCLES,
    })
}
