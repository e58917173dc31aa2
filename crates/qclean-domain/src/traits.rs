//! Trait definitions for external interactions
//!
//! The queue is owned by the hosting system. The cleanup core reaches it only
//! through [`WorkQueue`].

use crate::{ItemHandle, QueueItem};
use std::sync::Arc;

/// Result of a cancellation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The item was pending and has been removed
    Cancelled,

    /// The handle no longer refers to a pending item (started, withdrawn or
    /// already cancelled). Cancelling it was a no-op.
    NotQueued,
}

/// A live queue of pending items
///
/// Implementations are shared with the rest of the hosting system, so both
/// operations take `&self` and must be individually atomic. `cancel` on a
/// handle that has already left the queue must return
/// [`CancelOutcome::NotQueued`], never fail or panic.
pub trait WorkQueue {
    /// Error type for queue operations
    type Error: std::fmt::Display;

    /// Snapshot of the items pending at call time
    fn list_items(&self) -> Result<Vec<QueueItem>, Self::Error>;

    /// Request cancellation of the item behind `handle`
    fn cancel(&self, handle: ItemHandle) -> Result<CancelOutcome, Self::Error>;
}

impl<Q: WorkQueue + ?Sized> WorkQueue for &Q {
    type Error = Q::Error;

    fn list_items(&self) -> Result<Vec<QueueItem>, Self::Error> {
        (**self).list_items()
    }

    fn cancel(&self, handle: ItemHandle) -> Result<CancelOutcome, Self::Error> {
        (**self).cancel(handle)
    }
}

impl<Q: WorkQueue + ?Sized> WorkQueue for Arc<Q> {
    type Error = Q::Error;

    fn list_items(&self) -> Result<Vec<QueueItem>, Self::Error> {
        (**self).list_items()
    }

    fn cancel(&self, handle: ItemHandle) -> Result<CancelOutcome, Self::Error> {
        (**self).cancel(handle)
    }
}
