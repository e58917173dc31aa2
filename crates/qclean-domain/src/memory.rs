//! In-memory work queue
//!
//! A thread-safe reference implementation of [`WorkQueue`], used by hosts that
//! keep their queue in process and by the test suites.

use crate::traits::{CancelOutcome, WorkQueue};
use crate::{ItemHandle, QueueItem};
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mutex-guarded list of pending items
///
/// Cloning yields another handle to the same queue. Every operation leaves the
/// list whole, so a lock poisoned by a panicking holder is taken over rather
/// than reported.
#[derive(Debug, Clone, Default)]
pub struct MemoryQueue {
    items: Arc<Mutex<Vec<QueueItem>>>,
}

impl MemoryQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item and return its handle
    pub fn enqueue(&self, item: QueueItem) -> ItemHandle {
        let handle = item.handle;
        self.lock().push(item);
        handle
    }

    /// Remove an item because it started executing or was withdrawn
    ///
    /// Returns the item if it was still pending.
    pub fn take(&self, handle: ItemHandle) -> Option<QueueItem> {
        let mut items = self.lock();
        items
            .iter()
            .position(|item| item.handle == handle)
            .map(|idx| items.remove(idx))
    }

    /// Whether the item is still pending
    pub fn contains(&self, handle: ItemHandle) -> bool {
        self.lock().iter().any(|item| item.handle == handle)
    }

    /// Number of pending items
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Vec<QueueItem>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WorkQueue for MemoryQueue {
    type Error = Infallible;

    fn list_items(&self) -> Result<Vec<QueueItem>, Self::Error> {
        Ok(self.lock().clone())
    }

    fn cancel(&self, handle: ItemHandle) -> Result<CancelOutcome, Self::Error> {
        match self.take(handle) {
            Some(_) => Ok(CancelOutcome::Cancelled),
            None => Ok(CancelOutcome::NotQueued),
        }
    }
}
