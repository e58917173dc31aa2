//! Queue item module - a unit of pending work as seen by the cleanup core

use std::fmt;
use std::time::Duration;

/// Opaque handle used to request cancellation of a queued item
///
/// Handles are UUIDv7-based so that two items with the same display name can
/// never be confused when a cancellation is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemHandle(u128);

impl ItemHandle {
    /// Generate a new UUIDv7-based handle
    ///
    /// # Examples
    ///
    /// ```
    /// use qclean_domain::ItemHandle;
    ///
    /// let handle = ItemHandle::new();
    /// assert!(handle.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a handle from a raw u128 value
    ///
    /// Used by queue implementations that already carry their own identifiers.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a handle from its UUID string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid item handle: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for ItemHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// An item waiting in the work queue
///
/// Owned by the queue; the cleanup core only reads it and, at most, asks the
/// queue to cancel it through [`QueueItem::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    /// Handle used for cancellation (never the name)
    pub handle: ItemHandle,

    /// Short display name, e.g. `deploy`
    pub display_name: String,

    /// Fully-qualified display name, e.g. `team-a/deploy`
    ///
    /// This is the name eviction patterns are matched against.
    pub full_display_name: String,

    /// Enqueue time in milliseconds since the Unix epoch
    pub enqueued_at: u64,
}

impl QueueItem {
    /// Create a new item with a fresh handle
    pub fn new(
        display_name: impl Into<String>,
        full_display_name: impl Into<String>,
        enqueued_at: u64,
    ) -> Self {
        Self {
            handle: ItemHandle::new(),
            display_name: display_name.into(),
            full_display_name: full_display_name.into(),
            enqueued_at,
        }
    }

    /// How long the item has been queued as of `now_ms`
    ///
    /// Saturates to zero for items stamped after `now_ms` (clock skew between
    /// the queue and the sweeper).
    pub fn queued_for(&self, now_ms: u64) -> Duration {
        Duration::from_millis(now_ms.saturating_sub(self.enqueued_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_uniqueness() {
        let a = ItemHandle::new();
        let b = ItemHandle::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_handle_string_form() {
        let handle = ItemHandle::new();
        let s = handle.to_string();
        assert_eq!(s.len(), 36);
        assert_eq!(ItemHandle::from_string(&s).unwrap(), handle);
        assert!(ItemHandle::from_string("deploy-prod").is_err());
    }

    #[test]
    fn test_queued_for() {
        let item = QueueItem::new("deploy", "team-a/deploy", 1_000);
        assert_eq!(item.queued_for(4_000), Duration::from_millis(3_000));
    }

    #[test]
    fn test_queued_for_future_stamp_is_zero() {
        let item = QueueItem::new("deploy", "team-a/deploy", 10_000);
        assert_eq!(item.queued_for(4_000), Duration::ZERO);
    }
}
