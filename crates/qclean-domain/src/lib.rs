//! qclean Domain Layer
//!
//! Value objects and collaborator traits for stale queue item eviction.
//!
//! ## Key Concepts
//!
//! - **Queue item**: a unit of pending work with names and an enqueue timestamp
//! - **Item handle**: the opaque token used to request cancellation
//! - **Work queue**: the live, concurrently mutated queue owned by the host
//!
//! The queue itself belongs to the hosting system; [`WorkQueue`] is the only
//! way the cleanup core reads it or cancels items in it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod item;
pub mod memory;
pub mod traits;

// Re-exports for convenience
pub use item::{ItemHandle, QueueItem};
pub use memory::MemoryQueue;
pub use traits::{CancelOutcome, WorkQueue};
