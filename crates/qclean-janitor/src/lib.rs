//! qclean Janitor
//!
//! Background housekeeping that evicts items left waiting in a work queue for
//! too long.
//!
//! # Overview
//!
//! The janitor is responsible for:
//! - **Settings**: holding the eviction timeout and item pattern, and handing
//!   out only usable values even when the stored ones are broken
//! - **Sweeping**: one pass over a queue snapshot, cancelling items that are
//!   both older than the timeout and whose qualified name matches the pattern
//! - **Scheduling**: repeating the pass on a fixed period resolved at startup
//! - **Metrics**: tracking what each pass cancelled, skipped or failed
//!
//! The queue itself is external and reached through
//! [`qclean_domain::WorkQueue`].
//!
//! # Fail-safe defaults
//!
//! | Stored value | What readers get |
//! |--------------|------------------|
//! | timeout not a number, or `<= 0.005` | 24 hours |
//! | pattern that does not compile | [`MATCH_NOTHING_PATTERN`] |
//! | fresh install | 24 hours, [`MATCH_NOTHING_PATTERN`] |
//!
//! A broken configuration therefore degrades to "evict nothing".
//!
//! # Usage
//!
//! ## One-time Sweep
//!
//! ```
//! use qclean_domain::{MemoryQueue, QueueItem};
//! use qclean_janitor::{ConfigStore, Sweeper};
//!
//! let queue = MemoryQueue::new();
//! queue.enqueue(QueueItem::new("nightly", "infra/nightly", 0));
//!
//! let config = ConfigStore::default();
//! config.load_toml(r#"
//!     [queue_cleanup]
//!     timeout = 12
//!     itemPattern = "infra/.*"
//! "#).unwrap();
//!
//! let mut sweeper = Sweeper::new(config);
//! let report = sweeper.sweep(&queue).unwrap();
//! assert_eq!(report.cancelled(), 1);
//! println!("{}", sweeper.metrics().summary());
//! ```
//!
//! ## Background Worker
//!
//! ```no_run
//! use qclean_domain::MemoryQueue;
//! use qclean_janitor::{ConfigStore, SweepWorker};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let queue = Arc::new(MemoryQueue::new());
//!     let config = ConfigStore::default();
//!
//!     // Period from QUEUE_CLEANUP_PERIOD_HOURS, 24 hours if unset
//!     let mut worker = SweepWorker::from_env(config.clone());
//!     worker.run(queue.clone()).await;
//! }
//! ```
//!
//! ## Interactive Form
//!
//! ```
//! use qclean_janitor::{ConfigStore, FormSubmission};
//!
//! let config = ConfigStore::default();
//! let err = config
//!     .submit_form(&FormSubmission::new("6", "deploy-("))
//!     .unwrap_err();
//!
//! assert_eq!(err.field(), "itemPattern");
//! println!("{}", err.render_preformatted());
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod metrics;
mod pattern;
mod schedule;
mod store;
mod sweeper;
mod validation;
mod worker;

pub use config::{CleanupSettings, DeclarativeSettings, FormSubmission, TimeoutValue};
pub use error::{CleanupError, MatchError, ValidationError};
pub use metrics::SweepMetrics;
pub use pattern::{ItemPattern, MATCH_NOTHING_PATTERN, MAX_MATCH_INPUT_BYTES};
pub use schedule::{SweepPeriod, DEFAULT_PERIOD_HOURS, PERIOD_ENV_VAR};
pub use store::{ConfigStore, ResolvedSettings};
pub use sweeper::{Eviction, EvictionOutcome, SweepReport, SweepState, SweepStateHandle, Sweeper};
pub use validation::{
    is_valid_timeout, parse_timeout, validate_item_pattern, validate_timeout,
    DEFAULT_TIMEOUT_HOURS, MIN_TIMEOUT_HOURS,
};
pub use worker::SweepWorker;
