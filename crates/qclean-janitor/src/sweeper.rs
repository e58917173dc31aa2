//! One eviction pass over the queue

use crate::{CleanupError, ConfigStore, SweepMetrics, SweepPeriod};
use qclean_domain::{CancelOutcome, ItemHandle, QueueItem, WorkQueue};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Current timestamp in milliseconds since Unix epoch
///
/// A clock set before the epoch reads as 0, which makes every item look fresh.
fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Whether a pass is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    /// Waiting for the next timer tick
    Idle,

    /// Running one pass over a queue snapshot
    Sweeping,
}

/// Shared view of a [`Sweeper`]'s state
///
/// The sweeper is borrowed mutably for the length of a pass, so other tasks
/// (and the queue itself) observe it through a handle instead.
#[derive(Debug, Clone, Default)]
pub struct SweepStateHandle {
    sweeping: Arc<AtomicBool>,
}

impl SweepStateHandle {
    /// Current state
    pub fn get(&self) -> SweepState {
        if self.sweeping.load(Ordering::Acquire) {
            SweepState::Sweeping
        } else {
            SweepState::Idle
        }
    }

    fn enter(&self) -> SweepingGuard {
        self.sweeping.store(true, Ordering::Release);
        SweepingGuard {
            sweeping: Arc::clone(&self.sweeping),
        }
    }
}

// Returns the state to Idle however the pass ends
struct SweepingGuard {
    sweeping: Arc<AtomicBool>,
}

impl Drop for SweepingGuard {
    fn drop(&mut self) {
        self.sweeping.store(false, Ordering::Release);
    }
}

/// What happened to an item marked for eviction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvictionOutcome {
    /// The queue removed the item
    Cancelled,

    /// The item left the queue after the snapshot was taken
    AlreadyGone,

    /// The queue rejected the request
    Failed(String),
}

/// An item marked for eviction in one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eviction {
    /// Handle the cancellation was issued against
    pub handle: ItemHandle,

    /// Qualified name, for reporting
    pub full_display_name: String,

    /// Time the item had spent in the queue
    pub queued_for: Duration,

    /// Result of the cancellation request
    pub outcome: EvictionOutcome,
}

/// Result of a single pass
#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    /// Effective timeout for the pass
    pub timeout_hours: f64,

    /// Effective pattern for the pass
    pub pattern: String,

    /// Recurrence period, when the pass was run by a scheduler
    pub interval_hours: Option<f64>,

    /// Items in the snapshot
    pub scanned: usize,

    /// Items whose name could not be evaluated (treated as non-matching)
    pub match_errors: usize,

    /// Items marked for eviction, in snapshot order
    pub evictions: Vec<Eviction>,
}

impl SweepReport {
    /// Items actually removed by this pass
    pub fn cancelled(&self) -> usize {
        self.count(|outcome| matches!(outcome, EvictionOutcome::Cancelled))
    }

    /// Items that vanished before they could be cancelled
    pub fn already_gone(&self) -> usize {
        self.count(|outcome| matches!(outcome, EvictionOutcome::AlreadyGone))
    }

    /// Cancellation requests that failed
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, EvictionOutcome::Failed(_)))
    }

    /// Qualified names of the items removed by this pass
    pub fn cancelled_names(&self) -> Vec<&str> {
        self.evictions
            .iter()
            .filter(|e| e.outcome == EvictionOutcome::Cancelled)
            .map(|e| e.full_display_name.as_str())
            .collect()
    }

    fn count(&self, pred: impl Fn(&EvictionOutcome) -> bool) -> usize {
        self.evictions.iter().filter(|e| pred(&e.outcome)).count()
    }
}

/// Evicts stale queue items whose qualified name matches the configured pattern
///
/// # Examples
///
/// ```
/// use qclean_domain::{MemoryQueue, QueueItem};
/// use qclean_janitor::{CleanupSettings, ConfigStore, Sweeper};
///
/// let queue = MemoryQueue::new();
/// queue.enqueue(QueueItem::new("deploy-prod", "deploy-prod", 0));
///
/// let config = ConfigStore::new(CleanupSettings::new(1.0, "^deploy-.*"));
/// let mut sweeper = Sweeper::new(config);
///
/// // Two hours after the epoch the item is one hour past its timeout
/// let report = sweeper.sweep_at(&queue, 2 * 3_600_000).unwrap();
/// assert_eq!(report.cancelled_names(), vec!["deploy-prod"]);
/// assert!(queue.is_empty());
/// ```
pub struct Sweeper {
    config: ConfigStore,
    metrics: SweepMetrics,
    state: SweepStateHandle,
    period: Option<SweepPeriod>,
}

impl Sweeper {
    /// Create a sweeper reading its settings from `config`
    pub fn new(config: ConfigStore) -> Self {
        Self {
            config,
            metrics: SweepMetrics::new(),
            state: SweepStateHandle::default(),
            period: None,
        }
    }

    /// Record the period this sweeper is scheduled on
    ///
    /// The period is reported with every pass; it does not affect eviction.
    pub fn with_period(mut self, period: SweepPeriod) -> Self {
        self.period = Some(period);
        self
    }

    /// Period this sweeper is scheduled on, if any
    pub fn period(&self) -> Option<SweepPeriod> {
        self.period
    }

    /// Settings handle this sweeper reads from
    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &SweepMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Current state
    pub fn state(&self) -> SweepState {
        self.state.get()
    }

    /// Handle for observing the state from elsewhere
    pub fn state_handle(&self) -> SweepStateHandle {
        self.state.clone()
    }

    /// Run one pass using the wall clock
    pub fn sweep<Q: WorkQueue>(&mut self, queue: &Q) -> Result<SweepReport, CleanupError> {
        self.sweep_at(queue, current_timestamp_ms())
    }

    /// Run one pass with `now_ms` as the single reference time
    ///
    /// An `Err` means the pass was skipped before any item was touched. Errors
    /// on individual items never fail the pass; they are reported in the
    /// returned [`SweepReport`].
    pub fn sweep_at<Q: WorkQueue>(
        &mut self,
        queue: &Q,
        now_ms: u64,
    ) -> Result<SweepReport, CleanupError> {
        let start = Instant::now();
        let sweeping = self.state.enter();

        let result = self.run_pass(queue, now_ms);

        drop(sweeping);
        match &result {
            Ok(report) => self.metrics.record_pass(report),
            Err(_) => self.metrics.record_skip(),
        }
        self.metrics.total_runtime_ms += start.elapsed().as_millis() as u64;

        result
    }

    fn run_pass<Q: WorkQueue>(&self, queue: &Q, now_ms: u64) -> Result<SweepReport, CleanupError> {
        let settings = self.config.resolve()?;
        let items = queue
            .list_items()
            .map_err(|e| CleanupError::QueueUnavailable(e.to_string()))?;

        let interval_hours = self.period.map(|period| period.hours());
        tracing::info!(
            interval_hours,
            timeout_hours = settings.timeout_hours,
            pattern = %settings.pattern,
            items = items.len(),
            "Queue cleanup started"
        );

        let threshold_ms = settings.timeout_millis();
        let mut report = SweepReport {
            timeout_hours: settings.timeout_hours,
            pattern: settings.pattern.as_str().to_string(),
            interval_hours,
            scanned: items.len(),
            match_errors: 0,
            evictions: Vec::new(),
        };

        let mut marked: Vec<(&QueueItem, Duration)> = Vec::new();
        for item in &items {
            let queued_for = item.queued_for(now_ms);
            if queued_for.as_millis() as f64 <= threshold_ms {
                continue;
            }

            match settings.pattern.is_match(&item.full_display_name) {
                Ok(true) => marked.push((item, queued_for)),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        item = %item.full_display_name,
                        error = %e,
                        "Cannot evaluate item pattern, skipping item"
                    );
                    report.match_errors += 1;
                }
            }
        }

        for (item, queued_for) in marked {
            let outcome = cancel_item(queue, item, queued_for);
            report.evictions.push(Eviction {
                handle: item.handle,
                full_display_name: item.full_display_name.clone(),
                queued_for,
                outcome,
            });
        }

        tracing::info!(
            scanned = report.scanned,
            cancelled = report.cancelled(),
            already_gone = report.already_gone(),
            failed = report.failed(),
            match_errors = report.match_errors,
            "Queue cleanup finished"
        );

        Ok(report)
    }
}

fn cancel_item<Q: WorkQueue>(queue: &Q, item: &QueueItem, queued_for: Duration) -> EvictionOutcome {
    match queue.cancel(item.handle) {
        Ok(CancelOutcome::Cancelled) => {
            tracing::warn!(
                item = %item.full_display_name,
                queued_for_secs = queued_for.as_secs(),
                "Item removed from queue after timeout"
            );
            EvictionOutcome::Cancelled
        }
        Ok(CancelOutcome::NotQueued) => {
            tracing::info!(
                item = %item.full_display_name,
                "Item left the queue before it could be cancelled"
            );
            EvictionOutcome::AlreadyGone
        }
        Err(e) => {
            tracing::warn!(
                item = %item.full_display_name,
                error = %e,
                "Failed to cancel queue item"
            );
            EvictionOutcome::Failed(e.to_string())
        }
    }
}
