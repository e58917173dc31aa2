//! Metrics collection for sweep passes

use crate::sweeper::SweepReport;

/// Cumulative counters across sweep passes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepMetrics {
    /// Completed passes
    pub sweep_count: usize,

    /// Passes skipped because settings or the queue were unavailable
    pub skipped_count: usize,

    /// Items cancelled by a pass
    pub cancelled: usize,

    /// Items that left the queue between snapshot and cancellation
    pub already_gone: usize,

    /// Cancellation requests the queue rejected
    pub cancel_failures: usize,

    /// Items whose name could not be evaluated against the pattern
    pub match_errors: usize,

    /// Total time spent in passes, in milliseconds
    pub total_runtime_ms: u64,
}

impl SweepMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a completed pass into the totals
    pub fn record_pass(&mut self, report: &SweepReport) {
        self.sweep_count += 1;
        self.cancelled += report.cancelled();
        self.already_gone += report.already_gone();
        self.cancel_failures += report.failed();
        self.match_errors += report.match_errors;
    }

    /// Record a skipped pass
    pub fn record_skip(&mut self) {
        self.skipped_count += 1;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Queue Cleanup Metrics Summary".to_string(),
            "=============================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Skipped cycles: {}", self.skipped_count),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            String::new(),
            format!("Cancelled: {}", self.cancelled),
            format!("Already gone: {}", self.already_gone),
            format!("Cancel failures: {}", self.cancel_failures),
            format!("Match errors: {}", self.match_errors),
        ]
        .join("\n")
    }
}
