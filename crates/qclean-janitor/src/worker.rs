//! Background worker for continuous queue cleanup

use crate::{
    CleanupError, ConfigStore, SweepMetrics, SweepPeriod, SweepReport, SweepStateHandle, Sweeper,
};
use qclean_domain::WorkQueue;
use std::future::Future;
use tokio::time::{interval, MissedTickBehavior};

/// Background worker that runs a [`Sweeper`] on a fixed period
///
/// Passes run one at a time inside the worker's task, so a slow pass delays
/// the next tick instead of overlapping with it. A skipped pass is logged and
/// the loop carries on; only shutdown ends it.
///
/// # Examples
///
/// ```no_run
/// use qclean_domain::MemoryQueue;
/// use qclean_janitor::{ConfigStore, SweepWorker};
///
/// #[tokio::main]
/// async fn main() {
///     let queue = MemoryQueue::new();
///     let config = ConfigStore::default();
///     let mut worker = SweepWorker::from_env(config.clone());
///
///     // Run until Ctrl+C; `config` stays with the host for updates
///     worker.run(queue).await;
/// }
/// ```
pub struct SweepWorker {
    sweeper: Sweeper,
    period: SweepPeriod,
}

impl SweepWorker {
    /// Create a worker with an explicit period
    pub fn new(config: ConfigStore, period: SweepPeriod) -> Self {
        Self {
            sweeper: Sweeper::new(config).with_period(period),
            period,
        }
    }

    /// Create a worker whose period comes from the environment
    pub fn from_env(config: ConfigStore) -> Self {
        Self::new(config, SweepPeriod::from_env())
    }

    /// The period between passes
    pub fn period(&self) -> SweepPeriod {
        self.period
    }

    /// Run the worker until Ctrl+C
    ///
    /// If the signal handler cannot be installed the worker keeps running.
    pub async fn run<Q: WorkQueue>(&mut self, queue: Q) {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        };

        self.run_until(queue, shutdown).await;
    }

    /// Run the worker until `shutdown` resolves
    pub async fn run_until<Q, F>(&mut self, queue: Q, shutdown: F)
    where
        Q: WorkQueue,
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.period.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(
            interval_hours = self.period.hours(),
            "Queue cleanup worker started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let _ = self.tick(&queue);
                }
                _ = &mut shutdown => {
                    tracing::info!("Shutdown signal received, stopping queue cleanup");
                    break;
                }
            }
        }

        tracing::info!(
            "Queue cleanup worker stopped. Final metrics:\n{}",
            self.metrics().summary()
        );
    }

    /// Run for a specific number of passes (useful for testing)
    ///
    /// Returns the outcome of every pass, skipped ones included.
    pub async fn run_cycles<Q: WorkQueue>(
        &mut self,
        queue: Q,
        cycles: usize,
    ) -> Vec<Result<SweepReport, CleanupError>> {
        let mut ticker = interval(self.period.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut results = Vec::with_capacity(cycles);
        for _ in 0..cycles {
            ticker.tick().await;
            results.push(self.tick(&queue));
        }

        results
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &SweepMetrics {
        self.sweeper.metrics()
    }

    /// Handle for observing whether a pass is in progress
    pub fn state_handle(&self) -> SweepStateHandle {
        self.sweeper.state_handle()
    }

    /// Reset the metrics counters
    pub fn reset_metrics(&mut self) {
        self.sweeper.reset_metrics();
    }

    fn tick<Q: WorkQueue>(&mut self, queue: &Q) -> Result<SweepReport, CleanupError> {
        tracing::debug!("Starting queue cleanup pass");

        let result = self.sweeper.sweep(queue);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Queue cleanup pass skipped");
        }
        result
    }
}
