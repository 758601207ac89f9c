// Collection cycle: list containers, fan out one collector per container
// (bounded), join them all, then hand ordered rows to the presenter.

use crate::collector::{self, CollectorOptions, CollectorOutcome};
use crate::error::InventoryError;
use crate::models::MetricRow;
use crate::presenter::Presenter;
use crate::sink::ResultSink;
use crate::source::{ContainerInventory, MetricsSource};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Semaphore, oneshot};
use tokio::task::{self, JoinSet};
use tokio::time::{Duration, interval};
use tracing::{debug, info, instrument, warn};

/// A container whose collector ended without a clean finish.
#[derive(Debug)]
pub struct CollectorFailure {
    pub container_id: String,
    pub outcome: CollectorOutcome,
}

/// Result of one cycle: rows in inventory order plus per-container failures.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub rows: Vec<MetricRow>,
    pub failures: Vec<CollectorFailure>,
}

pub struct Orchestrator<I, S> {
    inventory: Arc<I>,
    source: Arc<S>,
    options: CollectorOptions,
    max_concurrent_streams: usize,
}

impl<I, S> Orchestrator<I, S>
where
    I: ContainerInventory,
    S: MetricsSource,
{
    pub fn new(
        inventory: Arc<I>,
        source: Arc<S>,
        options: CollectorOptions,
        max_concurrent_streams: usize,
    ) -> Self {
        Self {
            inventory,
            source,
            options,
            max_concurrent_streams: max_concurrent_streams.clamp(1, Semaphore::MAX_PERMITS),
        }
    }

    /// Run one full cycle. Fails only when the inventory cannot be listed;
    /// collector failures are isolated and reported in the returned value.
    #[instrument(skip(self), fields(max_concurrent_streams = self.max_concurrent_streams))]
    pub async fn run_cycle(&self) -> Result<CycleReport, InventoryError> {
        let containers = self.inventory.list_containers().await?;
        debug!(containers = containers.len(), "starting collection cycle");

        let sink = ResultSink::new();
        let permits = Arc::new(Semaphore::new(self.max_concurrent_streams));
        let mut tasks = JoinSet::new();
        let mut task_owners: HashMap<task::Id, String> = HashMap::with_capacity(containers.len());

        for container in containers.iter().cloned() {
            let source = self.source.clone();
            let sink = sink.clone();
            let options = self.options.clone();
            let permits = permits.clone();
            let container_id = container.id.clone();
            let handle = tasks.spawn(async move {
                // Semaphore is never closed, so acquire only fails if that changes.
                let _permit = permits.acquire_owned().await.ok();
                let outcome = collector::collect(&container, source.as_ref(), &sink, &options).await;
                (container.id, outcome)
            });
            task_owners.insert(handle.id(), container_id);
        }

        let mut failures = Vec::new();
        while let Some(joined) = tasks.join_next_with_id().await {
            let (container_id, outcome) = match joined {
                Ok((_, done)) => done,
                Err(e) => {
                    let container_id = task_owners.remove(&e.id()).unwrap_or_default();
                    (container_id, CollectorOutcome::Panicked(e.to_string()))
                }
            };
            log_outcome(&container_id, &outcome);
            if outcome.is_failure() {
                failures.push(CollectorFailure {
                    container_id,
                    outcome,
                });
            }
        }

        let rows = sink.ordered_rows(&containers).await;
        debug!(
            rows = rows.len(),
            failures = failures.len(),
            "collection cycle complete"
        );
        Ok(CycleReport { rows, failures })
    }

    /// One cycle, rendered once.
    pub async fn collect_and_render<P: Presenter + ?Sized>(
        &self,
        presenter: &mut P,
    ) -> anyhow::Result<CycleReport> {
        let report = self.run_cycle().await?;
        presenter.render(&report.rows)?;
        Ok(report)
    }

    /// Re-run the cycle every `period` until `shutdown_rx` fires. An inventory
    /// failure on the first cycle is returned; later ones skip the frame.
    pub async fn watch<P: Presenter + ?Sized>(
        &self,
        presenter: &mut P,
        period: Duration,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) -> anyhow::Result<()> {
        let mut tick = interval(period);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut frames: u64 = 0;

        loop {
            tokio::select! {
                _ = tick.tick() => {}
                _ = &mut shutdown_rx => break,
            }
            let result = tokio::select! {
                result = self.run_cycle() => result,
                _ = &mut shutdown_rx => break,
            };
            match result {
                Ok(report) => {
                    presenter.render(&report.rows)?;
                    frames += 1;
                }
                Err(e) if frames == 0 => return Err(e.into()),
                Err(e) => {
                    warn!(error = %e, operation = "list_containers", "skipping refresh");
                }
            }
        }
        info!(frames, "watch stopped");
        Ok(())
    }
}

fn log_outcome(container_id: &str, outcome: &CollectorOutcome) {
    match outcome {
        CollectorOutcome::Finished { samples } => {
            debug!(container_id, samples, "collector finished");
        }
        CollectorOutcome::OpenFailed(e) => {
            warn!(container_id, error = %e, "failed to open stats stream");
        }
        CollectorOutcome::Interrupted { samples, error } => {
            warn!(container_id, samples, error = %error, "stats stream interrupted");
        }
        CollectorOutcome::TimedOut { samples: 0 } => {
            warn!(container_id, "no stats received before timeout");
        }
        CollectorOutcome::TimedOut { samples } => {
            debug!(container_id, samples, "stats read timed out");
        }
        CollectorOutcome::Panicked(e) => {
            warn!(container_id, error = %e, "collector task panicked");
        }
    }
}
