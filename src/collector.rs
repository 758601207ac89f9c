// Per-container collector: drain one stats stream into the shared sink.
// Baseline state stays local to the collector; only rows are shared.

use crate::error::StreamError;
use crate::metrics::compute_row;
use crate::models::{ContainerIdentity, SnapshotPair, StatSnapshot};
use crate::sink::ResultSink;
use crate::source::MetricsSource;
use futures_util::StreamExt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Per-collector limits.
#[derive(Debug, Clone)]
pub struct CollectorOptions {
    /// Stop after this many decoded snapshots (live streams never end on their own).
    pub sample_limit: usize,
    /// Deadline for each read; expiry ends the collector like end-of-stream.
    pub read_timeout: Duration,
    /// Publish a row for the first snapshot, computed against zero counters.
    pub emit_first_sample: bool,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            sample_limit: 2,
            read_timeout: Duration::from_secs(5),
            emit_first_sample: false,
        }
    }
}

/// How a collector terminated.
#[derive(Debug)]
pub enum CollectorOutcome {
    /// Stream ended or the sample limit was reached.
    Finished { samples: usize },
    /// The first read failed; the container has no row this cycle.
    OpenFailed(StreamError),
    /// Decode or transport error after at least one snapshot.
    Interrupted { samples: usize, error: StreamError },
    /// A read exceeded `read_timeout`. After at least one snapshot this
    /// ends the collector the same way end-of-stream does.
    TimedOut { samples: usize },
    /// The collector task panicked.
    Panicked(String),
}

impl CollectorOutcome {
    pub fn samples(&self) -> usize {
        match self {
            CollectorOutcome::OpenFailed(_) | CollectorOutcome::Panicked(_) => 0,
            CollectorOutcome::Finished { samples }
            | CollectorOutcome::Interrupted { samples, .. }
            | CollectorOutcome::TimedOut { samples } => *samples,
        }
    }

    /// True when the container ended without data or with an error.
    pub fn is_failure(&self) -> bool {
        match self {
            CollectorOutcome::Finished { .. } => false,
            CollectorOutcome::TimedOut { samples } => *samples == 0,
            CollectorOutcome::OpenFailed(_)
            | CollectorOutcome::Interrupted { .. }
            | CollectorOutcome::Panicked(_) => true,
        }
    }
}

/// Read snapshots for `container` until the stream ends, fails, times out or
/// hits the sample limit. Each snapshot after the baseline replaces the
/// container's row in `sink`.
#[instrument(skip_all, fields(container_id = %container.id))]
pub async fn collect<S: MetricsSource + ?Sized>(
    container: &ContainerIdentity,
    source: &S,
    sink: &ResultSink,
    options: &CollectorOptions,
) -> CollectorOutcome {
    let mut stream = source.open_stream(&container.id);
    let mut previous: Option<StatSnapshot> = None;
    let mut samples = 0usize;

    while samples < options.sample_limit {
        let next = match tokio::time::timeout(options.read_timeout, stream.next()).await {
            Ok(next) => next,
            Err(_) => {
                debug!(samples, "stats read timed out");
                return CollectorOutcome::TimedOut { samples };
            }
        };
        let current = match next {
            Some(Ok(s)) => s,
            Some(Err(e)) if samples == 0 => return CollectorOutcome::OpenFailed(e),
            Some(Err(error)) => return CollectorOutcome::Interrupted { samples, error },
            None => break,
        };
        samples += 1;

        if previous.is_some() || options.emit_first_sample {
            let row = compute_row(container, SnapshotPair::new(previous.as_ref(), &current));
            sink.publish(&container.id, row).await;
        }
        previous = Some(current);
    }

    debug!(samples, "stats stream finished");
    CollectorOutcome::Finished { samples }
}
