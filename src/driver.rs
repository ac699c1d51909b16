//! Driver spawns and manages the link ingest task

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::aggregator::SnapshotAggregator;
use crate::link::DeviceLink;

/// First retry delay after a link error
const BASE_BACKOFF_MS: u64 = 50;

/// Doublings before the retry delay stops growing
const MAX_BACKOFF_DOUBLINGS: u32 = 5;

/// Handle to a running ingest task
pub struct DriverHandle {
    task: JoinHandle<u64>,
}

impl DriverHandle {
    /// Whether the ingest task has ended.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the ingest task and return the number of updates it applied.
    ///
    /// A task that panicked or was aborted reports zero.
    pub async fn join(self) -> u64 {
        match self.task.await {
            Ok(applied) => applied,
            Err(e) => {
                error!("Ingest task did not complete: {}", e);
                0
            }
        }
    }
}

/// Driver spawns the task that feeds link updates into the aggregator
///
/// The task is the only consumer of the link. Updates are applied in arrival
/// order; the aggregator's per-group locks serialize them against readers.
pub struct Driver;

impl Driver {
    /// Spawn the ingest task for `link`
    ///
    /// `max_errors` consecutive link failures stop the task.
    pub fn spawn<L>(
        link: L,
        aggregator: Arc<SnapshotAggregator>,
        max_errors: u32,
        cancel: CancellationToken,
    ) -> DriverHandle
    where
        L: DeviceLink,
    {
        let task = tokio::spawn(async move {
            Self::ingest_task(link, aggregator, max_errors, cancel).await
        });

        DriverHandle { task }
    }

    /// Ingest task - starts the heartbeat protocol, then applies updates
    async fn ingest_task<L>(
        mut link: L,
        aggregator: Arc<SnapshotAggregator>,
        max_errors: u32,
        cancel: CancellationToken,
    ) -> u64
    where
        L: DeviceLink,
    {
        info!(link = link.target(), "Ingest task started");

        if let Err(e) = link.start_heartbeat().await {
            // Updates can still flow without outbound heartbeats.
            warn!("Failed to start heartbeat protocol: {}", e);
        }

        let mut update_count = 0u64;
        let mut error_count = 0u32;

        loop {
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Ingest cancelled");
                    break;
                }
                result = link.next_update() => result,
            };

            match result {
                Ok(Some(update)) => {
                    update_count += 1;
                    error_count = 0;
                    trace!(
                        "Update {}: kind={}, timestamp={}",
                        update_count,
                        update.update.kind(),
                        update.timestamp
                    );
                    aggregator.apply_field_update(update);
                }
                Ok(None) => {
                    info!("Link closed after {} updates", update_count);
                    break;
                }
                Err(e) => {
                    error_count += 1;
                    error!("Link error ({}/{}): {}", error_count, max_errors, e);

                    if error_count >= max_errors {
                        error!("Too many link errors, stopping ingest");
                        break;
                    }

                    let backoff = backoff_delay(error_count);
                    debug!(?backoff, "Backing off before next read");
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }

        info!("Ingest task ended (applied {} updates)", update_count);
        update_count
    }
}

/// Delay before retrying after `consecutive_errors` failures in a row.
///
/// 50ms after the first failure, doubling per failure up to 1.6s.
fn backoff_delay(consecutive_errors: u32) -> Duration {
    let doublings = consecutive_errors.saturating_sub(1).min(MAX_BACKOFF_DOUBLINGS);
    Duration::from_millis(BASE_BACKOFF_MS << doublings)
}
