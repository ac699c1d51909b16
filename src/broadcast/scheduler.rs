//! Periodic fan-out of snapshots to the subscriber registry

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::registry::{SubscriberId, SubscriberRegistry};
use crate::aggregator::SnapshotSource;
use crate::clock::Clock;
use crate::HubError;

/// Outcome of one broadcast pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Subscribers that accepted the snapshot
    pub delivered: usize,
    /// Subscribers pruned after failing
    pub removed: Vec<SubscriberId>,
}

impl TickReport {
    /// Whether the tick was skipped for lack of subscribers.
    pub fn is_idle(&self) -> bool {
        self.delivered == 0 && self.removed.is_empty()
    }
}

/// Pushes one snapshot per period to every live subscriber.
pub struct BroadcastScheduler<S: SnapshotSource> {
    source: Arc<S>,
    registry: Arc<SubscriberRegistry>,
    period: Duration,
    send_timeout: Duration,
}

impl<S: SnapshotSource> BroadcastScheduler<S> {
    /// Create a scheduler over `source` and `registry`
    pub fn new(
        source: Arc<S>,
        registry: Arc<SubscriberRegistry>,
        period: Duration,
        send_timeout: Duration,
    ) -> Self {
        Self { source, registry, period, send_timeout }
    }

    /// Broadcast period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run one broadcast pass at time `now`.
    ///
    /// With no subscribers nothing is read. Otherwise exactly one snapshot is
    /// built and sent to every subscriber concurrently; subscribers that fail
    /// or exceed the send timeout are removed once all sends have finished.
    pub async fn tick(&self, now: f64) -> TickReport {
        let members = self.registry.members();
        if members.is_empty() {
            return TickReport::default();
        }

        let snapshot = Arc::new(self.source.read_snapshot(now));
        trace!(sequence = snapshot.sequence, subscribers = members.len(), "Broadcasting snapshot");

        let timeout = self.send_timeout;
        let sends = members.into_iter().map(|(id, subscriber)| {
            let snapshot = Arc::clone(&snapshot);
            async move {
                let send = tokio::time::timeout(timeout, subscriber.send(id, snapshot));
                let result = send.await.unwrap_or(Err(HubError::SendTimeout { id, timeout }));
                (id, result)
            }
        });

        let mut report = TickReport::default();
        for (id, result) in join_all(sends).await {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(subscriber = %id, "Dropping subscriber: {}", e);
                    report.removed.push(id);
                }
            }
        }

        let pruned = self.registry.remove_all(&report.removed);
        if pruned > 0 {
            debug!(pruned, live = self.registry.len(), "Pruned failed subscribers");
        }

        report
    }

    /// Tick every period until `cancel` fires.
    pub async fn run<C: Clock>(self, clock: Arc<C>, cancel: CancellationToken) {
        info!(period = ?self.period, "Broadcast scheduler started");
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = 0u64;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Broadcast scheduler cancelled");
                    break;
                }
                _ = ticker.tick() => {}
            }

            let report = self.tick(clock.now()).await;
            if !report.is_idle() {
                ticks += 1;
            }
        }

        info!("Broadcast scheduler ended ({} broadcasts)", ticks);
    }
}
