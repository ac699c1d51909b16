//! Telemetry hub wiring ingest, pull reads and periodic fan-out

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::aggregator::SnapshotAggregator;
use crate::broadcast::{
    BroadcastScheduler, ChannelSubscriber, Subscriber, SubscriberId, SubscriberRegistry,
};
use crate::clock::Clock;
use crate::config::HubConfig;
use crate::driver::{Driver, DriverHandle};
use crate::link::DeviceLink;
use crate::types::{CommandAck, Snapshot};
use crate::Result;

/// Running telemetry hub for one device link
///
/// Owns the ingest task and the broadcast scheduler. Both stop when the hub
/// is shut down or dropped.
pub struct TelemetryHub<C: Clock> {
    aggregator: Arc<SnapshotAggregator>,
    registry: Arc<SubscriberRegistry>,
    clock: Arc<C>,
    config: HubConfig,
    cancel: CancellationToken,
    ingest: Option<DriverHandle>,
    broadcast: Option<JoinHandle<()>>,
}

impl<C: Clock> TelemetryHub<C> {
    /// Start ingesting from `link` and broadcasting on the configured period.
    ///
    /// Must be called inside a tokio runtime.
    pub fn start<L>(link: L, config: HubConfig, clock: Arc<C>) -> Result<Self>
    where
        L: DeviceLink,
    {
        config.validate()?;
        info!(
            link = link.target(),
            period_ms = config.broadcast_period_ms,
            rate_window = config.rate_window,
            "Starting telemetry hub"
        );

        let cancel = CancellationToken::new();
        let aggregator = Arc::new(SnapshotAggregator::new(config.rate_window));
        let registry = Arc::new(SubscriberRegistry::new());

        let ingest = Driver::spawn(
            link,
            Arc::clone(&aggregator),
            config.max_link_errors,
            cancel.clone(),
        );

        let scheduler = BroadcastScheduler::new(
            Arc::clone(&aggregator),
            Arc::clone(&registry),
            config.broadcast_period(),
            config.send_timeout(),
        );
        let broadcast = tokio::spawn(scheduler.run(Arc::clone(&clock), cancel.clone()));

        Ok(Self {
            aggregator,
            registry,
            clock,
            config,
            cancel,
            ingest: Some(ingest),
            broadcast: Some(broadcast),
        })
    }

    /// Pull the current snapshot.
    ///
    /// Drains the status text log like a broadcast does, so text is delivered
    /// to whichever reader comes first.
    pub fn snapshot(&self) -> Snapshot {
        self.aggregator.read_snapshot(self.clock.now())
    }

    /// Add a push subscriber to the periodic broadcast.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber>) -> SubscriberId {
        self.registry.register(subscriber)
    }

    /// Subscribe through a bounded channel and receive snapshots as a stream.
    ///
    /// The stream ends only when the hub drops the subscriber, which happens
    /// once a send fails or times out.
    pub fn subscribe_stream(&self) -> (SubscriberId, ReceiverStream<Arc<Snapshot>>) {
        let (subscriber, rx) = ChannelSubscriber::channel(self.config.subscriber_buffer);
        let id = self.registry.register(Arc::new(subscriber));
        (id, ReceiverStream::new(rx))
    }

    /// Remove a subscriber that disconnected.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let removed = self.registry.remove(id);
        debug!(subscriber = %id, removed, "Unsubscribe requested");
        removed
    }

    /// Attach a command acknowledgement to subsequent snapshots.
    pub fn record_command_ack(&self, ack: CommandAck) {
        self.aggregator.record_command_ack(ack);
    }

    /// Number of live push subscribers
    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    /// Shared aggregator, for callers that read rates directly
    pub fn aggregator(&self) -> &Arc<SnapshotAggregator> {
        &self.aggregator
    }

    /// Active configuration
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Stop ingest and broadcasting.
    pub fn shutdown(&self) {
        if !self.cancel.is_cancelled() {
            info!("Shutting down telemetry hub");
            self.cancel.cancel();
        }
    }

    /// Whether [`TelemetryHub::shutdown`] has been called.
    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the ingest task is still reading from the link.
    ///
    /// Turns false once the link closes, exceeds its error budget or the hub
    /// shuts down.
    pub fn is_ingesting(&self) -> bool {
        self.ingest.as_ref().is_some_and(|ingest| !ingest.is_finished())
    }

    /// Shut down and wait for the ingest task and the scheduler to end.
    ///
    /// Returns the number of updates applied from the link.
    pub async fn shutdown_and_wait(mut self) -> u64 {
        self.shutdown();

        if let Some(broadcast) = self.broadcast.take() {
            if let Err(e) = broadcast.await {
                warn!("Broadcast scheduler did not complete: {}", e);
            }
        }

        match self.ingest.take() {
            Some(ingest) => ingest.join().await,
            None => 0,
        }
    }
}

impl<C: Clock> Drop for TelemetryHub<C> {
    fn drop(&mut self) {
        debug!("Dropping telemetry hub");
        self.cancel.cancel();
    }
}
