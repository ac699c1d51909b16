//! Channel-backed link fed by an external decoder

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::link::DeviceLink;
use crate::types::{FieldUpdate, TimedUpdate};
use crate::{HubError, Result};

/// Handle a decoder uses to push updates into a [`ChannelLink`].
#[derive(Debug, Clone)]
pub struct LinkSender {
    tx: mpsc::Sender<TimedUpdate>,
}

impl LinkSender {
    /// Queue one update, waiting for space if the ingress is full.
    pub async fn send(&self, timestamp: f64, update: FieldUpdate) -> Result<()> {
        self.tx
            .send(TimedUpdate::new(timestamp, update))
            .await
            .map_err(|_| HubError::link_failed("ingress closed"))
    }

    /// Queue one update without waiting; fails when full or closed.
    pub fn try_send(&self, timestamp: f64, update: FieldUpdate) -> Result<()> {
        self.tx.try_send(TimedUpdate::new(timestamp, update)).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => HubError::link_failed("ingress full"),
            mpsc::error::TrySendError::Closed(_) => HubError::link_failed("ingress closed"),
        })
    }
}

/// Link whose updates arrive over an in-process ingress queue.
///
/// The link ends once every [`LinkSender`] is dropped.
#[derive(Debug)]
pub struct ChannelLink {
    target: String,
    rx: mpsc::Receiver<TimedUpdate>,
    heartbeat_started: bool,
}

impl ChannelLink {
    /// Create a link and its sender with room for `capacity` queued updates.
    pub fn new(target: impl Into<String>, capacity: usize) -> (Self, LinkSender) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let link = Self { target: target.into(), rx, heartbeat_started: false };
        (link, LinkSender { tx })
    }

    /// Whether the heartbeat sub-protocol was started.
    pub fn heartbeat_started(&self) -> bool {
        self.heartbeat_started
    }
}

#[async_trait::async_trait]
impl DeviceLink for ChannelLink {
    async fn start_heartbeat(&mut self) -> Result<()> {
        info!(link = %self.target, "Heartbeat protocol registered");
        self.heartbeat_started = true;
        Ok(())
    }

    async fn next_update(&mut self) -> Result<Option<TimedUpdate>> {
        let update = self.rx.recv().await;
        if update.is_none() {
            debug!(link = %self.target, "All link senders dropped");
        }
        Ok(update)
    }

    fn target(&self) -> &str {
        &self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn updates_flow_until_senders_drop() {
        let (mut link, sender) = ChannelLink::new("test", 4);
        link.start_heartbeat().await.unwrap();
        assert!(link.heartbeat_started());

        sender.send(1.0, FieldUpdate::StatusText("hello".into())).await.unwrap();
        sender.try_send(2.0, FieldUpdate::StatusText("world".into())).unwrap();
        drop(sender);

        let first = link.next_update().await.unwrap().unwrap();
        assert_eq!(first.timestamp, 1.0);
        let second = link.next_update().await.unwrap().unwrap();
        assert_eq!(second.update, FieldUpdate::StatusText("world".into()));
        assert!(link.next_update().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn try_send_reports_full_ingress() {
        let (_link, sender) = ChannelLink::new("test", 1);
        sender.try_send(1.0, FieldUpdate::StatusText("a".into())).unwrap();
        let err = sender.try_send(2.0, FieldUpdate::StatusText("b".into())).unwrap_err();
        assert!(err.is_retryable());
    }
}
