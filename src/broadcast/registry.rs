//! Live set of push subscribers

use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

use crate::types::Snapshot;
use crate::{HubError, Result};

/// Identity assigned to a subscriber when it registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Wrap a raw identifier
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identifier value
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One connected push channel.
///
/// Any error returned from [`Subscriber::send`] is final: the registry drops
/// the subscriber and never retries it.
#[async_trait]
pub trait Subscriber: Send + Sync + 'static {
    async fn send(&self, id: SubscriberId, snapshot: Arc<Snapshot>) -> Result<()>;
}

/// Subscriber backed by a bounded channel.
///
/// A full channel waits for capacity, so a stalled reader is cut off by the
/// scheduler's send timeout. A dropped receiver fails immediately.
#[derive(Debug, Clone)]
pub struct ChannelSubscriber {
    tx: mpsc::Sender<Arc<Snapshot>>,
}

impl ChannelSubscriber {
    /// Create a subscriber and the receiver its snapshots arrive on.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Arc<Snapshot>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Subscriber for ChannelSubscriber {
    async fn send(&self, id: SubscriberId, snapshot: Arc<Snapshot>) -> Result<()> {
        self.tx.send(snapshot).await.map_err(|_| HubError::SubscriberClosed { id })
    }
}

/// Currently connected subscribers.
#[derive(Default)]
pub struct SubscriberRegistry {
    members: Mutex<Vec<(SubscriberId, Arc<dyn Subscriber>)>>,
    next_id: AtomicU64,
}

impl fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRegistry").field("len", &self.len()).finish()
    }
}

impl SubscriberRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber to the live set.
    pub fn register(&self, subscriber: Arc<dyn Subscriber>) -> SubscriberId {
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let mut members = self.members.lock();
        members.push((id, subscriber));
        debug!(subscriber = %id, live = members.len(), "Subscriber registered");
        id
    }

    /// Remove one subscriber. Returns whether it was present.
    pub fn remove(&self, id: SubscriberId) -> bool {
        let mut members = self.members.lock();
        let before = members.len();
        members.retain(|(member, _)| *member != id);
        before != members.len()
    }

    /// Remove every listed subscriber in one pass.
    pub fn remove_all(&self, ids: &[SubscriberId]) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let mut members = self.members.lock();
        let before = members.len();
        members.retain(|(member, _)| !ids.contains(member));
        before - members.len()
    }

    /// Copy of the live set for one broadcast pass.
    pub fn members(&self) -> Vec<(SubscriberId, Arc<dyn Subscriber>)> {
        self.members.lock().clone()
    }

    /// Whether `id` is still live.
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.members.lock().iter().any(|(member, _)| *member == id)
    }

    /// Number of live subscribers.
    pub fn len(&self) -> usize {
        self.members.lock().len()
    }

    /// Whether nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.members.lock().is_empty()
    }
}
