//! Test doubles for the broadcast layer and fixtures for field updates.
//!
//! Available under `cfg(test)` and the `benchmark` feature.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::aggregator::{SnapshotAggregator, SnapshotSource};
use crate::broadcast::{Subscriber, SubscriberId};
use crate::types::{
    ArmState, Attitude, CELL_SLOTS, FieldUpdate, GpsFix, Hud, Position, Power, Snapshot,
    TimedUpdate, system_status,
};
use crate::{HubError, Result};

/// Snapshot source that counts reads.
#[derive(Debug, Default)]
pub struct SpySource {
    inner: SnapshotAggregator,
    reads: AtomicUsize,
}

impl SpySource {
    /// Number of snapshots built so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl SnapshotSource for SpySource {
    fn read_snapshot(&self, now: f64) -> Snapshot {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read_snapshot(now)
    }
}

/// Subscriber that keeps every snapshot it receives.
#[derive(Debug, Default)]
pub struct RecordingSubscriber {
    received: Mutex<Vec<Arc<Snapshot>>>,
}

impl RecordingSubscriber {
    /// Snapshots received so far.
    pub fn received(&self) -> Vec<Arc<Snapshot>> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl Subscriber for RecordingSubscriber {
    async fn send(&self, _id: SubscriberId, snapshot: Arc<Snapshot>) -> Result<()> {
        self.received.lock().push(snapshot);
        Ok(())
    }
}

/// Subscriber that only counts deliveries.
#[derive(Debug, Default)]
pub struct CountingSubscriber {
    delivered: AtomicUsize,
}

impl CountingSubscriber {
    /// Snapshots delivered so far.
    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Subscriber for CountingSubscriber {
    async fn send(&self, _id: SubscriberId, _snapshot: Arc<Snapshot>) -> Result<()> {
        self.delivered.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Subscriber whose channel is always broken.
#[derive(Debug, Default)]
pub struct FailingSubscriber;

#[async_trait]
impl Subscriber for FailingSubscriber {
    async fn send(&self, id: SubscriberId, _snapshot: Arc<Snapshot>) -> Result<()> {
        Err(HubError::SubscriberClosed { id })
    }
}

/// Subscriber that never completes a send.
#[derive(Debug, Default)]
pub struct StalledSubscriber;

#[async_trait]
impl Subscriber for StalledSubscriber {
    async fn send(&self, _id: SubscriberId, _snapshot: Arc<Snapshot>) -> Result<()> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// A plausible update for every field group, heartbeat at `timestamp`.
pub fn full_update_set(timestamp: f64) -> Vec<TimedUpdate> {
    let mut voltages = [u16::MAX; CELL_SLOTS];
    voltages[0] = 12_600;

    vec![
        TimedUpdate::new(
            timestamp,
            FieldUpdate::Heartbeat(ArmState {
                base_mode: 0x81,
                custom_mode: 4,
                system_status: system_status::ACTIVE,
            }),
        ),
        TimedUpdate::new(
            timestamp,
            FieldUpdate::Attitude(Attitude { roll: 0.1, pitch: -0.05, yaw: 1.5 }),
        ),
        TimedUpdate::new(
            timestamp,
            FieldUpdate::Hud(Hud {
                airspeed: 18.0,
                groundspeed: 17.5,
                climb: 0.5,
                heading: 92,
                throttle: 48,
            }),
        ),
        TimedUpdate::new(
            timestamp,
            FieldUpdate::Position(Position {
                lat: 473_977_418,
                lon: 85_455_939,
                alt: 520_000,
                relative_alt: 32_000,
            }),
        ),
        TimedUpdate::new(
            timestamp,
            FieldUpdate::Power(Power { voltages, current_battery: 142, battery_remaining: 76 }),
        ),
        TimedUpdate::new(
            timestamp,
            FieldUpdate::GpsFix(GpsFix { fix_type: 3, satellites_visible: 14, eph: 90 }),
        ),
    ]
}
