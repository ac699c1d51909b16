//! Shared last-value-wins telemetry state
//!
//! Each field group sits behind its own lock so updates to different groups
//! never contend, and a read copies one group at a time. A snapshot is
//! therefore consistent within a group but may combine groups observed at
//! different instants.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

use crate::conversions;
use crate::message_log::MessageLog;
use crate::rate::RateEstimator;
use crate::types::{
    ArmState, Attitude, CommandAck, FieldUpdate, GpsFix, Hud, Position, Power, Snapshot,
    TimedUpdate,
};

/// Anything that can produce a point-in-time [`Snapshot`].
///
/// The broadcast scheduler only depends on this trait, not on the aggregator.
pub trait SnapshotSource: Send + Sync + 'static {
    fn read_snapshot(&self, now: f64) -> Snapshot;
}

/// Merges independently arriving field updates into one readable state.
#[derive(Debug, Default)]
pub struct SnapshotAggregator {
    attitude: Mutex<Attitude>,
    hud: Mutex<Hud>,
    position: Mutex<Position>,
    power: Mutex<Power>,
    gps: Mutex<GpsFix>,
    arm_state: Mutex<ArmState>,
    command_ack: Mutex<Option<CommandAck>>,
    heartbeats: Mutex<RateEstimator>,
    messages: MessageLog,
    heartbeat_count: AtomicU64,
    sequence: AtomicU64,
}

impl SnapshotAggregator {
    /// Create an aggregator whose rate estimator keeps `rate_window` heartbeats.
    pub fn new(rate_window: usize) -> Self {
        Self { heartbeats: Mutex::new(RateEstimator::new(rate_window)), ..Default::default() }
    }

    /// Overwrite the group targeted by `update`.
    pub fn apply_field_update(&self, update: TimedUpdate) {
        let TimedUpdate { timestamp, update } = update;
        trace!(kind = update.kind(), timestamp, "Applying field update");

        match update {
            FieldUpdate::Attitude(value) => *self.attitude.lock() = value,
            FieldUpdate::Hud(value) => *self.hud.lock() = value,
            FieldUpdate::Position(value) => *self.position.lock() = value,
            FieldUpdate::Power(value) => *self.power.lock() = value,
            FieldUpdate::GpsFix(value) => *self.gps.lock() = value,
            FieldUpdate::Heartbeat(value) => {
                *self.arm_state.lock() = value;
                self.heartbeats.lock().record_event(timestamp);
                self.heartbeat_count.fetch_add(1, Ordering::Relaxed);
            }
            FieldUpdate::StatusText(text) => self.messages.append(&text),
        }
    }

    /// Store the latest command acknowledgement for inclusion in snapshots.
    pub fn record_command_ack(&self, ack: CommandAck) {
        *self.command_ack.lock() = Some(ack);
    }

    /// Current heartbeat rate in Hz, or the unknown sentinel.
    pub fn heartbeat_rate_hz(&self, now: f64) -> f64 {
        self.heartbeats.lock().estimate_rate_hz(now)
    }

    /// Heartbeats ingested so far.
    pub fn heartbeat_count(&self) -> u64 {
        self.heartbeat_count.load(Ordering::Relaxed)
    }

    /// Build a snapshot, draining the message log.
    pub fn read_snapshot(&self, now: f64) -> Snapshot {
        let attitude = *self.attitude.lock();
        let hud = *self.hud.lock();
        let position = *self.position.lock();
        let power = *self.power.lock();
        let gps = *self.gps.lock();
        let arm_state = *self.arm_state.lock();
        let command_ack = *self.command_ack.lock();
        let heartbeat_hz = self.heartbeat_rate_hz(now);

        Snapshot {
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
            timestamp: now,
            heartbeat_count: self.heartbeat_count(),
            heartbeat_hz,
            roll: conversions::degrees(attitude.roll),
            pitch: conversions::degrees(attitude.pitch),
            yaw: conversions::degrees(attitude.yaw),
            heading: hud.heading as f64,
            airspeed: conversions::speed(hud.airspeed),
            vertical_speed: conversions::speed(hud.climb),
            ground_speed: conversions::speed(hud.groundspeed),
            throttle: hud.throttle as f64,
            altitude: conversions::altitude_feet(position.relative_alt),
            altitude_msl: conversions::altitude_feet(position.alt),
            latitude: conversions::coordinate(position.lat),
            longitude: conversions::coordinate(position.lon),
            cell_voltages: conversions::cell_fractions(&power.voltages),
            pack_voltage: conversions::pack_voltage(&power.voltages),
            current: conversions::current(power.current_battery),
            power: conversions::power(&power),
            battery_remaining: power.battery_remaining,
            gps_fix_type: gps.fix_type,
            satellites: gps.satellites_visible,
            armed: arm_state.is_armed(),
            estop: arm_state.is_estopped(),
            mode: arm_state.custom_mode,
            messages: self.messages.drain(),
            command_ack,
        }
    }
}

impl SnapshotSource for SnapshotAggregator {
    fn read_snapshot(&self, now: f64) -> Snapshot {
        SnapshotAggregator::read_snapshot(self, now)
    }
}
