//! Snapshot and command acknowledgement types

use serde::{Deserialize, Serialize};

use super::field_update::CELL_SLOTS;

/// Outcome of a command as reported back by the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandResult {
    Accepted,
    TemporarilyRejected,
    Denied,
    Unsupported,
    Failed,
    InProgress,
    Cancelled,
}

/// Latest acknowledgement injected by the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAck {
    pub command: u16,
    pub result: CommandResult,
}

/// One immutable, fully-merged view of all tracked telemetry.
///
/// Every value is already converted to display units. Field groups that never
/// reported contribute zeroes. Serializes to a flat camelCase object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Monotonic per-snapshot counter, starting at 1
    pub sequence: u64,
    /// Time the snapshot was built, in seconds
    pub timestamp: f64,

    pub heartbeat_count: u64,
    /// Smoothed heartbeat rate; `-1.0` when unknown
    #[serde(rename = "heartbeatHZ")]
    pub heartbeat_hz: f64,

    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,

    pub heading: f64,
    pub airspeed: f64,
    pub vertical_speed: f64,
    pub ground_speed: f64,
    pub throttle: f64,

    pub altitude: f64,
    pub altitude_msl: f64,
    pub latitude: f64,
    pub longitude: f64,

    pub cell_voltages: [f64; CELL_SLOTS],
    pub pack_voltage: f64,
    pub current: f64,
    pub power: f64,
    pub battery_remaining: i8,

    pub gps_fix_type: u8,
    pub satellites: u8,

    pub armed: bool,
    pub estop: bool,
    pub mode: u32,

    /// Status text accumulated since the previous snapshot
    pub messages: String,
    pub command_ack: Option<CommandAck>,
}
