//! Decoded field-group values and the update events that carry them

use serde::{Deserialize, Serialize};

/// Number of cell slots reported by a battery status message.
pub const CELL_SLOTS: usize = 10;

/// `base_mode` flag set while the vehicle is armed.
pub const MODE_FLAG_SAFETY_ARMED: u8 = 0x80;

/// Vehicle system status as reported in heartbeats.
pub mod system_status {
    pub const UNINIT: u8 = 0;
    pub const BOOT: u8 = 1;
    pub const CALIBRATING: u8 = 2;
    pub const STANDBY: u8 = 3;
    pub const ACTIVE: u8 = 4;
    pub const CRITICAL: u8 = 5;
    pub const EMERGENCY: u8 = 6;
    pub const POWEROFF: u8 = 7;
    pub const FLIGHT_TERMINATION: u8 = 8;
}

/// Vehicle orientation in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Attitude {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

/// Head-up display values: speeds in m/s, heading in degrees, throttle in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub airspeed: f32,
    pub groundspeed: f32,
    pub climb: f32,
    pub heading: i16,
    pub throttle: u16,
}

/// Global position: latitude/longitude in degE7, altitudes in millimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: i32,
    pub lon: i32,
    pub alt: i32,
    pub relative_alt: i32,
}

/// Battery status with raw per-cell readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Power {
    pub voltages: [u16; CELL_SLOTS],
    pub current_battery: i16,
    pub battery_remaining: i8,
}

/// GPS receiver fix quality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    pub fix_type: u8,
    pub satellites_visible: u8,
    pub eph: u16,
}

/// Arm state and flight mode carried by heartbeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmState {
    pub base_mode: u8,
    pub custom_mode: u32,
    pub system_status: u8,
}

impl ArmState {
    /// Whether the safety-armed flag is set.
    pub fn is_armed(&self) -> bool {
        self.base_mode & MODE_FLAG_SAFETY_ARMED != 0
    }

    /// Whether the vehicle reports an emergency or flight termination state.
    pub fn is_estopped(&self) -> bool {
        matches!(
            self.system_status,
            system_status::EMERGENCY | system_status::FLIGHT_TERMINATION
        )
    }
}

/// One decoded message from the device link, tagged by the group it updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldUpdate {
    Attitude(Attitude),
    Hud(Hud),
    Position(Position),
    Power(Power),
    GpsFix(GpsFix),
    /// Heartbeats update the arm state and feed the rate estimator.
    Heartbeat(ArmState),
    /// Free-form status text destined for the message log.
    StatusText(String),
}

impl FieldUpdate {
    /// Short name of the group this update targets, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldUpdate::Attitude(_) => "attitude",
            FieldUpdate::Hud(_) => "hud",
            FieldUpdate::Position(_) => "position",
            FieldUpdate::Power(_) => "power",
            FieldUpdate::GpsFix(_) => "gps_fix",
            FieldUpdate::Heartbeat(_) => "heartbeat",
            FieldUpdate::StatusText(_) => "status_text",
        }
    }
}

/// A field update together with the time the link observed it, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedUpdate {
    pub timestamp: f64,
    pub update: FieldUpdate,
}

impl TimedUpdate {
    /// Create a new timed update
    pub fn new(timestamp: f64, update: FieldUpdate) -> Self {
        Self { timestamp, update }
    }
}
